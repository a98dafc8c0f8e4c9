//! Placeholder scanner using nom.
//!
//! Splits SQL text into plain text and named placeholder references for a
//! given [`PlaceholderStyle`]:
//!
//! ```text
//! Age > @min AND Name <> '@literal' AND Id::text = @id
//! ──┬───  ─┬─ ──────────────┬────── ──────┬──────  ─┬
//!   │      │                │             │         └── Placeholder("id")
//!   │      │                │             └── text (`::` is a cast, not a placeholder)
//!   │      │                └── text (string literals are never scanned)
//!   │      └── Placeholder("min")
//!   └── text
//! ```

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{anychar, char},
    combinator::{map, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::dialect::PlaceholderStyle;

/// A piece of scanned SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied as-is.
    Text(&'a str),
    /// A placeholder reference, without its prefix.
    Placeholder(&'a str),
}

/// Scan `sql` for placeholders written in `style`.
pub fn scan(sql: &str, style: PlaceholderStyle) -> Vec<Segment<'_>> {
    let prefix = style.prefix();
    let stops = format!("'\"{}", prefix);
    let mut segments = Vec::new();
    let mut rest = sql;

    while !rest.is_empty() {
        match parse_segment(rest, prefix, &stops) {
            Ok((remaining, segment)) => {
                segments.push(segment);
                rest = remaining;
            }
            Err(_) => {
                segments.push(Segment::Text(rest));
                break;
            }
        }
    }

    segments
}

/// Distinct placeholder names, in order of first appearance.
pub fn placeholder_names(sql: &str, style: PlaceholderStyle) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in scan(sql, style) {
        if let Segment::Placeholder(name) = segment {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Parse one segment. The last alternative consumes any single char, so this
/// only fails on empty input.
fn parse_segment<'a>(input: &'a str, prefix: char, stops: &str) -> IResult<&'a str, Segment<'a>> {
    alt((
        map(string_literal, Segment::Text),
        map(quoted_identifier, Segment::Text),
        // `::`, `@@`, `$$`
        map(recognize(pair(char(prefix), char(prefix))), Segment::Text),
        map(
            preceded(char(prefix), take_while1(is_param_char)),
            Segment::Placeholder,
        ),
        map(is_not(stops), Segment::Text),
        map(recognize(anychar), Segment::Text),
    ))(input)
}

/// Parse a single-quoted string literal, `''` being an escaped quote.
fn string_literal(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('\''),
        many0(alt((is_not("'"), tag("''")))),
        char('\''),
    ))(input)
}

/// Parse a double-quoted identifier.
fn quoted_identifier(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        many0(alt((is_not("\""), tag("\"\"")))),
        char('"'),
    ))(input)
}

fn is_param_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
