//! Placeholder styles and identifier escaping.

use serde::{Deserialize, Serialize};

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "insert",
    "update",
    "delete",
    "values",
    "set",
    "into",
    "index",
    "key",
    "primary",
    "default",
    "check",
];

/// Prefix used for named parameters in generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `@name` (SQL Server, ADO.NET style).
    #[default]
    At,
    /// `:name` (Oracle, SQLite).
    Colon,
    /// `$name` (SQLite).
    Dollar,
}

impl PlaceholderStyle {
    pub fn prefix(&self) -> char {
        match self {
            PlaceholderStyle::At => '@',
            PlaceholderStyle::Colon => ':',
            PlaceholderStyle::Dollar => '$',
        }
    }

    /// Render the placeholder for a parameter name.
    pub fn placeholder(&self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }
}

/// Positional placeholders expected by database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionalStyle {
    /// `?` (MySQL, SQLite).
    Question,
    /// `$1`, `$2`, ... (PostgreSQL).
    Numbered,
}

impl PositionalStyle {
    /// Pick the style a database URL's driver understands.
    pub fn for_url(url: &str) -> Self {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            PositionalStyle::Numbered
        } else {
            PositionalStyle::Question
        }
    }

    /// Generate the placeholder for a 1-based index.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            PositionalStyle::Question => "?".to_string(),
            PositionalStyle::Numbered => format!("${}", index),
        }
    }
}

/// Escape an identifier if it's a reserved word or contains special chars.
/// Handles dotted identifiers (e.g., `schema.table`) by quoting each part.
pub fn escape_identifier(name: &str) -> String {
    if name.contains('.') {
        return name
            .split('.')
            .map(escape_single_identifier)
            .collect::<Vec<_>>()
            .join(".");
    }
    escape_single_identifier(name)
}

/// Escape a column name. Dots are part of the name, not a qualifier.
pub fn escape_column_name(name: &str) -> String {
    escape_single_identifier(name)
}

/// Escape a single identifier part (no dots).
fn escape_single_identifier(name: &str) -> String {
    let lower = name.to_lowercase();
    let needs_escaping = RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(false);

    if needs_escaping {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Turn a column name into a parameter name usable after a placeholder prefix.
pub fn parameter_name(column: &str) -> String {
    column
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
