//! WHERE expressions embedded in generated commands.

use crate::command::Parameter;
use crate::dialect::PlaceholderStyle;
use crate::error::{CmdGenError, CmdGenResult};
use crate::placeholder::{self, Segment};
use crate::value::Value;

/// A boolean SQL condition with its own bound parameters.
///
/// The generator never looks inside it; it only asks it to
/// [`render`](WhereExpression::render) into a placeholder style.
///
/// # Example
///
/// ```
/// use cmdgen::expression::WhereExpression;
/// use cmdgen::value::Value;
///
/// let expr = WhereExpression::new("Age > @1 AND Name <> @2", [Value::from(30), Value::from("Bob")]).unwrap();
/// assert_eq!(expr.parameters().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WhereExpression {
    sql: String,
    style: PlaceholderStyle,
    parameters: Vec<Parameter>,
}

impl WhereExpression {
    /// Build an expression using `@` placeholders.
    ///
    /// Distinct placeholders, in order of first appearance, are bound to
    /// `args` in order.
    pub fn new<I>(sql: impl Into<String>, args: I) -> CmdGenResult<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        Self::with_style(PlaceholderStyle::default(), sql, args)
    }

    /// Build an expression whose SQL uses `style` placeholders.
    pub fn with_style<I>(style: PlaceholderStyle, sql: impl Into<String>, args: I) -> CmdGenResult<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let sql = sql.into();
        let args: Vec<Value> = args.into_iter().collect();
        let names = placeholder::placeholder_names(&sql, style);

        if names.len() != args.len() {
            return Err(CmdGenError::ArgumentCount {
                expected: names.len(),
                actual: args.len(),
            });
        }

        let parameters = names
            .into_iter()
            .zip(args)
            .map(|(name, value)| Parameter {
                name: name.to_string(),
                value: Some(value),
            })
            .collect();

        Ok(Self {
            sql,
            style,
            parameters,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Render the condition for a command written in `style`.
    ///
    /// Fails with [`CmdGenError::StyleConflict`] when the rewritten SQL has
    /// placeholders other than the expression's own, e.g. an `@` condition
    /// containing `a[1:2]` rendered with `:` placeholders.
    pub fn render(&self, style: PlaceholderStyle) -> CmdGenResult<(String, Vec<Parameter>)> {
        if style == self.style {
            return Ok((self.sql.clone(), self.parameters.clone()));
        }

        let sql: String = placeholder::scan(&self.sql, self.style)
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.to_string(),
                Segment::Placeholder(name) => style.placeholder(name),
            })
            .collect();

        let names = placeholder::placeholder_names(&sql, style);
        let unchanged = names.len() == self.parameters.len()
            && names
                .iter()
                .all(|name| self.parameters.iter().any(|p| p.name == *name));
        if !unchanged {
            return Err(CmdGenError::StyleConflict {
                sql: self.sql.clone(),
                prefix: style.prefix(),
            });
        }

        Ok((sql, self.parameters.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binds_args_in_order() {
        let expr = WhereExpression::new(
            "Age > @1 AND Age < @2 OR Age = @1",
            [Value::Int(18), Value::Int(65)],
        )
        .unwrap();

        let params = expr.parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "1");
        assert_eq!(params[0].value, Some(Value::Int(18)));
        assert_eq!(params[1].name, "2");
        assert_eq!(params[1].value, Some(Value::Int(65)));
    }

    #[test]
    fn test_argument_count_mismatch() {
        let err = WhereExpression::new("Age > @min", Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            CmdGenError::ArgumentCount {
                expected: 1,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_no_placeholders() {
        let expr = WhereExpression::new("Deleted = 1", Vec::new()).unwrap();
        assert!(expr.parameters().is_empty());
        assert_eq!(expr.render(PlaceholderStyle::At).unwrap().0, "Deleted = 1");
    }

    #[test]
    fn test_render_other_style() {
        let expr = WhereExpression::new("Name = @name AND Note <> '@x'", [Value::from("Ann")]).unwrap();
        let (sql, params) = expr.render(PlaceholderStyle::Colon).unwrap();
        assert_eq!(sql, "Name = :name AND Note <> '@x'");
        assert_eq!(params[0].name, "name");
    }

    #[test]
    fn test_render_rejects_new_placeholders() {
        let expr = WhereExpression::new("Tags[1:2] = @1", [Value::from("x")]).unwrap();
        let err = expr.render(PlaceholderStyle::Colon).unwrap_err();
        assert!(matches!(
            err,
            CmdGenError::StyleConflict { prefix: ':', sql } if sql == "Tags[1:2] = @1"
        ));

        // Same style is passed through untouched.
        let (sql, _) = expr.render(PlaceholderStyle::At).unwrap();
        assert_eq!(sql, "Tags[1:2] = @1");
    }
}
