//! Commands and their parameter slots.

use crate::dialect::{PlaceholderStyle, PositionalStyle};
use crate::error::{CmdGenError, CmdGenResult};
use crate::placeholder::{self, Segment};
use crate::value::Value;

/// A named parameter slot. `value` is `None` until the slot is bound.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Option<Value>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.value.is_some()
    }
}

/// A parameterized, not yet executed SQL command.
///
/// Parameter names are unique; slots keep the order they were added in.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    sql: String,
    style: PlaceholderStyle,
    parameters: Vec<Parameter>,
}

impl Command {
    pub fn new(sql: impl Into<String>, style: PlaceholderStyle) -> Self {
        Self {
            sql: sql.into(),
            style,
            parameters: Vec::new(),
        }
    }

    /// The SQL text, with named placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The placeholder style the SQL text is written in.
    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> impl Iterator<Item = &mut Parameter> {
        self.parameters.iter_mut()
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Add an unbound slot. Does nothing if the name is already present.
    pub fn add_parameter(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.parameter(&name).is_none() {
            self.parameters.push(Parameter::new(name));
        }
    }

    /// Add a slot bound to `value`, or rebind the existing slot.
    pub fn add_parameter_with(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.parameters.iter_mut().find(|p| p.name == name) {
            Some(param) => param.value = Some(value),
            None => self.parameters.push(Parameter {
                name,
                value: Some(value),
            }),
        }
    }

    /// Bind an existing slot.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> CmdGenResult<()> {
        let param = self
            .parameters
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| CmdGenError::UnknownParameter(name.to_string()))?;
        param.value = Some(value.into());
        Ok(())
    }

    /// Names of slots with no value.
    pub fn unbound(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| !p.is_bound())
            .map(|p| p.name.as_str())
    }

    fn bound_value(&self, name: &str) -> CmdGenResult<&Value> {
        let param = self
            .parameter(name)
            .ok_or_else(|| CmdGenError::UnknownParameter(name.to_string()))?;
        param
            .value
            .as_ref()
            .ok_or_else(|| CmdGenError::UnboundParameter(name.to_string()))
    }

    /// Rewrite named placeholders into driver positional placeholders.
    ///
    /// Returns the SQL and the values in placeholder order. A name used
    /// twice becomes two positions.
    pub fn to_positional(&self, style: PositionalStyle) -> CmdGenResult<(String, Vec<Value>)> {
        let mut sql = String::with_capacity(self.sql.len());
        let mut values = Vec::with_capacity(self.parameters.len());

        for segment in placeholder::scan(&self.sql, self.style) {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Placeholder(name) => {
                    values.push(self.bound_value(name)?.clone());
                    sql.push_str(&style.placeholder(values.len()));
                }
            }
        }

        Ok((sql, values))
    }

    /// SQL with bound values inlined as literals, for display only.
    /// Unknown or unbound placeholders are left as written.
    pub fn to_literal_sql(&self) -> String {
        let mut sql = String::with_capacity(self.sql.len());
        for segment in placeholder::scan(&self.sql, self.style) {
            match segment {
                Segment::Text(text) => sql.push_str(text),
                Segment::Placeholder(name) => match self.bound_value(name) {
                    Ok(value) => sql.push_str(&value.to_string()),
                    Err(_) => sql.push_str(&self.style.placeholder(name)),
                },
            }
        }
        sql
    }
}
