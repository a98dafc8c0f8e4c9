//! Column and table descriptors for record types.
//!
//! Descriptors are configured ahead of time, once per record type, through
//! [`TableInfo::builder`] and usually exposed via the [`Entity`] trait:
//!
//! ```
//! use cmdgen::metadata::{Entity, TableInfo};
//! use cmdgen::error::CmdGenResult;
//!
//! struct Person {
//!     id: i64,
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! impl Entity for Person {
//!     fn table_info() -> CmdGenResult<TableInfo<Self>> {
//!         TableInfo::builder("people")
//!             .key("Id", |p: &Person| p.id.into())
//!             .column("Name", |p: &Person| p.name.as_str().into())
//!             .column("Age", |p: &Person| p.age.into())
//!             .build()
//!     }
//! }
//!
//! let info = Person::table_info().unwrap();
//! assert_eq!(info.columns().len(), 3);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::dialect::parameter_name;
use crate::error::{CmdGenError, CmdGenResult};
use crate::value::Value;

type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
type Converter = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Metadata provider for a record type.
pub trait Entity: Sized {
    fn table_info() -> CmdGenResult<TableInfo<Self>>;
}

/// One persisted property of `T`.
pub struct ColumnInfo<T> {
    name: String,
    property: String,
    primary_key: bool,
    generated: bool,
    getter: Getter<T>,
    converter: Option<Converter>,
}

impl<T> ColumnInfo<T> {
    /// A column whose property has the same name as the column.
    pub fn new<F>(name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            property: name.clone(),
            name,
            primary_key: false,
            generated: false,
            getter: Arc::new(getter),
            converter: None,
        }
    }

    /// Name of the property on the record type, when it differs from the column.
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    /// Mark the column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark the column as generated by the database (identity, autoincrement).
    /// Generated columns are left out of INSERT commands.
    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Convert values read from the record before they become parameters.
    pub fn converter<F>(mut self, converter: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.converter = Some(Arc::new(converter));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_name(&self) -> &str {
        &self.property
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Name of the command parameter bound to this column.
    pub fn parameter_name(&self) -> String {
        parameter_name(&self.name)
    }

    /// Read the column's value from `item`, converter applied.
    pub fn value(&self, item: &T) -> Value {
        let value = (self.getter)(item);
        match &self.converter {
            Some(convert) => convert(value),
            None => value,
        }
    }
}

impl<T> Clone for ColumnInfo<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            property: self.property.clone(),
            primary_key: self.primary_key,
            generated: self.generated,
            getter: Arc::clone(&self.getter),
            converter: self.converter.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnInfo")
            .field("name", &self.name)
            .field("property", &self.property)
            .field("primary_key", &self.primary_key)
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}

/// Primary key shape, as indices into the table's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKey {
    None,
    Single(usize),
    Composite(Vec<usize>),
}

impl PrimaryKey {
    fn from_columns<T>(columns: &[ColumnInfo<T>]) -> Self {
        let indices: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_primary_key())
            .map(|(i, _)| i)
            .collect();

        match indices.len() {
            0 => PrimaryKey::None,
            1 => PrimaryKey::Single(indices[0]),
            _ => PrimaryKey::Composite(indices),
        }
    }

    pub fn indices(&self) -> &[usize] {
        match self {
            PrimaryKey::None => &[],
            PrimaryKey::Single(index) => std::slice::from_ref(index),
            PrimaryKey::Composite(indices) => indices,
        }
    }
}

/// Table name, ordered columns, and the primary key derived from them.
pub struct TableInfo<T> {
    name: String,
    columns: Vec<ColumnInfo<T>>,
    primary_key: PrimaryKey,
}

impl<T> TableInfo<T> {
    pub fn builder(name: impl Into<String>) -> TableInfoBuilder<T> {
        TableInfoBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All columns, in discovery order.
    pub fn columns(&self) -> &[ColumnInfo<T>] {
        &self.columns
    }

    pub fn primary_key(&self) -> &PrimaryKey {
        &self.primary_key
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo<T>> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &ColumnInfo<T>> {
        self.primary_key.indices().iter().map(|&i| &self.columns[i])
    }

    /// Columns that are not part of the primary key.
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnInfo<T>> {
        self.columns.iter().filter(|c| !c.is_primary_key())
    }

    /// Columns an INSERT supplies values for.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &ColumnInfo<T>> {
        self.columns.iter().filter(|c| !c.is_generated())
    }
}

impl<T> fmt::Debug for TableInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableInfo")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

/// Builder for [`TableInfo`]. Columns keep the order they are added in.
pub struct TableInfoBuilder<T> {
    name: String,
    columns: Vec<ColumnInfo<T>>,
}

impl<T> TableInfoBuilder<T> {
    pub fn column<F>(self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.column_info(ColumnInfo::new(name, getter))
    }

    pub fn key<F>(self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.column_info(ColumnInfo::new(name, getter).primary_key())
    }

    /// A key column whose value the database generates.
    pub fn generated_key<F>(self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        self.column_info(ColumnInfo::new(name, getter).primary_key().generated())
    }

    pub fn column_info(mut self, column: ColumnInfo<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn build(self) -> CmdGenResult<TableInfo<T>> {
        if self.columns.is_empty() {
            return Err(CmdGenError::EmptyTable(self.name));
        }

        for (i, column) in self.columns.iter().enumerate() {
            let clash = self.columns[..i]
                .iter()
                .any(|c| c.name == column.name || c.parameter_name() == column.parameter_name());
            if clash {
                return Err(CmdGenError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        let primary_key = PrimaryKey::from_columns(&self.columns);
        Ok(TableInfo {
            name: self.name,
            columns: self.columns,
            primary_key,
        })
    }
}
