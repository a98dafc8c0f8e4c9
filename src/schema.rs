//! Table schemas for dynamic records.
//!
//! Lets a table be described in TOML instead of code, for records that are
//! plain JSON objects:
//!
//! ```toml
//! table = "people"
//!
//! [[column]]
//! name = "Id"
//! key = true
//! generated = false
//!
//! [[column]]
//! name = "Name"
//! property = "name"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{CmdGenError, CmdGenResult};
use crate::metadata::{ColumnInfo, TableInfo};
use crate::value::Value;

/// A record whose properties are looked up by name.
pub type Record = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableSchema {
    pub table: String,
    #[serde(rename = "column", default)]
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    /// Property on the record; defaults to `name`.
    pub property: Option<String>,
    #[serde(default)]
    pub key: bool,
    #[serde(default)]
    pub generated: bool,
}

impl TableSchema {
    pub fn from_toml(content: &str) -> CmdGenResult<Self> {
        toml::from_str(content).map_err(|e| CmdGenError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> CmdGenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| CmdGenError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Build the metadata for [`Record`]s of this table. A property missing
    /// from a record reads as `Null`.
    pub fn table_info(&self) -> CmdGenResult<TableInfo<Record>> {
        let mut builder = TableInfo::builder(self.table.as_str());

        for column in &self.columns {
            let property = column.property.clone().unwrap_or_else(|| column.name.clone());
            let lookup = property.clone();

            let mut info = ColumnInfo::new(column.name.as_str(), move |record: &Record| {
                record
                    .get(&lookup)
                    .cloned()
                    .map(Value::from)
                    .unwrap_or(Value::Null)
            })
            .property(property);

            if column.key {
                info = info.primary_key();
            }
            if column.generated {
                info = info.generated();
            }
            builder = builder.column_info(info);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{CommandGenerator, TableCommandGenerator};
    use crate::metadata::PrimaryKey;

    const PEOPLE: &str = r#"
        table = "people"

        [[column]]
        name = "Id"
        key = true

        [[column]]
        name = "Name"
        property = "name"

        [[column]]
        name = "Age"
    "#;

    #[test]
    fn test_parse_schema() {
        let schema = TableSchema::from_toml(PEOPLE).unwrap();
        assert_eq!(schema.table, "people");
        assert_eq!(schema.columns.len(), 3);
        assert!(schema.columns[0].key);
        assert_eq!(schema.columns[1].property.as_deref(), Some("name"));
    }

    #[test]
    fn test_table_info() {
        let info = TableSchema::from_toml(PEOPLE).unwrap().table_info().unwrap();
        assert_eq!(info.name(), "people");
        assert_eq!(info.primary_key(), &PrimaryKey::Single(0));
        assert_eq!(info.columns()[1].property_name(), "name");
        assert_eq!(info.columns()[2].property_name(), "Age");
    }

    #[test]
    fn test_fill_from_record() {
        let info = TableSchema::from_toml(PEOPLE).unwrap().table_info().unwrap();
        let generator = TableCommandGenerator::new(info);
        let record: Record = serde_json::from_str(r#"{"Id": 4, "name": "Dee"}"#).unwrap();

        let mut cmd = generator.insert_command();
        generator.fill(&mut cmd, &record).unwrap();
        assert_eq!(cmd.parameter("Id").unwrap().value, Some(Value::Int(4)));
        assert_eq!(cmd.parameter("Name").unwrap().value, Some(Value::from("Dee")));
        assert_eq!(cmd.parameter("Age").unwrap().value, Some(Value::Null));
    }

    #[test]
    fn test_schema_without_columns() {
        let schema = TableSchema::from_toml("table = \"empty\"").unwrap();
        assert!(matches!(schema.table_info(), Err(CmdGenError::EmptyTable(_))));
    }
}
