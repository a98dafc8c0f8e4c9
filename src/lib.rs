//! # cmdgen — commands for table-backed records
//!
//! > **No hand-written SQL for simple persistence.**
//!
//! cmdgen turns the column metadata of a record type into parameterized
//! INSERT, UPDATE and DELETE commands, and fills their parameters from
//! instances.
//!
//! ## Quick Example
//!
//! ```
//! use cmdgen::prelude::*;
//!
//! struct Person {
//!     id: i64,
//!     name: String,
//! }
//!
//! let info = TableInfo::builder("people")
//!     .key("Id", |p: &Person| p.id.into())
//!     .column("Name", |p: &Person| p.name.as_str().into())
//!     .build()?;
//! let generator = TableCommandGenerator::new(info);
//!
//! let mut cmd = generator.update_command()?;
//! assert_eq!(cmd.sql(), "UPDATE people SET Name = @Name WHERE Id = @Id");
//!
//! generator.fill(&mut cmd, &Person { id: 7, name: "Ann".into() })?;
//! assert_eq!(cmd.parameter("Id").unwrap().value, Some(Value::Int(7)));
//! # Ok::<(), CmdGenError>(())
//! ```
//!
//! ## Commands
//!
//! | Operation              | Needs           | SQL                                    |
//! |------------------------|-----------------|----------------------------------------|
//! | `insert_command`       | -               | `INSERT INTO t (..) VALUES (..)`       |
//! | `update_command`       | primary key     | `UPDATE t SET .. WHERE key = @key`     |
//! | `delete_command`       | primary key     | `DELETE FROM t WHERE key = @key`       |
//! | `delete_commands`      | single-column key | one `DELETE` per id                  |
//! | `delete_command_where` | -               | `DELETE FROM t WHERE <expression>`     |

pub mod command;
pub mod config;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod expression;
pub mod generator;
pub mod metadata;
pub mod placeholder;
pub mod schema;
pub mod value;

pub mod prelude {
    pub use crate::command::{Command, Parameter};
    pub use crate::config::{Config, GeneratorConfig};
    pub use crate::dialect::{PlaceholderStyle, PositionalStyle};
    pub use crate::engine::Executor;
    pub use crate::error::*;
    pub use crate::expression::WhereExpression;
    pub use crate::generator::{CommandGenerator, DeleteCommands, TableCommandGenerator};
    pub use crate::metadata::{ColumnInfo, Entity, PrimaryKey, TableInfo};
    pub use crate::schema::{Record, TableSchema};
    pub use crate::value::Value;
}
