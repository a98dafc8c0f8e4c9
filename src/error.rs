//! Error types for cmdgen.

use thiserror::Error;

/// The main error type for command generation and execution.
#[derive(Debug, Error)]
pub enum CmdGenError {
    /// The operation needs a primary key and the table has none.
    #[error("Table '{table}' has no primary key")]
    MissingPrimaryKey { table: String },

    /// The operation needs a single-column key and the table has a composite one.
    #[error("Table '{table}' has a composite primary key ({columns})")]
    CompositePrimaryKey { table: String, columns: String },

    /// A required argument was absent.
    #[error("Argument '{0}' is required")]
    ArgumentNull(&'static str),

    /// The column is not part of the generator's table.
    #[error("Column '{column}' does not belong to table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Every column is a key column, so an UPDATE has nothing to SET.
    #[error("Table '{table}' has no non-key columns to update")]
    NothingToUpdate { table: String },

    /// Two columns share a name.
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },

    /// A table was described without any column.
    #[error("Table '{0}' has no columns")]
    EmptyTable(String),

    /// The command has no parameter with this name.
    #[error("Unknown parameter: '{0}'")]
    UnknownParameter(String),

    /// The parameter exists but was never given a value.
    #[error("Parameter '{0}' has no value")]
    UnboundParameter(String),

    /// Placeholder count and argument count differ.
    #[error("Expected {expected} argument(s), got {actual}")]
    ArgumentCount { expected: usize, actual: usize },

    /// A condition's SQL reads differently once its placeholders are rewritten.
    #[error("Condition '{sql}' cannot be rendered with '{prefix}' placeholders")]
    StyleConflict { sql: String, prefix: char },

    /// Configuration or schema file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Command execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CmdGenError {
    /// Create a missing primary key error.
    pub fn missing_key(table: impl Into<String>) -> Self {
        Self::MissingPrimaryKey {
            table: table.into(),
        }
    }

    /// Create an unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Result type alias for cmdgen operations.
pub type CmdGenResult<T> = Result<T, CmdGenError>;
