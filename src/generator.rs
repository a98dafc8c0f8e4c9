//! Command generation for table-backed record types.
//!
//! A [`TableCommandGenerator`] turns the [`TableInfo`] of a record type into
//! parameterized INSERT, UPDATE and DELETE commands, and fills their
//! parameters from instances:
//!
//! ```text
//! people (Id key, Name, Age)
//!
//! insert  INSERT INTO people (Id, Name, Age) VALUES (@Id, @Name, @Age)
//! update  UPDATE people SET Name = @Name, Age = @Age WHERE Id = @Id
//! delete  DELETE FROM people WHERE Id = @Id
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::command::Command;
use crate::config::GeneratorConfig;
use crate::dialect::{PlaceholderStyle, escape_column_name, escape_identifier};
use crate::error::{CmdGenError, CmdGenResult};
use crate::expression::WhereExpression;
use crate::metadata::{ColumnInfo, Entity, PrimaryKey, TableInfo};
use crate::value::Value;

/// Generates single-table commands for record type `T`.
pub trait CommandGenerator<T> {
    /// INSERT over every column the database does not generate.
    fn insert_command(&self) -> Command;

    /// UPDATE of all non-key columns, matched on all key columns.
    ///
    /// Fails with [`CmdGenError::MissingPrimaryKey`] when `T` has no key.
    fn update_command(&self) -> CmdGenResult<Command>;

    /// DELETE matched on all key columns.
    ///
    /// Fails with [`CmdGenError::MissingPrimaryKey`] when `T` has no key.
    fn delete_command(&self) -> CmdGenResult<Command>;

    /// One DELETE per id, in input order, each with its key parameter bound.
    ///
    /// The key checks run before any id is read: no key fails with
    /// [`CmdGenError::MissingPrimaryKey`], a composite key with
    /// [`CmdGenError::CompositePrimaryKey`]. The returned iterator is single
    /// pass and cannot be restarted.
    fn delete_commands<I>(&self, ids: I) -> CmdGenResult<DeleteCommands<I::IntoIter>>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
        Self: Sized;

    /// DELETE scoped by an arbitrary condition. No key needed.
    ///
    /// Fails with [`CmdGenError::StyleConflict`] when the condition cannot be
    /// rewritten into this generator's placeholder style unchanged.
    fn delete_command_where(&self, expression: &WhereExpression) -> CmdGenResult<Command>;

    /// Write values from `item` into every parameter of `command` that
    /// matches a column. Other parameters are left untouched.
    ///
    /// Fails with [`CmdGenError::ArgumentNull`] when either argument is absent.
    fn fill_command(&self, command: Option<&mut Command>, item: Option<&T>) -> CmdGenResult<()>;

    /// [`fill_command`](CommandGenerator::fill_command) for present arguments.
    fn fill(&self, command: &mut Command, item: &T) -> CmdGenResult<()> {
        self.fill_command(Some(command), Some(item))
    }

    /// All columns of `T`, in discovery order.
    fn query_columns(&self) -> &[ColumnInfo<T>];

    /// Read `column` from `item`.
    ///
    /// Fails with [`CmdGenError::UnknownColumn`] when the column is not one of
    /// this generator's columns.
    fn column_value(&self, column: &ColumnInfo<T>, item: &T) -> CmdGenResult<Value>;
}

/// [`CommandGenerator`] driven by a [`TableInfo`].
///
/// Immutable after construction; clones share the metadata.
pub struct TableCommandGenerator<T> {
    table: Arc<TableInfo<T>>,
    config: GeneratorConfig,
}

impl<T> Clone for TableCommandGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            config: self.config.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TableCommandGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCommandGenerator")
            .field("table", &self.table)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Entity> TableCommandGenerator<T> {
    /// Generator over the metadata `T` provides.
    pub fn for_entity() -> CmdGenResult<Self> {
        Ok(Self::new(T::table_info()?))
    }
}

impl<T> TableCommandGenerator<T> {
    pub fn new(table: TableInfo<T>) -> Self {
        Self::with_config(table, GeneratorConfig::default())
    }

    pub fn with_config(table: TableInfo<T>, config: GeneratorConfig) -> Self {
        Self {
            table: Arc::new(table),
            config,
        }
    }

    pub fn table(&self) -> &TableInfo<T> {
        &self.table
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn style(&self) -> PlaceholderStyle {
        self.config.placeholder
    }

    fn table_name(&self) -> String {
        if self.config.quote_identifiers {
            escape_identifier(self.table.name())
        } else {
            self.table.name().to_string()
        }
    }

    fn column_name(&self, column: &ColumnInfo<T>) -> String {
        if self.config.quote_identifiers {
            escape_column_name(column.name())
        } else {
            column.name().to_string()
        }
    }

    /// `column = @column`
    fn equality(&self, column: &ColumnInfo<T>) -> String {
        format!(
            "{} = {}",
            self.column_name(column),
            self.style().placeholder(&column.parameter_name())
        )
    }

    fn key_columns(&self) -> CmdGenResult<Vec<&ColumnInfo<T>>> {
        if let PrimaryKey::None = self.table.primary_key() {
            return Err(CmdGenError::missing_key(self.table.name()));
        }
        Ok(self.table.key_columns().collect())
    }

    fn key_predicate(&self, keys: &[&ColumnInfo<T>]) -> String {
        keys.iter()
            .map(|c| self.equality(c))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn single_key(&self) -> CmdGenResult<&ColumnInfo<T>> {
        match self.table.primary_key() {
            PrimaryKey::None => Err(CmdGenError::missing_key(self.table.name())),
            PrimaryKey::Single(index) => Ok(&self.table.columns()[*index]),
            PrimaryKey::Composite(_) => Err(CmdGenError::CompositePrimaryKey {
                table: self.table.name().to_string(),
                columns: self
                    .table
                    .key_columns()
                    .map(|c| c.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    fn command<'a>(&self, sql: String, columns: impl IntoIterator<Item = &'a ColumnInfo<T>>) -> Command
    where
        T: 'a,
    {
        let mut command = Command::new(sql, self.style());
        for column in columns {
            command.add_parameter(column.parameter_name());
        }
        command
    }
}

impl<T> CommandGenerator<T> for TableCommandGenerator<T> {
    fn insert_command(&self) -> Command {
        let columns: Vec<&ColumnInfo<T>> = self.table.insertable_columns().collect();

        let sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table_name())
        } else {
            let names: Vec<String> = columns.iter().map(|c| self.column_name(c)).collect();
            let placeholders: Vec<String> = columns
                .iter()
                .map(|c| self.style().placeholder(&c.parameter_name()))
                .collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table_name(),
                names.join(", "),
                placeholders.join(", ")
            )
        };

        debug!("INSERT command for {}: {}", self.table.name(), sql);
        self.command(sql, columns)
    }

    fn update_command(&self) -> CmdGenResult<Command> {
        let keys = self.key_columns()?;
        let values: Vec<&ColumnInfo<T>> = self.table.value_columns().collect();
        if values.is_empty() {
            return Err(CmdGenError::NothingToUpdate {
                table: self.table.name().to_string(),
            });
        }

        let set: Vec<String> = values.iter().map(|c| self.equality(c)).collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            self.table_name(),
            set.join(", "),
            self.key_predicate(&keys)
        );

        debug!("UPDATE command for {}: {}", self.table.name(), sql);
        Ok(self.command(sql, values.into_iter().chain(keys)))
    }

    fn delete_command(&self) -> CmdGenResult<Command> {
        let keys = self.key_columns()?;
        let sql = format!(
            "DELETE FROM {} WHERE {}",
            self.table_name(),
            self.key_predicate(&keys)
        );

        debug!("DELETE command for {}: {}", self.table.name(), sql);
        Ok(self.command(sql, keys))
    }

    fn delete_commands<I>(&self, ids: I) -> CmdGenResult<DeleteCommands<I::IntoIter>>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let key = self.single_key()?;
        let sql = format!("DELETE FROM {} WHERE {}", self.table_name(), self.equality(key));

        debug!("DELETE-by-id commands for {}: {}", self.table.name(), sql);
        Ok(DeleteCommands {
            sql,
            style: self.style(),
            parameter: key.parameter_name(),
            ids: ids.into_iter(),
        })
    }

    fn delete_command_where(&self, expression: &WhereExpression) -> CmdGenResult<Command> {
        let (condition, parameters) = expression.render(self.style())?;
        let sql = format!("DELETE FROM {} WHERE {}", self.table_name(), condition);

        debug!("DELETE command for {}: {}", self.table.name(), sql);
        let mut command = Command::new(sql, self.style());
        for param in parameters {
            match param.value {
                Some(value) => command.add_parameter_with(param.name, value),
                None => command.add_parameter(param.name),
            }
        }
        Ok(command)
    }

    fn fill_command(&self, command: Option<&mut Command>, item: Option<&T>) -> CmdGenResult<()> {
        let command = command.ok_or(CmdGenError::ArgumentNull("command"))?;
        let item = item.ok_or(CmdGenError::ArgumentNull("item"))?;

        for param in command.parameters_mut() {
            let column = self
                .table
                .columns()
                .iter()
                .find(|c| c.parameter_name() == param.name);

            if let Some(column) = column {
                let value = column.value(item);
                trace!("{}.{} = {}", self.table.name(), param.name, value);
                param.value = Some(value);
            }
        }

        Ok(())
    }

    fn query_columns(&self) -> &[ColumnInfo<T>] {
        self.table.columns()
    }

    fn column_value(&self, column: &ColumnInfo<T>, item: &T) -> CmdGenResult<Value> {
        let own = self
            .table
            .column(column.name())
            .ok_or_else(|| CmdGenError::unknown_column(self.table.name(), column.name()))?;
        Ok(own.value(item))
    }
}

/// Lazily produced DELETE commands, one per id.
///
/// Consumes the id iterator as it goes; once exhausted it cannot be
/// restarted.
pub struct DeleteCommands<I> {
    sql: String,
    style: PlaceholderStyle,
    parameter: String,
    ids: I,
}

impl<I> DeleteCommands<I> {
    /// The SQL every produced command carries.
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl<I> Iterator for DeleteCommands<I>
where
    I: Iterator,
    I::Item: Into<Value>,
{
    type Item = Command;

    fn next(&mut self) -> Option<Command> {
        let id = self.ids.next()?;
        let mut command = Command::new(self.sql.clone(), self.style);
        command.add_parameter_with(self.parameter.clone(), id);
        Some(command)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}
