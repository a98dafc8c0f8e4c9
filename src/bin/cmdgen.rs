//! cmdgen — the command generator CLI
//!
//! Generates parameterized commands for a table described in a TOML schema,
//! optionally fills them from a JSON record and executes them.
//!
//! # Usage
//!
//! ```bash
//! # Show the INSERT for a table
//! cmdgen --schema people.toml insert
//!
//! # Fill it from a record and run it
//! cmdgen --schema people.toml --record '{"Id": 1, "Name": "Ann"}' insert \
//!     --database-url sqlite://app.db
//!
//! # One DELETE per id
//! cmdgen --schema people.toml delete-ids 1 2 3 --dry-run
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use cmdgen::prelude::*;

#[derive(Parser)]
#[command(name = "cmdgen")]
#[command(version)]
#[command(about = "Parameterized INSERT/UPDATE/DELETE commands for a table", long_about = None)]
#[command(after_help = "EXAMPLES:
    cmdgen --schema people.toml insert
    cmdgen --schema people.toml --record '{\"Id\": 7, \"Name\": \"Ann\"}' update
    cmdgen --schema people.toml delete-ids 1 2 3 --dry-run
    cmdgen --schema people.toml delete-where 'Age > @1' --arg 65")]
struct Cli {
    /// Table schema file (TOML)
    #[arg(short, long, global = true, default_value = "schema.toml")]
    schema: PathBuf,

    /// JSON object whose properties fill the command parameters
    #[arg(short, long, global = true)]
    record: Option<String>,

    /// Placeholder style (overrides the config file)
    #[arg(long, value_enum, global = true)]
    style: Option<StyleArg>,

    /// Config file (defaults to ./cmdgen.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, env = "CMDGEN_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Don't execute, just show the generated SQL
    #[arg(short, long, global = true)]
    dry_run: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    At,
    Colon,
    Dollar,
}

impl From<StyleArg> for PlaceholderStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::At => PlaceholderStyle::At,
            StyleArg::Colon => PlaceholderStyle::Colon,
            StyleArg::Dollar => PlaceholderStyle::Dollar,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// INSERT over every non-generated column
    Insert,
    /// UPDATE matched on the primary key
    Update,
    /// DELETE matched on the primary key
    Delete,
    /// One DELETE per id (single-column keys only)
    DeleteIds {
        /// Key values
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// DELETE scoped by a condition
    DeleteWhere {
        /// The condition, using the configured placeholder style
        condition: String,

        /// Argument bound to the condition's next placeholder (repeatable)
        #[arg(short, long)]
        arg: Vec<String>,
    },
    /// Show the table's columns
    Columns,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };
    if let Some(style) = cli.style {
        config.generator.placeholder = style.into();
    }

    let schema = TableSchema::load(&cli.schema)
        .with_context(|| format!("Failed to load schema {}", cli.schema.display()))?;
    let generator = TableCommandGenerator::with_config(schema.table_info()?, config.generator.clone());

    if cli.verbose {
        println!(
            "{} {} ({} columns)",
            "Table:".dimmed(),
            generator.table().name().yellow(),
            generator.query_columns().len()
        );
    }

    if let Commands::Columns = cli.command {
        show_columns(&generator);
        return Ok(());
    }

    let record = match &cli.record {
        Some(record) => {
            Some(serde_json::from_str::<Record>(record).context("--record must be a JSON object")?)
        }
        None => None,
    };
    let commands = build_commands(
        &generator,
        &cli.command,
        record.as_ref(),
        config.generator.placeholder,
    )?;

    print_commands(&commands);

    let database_url = cli.database_url.clone().or(config.database.url.clone());
    let Some(url) = database_url.filter(|_| !cli.dry_run) else {
        if !cli.dry_run {
            println!();
            println!(
                "{}",
                "⚠ No database URL. Use --database-url or set CMDGEN_DATABASE_URL".yellow()
            );
        }
        return Ok(());
    };

    if cli.verbose {
        println!("{} {}", "Connecting to:".dimmed(), url);
    }
    let executor = Executor::connect(&url).await?;

    let affected = if commands.len() == 1 {
        executor.execute(&commands[0]).await?
    } else {
        executor.execute_all(commands).await?
    };
    println!("{} {} rows affected", "✓".green(), affected);

    Ok(())
}

/// Generate the subcommand's commands, filled from `record` when given.
fn build_commands(
    generator: &TableCommandGenerator<Record>,
    command: &Commands,
    record: Option<&Record>,
    style: PlaceholderStyle,
) -> anyhow::Result<Vec<Command>> {
    let mut commands = match command {
        Commands::Columns => Vec::new(),
        Commands::Insert => vec![generator.insert_command()],
        Commands::Update => vec![generator.update_command()?],
        Commands::Delete => vec![generator.delete_command()?],
        Commands::DeleteIds { ids } => {
            if record.is_some() {
                anyhow::bail!("--record cannot be used with delete-ids: the ids bind the key");
            }
            generator
                .delete_commands(ids.iter().map(|id| parse_binding(id)))?
                .collect()
        }
        Commands::DeleteWhere { condition, arg } => {
            let expression = WhereExpression::with_style(
                style,
                condition.as_str(),
                arg.iter().map(|a| parse_binding(a)),
            )?;
            vec![generator.delete_command_where(&expression)?]
        }
    };

    if let Some(record) = record {
        for command in &mut commands {
            generator.fill(command, record)?;
        }
    }

    Ok(commands)
}

/// Parse a CLI argument as a number or boolean, otherwise use it as a string.
fn parse_binding(binding: &str) -> Value {
    if let Ok(n) = binding.parse::<i64>() {
        Value::Int(n)
    } else if let Ok(f) = binding.parse::<f64>() {
        Value::Float(f)
    } else if binding == "true" {
        Value::Bool(true)
    } else if binding == "false" {
        Value::Bool(false)
    } else if binding.eq_ignore_ascii_case("null") {
        Value::Null
    } else {
        Value::String(binding.to_string())
    }
}

fn print_commands(commands: &[Command]) {
    for (i, command) in commands.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", "Generated SQL:".green().bold());
        println!("  {}", command.sql().white());

        if !command.parameters().is_empty() {
            println!("{}", "Parameters:".cyan());
            for param in command.parameters() {
                let value = match &param.value {
                    Some(value) => value.to_string().yellow(),
                    None => "(unbound)".dimmed(),
                };
                println!("  {} = {}", command.style().placeholder(&param.name), value);
            }
        }
    }
}

fn show_columns(generator: &TableCommandGenerator<Record>) {
    println!(
        "{:20} {:20} {:5} {}",
        "Column".white().bold(),
        "Property".white().bold(),
        "Key".white().bold(),
        "Generated".white().bold()
    );
    println!("{}", "─".repeat(56).dimmed());

    for column in generator.query_columns() {
        println!(
            "{:20} {:20} {:5} {}",
            column.name().cyan(),
            column.property_name(),
            if column.is_primary_key() { "✓" } else { "" },
            if column.is_generated() { "✓" } else { "" }
        );
    }
}
