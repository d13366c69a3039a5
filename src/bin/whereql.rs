//! whereql: compile JSON predicates to SQL
//!
//! # Usage
//!
//! ```bash
//! # Compile a predicate (Postgres by default)
//! whereql '{"status": "active", "age": {"$gte": 18}}'
//!
//! # Read from stdin, MySQL dialect, table alias
//! echo '{"deleted_at": null}' | whereql - --dialect mysql --prefix u
//!
//! # Operator tokens of a dialect
//! whereql operators --dialect sqlserver
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;
use whereql::prelude::*;

#[derive(Parser)]
#[command(name = "whereql")]
#[command(version)]
#[command(about = "Compile JSON predicates to dialect-specific SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    whereql '{\"role\": \"admin\", \"karma\": {\"$gt\": 100}}'
    whereql '{\"$or\": [{\"a\": 1}, {\"b\": null}]}' --dialect sqlite
    whereql '{\"firstName\": \"Ann\"}' --entity users --config whereql.toml")]
struct Cli {
    /// Predicate as JSON, or `-` to read it from stdin
    predicate: Option<String>,

    /// SQL dialect (overrides the config file)
    #[arg(short, long, env = "WHEREQL_DIALECT")]
    dialect: Option<Dialect>,

    /// Prefix for generated column references, usually a table alias
    #[arg(short, long)]
    prefix: Option<String>,

    /// Config entity used to map field names to columns and types
    #[arg(short, long)]
    entity: Option<String>,

    /// Config file path
    #[arg(short, long, env = "WHEREQL_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the operator token table of a dialect
    Operators {
        /// Dialect to show (defaults to the configured one)
        #[arg(short, long)]
        dialect: Option<Dialect>,
    },
    /// List supported dialects
    Dialects,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "whereql=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;

    match &cli.command {
        Some(Commands::Operators { dialect }) => {
            if let Some(dialect) = dialect.or(cli.dialect) {
                config.dialect = dialect;
            }
            show_operators(&config)
        }
        Some(Commands::Dialects) => {
            show_dialects(config.dialect);
            Ok(())
        }
        None => {
            if let Some(dialect) = cli.dialect {
                config.dialect = dialect;
            }
            match &cli.predicate {
                Some(input) => compile(input, cli, &config),
                None => {
                    println!("{}", "whereql: predicate trees to SQL".cyan().bold());
                    println!();
                    println!("Usage: whereql <PREDICATE_JSON | -> [OPTIONS]");
                    println!();
                    println!("Try: whereql --help");
                    Ok(())
                }
            }
        }
    }
}

fn compile(input: &str, cli: &Cli, config: &Config) -> Result<()> {
    let json = if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read predicate from stdin")?;
        buf
    } else {
        input.to_string()
    };

    if cli.verbose {
        eprintln!("{} {}", "Input:".dimmed(), json.trim().yellow());
        eprintln!("{} {}", "Dialect:".dimmed(), config.dialect.to_string().yellow());
    }

    let predicate = Predicate::from_json_str(&json).context("Invalid predicate")?;
    let compiler = config.compiler()?;

    let entity = match &cli.entity {
        Some(name) => Some(
            config
                .entity(name)
                .with_context(|| format!("Entity '{}' is not defined in the config", name))?,
        ),
        None => None,
    };

    let mut options = CompileOptions::new().with_context(config.context()?);
    if let Some(entity) = &entity {
        options = options.with_entity(entity);
    }
    if let Some(prefix) = cli.prefix.as_deref().or(config.prefix.as_deref()) {
        options = options.with_prefix(prefix);
    }

    let sql = compiler.compile_predicate(predicate.as_ref(), &options)?;
    if sql.is_empty() {
        eprintln!("{}", "(empty predicate, no condition)".dimmed());
    } else {
        println!("{}", sql);
    }
    Ok(())
}

fn show_operators(config: &Config) -> Result<()> {
    let table = config.operator_table()?;
    println!(
        "{} {}",
        "Operators for".cyan().bold(),
        config.dialect.to_string().cyan().bold()
    );
    println!();
    for (op, token) in table.iter() {
        let key = format!("{:<14}", op.key());
        if op.is_bespoke() {
            println!("  {} {}  {}", key.yellow(), token.white(), "(rewritten)".dimmed());
        } else {
            println!("  {} {}", key.yellow(), token.white());
        }
    }
    Ok(())
}

fn show_dialects(current: Dialect) {
    println!("{}", "Supported dialects".cyan().bold());
    println!();
    for dialect in Dialect::ALL {
        if *dialect == current {
            println!("  {} {}", dialect.name().green().bold(), "(active)".dimmed());
        } else {
            println!("  {}", dialect.name());
        }
    }
}
