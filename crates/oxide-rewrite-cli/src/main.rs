//! oxide-rewrite CLI
//!
//! Command-line tool for adding row filters to SQL statements.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_rewrite::lexer::Span;
use oxide_rewrite::{RewriteError, RewriteOptions, RewriteResult, Rewriter};

/// Adds a WHERE condition to every query block reading from a table.
#[derive(Parser, Debug)]
#[command(name = "oxide-rewrite")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SQL statement to rewrite (read from --file or stdin if omitted).
    sql: Option<String>,

    /// Table whose query blocks receive the condition.
    #[arg(short, long, env = "OXIDE_REWRITE_TABLE")]
    table: Option<String>,

    /// Condition to add.
    #[arg(short, long, env = "OXIDE_REWRITE_CONDITION")]
    condition: String,

    /// Read the statement from a file.
    #[arg(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// Reject conditions that are not a single SQL expression.
    #[arg(long)]
    validate_condition: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// JSON output of a rewrite.
#[derive(Debug, Serialize)]
struct Output {
    sql: String,
    rewritten: bool,
    clauses: usize,
}

impl Output {
    fn new(result: RewriteResult, original: &str) -> Self {
        match result {
            RewriteResult::Rewritten { sql, clauses } => Self {
                rewritten: clauses > 0,
                sql,
                clauses,
            },
            RewriteResult::Unchanged => Self {
                sql: original.to_string(),
                rewritten: false,
                clauses: 0,
            },
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let sql = read_input(&cli)?;
    debug!(bytes = sql.len(), "Read statement");

    let mut options = RewriteOptions::new();
    if cli.validate_condition {
        options = options.with_condition_validation();
    }
    let rewriter = Rewriter::with_options(options);

    let result = rewriter
        .rewrite(&sql, &cli.condition, cli.table.as_deref())
        .map_err(|err| {
            let context = failure_context(&err, &sql);
            anyhow::Error::new(err).context(context)
        })?;
    if result == RewriteResult::Unchanged {
        info!(table = cli.table.as_deref().unwrap_or_default(), "Table not referenced");
    }

    let output = Output::new(result, &sql);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output.sql);
    }

    Ok(())
}

/// Describes a failed rewrite, with the line and column in `sql` when the
/// error points into the statement.
fn failure_context(err: &RewriteError, sql: &str) -> String {
    match err.offset() {
        Some(offset) => {
            let (line, column) = Span::new(offset, offset).line_col(sql);
            format!("Failed to rewrite statement at line {line}, column {column}")
        }
        None => String::from("Failed to rewrite statement"),
    }
}

/// Returns the statement from the argument, the file, or stdin, in that
/// order.
fn read_input(cli: &Cli) -> anyhow::Result<String> {
    if let Some(sql) = &cli.sql {
        return Ok(sql.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut sql = String::new();
    std::io::stdin()
        .read_to_string(&mut sql)
        .context("Failed to read statement from stdin")?;
    Ok(sql)
}
