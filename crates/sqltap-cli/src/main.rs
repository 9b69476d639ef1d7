//! `sqltap` binary: runs SQL against an instrumented SQLite connection and
//! logs every lifecycle event it emits.
//!
//! ```text
//! sqltap [--config <path>] <sql>...
//! ```
//!
//! Each SQL argument is run as a one-shot query; the rows it produces are
//! printed to stdout as JSON arrays. The words `begin`, `commit` and
//! `rollback` drive transaction control instead.

mod config;
mod log_subscriber;

use std::process::ExitCode;
use std::sync::Arc;

use sqltap::{Connection, OpenError, Value};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};
use crate::log_subscriber::LogSubscriber;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Open(#[from] OpenError),

    #[error("sql error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("failed to encode rows: {0}")]
    Json(#[from] serde_json::Error),

    #[error("usage: sqltap [--config <path>] <sql>...")]
    Usage,
}

struct Invocation {
    config_path: Option<String>,
    statements: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Invocation, CliError> {
    let mut config_path = std::env::var("SQLTAP_CONFIG_PATH")
        .ok()
        .filter(|path| !path.trim().is_empty());
    let mut statements = Vec::new();

    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = Some(args.next().ok_or(CliError::Usage)?);
        } else {
            statements.push(arg);
        }
    }

    if statements.is_empty() {
        return Err(CliError::Usage);
    }
    Ok(Invocation {
        config_path,
        statements,
    })
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::Real(f) => serde_json::Value::from(*f),
        Value::Text(s) => serde_json::Value::from(s.as_str()),
        Value::Blob(bytes) => serde_json::Value::from(bytes.as_slice()),
    }
}

fn run_statement(conn: &Connection, sql: &str) -> Result<(), CliError> {
    match sql.trim().to_ascii_lowercase().as_str() {
        "begin" => {
            conn.begin_transaction()?;
            return Ok(());
        }
        "commit" => {
            conn.commit()?;
            return Ok(());
        }
        "rollback" => {
            conn.rollback()?;
            return Ok(());
        }
        _ => {}
    }

    let Some(stmt) = conn.query(sql)? else {
        // Silent mode: the failure was already reported by the subscriber.
        return Ok(());
    };
    for row in stmt.rows() {
        let values: Vec<serde_json::Value> = row.iter().map(to_json).collect();
        println!("{}", serde_json::to_string(&values)?);
    }
    Ok(())
}

fn run() -> Result<(), CliError> {
    let invocation = parse_args(std::env::args().skip(1))?;
    let config = config::load_config(invocation.config_path.as_deref())?;
    init_tracing(&config);

    tracing::info!(
        path = %config.database.path,
        error_mode = %config.database.error_mode,
        "opening database"
    );
    let settings = config.database.open_settings();
    let mut conn = if config.database.path == ":memory:" {
        Connection::open_in_memory(settings)?
    } else {
        Connection::open(&config.database.path, settings)?
    };
    conn.subscribe(Arc::new(LogSubscriber));

    for sql in &invocation.statements {
        run_statement(&conn, sql)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("sqltap: {err}");
            ExitCode::FAILURE
        }
    }
}
