//! `rusqlite`-backed client.

use std::cell::RefCell;
use std::path::Path;

use rusqlite::{Batch, Connection, OpenFlags};
use sqltap_events::{ErrorInfo, Value};
use thiserror::Error;

use crate::driver::{Driver, DriverStatement};
use crate::mode::ErrorMode;

/// Settings applied when a SQLite connection is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenSettings {
    /// Failure channel for SQL errors.
    pub error_mode: ErrorMode,

    /// Busy timeout for the connection, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Whether foreign key constraints are enforced.
    pub foreign_keys: bool,

    /// Whether to switch file databases to WAL journaling.
    pub wal: bool,
}

impl Default for OpenSettings {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Raise,
            busy_timeout_ms: 5_000,
            foreign_keys: true,
            wal: false,
        }
    }
}

/// Errors that can occur when opening a SQLite connection.
#[derive(Debug, Error)]
pub enum OpenError {
    /// SQLite refused to open or configure the connection.
    #[error("failed to open database: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The journal mode could not be switched to WAL.
    #[error("failed to set WAL journal mode, got: {0}")]
    JournalMode(String),
}

/// Failure bookkeeping shared by a connection and its statements.
#[derive(Debug)]
struct ErrorState {
    mode: ErrorMode,
    last: RefCell<Option<ErrorInfo>>,
}

impl ErrorState {
    fn clear(&self) {
        self.last.replace(None);
    }

    fn record(&self, err: &rusqlite::Error) {
        let info = ErrorInfo::from_error(err);
        tracing::debug!(
            state = %info.state,
            code = ?info.code,
            message = %info.message,
            mode = %self.mode,
            "sqlite operation failed"
        );
        self.last.replace(Some(info));
    }

    /// Routes a failure through the configured channel, substituting
    /// `sentinel` for the error in silent mode.
    fn settle<T>(&self, result: rusqlite::Result<T>, sentinel: T) -> rusqlite::Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                self.record(&err);
                match self.mode {
                    ErrorMode::Raise => Err(err),
                    ErrorMode::Silent => Ok(sentinel),
                }
            }
        }
    }
}

/// A SQLite connection implementing [`Driver`].
#[derive(Debug)]
pub struct SqliteDriver {
    conn: Connection,
    errors: ErrorState,
}

impl SqliteDriver {
    /// Opens (creating if needed) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `OpenError` if the file cannot be opened or the settings
    /// cannot be applied.
    pub fn open(path: impl AsRef<Path>, settings: OpenSettings) -> Result<Self, OpenError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        Self::from_connection(conn, settings)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `OpenError` if the settings cannot be applied.
    pub fn open_in_memory(settings: OpenSettings) -> Result<Self, OpenError> {
        Self::from_connection(Connection::open_in_memory()?, settings)
    }

    /// Wraps an already open connection, applying `settings` to it.
    ///
    /// # Errors
    ///
    /// Returns `OpenError` if a PRAGMA fails or WAL mode is rejected.
    pub fn from_connection(conn: Connection, settings: OpenSettings) -> Result<Self, OpenError> {
        if settings.wal {
            // In-memory databases report "memory", which is acceptable.
            let journal_mode: String =
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            if journal_mode != "wal" && journal_mode != "memory" {
                return Err(OpenError::JournalMode(journal_mode));
            }
        }

        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = {};
             PRAGMA busy_timeout = {};",
            if settings.foreign_keys { "ON" } else { "OFF" },
            settings.busy_timeout_ms
        ))?;

        Ok(Self {
            conn,
            errors: ErrorState {
                mode: settings.error_mode,
                last: RefCell::new(None),
            },
        })
    }

    /// The configured failure channel.
    pub fn error_mode(&self) -> ErrorMode {
        self.errors.mode
    }

    /// Row ID of the most recent successful insert.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// The underlying `rusqlite` connection. Operations issued through it
    /// bypass the error mode.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn run_batch(&self, sql: &str) -> rusqlite::Result<usize> {
        let mut batch = Batch::new(&self.conn, sql);
        let mut affected = 0;
        while let Some(mut stmt) = batch.next()? {
            if stmt.column_count() == 0 {
                affected = stmt.raw_execute()?;
            } else {
                let mut rows = stmt.raw_query();
                while rows.next()?.is_some() {}
            }
        }
        Ok(affected)
    }

    fn prepare_statement(&self, sql: &str) -> rusqlite::Result<SqliteStatement<'_>> {
        let stmt = self.conn.prepare(sql)?;
        Ok(SqliteStatement {
            stmt,
            errors: &self.errors,
            rows: Vec::new(),
            row_count: 0,
        })
    }

    fn transaction_control(&self, sql: &str, requires_open: bool) -> rusqlite::Result<bool> {
        self.errors.clear();
        if self.in_transaction() != requires_open {
            let message = if requires_open {
                "there is no active transaction"
            } else {
                "there is already an active transaction"
            };
            let err = rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some(message.to_string()),
            );
            self.errors.record(&err);
            return Err(err);
        }
        self.errors
            .settle(self.conn.execute_batch(sql).map(|()| true), false)
    }
}

impl Driver for SqliteDriver {
    type Error = rusqlite::Error;
    type Statement<'conn> = SqliteStatement<'conn>;

    fn exec(&self, sql: &str) -> rusqlite::Result<Option<usize>> {
        self.errors.clear();
        self.errors.settle(self.run_batch(sql).map(Some), None)
    }

    fn prepare(&self, sql: &str) -> rusqlite::Result<Option<SqliteStatement<'_>>> {
        self.errors.clear();
        self.errors.settle(self.prepare_statement(sql).map(Some), None)
    }

    fn query(&self, sql: &str) -> rusqlite::Result<Option<SqliteStatement<'_>>> {
        self.errors.clear();
        let result = self.prepare_statement(sql).and_then(|mut stmt| {
            stmt.run(&[])?;
            Ok(Some(stmt))
        });
        self.errors.settle(result, None)
    }

    fn begin_transaction(&self) -> rusqlite::Result<bool> {
        self.transaction_control("BEGIN", false)
    }

    fn commit(&self) -> rusqlite::Result<bool> {
        self.transaction_control("COMMIT", true)
    }

    fn rollback(&self) -> rusqlite::Result<bool> {
        self.transaction_control("ROLLBACK", true)
    }

    fn last_error(&self) -> Option<ErrorInfo> {
        self.errors.last.borrow().clone()
    }

    fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }
}

/// A prepared SQLite statement implementing [`DriverStatement`].
///
/// Rows produced by an execution are buffered so they stay readable after
/// the statement is reset for the next execution.
pub struct SqliteStatement<'conn> {
    stmt: rusqlite::Statement<'conn>,
    errors: &'conn ErrorState,
    rows: Vec<Vec<Value>>,
    row_count: usize,
}

impl SqliteStatement<'_> {
    fn run(&mut self, params: &[Value]) -> rusqlite::Result<()> {
        self.rows.clear();
        self.row_count = 0;

        let expected = self.stmt.parameter_count();
        if params.len() != expected {
            return Err(rusqlite::Error::InvalidParameterCount(params.len(), expected));
        }
        for (index, value) in params.iter().enumerate() {
            self.stmt.raw_bind_parameter(index + 1, value)?;
        }

        let columns = self.stmt.column_count();
        if columns == 0 {
            self.row_count = self.stmt.raw_execute()?;
            return Ok(());
        }

        let mut fetched = Vec::new();
        let mut rows = self.stmt.raw_query();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns);
            for column in 0..columns {
                values.push(row.get::<_, Value>(column)?);
            }
            fetched.push(values);
        }
        self.row_count = fetched.len();
        self.rows = fetched;
        Ok(())
    }
}

impl std::fmt::Debug for SqliteStatement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStatement")
            .field("sql", &self.stmt.expanded_sql())
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl DriverStatement for SqliteStatement<'_> {
    type Error = rusqlite::Error;

    fn execute(&mut self, params: &[Value]) -> rusqlite::Result<bool> {
        self.errors.clear();
        let result = self.run(params).map(|()| true);
        self.errors.settle(result, false)
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    fn column_names(&self) -> Vec<String> {
        self.stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
