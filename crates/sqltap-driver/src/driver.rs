//! The client contract consumed by the instrumentation layer.

use sqltap_events::{ErrorInfo, SqlError, Value};

/// A real database connection.
pub trait Driver {
    /// The error the client raises.
    type Error: SqlError + 'static;

    /// Statements produced by [`Driver::prepare`] and [`Driver::query`].
    type Statement<'conn>: DriverStatement<Error = Self::Error>
    where
        Self: 'conn;

    /// Runs raw SQL and returns the number of affected rows, or `None` on
    /// failure.
    fn exec(&self, sql: &str) -> Result<Option<usize>, Self::Error>;

    /// Prepares `sql` without running it. `None` on failure.
    fn prepare(&self, sql: &str) -> Result<Option<Self::Statement<'_>>, Self::Error>;

    /// Prepares and runs `sql` without parameters, returning the executed
    /// statement. `None` on failure.
    fn query(&self, sql: &str) -> Result<Option<Self::Statement<'_>>, Self::Error>;

    /// Opens a transaction. `false` on failure.
    fn begin_transaction(&self) -> Result<bool, Self::Error>;

    /// Commits the open transaction. `false` on failure.
    fn commit(&self) -> Result<bool, Self::Error>;

    /// Rolls back the open transaction. `false` on failure.
    fn rollback(&self) -> Result<bool, Self::Error>;

    /// The failure recorded by the most recent operation, if it failed.
    fn last_error(&self) -> Option<ErrorInfo>;

    /// Whether a transaction is currently open.
    fn in_transaction(&self) -> bool;
}

/// A statement prepared by a [`Driver`].
pub trait DriverStatement {
    /// The error the client raises.
    type Error: SqlError + 'static;

    /// Binds `params` positionally and runs the statement. `false` on
    /// failure.
    fn execute(&mut self, params: &[Value]) -> Result<bool, Self::Error>;

    /// Rows affected by (or returned from) the last execution.
    fn row_count(&self) -> usize;

    /// Rows produced by the last execution.
    fn rows(&self) -> &[Vec<Value>];

    /// Result column names.
    fn column_names(&self) -> Vec<String>;
}
