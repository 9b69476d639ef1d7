//! The instrumented prepared statement.

use sqltap_driver::{Driver, DriverStatement};
use sqltap_events::{ExecutionFailed, ExecutionStarts, ExecutionSucceeded, Value};

use crate::connection::Connection;

/// A prepared statement that reports its executions through the connection
/// that prepared it.
///
/// The statement keeps its own copy of the SQL it was prepared with, so
/// `ExecutionStarts` always names this statement's query regardless of what
/// else ran on the connection in between. It borrows the connection and
/// cannot outlive it.
pub struct Statement<'conn, D: Driver + 'conn> {
    connection: &'conn Connection<D>,
    inner: D::Statement<'conn>,
    query: String,
}

impl<'conn, D: Driver + 'conn> Statement<'conn, D> {
    pub(crate) fn new(connection: &'conn Connection<D>, inner: D::Statement<'conn>, query: &str) -> Self {
        Self {
            connection,
            inner,
            query: query.to_string(),
        }
    }

    /// Binds `params` positionally and runs the statement, returning the
    /// driver's result unchanged.
    ///
    /// Emits `ExecutionStarts` with this statement's query, then
    /// `ExecutionSucceeded` or `ExecutionFailed` carrying `params`.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged when it raises.
    pub fn execute(&mut self, params: &[Value]) -> Result<bool, D::Error> {
        let connection = self.connection;
        connection.notify(&ExecutionStarts::new(&self.query));

        match self.inner.execute(params) {
            Ok(true) => {
                connection.notify(&ExecutionSucceeded::new(self.inner.row_count(), Some(params)));
                Ok(true)
            }
            Ok(false) => {
                connection.notify(&ExecutionFailed::from_error_state(
                    connection.last_error(),
                    Some(params),
                ));
                Ok(false)
            }
            Err(err) => {
                connection.notify(&ExecutionFailed::from_error(&err, Some(params)));
                Err(err)
            }
        }
    }

    /// The SQL this statement was prepared with.
    pub fn query_string(&self) -> &str {
        &self.query
    }

    /// Rows affected by (or returned from) the last execution.
    pub fn row_count(&self) -> usize {
        self.inner.row_count()
    }

    /// Rows produced by the last execution.
    pub fn rows(&self) -> &[Vec<Value>] {
        self.inner.rows()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.inner.column_names()
    }

    /// The connection this statement reports through.
    pub fn connection(&self) -> &'conn Connection<D> {
        self.connection
    }

    /// The wrapped driver statement. Executions made through it are not
    /// observed.
    pub fn inner(&self) -> &D::Statement<'conn> {
        &self.inner
    }
}

impl<'conn, D: Driver + 'conn> std::fmt::Debug for Statement<'conn, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("query", &self.query)
            .field("row_count", &self.row_count())
            .finish_non_exhaustive()
    }
}
