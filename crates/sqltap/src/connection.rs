//! The instrumented connection.

use std::path::Path;
use std::sync::Arc;

use sqltap_driver::{Driver, OpenError, OpenSettings, SqliteDriver};
use sqltap_events::{
    ErrorInfo, Event, ExecutionFailed, ExecutionStarts, ExecutionSucceeded, Prepare, Subscriber,
    TransactionBegin, TransactionCommit, TransactionRollback,
};

use crate::dispatch::Dispatcher;
use crate::statement::Statement;

/// A database connection that notifies subscribers of its lifecycle.
///
/// Every instrumented operation returns exactly what the wrapped driver
/// returned: the same values, the same sentinels, the same error values.
/// Subscribers are notified synchronously on the calling thread, before
/// the operation returns.
#[derive(Debug)]
pub struct Connection<D: Driver = SqliteDriver> {
    driver: D,
    dispatcher: Dispatcher,
}

impl Connection<SqliteDriver> {
    /// Opens an instrumented connection to the SQLite file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `OpenError` if the database cannot be opened or configured.
    pub fn open(path: impl AsRef<Path>, settings: OpenSettings) -> Result<Self, OpenError> {
        SqliteDriver::open(path, settings).map(Self::new)
    }

    /// Opens an instrumented connection to a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns `OpenError` if the settings cannot be applied.
    pub fn open_in_memory(settings: OpenSettings) -> Result<Self, OpenError> {
        SqliteDriver::open_in_memory(settings).map(Self::new)
    }
}

impl<D: Driver> Connection<D> {
    /// Wraps `driver` with an empty subscriber list.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Registers `subscriber` after all previously registered ones.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscriber>) {
        self.dispatcher.subscribe(subscriber);
    }

    /// Number of registrations, counting duplicates.
    pub fn subscriber_count(&self) -> usize {
        self.dispatcher.len()
    }

    pub(crate) fn notify(&self, event: &dyn Event) {
        self.dispatcher.notify(event);
    }

    /// Runs raw SQL, returning the affected row count or the driver's
    /// failure sentinel.
    ///
    /// Emits `ExecutionStarts`, then `ExecutionSucceeded` or
    /// `ExecutionFailed`.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged when it raises.
    pub fn exec(&self, sql: &str) -> Result<Option<usize>, D::Error> {
        self.notify(&ExecutionStarts::new(sql));
        let result = self.driver.exec(sql);
        self.finish(result, |affected| *affected)
    }

    /// Prepares `sql`.
    ///
    /// Emits `Prepare` only when a statement is returned. Preparing does not
    /// execute anything, so no execution events are emitted.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged when it raises.
    pub fn prepare(&self, sql: &str) -> Result<Option<Statement<'_, D>>, D::Error> {
        let Some(inner) = self.driver.prepare(sql)? else {
            return Ok(None);
        };
        let statement = Statement::new(self, inner, sql);
        self.notify(&Prepare::new(statement.query_string()));
        Ok(Some(statement))
    }

    /// Prepares and runs `sql` without parameters, returning the executed
    /// statement so its rows can be read.
    ///
    /// Emits `ExecutionStarts`, then `ExecutionSucceeded` (carrying the
    /// statement's row count) or `ExecutionFailed`.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged when it raises.
    pub fn query(&self, sql: &str) -> Result<Option<Statement<'_, D>>, D::Error> {
        self.notify(&ExecutionStarts::new(sql));
        let result = self
            .driver
            .query(sql)
            .map(|inner| inner.map(|inner| Statement::new(self, inner, sql)));
        self.finish(result, |stmt| stmt.row_count())
    }

    /// Opens a transaction. Emits `TransactionBegin` only if the driver
    /// reports success.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged, without emitting an event.
    pub fn begin_transaction(&self) -> Result<bool, D::Error> {
        let began = self.driver.begin_transaction()?;
        if began {
            self.notify(&TransactionBegin);
        }
        Ok(began)
    }

    /// Commits the open transaction. Emits `TransactionCommit` only if the
    /// driver reports success.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged, without emitting an event.
    pub fn commit(&self) -> Result<bool, D::Error> {
        let committed = self.driver.commit()?;
        if committed {
            self.notify(&TransactionCommit);
        }
        Ok(committed)
    }

    /// Rolls back the open transaction. Emits `TransactionRollback` only if
    /// the driver reports success.
    ///
    /// # Errors
    ///
    /// Returns the driver's error unchanged, without emitting an event.
    pub fn rollback(&self) -> Result<bool, D::Error> {
        let rolled_back = self.driver.rollback()?;
        if rolled_back {
            self.notify(&TransactionRollback);
        }
        Ok(rolled_back)
    }

    /// The failure recorded by the driver's most recent operation.
    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.driver.last_error()
    }

    pub fn in_transaction(&self) -> bool {
        self.driver.in_transaction()
    }

    /// The wrapped driver. Calls made through it are not observed.
    pub fn inner(&self) -> &D {
        &self.driver
    }

    /// Emits the terminal event for a raw execution and hands the driver's
    /// result back untouched.
    fn finish<T>(
        &self,
        result: Result<Option<T>, D::Error>,
        row_count: impl FnOnce(&T) -> usize,
    ) -> Result<Option<T>, D::Error> {
        match &result {
            Ok(Some(value)) => self.notify(&ExecutionSucceeded::new(row_count(value), None)),
            Ok(None) => self.notify(&ExecutionFailed::from_error_state(
                self.driver.last_error(),
                None,
            )),
            Err(err) => self.notify(&ExecutionFailed::from_error(err, None)),
        }
        result
    }
}
