//! Lifecycle event types.
//!
//! Events borrow their query text and parameters from the operation that
//! emits them and are handed to subscribers by shared reference only, so a
//! subscriber can read but never alter them. Subscribers that need to keep
//! an event beyond the handler copy what they need out of it.

use crate::error::{ErrorInfo, SqlError};
use crate::kind::EventKind;
use crate::subscriber::Subscriber;
use rusqlite::types::Value;

/// A lifecycle event that knows which subscriber capability receives it.
pub trait Event: std::fmt::Debug {
    /// The kind tag of this event.
    fn kind(&self) -> EventKind;

    /// Hands this event to `subscriber` if it carries the matching
    /// capability; does nothing otherwise.
    fn deliver(&self, subscriber: &dyn Subscriber);
}

/// A query is about to be handed to the wrapped client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionStarts<'a> {
    query: &'a str,
}

impl<'a> ExecutionStarts<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }

    /// The SQL text being executed.
    pub fn query(&self) -> &'a str {
        self.query
    }
}

impl Event for ExecutionStarts<'_> {
    fn kind(&self) -> EventKind {
        EventKind::ExecutionStarts
    }

    fn deliver(&self, subscriber: &dyn Subscriber) {
        if let Some(target) = subscriber.as_execution_starts() {
            target.on_execution_starts(self);
        }
    }
}

/// The wrapped client reported success.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionSucceeded<'a> {
    row_count: usize,
    params: Option<&'a [Value]>,
}

impl<'a> ExecutionSucceeded<'a> {
    pub fn new(row_count: usize, params: Option<&'a [Value]>) -> Self {
        Self { row_count, params }
    }

    /// Rows affected (or returned, for statements producing rows).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Parameters bound for this execution; `None` for raw SQL.
    pub fn params(&self) -> Option<&'a [Value]> {
        self.params
    }
}

impl Event for ExecutionSucceeded<'_> {
    fn kind(&self) -> EventKind {
        EventKind::ExecutionSucceeded
    }

    fn deliver(&self, subscriber: &dyn Subscriber) {
        if let Some(target) = subscriber.as_execution_succeeded() {
            target.on_execution_succeeded(self);
        }
    }
}

/// The wrapped client raised an error or returned a failure sentinel.
///
/// Both origins produce the same [`ErrorInfo`] shape, so subscribers never
/// need to tell them apart.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionFailed<'a> {
    error: ErrorInfo,
    params: Option<&'a [Value]>,
}

impl<'a> ExecutionFailed<'a> {
    pub fn new(error: ErrorInfo, params: Option<&'a [Value]>) -> Self {
        Self { error, params }
    }

    /// Builds the event from an error raised by the wrapped client.
    pub fn from_error<E: SqlError + ?Sized>(error: &E, params: Option<&'a [Value]>) -> Self {
        Self::new(ErrorInfo::from_error(error), params)
    }

    /// Builds the event from the client's last-error state, reported after
    /// it returned a failure sentinel.
    pub fn from_error_state(state: Option<ErrorInfo>, params: Option<&'a [Value]>) -> Self {
        Self::new(state.unwrap_or_else(ErrorInfo::unknown), params)
    }

    pub fn error(&self) -> &ErrorInfo {
        &self.error
    }

    /// Parameters bound for this execution; `None` for raw SQL.
    pub fn params(&self) -> Option<&'a [Value]> {
        self.params
    }
}

impl Event for ExecutionFailed<'_> {
    fn kind(&self) -> EventKind {
        EventKind::ExecutionFailed
    }

    fn deliver(&self, subscriber: &dyn Subscriber) {
        if let Some(target) = subscriber.as_execution_failed() {
            target.on_execution_failed(self);
        }
    }
}

/// A statement was prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prepare<'a> {
    query: &'a str,
}

impl<'a> Prepare<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }

    /// The SQL text the statement was prepared with.
    pub fn query(&self) -> &'a str {
        self.query
    }
}

impl Event for Prepare<'_> {
    fn kind(&self) -> EventKind {
        EventKind::Prepare
    }

    fn deliver(&self, subscriber: &dyn Subscriber) {
        if let Some(target) = subscriber.as_prepare() {
            target.on_prepare(self);
        }
    }
}

/// A transaction was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionBegin;

impl Event for TransactionBegin {
    fn kind(&self) -> EventKind {
        EventKind::TransactionBegin
    }

    fn deliver(&self, subscriber: &dyn Subscriber) {
        if let Some(target) = subscriber.as_transaction_begin() {
            target.on_transaction_begin(self);
        }
    }
}

/// A transaction was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionCommit;

impl Event for TransactionCommit {
    fn kind(&self) -> EventKind {
        EventKind::TransactionCommit
    }

    fn deliver(&self, subscriber: &dyn Subscriber) {
        if let Some(target) = subscriber.as_transaction_commit() {
            target.on_transaction_commit(self);
        }
    }
}

/// A transaction was rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionRollback;

impl Event for TransactionRollback {
    fn kind(&self) -> EventKind {
        EventKind::TransactionRollback
    }

    fn deliver(&self, subscriber: &dyn Subscriber) {
        if let Some(target) = subscriber.as_transaction_rollback() {
            target.on_transaction_rollback(self);
        }
    }
}
