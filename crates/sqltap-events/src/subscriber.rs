//! Subscriber capabilities.
//!
//! Each event kind has one narrow trait with a single handler. A subscriber
//! implements the traits for the kinds it cares about and advertises them
//! through [`Subscriber`]'s capability queries, which default to `None`.

use crate::event::{
    ExecutionFailed, ExecutionStarts, ExecutionSucceeded, Prepare, TransactionBegin,
    TransactionCommit, TransactionRollback,
};

/// Receives [`ExecutionStarts`] events.
pub trait ExecutionStartsSubscriber {
    /// Called before the wrapped client runs a query.
    fn on_execution_starts(&self, event: &ExecutionStarts<'_>);
}

/// Receives [`ExecutionSucceeded`] events.
pub trait ExecutionSucceededSubscriber {
    /// Called after the wrapped client reports success.
    fn on_execution_succeeded(&self, event: &ExecutionSucceeded<'_>);
}

/// Receives [`ExecutionFailed`] events.
pub trait ExecutionFailedSubscriber {
    /// Called after the wrapped client raises or returns a failure sentinel.
    fn on_execution_failed(&self, event: &ExecutionFailed<'_>);
}

/// Receives [`Prepare`] events.
pub trait PrepareSubscriber {
    /// Called after a statement was prepared.
    fn on_prepare(&self, event: &Prepare<'_>);
}

/// Receives [`TransactionBegin`] events.
pub trait TransactionBeginSubscriber {
    /// Called after a transaction was opened.
    fn on_transaction_begin(&self, event: &TransactionBegin);
}

/// Receives [`TransactionCommit`] events.
pub trait TransactionCommitSubscriber {
    /// Called after a transaction was committed.
    fn on_transaction_commit(&self, event: &TransactionCommit);
}

/// Receives [`TransactionRollback`] events.
pub trait TransactionRollbackSubscriber {
    /// Called after a transaction was rolled back.
    fn on_transaction_rollback(&self, event: &TransactionRollback);
}

/// A registered observer.
///
/// The capability queries are how an event asks a subscriber whether it
/// handles that event's kind. Override the ones matching the capability
/// traits the type implements and return `Some(self)`; everything else keeps
/// the `None` default and is never called.
pub trait Subscriber: Send + Sync {
    fn as_execution_starts(&self) -> Option<&dyn ExecutionStartsSubscriber> {
        None
    }

    fn as_execution_succeeded(&self) -> Option<&dyn ExecutionSucceededSubscriber> {
        None
    }

    fn as_execution_failed(&self) -> Option<&dyn ExecutionFailedSubscriber> {
        None
    }

    fn as_prepare(&self) -> Option<&dyn PrepareSubscriber> {
        None
    }

    fn as_transaction_begin(&self) -> Option<&dyn TransactionBeginSubscriber> {
        None
    }

    fn as_transaction_commit(&self) -> Option<&dyn TransactionCommitSubscriber> {
        None
    }

    fn as_transaction_rollback(&self) -> Option<&dyn TransactionRollbackSubscriber> {
        None
    }
}
