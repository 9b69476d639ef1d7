//! Subscriber that writes every lifecycle event to the tracing log.

use sqltap::{
    ExecutionFailed, ExecutionFailedSubscriber, ExecutionStarts, ExecutionStartsSubscriber,
    ExecutionSucceeded, ExecutionSucceededSubscriber, Prepare, PrepareSubscriber, Subscriber,
    TransactionBegin, TransactionBeginSubscriber, TransactionCommit, TransactionCommitSubscriber,
    TransactionRollback, TransactionRollbackSubscriber,
};

#[derive(Debug, Default)]
pub struct LogSubscriber;

impl ExecutionStartsSubscriber for LogSubscriber {
    fn on_execution_starts(&self, event: &ExecutionStarts<'_>) {
        tracing::info!(query = event.query(), "execution starts");
    }
}

impl ExecutionSucceededSubscriber for LogSubscriber {
    fn on_execution_succeeded(&self, event: &ExecutionSucceeded<'_>) {
        tracing::info!(
            row_count = event.row_count(),
            params = ?event.params(),
            "execution succeeded"
        );
    }
}

impl ExecutionFailedSubscriber for LogSubscriber {
    fn on_execution_failed(&self, event: &ExecutionFailed<'_>) {
        let error = event.error();
        tracing::warn!(
            state = %error.state,
            code = ?error.code,
            message = %error.message,
            params = ?event.params(),
            "execution failed"
        );
    }
}

impl PrepareSubscriber for LogSubscriber {
    fn on_prepare(&self, event: &Prepare<'_>) {
        tracing::info!(query = event.query(), "statement prepared");
    }
}

impl TransactionBeginSubscriber for LogSubscriber {
    fn on_transaction_begin(&self, _event: &TransactionBegin) {
        tracing::info!("transaction begin");
    }
}

impl TransactionCommitSubscriber for LogSubscriber {
    fn on_transaction_commit(&self, _event: &TransactionCommit) {
        tracing::info!("transaction commit");
    }
}

impl TransactionRollbackSubscriber for LogSubscriber {
    fn on_transaction_rollback(&self, _event: &TransactionRollback) {
        tracing::info!("transaction rollback");
    }
}

impl Subscriber for LogSubscriber {
    fn as_execution_starts(&self) -> Option<&dyn ExecutionStartsSubscriber> {
        Some(self)
    }

    fn as_execution_succeeded(&self) -> Option<&dyn ExecutionSucceededSubscriber> {
        Some(self)
    }

    fn as_execution_failed(&self) -> Option<&dyn ExecutionFailedSubscriber> {
        Some(self)
    }

    fn as_prepare(&self) -> Option<&dyn PrepareSubscriber> {
        Some(self)
    }

    fn as_transaction_begin(&self) -> Option<&dyn TransactionBeginSubscriber> {
        Some(self)
    }

    fn as_transaction_commit(&self) -> Option<&dyn TransactionCommitSubscriber> {
        Some(self)
    }

    fn as_transaction_rollback(&self) -> Option<&dyn TransactionRollbackSubscriber> {
        Some(self)
    }
}
