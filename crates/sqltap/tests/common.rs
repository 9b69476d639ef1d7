#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sqltap::{
    Connection, ErrorInfo, ErrorMode, ExecutionFailed, ExecutionFailedSubscriber,
    ExecutionStarts, ExecutionStartsSubscriber, ExecutionSucceeded, ExecutionSucceededSubscriber,
    OpenSettings, Prepare, PrepareSubscriber, Subscriber, TransactionBegin,
    TransactionBeginSubscriber, TransactionCommit, TransactionCommitSubscriber,
    TransactionRollback, TransactionRollbackSubscriber, Value,
};

/// An owned copy of a delivered event.
#[derive(Debug, Clone, PartialEq)]
pub enum Seen {
    Starts(String),
    Succeeded {
        row_count: usize,
        params: Option<Vec<Value>>,
    },
    Failed {
        error: ErrorInfo,
        params: Option<Vec<Value>>,
    },
    Prepare(String),
    Begin,
    Commit,
    Rollback,
}

impl Seen {
    pub fn starts(query: &str) -> Self {
        Self::Starts(query.to_string())
    }

    pub fn prepare(query: &str) -> Self {
        Self::Prepare(query.to_string())
    }

    pub fn succeeded(row_count: usize, params: Option<Vec<Value>>) -> Self {
        Self::Succeeded { row_count, params }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn failure(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub type Log = Arc<Mutex<Vec<(String, Seen)>>>;

/// Subscribes to every event kind and appends what it sees to a log that
/// may be shared with other recorders.
pub struct Recorder {
    label: String,
    log: Log,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Self::sharing("recorder", &Log::default())
    }

    pub fn sharing(label: &str, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            log: Arc::clone(log),
        })
    }

    fn push(&self, seen: Seen) {
        self.log
            .lock()
            .expect("lock should not be poisoned")
            .push((self.label.clone(), seen));
    }

    /// Events this recorder received, in delivery order.
    pub fn seen(&self) -> Vec<Seen> {
        self.log
            .lock()
            .expect("lock should not be poisoned")
            .iter()
            .filter(|(label, _)| *label == self.label)
            .map(|(_, seen)| seen.clone())
            .collect()
    }
}

impl ExecutionStartsSubscriber for Recorder {
    fn on_execution_starts(&self, event: &ExecutionStarts<'_>) {
        self.push(Seen::starts(event.query()));
    }
}

impl ExecutionSucceededSubscriber for Recorder {
    fn on_execution_succeeded(&self, event: &ExecutionSucceeded<'_>) {
        self.push(Seen::Succeeded {
            row_count: event.row_count(),
            params: event.params().map(<[Value]>::to_vec),
        });
    }
}

impl ExecutionFailedSubscriber for Recorder {
    fn on_execution_failed(&self, event: &ExecutionFailed<'_>) {
        self.push(Seen::Failed {
            error: event.error().clone(),
            params: event.params().map(<[Value]>::to_vec),
        });
    }
}

impl PrepareSubscriber for Recorder {
    fn on_prepare(&self, event: &Prepare<'_>) {
        self.push(Seen::prepare(event.query()));
    }
}

impl TransactionBeginSubscriber for Recorder {
    fn on_transaction_begin(&self, _event: &TransactionBegin) {
        self.push(Seen::Begin);
    }
}

impl TransactionCommitSubscriber for Recorder {
    fn on_transaction_commit(&self, _event: &TransactionCommit) {
        self.push(Seen::Commit);
    }
}

impl TransactionRollbackSubscriber for Recorder {
    fn on_transaction_rollback(&self, _event: &TransactionRollback) {
        self.push(Seen::Rollback);
    }
}

impl Subscriber for Recorder {
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

/// Opens an in-memory connection with one recorder attached.
pub fn recorded(mode: ErrorMode) -> (Connection, Arc<Recorder>) {
    let settings = OpenSettings {
        error_mode: mode,
        ..OpenSettings::default()
    };
    let mut conn = Connection::open_in_memory(settings).expect("should open in-memory db");
    let recorder = Recorder::new();
    conn.subscribe(recorder.clone());
    (conn, recorder)
}
