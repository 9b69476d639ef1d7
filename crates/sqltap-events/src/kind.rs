//! Event kind tags.

use serde::{Deserialize, Serialize};

/// The kind of a lifecycle event.
///
/// Tags are descriptive only. Routing never switches on them; each event
/// type delivers itself to the capability it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// A query is about to be handed to the wrapped client.
    ExecutionStarts,
    /// The wrapped client reported success.
    ExecutionSucceeded,
    /// The wrapped client raised an error or returned a failure sentinel.
    ExecutionFailed,
    /// A statement was prepared.
    Prepare,
    /// A transaction was opened.
    TransactionBegin,
    /// A transaction was committed.
    TransactionCommit,
    /// A transaction was rolled back.
    TransactionRollback,
}

impl EventKind {
    /// Every kind, in lifecycle order.
    pub const ALL: [EventKind; 7] = [
        Self::ExecutionStarts,
        Self::ExecutionSucceeded,
        Self::ExecutionFailed,
        Self::Prepare,
        Self::TransactionBegin,
        Self::TransactionCommit,
        Self::TransactionRollback,
    ];

    /// Returns the canonical string label for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExecutionStarts => "EXECUTION_STARTS",
            Self::ExecutionSucceeded => "EXECUTION_SUCCEEDED",
            Self::ExecutionFailed => "EXECUTION_FAILED",
            Self::Prepare => "PREPARE",
            Self::TransactionBegin => "TRANSACTION_BEGIN",
            Self::TransactionCommit => "TRANSACTION_COMMIT",
            Self::TransactionRollback => "TRANSACTION_ROLLBACK",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseEventKindError(s.to_string()))
    }
}

/// Error returned when parsing an unknown event kind string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event kind: {0}")]
pub struct ParseEventKindError(pub String);
