//! Event taxonomy and subscriber capabilities for instrumented database
//! connections.
//!
//! Every lifecycle moment of a wrapped connection is represented by its own
//! immutable event type. An event routes itself: [`Event::deliver`] asks the
//! subscriber whether it carries the matching capability and, if it does,
//! invokes that one handler. Subscribers lacking the capability are skipped
//! silently.
//!
//! # Event kinds
//!
//! | Kind | Payload | Emitted by |
//! |------|---------|------------|
//! | `EXECUTION_STARTS` | query text | connection, statement |
//! | `EXECUTION_SUCCEEDED` | row count, optional params | connection, statement |
//! | `EXECUTION_FAILED` | [`ErrorInfo`], optional params | connection, statement |
//! | `PREPARE` | query text | connection |
//! | `TRANSACTION_BEGIN` | none | connection |
//! | `TRANSACTION_COMMIT` | none | connection |
//! | `TRANSACTION_ROLLBACK` | none | connection |
//!
//! # Usage
//!
//! ```rust
//! use sqltap_events::{Event, ExecutionStarts, ExecutionStartsSubscriber, Subscriber};
//!
//! struct QueryPrinter;
//!
//! impl ExecutionStartsSubscriber for QueryPrinter {
//!     fn on_execution_starts(&self, event: &ExecutionStarts<'_>) {
//!         println!("running {}", event.query());
//!     }
//! }
//!
//! impl Subscriber for QueryPrinter {
//!     fn as_execution_starts(&self) -> Option<&dyn ExecutionStartsSubscriber> {
//!         Some(self)
//!     }
//! }
//!
//! ExecutionStarts::new("SELECT 1").deliver(&QueryPrinter);
//! ```

mod error;
mod event;
mod kind;
mod subscriber;

pub use error::{ErrorInfo, SqlError, GENERAL_ERROR_STATE, INVALID_PARAMETER_STATE};
pub use event::{
    Event, ExecutionFailed, ExecutionStarts, ExecutionSucceeded, Prepare, TransactionBegin,
    TransactionCommit, TransactionRollback,
};
pub use kind::{EventKind, ParseEventKindError};
pub use subscriber::{
    ExecutionFailedSubscriber, ExecutionStartsSubscriber, ExecutionSucceededSubscriber,
    PrepareSubscriber, Subscriber, TransactionBeginSubscriber, TransactionCommitSubscriber,
    TransactionRollbackSubscriber,
};

/// Positional statement parameter, as bound by the wrapped client.
pub use rusqlite::types::Value;
