//! Instrumented database connections.
//!
//! [`Connection`] wraps a [`Driver`] and emits lifecycle events around every
//! execution, preparation and transaction control call, without changing
//! what the driver returns. Statements prepared through it are
//! [`Statement`]s that dispatch through the connection that created them.
//!
//! Observation logic lives in subscribers outside this crate. A subscriber
//! implements the capability traits from [`sqltap_events`] for the event
//! kinds it wants and is registered with [`Connection::subscribe`].
//!
//! # Event sequences
//!
//! | Operation | Events |
//! |-----------|--------|
//! | `exec` | `ExecutionStarts`, then `ExecutionSucceeded` or `ExecutionFailed` |
//! | `query` | `ExecutionStarts`, then `ExecutionSucceeded` or `ExecutionFailed` |
//! | `prepare` | `Prepare` on success, nothing on failure |
//! | `Statement::execute` | `ExecutionStarts`, then `ExecutionSucceeded` or `ExecutionFailed` |
//! | `begin_transaction` / `commit` / `rollback` | the matching transaction event, only on success |
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sqltap::{Connection, OpenSettings, Value};
//!
//! let mut conn = Connection::open_in_memory(OpenSettings::default())?;
//! conn.subscribe(Arc::new(MySubscriber::default()));
//!
//! conn.exec("CREATE TABLE notes (body TEXT)")?;
//! let mut insert = conn.prepare("INSERT INTO notes (body) VALUES (?)")?.expect("prepared");
//! insert.execute(&[Value::Text("hello".into())])?;
//! ```

mod connection;
mod dispatch;
mod statement;

pub use connection::Connection;
pub use dispatch::Dispatcher;
pub use statement::Statement;

pub use sqltap_driver::{
    Driver, DriverStatement, ErrorMode, OpenError, OpenSettings, SqliteDriver, SqliteStatement,
};
pub use sqltap_events::{
    ErrorInfo, Event, EventKind, ExecutionFailed, ExecutionFailedSubscriber, ExecutionStarts,
    ExecutionStartsSubscriber, ExecutionSucceeded, ExecutionSucceededSubscriber, Prepare,
    PrepareSubscriber, SqlError, Subscriber, TransactionBegin, TransactionBeginSubscriber,
    TransactionCommit, TransactionCommitSubscriber, TransactionRollback,
    TransactionRollbackSubscriber, Value,
};
