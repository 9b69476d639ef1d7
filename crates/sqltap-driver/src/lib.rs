//! The database client seen by the instrumentation layer.
//!
//! [`Driver`] and [`DriverStatement`] describe the real client the
//! instrumented connection wraps: raw execution, preparation, one-shot
//! queries, transaction control and a last-error state. Failures arrive
//! through one of two channels: an `Err` (the client raised), or a sentinel
//! return (`Ok(None)` / `Ok(false)`) with the failure recorded in
//! [`Driver::last_error`].
//!
//! [`SqliteDriver`] implements the contract over `rusqlite`. Its
//! [`ErrorMode`] picks which failure channel SQL errors travel through.
//!
//! # Design decisions
//!
//! - **Sentinels are `Option`/`bool`, not a custom enum**: the instrumented
//!   layer returns exactly what the client returned, so the client's own
//!   shapes are the public contract.
//! - **Statements borrow their driver**: a prepared statement cannot
//!   outlive the connection that produced it.

mod driver;
mod mode;
mod sqlite;

pub use driver::{Driver, DriverStatement};
pub use mode::{ErrorMode, ParseErrorModeError};
pub use sqlite::{OpenError, OpenSettings, SqliteDriver, SqliteStatement};
