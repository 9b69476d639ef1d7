//! The failure shape shared by raised errors and driver error state.

use serde::{Deserialize, Serialize};

/// SQLSTATE reported for general driver errors.
pub const GENERAL_ERROR_STATE: &str = "HY000";

/// SQLSTATE reported when bound parameters do not match the statement.
pub const INVALID_PARAMETER_STATE: &str = "HY093";

/// A driver failure as seen by subscribers.
///
/// Both failure channels normalise into this shape: an error raised by the
/// wrapped client (see [`SqlError`]) and the last-error state a client
/// records when it reports failure through a sentinel instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Five-character SQLSTATE code.
    pub state: String,
    /// Driver-specific error code, when the driver reports one.
    pub code: Option<i32>,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    /// Creates an error description from its parts.
    pub fn new(state: impl Into<String>, code: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            code,
            message: message.into(),
        }
    }

    /// Describes a raised error.
    pub fn from_error<E: SqlError + ?Sized>(error: &E) -> Self {
        Self::new(error.sql_state(), error.code(), error.to_string())
    }

    /// Placeholder used when a client signalled failure but recorded no
    /// error state.
    pub fn unknown() -> Self {
        Self::new(GENERAL_ERROR_STATE, None, "unknown driver error")
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "SQLSTATE[{}] ({}): {}", self.state, code, self.message),
            None => write!(f, "SQLSTATE[{}]: {}", self.state, self.message),
        }
    }
}

/// An error raised by a wrapped database client.
///
/// Implementors expose the SQLSTATE and driver code so a failure event can
/// be built from the error without consuming it.
pub trait SqlError: std::error::Error {
    /// SQLSTATE classifying this error.
    fn sql_state(&self) -> &str;

    /// Driver-specific error code, if any.
    fn code(&self) -> Option<i32>;
}

impl SqlError for rusqlite::Error {
    fn sql_state(&self) -> &str {
        match self {
            rusqlite::Error::InvalidParameterCount(..) | rusqlite::Error::InvalidParameterName(_) => {
                INVALID_PARAMETER_STATE
            }
            _ => GENERAL_ERROR_STATE,
        }
    }

    fn code(&self) -> Option<i32> {
        match self {
            rusqlite::Error::SqliteFailure(err, _) => Some(err.extended_code),
            _ => None,
        }
    }
}
