//! How a client reports SQL failures.

use serde::{Deserialize, Serialize};

/// Failure channel for SQL errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Failures are returned as `Err`.
    #[default]
    Raise,
    /// Failures are recorded as the last error and a sentinel is returned.
    Silent,
}

impl ErrorMode {
    /// Returns the canonical string label for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::Silent => "silent",
        }
    }
}

impl std::fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ErrorMode {
    type Err = ParseErrorModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raise" => Ok(Self::Raise),
            "silent" => Ok(Self::Silent),
            _ => Err(ParseErrorModeError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown error mode string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error mode: {0} (expected \"raise\" or \"silent\")")]
pub struct ParseErrorModeError(pub String);
