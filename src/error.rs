//! Error types.
//!
//! Two layers:
//! - [`SourceError`] is what a hardware adapter reports from a single read.
//! - [`InputError`] is what the public API returns to application code.
//!
//! Invalid arguments are caller bugs and are reported synchronously by the call
//! that received them. Disconnection is *not* an error at the API level: the
//! driver absorbs [`SourceError::Disconnected`] and flips its connected flag.

use thiserror::Error;

/// Failure reported by a [`StateSource`](crate::device::StateSource) read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The device is no longer attached (or the slot is empty).
    #[error("device not connected")]
    Disconnected,

    /// The OS query failed for another reason (permissions, stale handle, ...).
    #[error("hardware read failed (code {code})")]
    Failed { code: u32 },
}

/// Errors returned by the public API.
#[derive(Debug, Error)]
pub enum InputError {
    /// An identifier or configuration value is outside its valid domain.
    #[error("invalid {what}: {reason}")]
    InvalidArgument { what: &'static str, reason: String },

    /// A transient hardware failure surfaced from `update`/`reset`.
    #[error("hardware read failed (code {code})")]
    Hardware { code: u32 },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl InputError {
    pub(crate) fn invalid(what: &'static str, reason: impl Into<String>) -> Self {
        InputError::InvalidArgument {
            what,
            reason: reason.into(),
        }
    }

    /// `true` for caller errors (as opposed to operational failures).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, InputError::InvalidArgument { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = InputError> = std::result::Result<T, E>;
