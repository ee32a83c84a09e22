//! Operation status codes
//!
//! Coarse result codes returned by validated edit operations and document
//! initialization hooks, where a failure is an expected outcome rather than
//! an error to propagate.

use core::fmt;

/// Outcome of a validated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The operation succeeded.
    Ok,
    /// The operation failed for an unspecified reason.
    Error,
    /// The operation is forbidden in the current state.
    NotAllowed,
    /// A referenced entity does not exist.
    NotFound,
    /// The operation did not finish in time.
    Timeout,
    /// A required directory is missing.
    NoDirectory,
    /// An input value was rejected.
    InvalidInput,
    /// The operation was a no-op; the target already had the value.
    NotChanged,
    /// The operation is not implemented by this type.
    NotImplemented,
    /// The operation was declined.
    No,
}

impl Status {
    /// Whether this status reports success. `NotChanged` counts as success:
    /// the target holds the requested value.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok | Self::NotChanged)
    }

    #[must_use]
    pub const fn is_err(self) -> bool {
        !self.is_ok()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Error => "error",
            Self::NotAllowed => "not allowed",
            Self::NotFound => "not found",
            Self::Timeout => "timeout",
            Self::NoDirectory => "no directory",
            Self::InvalidInput => "invalid input",
            Self::NotChanged => "not changed",
            Self::NotImplemented => "not implemented",
            Self::No => "no",
        };
        f.write_str(label)
    }
}
