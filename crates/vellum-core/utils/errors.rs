//! Error types for vellum-core
//!
//! Structured errors via `thiserror`; no `anyhow`. Higher layers wrap
//! [`CoreError`] transparently in their own error enums.

use thiserror::Error;

/// Error type for core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A preferences key is absent.
    #[error("preferences key not found: {key}")]
    KeyNotFound { key: String },

    /// A preferences value failed to parse as the requested type.
    #[error("cannot parse preferences value {value:?} under {key:?} as {expected}")]
    Parse {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A type-erased handle was downcast to the wrong type.
    #[error("handle does not refer to a {expected}")]
    WrongType { expected: &'static str },
}

/// Result type alias for core operations.
pub type Result<T> = core::result::Result<T, CoreError>;
