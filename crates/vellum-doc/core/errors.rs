//! Error types for the vellum-doc crate
//!
//! Wraps `CoreError` from vellum-core and adds the document- and
//! history-specific cases. Same philosophy as the core crate: `thiserror`
//! enums, no `anyhow`, and a `Result` alias.

use core::fmt;

use thiserror::Error;
use vellum_core::CoreError;

/// Error type for document and journal operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocError {
    /// Errors from vellum-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,

    /// A step is still accumulating changes; close it first.
    #[error("an undo step is still open")]
    StepOpen,

    /// The document's undo manager has been released.
    #[error("document has no undo manager")]
    NoUndoManager,

    /// The document was already loaded or initialized; the two entry points
    /// are mutually exclusive per instance.
    #[error("document was already loaded or initialized")]
    AlreadyLoaded,

    /// A save or load hook failed on I/O.
    #[error("I/O error: {0}")]
    Io(String),
}

impl DocError {
    /// Create a new I/O error from any displayable source.
    pub fn io<T: fmt::Display>(message: T) -> Self {
        Self::Io(message.to_string())
    }

    /// Whether this error came from the undo/redo gate.
    #[must_use]
    pub const fn is_history_error(&self) -> bool {
        matches!(
            self,
            Self::NothingToUndo | Self::NothingToRedo | Self::StepOpen
        )
    }
}

/// Result type alias for document operations.
pub type Result<T> = core::result::Result<T, DocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_convert() {
        let err: DocError = CoreError::KeyNotFound {
            key: "grid".to_string(),
        }
        .into();
        assert!(matches!(err, DocError::Core(_)));
        assert_eq!(err.to_string(), "preferences key not found: grid");
    }

    #[test]
    fn history_error_predicate() {
        assert!(DocError::NothingToUndo.is_history_error());
        assert!(DocError::NothingToRedo.is_history_error());
        assert!(DocError::StepOpen.is_history_error());
        assert!(!DocError::io("disk on fire").is_history_error());
    }
}
