//! Document event notifications
//!
//! Documents report state transitions through a plain
//! [`std::sync::mpsc::Sender`] installed with
//! [`DocumentState::set_event_channel`](crate::DocumentState::set_event_channel).
//! Send failures are ignored — an observer that went away is not the
//! document's problem.

use std::path::PathBuf;

/// A state transition observers may care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// An undo step was sealed with this many changes.
    StepClosed {
        /// Number of primitive changes committed.
        changes: usize,
    },

    /// An undo was performed.
    UndoPerformed {
        /// Steps left on the undo stack afterwards.
        remaining: usize,
    },

    /// A redo was performed.
    RedoPerformed {
        /// Steps left on the redo stack afterwards.
        remaining: usize,
    },

    /// The dirty flag changed value.
    DirtyChanged(bool),

    /// Both journal stacks were destroyed.
    StacksCleared,

    /// The document was saved.
    DocumentSaved {
        /// File the document was saved to, if one is set.
        path: Option<PathBuf>,
    },

    /// The document was loaded.
    DocumentLoaded {
        /// File the document was loaded from, if one is set.
        path: Option<PathBuf>,
    },

    /// The document asked its view layer for a redraw.
    RegenerationRequested,
}
