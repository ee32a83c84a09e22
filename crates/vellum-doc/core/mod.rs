//! Core types of the journaling layer
//!
//! - [`change`]: the reversible primitive edit and its ownership markers
//! - [`step`]: ordered groups of changes committed atomically
//! - [`history`]: the [`UndoManager`](history::UndoManager) with its two
//!   stacks and the open step
//! - [`edit`]: validated record-and-assign helpers
//! - [`document`]: the document state and trait
//! - [`errors`]: the crate error type

pub mod change;
pub mod document;
pub mod edit;
pub mod errors;
pub mod history;
pub mod step;

// Re-export commonly used types
pub use change::{Change, ChangeKind, JournalValue, Ownership, OwnershipMarker};
pub use document::{Document, DocumentState};
pub use errors::{DocError, Result};
pub use history::{DirtyFlag, UndoManager};
pub use step::UndoStep;
