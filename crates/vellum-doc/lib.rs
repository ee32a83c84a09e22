//! Undo/redo journaling and the document contract
//!
//! `vellum-doc` is the mutation-journaling layer of vellum: every primitive
//! edit to document state registers with an [`UndoManager`] before the
//! caller assigns the new value, primitive edits compose into atomic
//! [`UndoStep`]s, and the journal participates in object lifetime — objects
//! referenced only from undo steps stay alive until the journal forgets
//! them.
//!
//! # The recording protocol
//!
//! A reversible edit is three calls: record the field, assign the value,
//! close the step (typically once per user gesture, covering several
//! records):
//!
//! ```
//! use vellum_core::{AutoreleasePool, Field, Handle, Managed};
//! use vellum_doc::UndoManager;
//!
//! struct Counter {
//!     value: Field<i32>,
//! }
//!
//! impl Managed for Counter {
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! let pool = AutoreleasePool::new();
//! let counter = Handle::new_in(&pool, Counter { value: Field::new(0) });
//! let owner = counter.to_any();
//!
//! let mut journal = UndoManager::new();
//! journal.set_active(true);
//!
//! journal.record(&owner, &counter.value);
//! counter.value.set(42);
//! journal.close_step();
//!
//! assert_eq!(counter.value.get(), 42);
//! assert!(journal.undo());
//! assert_eq!(counter.value.get(), 0);
//! assert!(journal.redo());
//! assert_eq!(counter.value.get(), 42);
//! ```
//!
//! # Documents
//!
//! [`DocumentState`] bundles the pieces every document host needs — one
//! journal (active from construction), a dirty flag distinct from journal
//! emptiness, a file holder and a regenerate bit — and the [`Document`]
//! trait adds the save/load/init hooks concrete documents implement.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;
pub mod events;

// Public API exports
pub use crate::core::change::{Change, ChangeKind, JournalValue, Ownership, OwnershipMarker};
pub use crate::core::document::{Document, DocumentState};
pub use crate::core::errors::{DocError, Result};
pub use crate::core::history::{DirtyFlag, UndoManager};
pub use crate::core::step::UndoStep;
pub use events::DocumentEvent;
