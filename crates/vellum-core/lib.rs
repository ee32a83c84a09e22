//! Object-lifetime foundation for document-centric applications
//!
//! `vellum-core` provides the ownership layer every vellum document builds
//! on: reference-counted [`Handle`]s over [`Managed`] entities, an
//! [`AutoreleasePool`] for deferred releases, and journaled [`Field`] slots
//! that the undo layer (`vellum-doc`) targets instead of raw field
//! addresses.
//!
//! # Design
//!
//! - **One handle, one reference.** [`Handle`] and its type-erased sibling
//!   [`AnyHandle`] each stand for exactly one counted reference. `retain`
//!   clones, `release` consumes; a reference that reached count zero cannot
//!   be used again because the handle no longer exists.
//! - **Single mutator thread.** Handles are not `Send`. Cross-thread
//!   reference juggling is out of scope by type, which is why field slots
//!   and the journal need no internal locking.
//! - **Slots, not pointers.** Journaled state lives in [`Field`] cells.
//!   A field clone reaches the same storage, so an undo journal can swap
//!   saved values back in without touching the owning object's borrow.
//!
//! # Example
//!
//! ```
//! use vellum_core::{AutoreleasePool, Field, Handle, Managed};
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
//! assert_eq!(counter.ref_count(), 1);
//!
//! let second = counter.retain();
//! assert_eq!(counter.ref_count(), 2);
//! second.release();
//! assert_eq!(counter.ref_count(), 1);
//!
//! counter.value.set(42);
//! assert_eq!(counter.value.get(), 42);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod object;
pub mod prefs;
pub mod status;
pub mod types;
pub mod utils;

// Public API exports
pub use object::{
    AnyHandle, AnyWatch, AutoreleasePool, Field, Handle, Managed, ObjectSlot, RegenFlag, Watch,
};
pub use prefs::Preferences;
pub use status::Status;
pub use types::{Color, Date, Point2, Point3};
pub use utils::errors::{CoreError, Result};
