//! Journaled field slots
//!
//! A [`Field`] is the unit of state the undo journal can target. Cloning a
//! field clones a handle to the same storage, not the value, so a journal
//! entry can keep its way back to the field without borrowing the owning
//! object. Mutation goes through shared references; the single-mutator
//! threading model makes the interior `RefCell` safe in practice.

use core::cell::RefCell;
use core::fmt;
use core::mem;
use std::rc::Rc;

use super::AnyHandle;

/// A typed, shared slot holding one journaled value.
///
/// All accessors take `&self`; a field is freely reachable through any
/// clone of itself or through a [`Handle`](super::Handle) deref.
///
/// # Panics
///
/// Like any `RefCell`-backed cell, accessors panic if called while a
/// [`with`](Field::with) closure on the same field is still running.
pub struct Field<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Field<T> {
    /// Creates a slot holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    /// Overwrites the stored value.
    pub fn set(&self, value: T) {
        *self.inner.borrow_mut() = value;
    }

    /// Replaces the stored value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        self.inner.replace(value)
    }

    /// Runs `f` with a shared borrow of the stored value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Exchanges the stored value with `other`. This is the journal's swap
    /// primitive: applying it twice restores both sides.
    pub fn swap_with(&self, other: &mut T) {
        mem::swap(&mut *self.inner.borrow_mut(), other);
    }

    /// Whether `other` is a handle to this very slot.
    #[must_use]
    pub fn ptr_eq(&self, other: &Field<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Copy> Field<T> {
    /// Copies the stored value out.
    #[must_use]
    pub fn get(&self) -> T {
        *self.inner.borrow()
    }
}

impl<T: Clone> Field<T> {
    /// Clones the stored value out.
    #[must_use]
    pub fn value(&self) -> T {
        self.inner.borrow().clone()
    }
}

impl<T> Field<Option<T>> {
    /// Takes the stored value, leaving `None` behind.
    #[must_use]
    pub fn take(&self) -> Option<T> {
        self.inner.borrow_mut().take()
    }

    /// Whether the slot currently holds a value.
    #[must_use]
    pub fn is_some(&self) -> bool {
        self.inner.borrow().is_some()
    }
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Field<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.inner.borrow()).finish()
    }
}

/// An object-reference slot.
///
/// The slot owns its handle: assigning moves a counted reference in,
/// clearing moves it out. A journal swap therefore moves the reference
/// between the live graph and the journal's saved value, and the total
/// count never drifts.
pub type ObjectSlot = Field<Option<AnyHandle>>;

/// Per-object "please redraw" bit, set by regeneration markers on every
/// undo and redo that touches the owning object.
pub type RegenFlag = Field<bool>;
