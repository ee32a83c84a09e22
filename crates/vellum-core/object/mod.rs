//! Reference-counted object model
//!
//! Every entity that participates in ownership and undo journaling is a
//! [`Managed`] value held through a [`Handle`]. A handle is one counted
//! reference; the count is simply the number of live handles, wherever they
//! sit — the live document graph, an undo journal's saved values, or the
//! autorelease pool queue. Destruction happens when the last handle goes
//! away, so "use after the count reached zero" is not expressible.
//!
//! [`Watch`] and [`AnyWatch`] observe an object without owning it, which is
//! how callers (and tests) can verify that an object was actually destroyed.

use core::any::{self, Any};
use core::cell::Cell;
use core::fmt;
use std::rc::{Rc, Weak};

use crate::utils::errors::{CoreError, Result};

pub mod field;
pub mod pool;

pub use field::{Field, ObjectSlot, RegenFlag};
pub use pool::AutoreleasePool;

use pool::PoolShared;

/// Implemented by every heap entity that participates in ownership and
/// journaling.
///
/// The trait is deliberately small: identity lives in the handle, state
/// lives in [`Field`] slots, so most implementations are empty apart from
/// the `as_any` plumbing.
pub trait Managed: Any {
    /// Upcast used for checked downcasts through [`AnyHandle::downcast`].
    fn as_any(&self) -> &dyn Any;

    /// Value equality hook. Defaults to `false`; types with a meaningful
    /// notion of value equality override this. Handle identity is compared
    /// with [`AnyHandle::ptr_eq`] instead.
    fn equals(&self, _other: &dyn Managed) -> bool {
        false
    }
}

/// Per-object bookkeeping shared by all handles to the same allocation.
pub(crate) struct Header {
    /// Opaque one-bit marker for domain code. The core never reads it, and
    /// it is stored apart from the count so it cannot disturb it.
    high_bit: Cell<bool>,
    /// Back reference to the pool this object autoreleases into. Set at
    /// construction, never changed. Weak, so queued entries cannot keep
    /// their own pool alive.
    pool: Weak<PoolShared>,
}

/// The single allocation behind every handle to one object.
pub(crate) struct ObjAlloc<T: Managed> {
    header: Header,
    body: T,
}

/// Object-safe view of an [`ObjAlloc`] with the body type erased.
pub(crate) trait ErasedAlloc: Any {
    fn header(&self) -> &Header;
    fn managed(&self) -> &dyn Managed;
    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Managed> ErasedAlloc for ObjAlloc<T> {
    fn header(&self) -> &Header {
        &self.header
    }

    fn managed(&self) -> &dyn Managed {
        &self.body
    }

    fn as_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// A typed strong reference to a [`Managed`] object.
///
/// One `Handle` is one counted reference. [`Handle::retain`] (or `clone`)
/// adds a reference, [`Handle::release`] (or drop) removes one; the object
/// is destroyed together with its last handle.
///
/// Handles dereference to the object body, so journaled fields are reached
/// directly: `handle.some_field.get()`.
pub struct Handle<T: Managed> {
    alloc: Rc<ObjAlloc<T>>,
}

impl<T: Managed> Handle<T> {
    /// Allocates `body` as a managed object with reference count 1.
    ///
    /// The object keeps a back reference to `pool` for
    /// [`autorelease`](Handle::autorelease); the reference never changes
    /// afterwards.
    pub fn new_in(pool: &AutoreleasePool, body: T) -> Self {
        Self {
            alloc: Rc::new(ObjAlloc {
                header: Header {
                    high_bit: Cell::new(false),
                    pool: pool.shared_weak(),
                },
                body,
            }),
        }
    }

    /// Adds one reference and returns the new handle, mirroring the
    /// retain-for-chaining idiom of refcounted object systems.
    #[must_use]
    pub fn retain(&self) -> Self {
        self.clone()
    }

    /// Gives up this reference. The last release destroys the object.
    pub fn release(self) {
        drop(self);
    }

    /// Hands this reference to the object's autorelease pool. The count is
    /// unchanged; the matching release happens at the pool's next
    /// [`drain`](AutoreleasePool::drain).
    ///
    /// If the pool no longer exists the reference is released immediately.
    pub fn autorelease(self) {
        self.into_any().autorelease();
    }

    /// Number of live references to this object.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.alloc)
    }

    /// Reads the opaque per-object marker bit.
    #[must_use]
    pub fn high_bit(&self) -> bool {
        self.alloc.header.high_bit.get()
    }

    /// Sets the opaque per-object marker bit. Does not affect the count.
    pub fn set_high_bit(&self, status: bool) {
        self.alloc.header.high_bit.set(status);
    }

    /// A type-erased handle to the same object. Adds one reference.
    #[must_use]
    pub fn to_any(&self) -> AnyHandle {
        self.clone().into_any()
    }

    /// Converts into a type-erased handle without touching the count.
    #[must_use]
    pub fn into_any(self) -> AnyHandle {
        AnyHandle { alloc: self.alloc }
    }

    /// A non-owning observer of this object.
    #[must_use]
    pub fn downgrade(&self) -> Watch<T> {
        Watch {
            weak: Rc::downgrade(&self.alloc),
        }
    }
}

impl<T: Managed> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            alloc: Rc::clone(&self.alloc),
        }
    }
}

impl<T: Managed> core::ops::Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.alloc.body
    }
}

impl<T: Managed> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("ref_count", &self.ref_count())
            .field("high_bit", &self.high_bit())
            .finish_non_exhaustive()
    }
}

/// A type-erased strong reference to some [`Managed`] object.
///
/// Carries the same one-handle-one-reference semantics as [`Handle`].
/// Equality (`==`) is identity: two `AnyHandle`s are equal when they refer
/// to the same allocation. Value equality goes through [`AnyHandle::equals`].
pub struct AnyHandle {
    alloc: Rc<dyn ErasedAlloc>,
}

impl AnyHandle {
    /// Adds one reference and returns the new handle.
    #[must_use]
    pub fn retain(&self) -> Self {
        self.clone()
    }

    /// Gives up this reference. The last release destroys the object.
    pub fn release(self) {
        drop(self);
    }

    /// Hands this reference to the object's autorelease pool; the matching
    /// release happens at the next drain. If the pool no longer exists the
    /// reference is released immediately.
    pub fn autorelease(self) {
        if let Some(shared) = self.alloc.header().pool.upgrade() {
            shared.enqueue(self);
        }
    }

    /// Number of live references to the object.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.alloc)
    }

    /// Reads the opaque per-object marker bit.
    #[must_use]
    pub fn high_bit(&self) -> bool {
        self.alloc.header().high_bit.get()
    }

    /// Sets the opaque per-object marker bit. Does not affect the count.
    pub fn set_high_bit(&self, status: bool) {
        self.alloc.header().high_bit.set(status);
    }

    /// Whether `self` and `other` refer to the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &AnyHandle) -> bool {
        Rc::ptr_eq(&self.alloc, &other.alloc)
    }

    /// Value equality as defined by the object's [`Managed::equals`].
    #[must_use]
    pub fn equals(&self, other: &AnyHandle) -> bool {
        self.alloc.managed().equals(other.alloc.managed())
    }

    /// Recovers a typed handle. The returned handle is an additional
    /// reference to the object.
    ///
    /// # Errors
    ///
    /// [`CoreError::WrongType`] if the object is not a `T`.
    pub fn downcast<T: Managed>(&self) -> Result<Handle<T>> {
        Rc::clone(&self.alloc)
            .as_any_rc()
            .downcast::<ObjAlloc<T>>()
            .map(|alloc| Handle { alloc })
            .map_err(|_| CoreError::WrongType {
                expected: any::type_name::<T>(),
            })
    }

    /// A non-owning observer of the object.
    #[must_use]
    pub fn downgrade(&self) -> AnyWatch {
        AnyWatch {
            weak: Rc::downgrade(&self.alloc),
        }
    }
}

impl Clone for AnyHandle {
    fn clone(&self) -> Self {
        Self {
            alloc: Rc::clone(&self.alloc),
        }
    }
}

impl PartialEq for AnyHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for AnyHandle {}

impl fmt::Debug for AnyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyHandle")
            .field("ref_count", &self.ref_count())
            .field("high_bit", &self.high_bit())
            .finish_non_exhaustive()
    }
}

/// A non-owning observer of a typed object.
///
/// Watches do not count as references; they report the live count and
/// whether the object still exists, and can be upgraded back into a
/// counted [`Handle`].
pub struct Watch<T: Managed> {
    weak: Weak<ObjAlloc<T>>,
}

impl<T: Managed> Watch<T> {
    /// Whether the object has not been destroyed yet.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// Current number of live references; 0 once destroyed.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        self.weak.strong_count()
    }

    /// Re-acquires a counted reference, if the object is still alive.
    /// Upgrading is a retain.
    #[must_use]
    pub fn upgrade(&self) -> Option<Handle<T>> {
        self.weak.upgrade().map(|alloc| Handle { alloc })
    }
}

impl<T: Managed> Clone for Watch<T> {
    fn clone(&self) -> Self {
        Self {
            weak: Weak::clone(&self.weak),
        }
    }
}

impl<T: Managed> fmt::Debug for Watch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watch")
            .field("ref_count", &self.ref_count())
            .finish_non_exhaustive()
    }
}

/// A non-owning observer of a type-erased object. See [`Watch`].
pub struct AnyWatch {
    weak: Weak<dyn ErasedAlloc>,
}

impl AnyWatch {
    /// Whether the object has not been destroyed yet.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.weak.strong_count() > 0
    }

    /// Current number of live references; 0 once destroyed.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        self.weak.strong_count()
    }

    /// Re-acquires a counted reference, if the object is still alive.
    /// Upgrading is a retain.
    #[must_use]
    pub fn upgrade(&self) -> Option<AnyHandle> {
        self.weak.upgrade().map(|alloc| AnyHandle { alloc })
    }
}

impl Clone for AnyWatch {
    fn clone(&self) -> Self {
        Self {
            weak: Weak::clone(&self.weak),
        }
    }
}

impl fmt::Debug for AnyWatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyWatch")
            .field("ref_count", &self.ref_count())
            .finish_non_exhaustive()
    }
}
