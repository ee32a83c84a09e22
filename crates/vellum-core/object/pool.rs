//! Deferred-release queue for managed objects
//!
//! The pool is an explicit value owned by the application root; there is no
//! process-global instance. Objects are bound to a pool at construction and
//! [`autorelease`](super::Handle::autorelease) moves a counted reference
//! into the pool's queue, to be given up at the next [`drain`]
//! (AutoreleasePool::drain). This is the classic "keep it alive until the
//! end of the current cycle" pattern of refcounted object systems.
//!
//! The queue sits behind a [`parking_lot::Mutex`], the pool's one lock.
//! Reference counting itself needs no lock here: handles are not `Send`, so
//! counter updates cannot race by construction.

use std::collections::VecDeque;
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};

use parking_lot::Mutex;

use super::AnyHandle;

/// A deferred-release queue.
///
/// Cloning the pool clones a reference to the same queue; objects keep such
/// a reference (weakly) from construction on. Dropping the last clone
/// drains whatever is queued at that moment.
///
/// # Example
///
/// ```
/// use vellum_core::{AutoreleasePool, Handle, Managed};
///
/// struct Blob;
/// impl Managed for Blob {
///     fn as_any(&self) -> &dyn std::any::Any {
///         self
///     }
/// }
///
/// let pool = AutoreleasePool::new();
/// let blob = Handle::new_in(&pool, Blob);
/// let watch = blob.downgrade();
///
/// blob.autorelease();
/// assert!(watch.is_alive()); // deferred, not released yet
///
/// pool.drain();
/// assert!(!watch.is_alive());
/// ```
#[derive(Clone)]
pub struct AutoreleasePool {
    shared: Rc<PoolShared>,
}

pub(crate) struct PoolShared {
    queue: Mutex<VecDeque<AnyHandle>>,
}

impl AutoreleasePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Rc::new(PoolShared {
                queue: Mutex::new(VecDeque::new()),
            }),
        }
    }

    /// Appends `handle` to the queue. O(1), no count change; the reference
    /// now belongs to the pool until the next drain.
    pub fn add(&self, handle: AnyHandle) {
        self.shared.enqueue(handle);
    }

    /// Releases every queued entry in insertion order and empties the
    /// queue. Returns the number of entries released.
    ///
    /// Only the snapshot present when the drain starts is processed;
    /// entries enqueued while the drain runs (for example by destructors of
    /// drained objects) stay queued for the next drain.
    pub fn drain(&self) -> usize {
        let snapshot = {
            let mut queue = self.shared.queue.lock();
            mem::take(&mut *queue)
        };
        let drained = snapshot.len();
        for handle in snapshot {
            handle.release();
        }
        drained
    }

    /// Number of entries currently awaiting release.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().len()
    }

    pub(crate) fn shared_weak(&self) -> Weak<PoolShared> {
        Rc::downgrade(&self.shared)
    }
}

impl PoolShared {
    pub(crate) fn enqueue(&self, handle: AnyHandle) {
        self.queue.lock().push_back(handle);
    }
}

impl Drop for PoolShared {
    fn drop(&mut self) {
        // Release the snapshot in insertion order. Objects destroyed here
        // can no longer reach the pool (the weak back reference is already
        // dead), so anything they try to autorelease is released at once.
        let snapshot = mem::take(self.queue.get_mut());
        for handle in snapshot {
            handle.release();
        }
    }
}

impl Default for AutoreleasePool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AutoreleasePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoreleasePool")
            .field("pending", &self.pending())
            .finish()
    }
}
