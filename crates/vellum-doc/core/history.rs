//! The undo manager
//!
//! Two stacks of [`UndoStep`]s plus the step currently being accumulated.
//! Callers declare every primitive mutation *before* assigning the new
//! value ([`record`](UndoManager::record)), then seal the accumulated edits
//! into one atomic step ([`close_step`](UndoManager::close_step)) at the
//! end of a user gesture. Undoing pops a step and swaps its changes newest
//! first; redoing swaps oldest first, so nested dependencies unwind in
//! teardown order and re-apply in construction order.
//!
//! The manager owns `Rc`-backed journal state and is therefore not `Send`:
//! all operations on one document's journal happen on one thread, which is
//! why none of this needs a lock.

use core::cell::Cell;
use std::rc::Rc;

use vellum_core::object::{AnyHandle, Field, RegenFlag};

use super::change::{Change, ChangeKind, JournalValue, OwnershipMarker, ValueChange};
use super::step::UndoStep;

/// Shared dirty marker linking a manager to its owning document.
///
/// Recording any change sets the flag; the document exposes it as its
/// "changed since last save" bit and is the only place that clears it.
pub type DirtyFlag = Rc<Cell<bool>>;

/// Records primitive mutations as reversible steps and replays them.
///
/// Inactive after construction; hosts that want journaling call
/// [`set_active`](UndoManager::set_active). A
/// [`DocumentState`](super::document::DocumentState) does this for its own
/// manager at construction.
#[derive(Debug, Default)]
pub struct UndoManager {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    /// The step accumulating changes since the last close.
    current: Option<UndoStep>,
    /// When false, every `record*` call is a no-op.
    active: bool,
    /// True while a replay runs, so swaps cannot re-enter the journal.
    undoing: bool,
    /// True from the first record after a close until the next close;
    /// blocks undo/redo.
    open: bool,
    dirty: Option<DirtyFlag>,
}

impl UndoManager {
    /// Creates an inactive manager with empty stacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether changes are currently being tracked.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Turns tracking on or off. Turning it off does not discard recorded
    /// history.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Links this manager to its owning document's dirty marker.
    pub fn bind_dirty_flag(&mut self, flag: DirtyFlag) {
        self.dirty = Some(flag);
    }

    /// Severs the document link.
    pub fn unbind_dirty_flag(&mut self) {
        self.dirty = None;
    }

    /// Number of closed steps available for undo.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of undone steps available for redo.
    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether a step is currently accumulating changes.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether `undo` would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.open && !self.undo_stack.is_empty()
    }

    /// Whether `redo` would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.open && !self.redo_stack.is_empty()
    }

    /// Number of changes in the open step, if one is open.
    #[must_use]
    pub fn open_change_count(&self) -> usize {
        self.current.as_ref().map_or(0, UndoStep::len)
    }

    /// Registers an upcoming mutation of `field` on `owner`, snapshotting
    /// the value the field holds right now. Call this *before* assigning
    /// the new value.
    ///
    /// No-op while the manager is inactive or a replay is running. The
    /// first record after a close opens a new step, which also clears the
    /// redo stack — the future it encoded no longer exists — and marks the
    /// document dirty.
    pub fn record<T: JournalValue>(&mut self, owner: &AnyHandle, field: &Field<T>) {
        if !self.active || self.undoing {
            return;
        }
        self.push_change(Change::new(
            owner.retain(),
            T::into_kind(ValueChange::capture(field)),
        ));
    }

    /// Appends a regeneration marker so the view of the owning object is
    /// refreshed after every undo or redo of the current step.
    pub fn record_regeneration_marker(&mut self, owner: &AnyHandle, flag: &RegenFlag) {
        if !self.active || self.undoing {
            return;
        }
        self.push_change(Change::new(
            owner.retain(),
            ChangeKind::Regenerate(flag.clone()),
        ));
    }

    /// Declares that `object` has been detached from the live graph as part
    /// of the current step. The step takes over the passed reference and
    /// keeps the object resurrectable until both stacks forget it.
    ///
    /// Passing `None` records nothing. While the manager is inactive the
    /// reference is dropped, i.e. released immediately.
    pub fn register_release(&mut self, owner: &AnyHandle, object: Option<AnyHandle>) {
        if !self.active || self.undoing {
            return;
        }
        let Some(object) = object else { return };
        self.push_change(Change::new(
            owner.retain(),
            ChangeKind::Release(OwnershipMarker::detached(object)),
        ));
    }

    /// Declares that `object` has been newly attached to the live graph as
    /// part of the current step. Undoing the step parks a reference on the
    /// journal so the detached object stays alive.
    pub fn register_retain(&mut self, owner: &AnyHandle, object: &AnyHandle) {
        if !self.active || self.undoing {
            return;
        }
        self.push_change(Change::new(
            owner.retain(),
            ChangeKind::Retain(OwnershipMarker::attached(object)),
        ));
    }

    /// Seals the current step. A non-empty step moves onto the undo stack;
    /// an empty one is discarded. Enables undo/redo again.
    ///
    /// Returns the number of changes committed.
    pub fn close_step(&mut self) -> usize {
        let committed = match self.current.take() {
            Some(step) if !step.is_empty() => {
                let count = step.len();
                self.undo_stack.push(step);
                count
            }
            _ => 0,
        };
        self.open = false;
        committed
    }

    /// Reverts the most recent closed step and moves it to the redo stack.
    ///
    /// Returns `false` — with no state touched — while a step is open or
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.open {
            return false;
        }
        let Some(mut step) = self.undo_stack.pop() else {
            return false;
        };
        self.undoing = true;
        step.swap_newest_first();
        self.undoing = false;
        self.redo_stack.push(step);
        true
    }

    /// Re-applies the most recently undone step and moves it back to the
    /// undo stack.
    ///
    /// Returns `false` — with no state touched — while a step is open or
    /// when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.open {
            return false;
        }
        let Some(mut step) = self.redo_stack.pop() else {
            return false;
        };
        self.undoing = true;
        step.swap_oldest_first();
        self.undoing = false;
        self.undo_stack.push(step);
        true
    }

    /// Destroys both stacks. Objects held only by the journal are released
    /// here, synchronously.
    pub fn clear_stacks(&mut self) {
        self.clear_undo_stack();
        self.clear_redo_stack();
    }

    /// Destroys the undo stack.
    pub fn clear_undo_stack(&mut self) {
        self.undo_stack.clear();
    }

    /// Destroys the redo stack. Objects that only the undone steps kept
    /// alive become unreachable and are released now.
    pub fn clear_redo_stack(&mut self) {
        self.redo_stack.clear();
    }

    fn push_change(&mut self, change: Change) {
        if self.current.is_none() {
            self.current = Some(UndoStep::new());
            self.open = true;
            // Any new recording invalidates the recorded future.
            self.redo_stack.clear();
        }
        if let Some(flag) = &self.dirty {
            flag.set(true);
        }
        if let Some(step) = self.current.as_mut() {
            step.add(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::any::Any;
    use vellum_core::{AutoreleasePool, Handle, Managed};

    struct Obj;

    impl Managed for Obj {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn owner(pool: &AutoreleasePool) -> AnyHandle {
        Handle::new_in(pool, Obj).into_any()
    }

    fn active_manager() -> UndoManager {
        let mut manager = UndoManager::new();
        manager.set_active(true);
        manager
    }

    #[test]
    fn inactive_manager_records_nothing() {
        let pool = AutoreleasePool::new();
        let obj = owner(&pool);
        let field = Field::new(0i32);

        let mut manager = UndoManager::new();
        manager.record(&obj, &field);
        assert!(!manager.is_open());
        assert_eq!(manager.close_step(), 0);
        assert_eq!(manager.undo_count(), 0);
    }

    #[test]
    fn record_opens_a_step_and_close_commits_it() {
        let pool = AutoreleasePool::new();
        let obj = owner(&pool);
        let field = Field::new(0i32);
        let mut manager = active_manager();

        manager.record(&obj, &field);
        field.set(1);
        assert!(manager.is_open());
        assert_eq!(manager.open_change_count(), 1);
        assert_eq!(manager.undo_count(), 0);

        assert_eq!(manager.close_step(), 1);
        assert!(!manager.is_open());
        assert_eq!(manager.undo_count(), 1);
        assert_eq!(manager.redo_count(), 0);
    }

    #[test]
    fn closing_an_empty_step_commits_nothing() {
        let mut manager = active_manager();
        assert_eq!(manager.close_step(), 0);
        assert_eq!(manager.undo_count(), 0);
    }

    #[test]
    fn undo_and_redo_are_gated_by_the_open_step() {
        let pool = AutoreleasePool::new();
        let obj = owner(&pool);
        let field = Field::new(0i32);
        let mut manager = active_manager();

        manager.record(&obj, &field);
        field.set(1);
        manager.close_step();

        manager.record(&obj, &field);
        field.set(2);

        assert!(!manager.undo());
        assert!(!manager.redo());
        assert!(!manager.can_undo());
        assert_eq!(field.get(), 2);

        manager.close_step();
        assert!(manager.undo());
        assert_eq!(field.get(), 1);
    }

    #[test]
    fn recording_clears_the_redo_stack() {
        let pool = AutoreleasePool::new();
        let obj = owner(&pool);
        let field = Field::new(0i32);
        let mut manager = active_manager();

        for value in [1, 2] {
            manager.record(&obj, &field);
            field.set(value);
            manager.close_step();
        }
        assert!(manager.undo());
        assert_eq!(manager.redo_count(), 1);

        manager.record(&obj, &field);
        field.set(5);
        assert_eq!(manager.redo_count(), 0);
        manager.close_step();
        assert_eq!(field.get(), 5);
    }

    #[test]
    fn dirty_flag_is_set_by_recording_only() {
        let pool = AutoreleasePool::new();
        let obj = owner(&pool);
        let field = Field::new(0i32);
        let dirty = DirtyFlag::default();

        let mut manager = active_manager();
        manager.bind_dirty_flag(dirty.clone());
        assert!(!dirty.get());

        manager.record(&obj, &field);
        field.set(1);
        assert!(dirty.get());

        dirty.set(false);
        manager.close_step();
        assert!(manager.undo());
        assert!(!dirty.get()); // undo does not touch the dirty flag
    }

    #[test]
    fn replay_does_not_reenter_the_journal() {
        let pool = AutoreleasePool::new();
        let obj = owner(&pool);
        let field = Field::new(0i32);
        let mut manager = active_manager();

        manager.record(&obj, &field);
        field.set(1);
        manager.close_step();

        assert!(manager.undo());
        // A well-behaved replay leaves no open step and no new history.
        assert!(!manager.is_open());
        assert_eq!(manager.undo_count(), 0);
        assert_eq!(manager.redo_count(), 1);
    }

    #[test]
    fn clear_stacks_releases_journal_held_objects() {
        let pool = AutoreleasePool::new();
        let obj = owner(&pool);
        let obj_watch = obj.downgrade();
        let field = Field::new(0i32);
        let mut manager = active_manager();

        for value in [1, 2, 3] {
            manager.record(&obj, &field);
            field.set(value);
            manager.close_step();
        }
        // One reference per recorded change, plus the caller's.
        assert_eq!(obj_watch.ref_count(), 4);

        assert!(manager.undo());
        manager.clear_stacks();
        assert_eq!(manager.undo_count(), 0);
        assert_eq!(manager.redo_count(), 0);
        assert_eq!(obj_watch.ref_count(), 1);

        drop(obj);
        assert!(!obj_watch.is_alive());
    }
}
