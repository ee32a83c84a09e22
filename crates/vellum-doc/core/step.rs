//! Atomic groups of primitive changes

use super::change::Change;

/// An ordered list of changes forming one atomic user-visible step.
///
/// Changes are kept in insertion order. Undo replays them newest first so
/// dependent edits unwind in teardown order; redo replays oldest first so
/// they re-apply in construction order. Dropping a step drops its changes,
/// which releases every object reference the journal held through them.
#[derive(Debug, Default)]
pub struct UndoStep {
    changes: Vec<Change>,
}

impl UndoStep {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Number of changes in this step.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// The recorded changes, oldest first.
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    pub(crate) fn swap_newest_first(&mut self) {
        for change in self.changes.iter_mut().rev() {
            change.swap();
        }
    }

    pub(crate) fn swap_oldest_first(&mut self) {
        for change in &mut self.changes {
            change.swap();
        }
    }
}
