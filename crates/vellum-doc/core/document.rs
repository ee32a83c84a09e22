//! Document state and the document contract
//!
//! [`DocumentState`] is the concrete bundle every document host embeds: one
//! undo manager (created at construction and active from the start, so even
//! loading is journaled as a single step), a dirty flag distinct from
//! journal emptiness, a file holder and the regenerate bit. The
//! [`Document`] trait adds the save/load/init hooks a concrete document
//! implements, plus provided wrappers that keep the bookkeeping honest.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use vellum_core::{Preferences, Status};

use super::errors::{DocError, Result};
use super::history::{DirtyFlag, UndoManager};
use crate::events::DocumentEvent;

/// Per-document bookkeeping shared by all concrete document types.
#[derive(Debug, Default)]
pub struct DocumentState {
    /// The journal, if journaling is enabled for this document.
    undo_manager: Option<UndoManager>,
    /// Changed since last save. Shared with the manager, which sets it on
    /// every record; clearing it is this type's exclusive business.
    dirty: DirtyFlag,
    file: Option<PathBuf>,
    /// The view layer should refresh this document on its next cycle.
    regenerate: bool,
    /// Set once either loading or initialization ran.
    loaded: bool,
    event_tx: Option<Sender<DocumentEvent>>,
}

impl DocumentState {
    /// Fresh state with an empty, *active* undo manager, a clear dirty
    /// flag and no file.
    #[must_use]
    pub fn new() -> Self {
        let mut state = Self::default();
        state.install_manager();
        state
    }

    /// The journal, if enabled.
    #[must_use]
    pub fn undo_manager(&self) -> Option<&UndoManager> {
        self.undo_manager.as_ref()
    }

    /// Mutable access to the journal, if enabled.
    pub fn undo_manager_mut(&mut self) -> Option<&mut UndoManager> {
        self.undo_manager.as_mut()
    }

    #[must_use]
    pub fn has_undo_manager(&self) -> bool {
        self.undo_manager.is_some()
    }

    /// Enables or disables journaling. Enabling when a manager already
    /// exists does nothing; re-enabling after a disable starts from an
    /// empty journal — prior history is not restored. Disabling releases
    /// the manager and, with it, every object the journal kept alive.
    pub fn set_undo_manager(&mut self, enabled: bool) {
        if enabled {
            if self.undo_manager.is_none() {
                self.install_manager();
            }
        } else {
            self.undo_manager = None;
        }
    }

    /// Whether the document changed since the last save. May be true with
    /// an empty undo stack, and false with a non-empty one.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.dirty.get()
    }

    /// Sets or clears the dirty flag. This is the only way to clear it;
    /// saving goes through here and leaves the journal untouched.
    pub fn set_changed(&mut self, changed: bool) {
        if self.dirty.get() != changed {
            self.dirty.set(changed);
            self.emit(DocumentEvent::DirtyChanged(changed));
        }
    }

    /// Binds this document to a file. A pure holder; nothing is read or
    /// written.
    pub fn set_file(&mut self, file: impl Into<PathBuf>) {
        self.file = Some(file.into());
    }

    /// The bound file, if any.
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Seals the journal's current step — the standard end-of-gesture hook.
    pub fn close_undo_step(&mut self) {
        let committed = match self.undo_manager.as_mut() {
            Some(manager) => manager.close_step(),
            None => return,
        };
        if committed > 0 {
            self.emit(DocumentEvent::StepClosed { changes: committed });
        }
    }

    /// Reverts the most recent closed step.
    ///
    /// # Errors
    ///
    /// [`DocError::NoUndoManager`] without a journal, [`DocError::StepOpen`]
    /// while a step is accumulating, [`DocError::NothingToUndo`] on an
    /// empty stack.
    pub fn undo(&mut self) -> Result<()> {
        let manager = self.undo_manager.as_mut().ok_or(DocError::NoUndoManager)?;
        if manager.is_open() {
            return Err(DocError::StepOpen);
        }
        if !manager.undo() {
            return Err(DocError::NothingToUndo);
        }
        let remaining = manager.undo_count();
        self.emit(DocumentEvent::UndoPerformed { remaining });
        Ok(())
    }

    /// Re-applies the most recently undone step.
    ///
    /// # Errors
    ///
    /// [`DocError::NoUndoManager`] without a journal, [`DocError::StepOpen`]
    /// while a step is accumulating, [`DocError::NothingToRedo`] on an
    /// empty stack.
    pub fn redo(&mut self) -> Result<()> {
        let manager = self.undo_manager.as_mut().ok_or(DocError::NoUndoManager)?;
        if manager.is_open() {
            return Err(DocError::StepOpen);
        }
        if !manager.redo() {
            return Err(DocError::NothingToRedo);
        }
        let remaining = manager.redo_count();
        self.emit(DocumentEvent::RedoPerformed { remaining });
        Ok(())
    }

    /// Destroys both journal stacks, releasing journal-held objects now.
    pub fn clear_history(&mut self) {
        if let Some(manager) = self.undo_manager.as_mut() {
            manager.clear_stacks();
            self.emit(DocumentEvent::StacksCleared);
        }
    }

    /// Asks the view layer to refresh this document on the next cycle.
    pub fn regenerate(&mut self) {
        self.regenerate = true;
        self.emit(DocumentEvent::RegenerationRequested);
    }

    /// Called by the view layer once the refresh happened.
    pub fn regeneration_done(&mut self) {
        self.regenerate = false;
    }

    #[must_use]
    pub fn should_regenerate(&self) -> bool {
        self.regenerate
    }

    /// Installs the channel document events are delivered on.
    pub fn set_event_channel(&mut self, sender: Sender<DocumentEvent>) {
        self.event_tx = Some(sender);
    }

    pub(crate) fn ensure_not_loaded(&self) -> Result<()> {
        if self.loaded {
            return Err(DocError::AlreadyLoaded);
        }
        Ok(())
    }

    pub(crate) fn finish_load(&mut self) {
        self.loaded = true;
        let path = self.file.clone();
        self.emit(DocumentEvent::DocumentLoaded { path });
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.loaded = true;
    }

    pub(crate) fn finish_save(&mut self) {
        self.set_changed(false);
        let path = self.file.clone();
        self.emit(DocumentEvent::DocumentSaved { path });
    }

    fn install_manager(&mut self) {
        let mut manager = UndoManager::new();
        manager.set_active(true);
        manager.bind_dirty_flag(self.dirty.clone());
        self.undo_manager = Some(manager);
    }

    fn emit(&self, event: DocumentEvent) {
        if let Some(sender) = &self.event_tx {
            let _ = sender.send(event);
        }
    }
}

/// The contract between the library and a concrete document type.
///
/// Implementors embed a [`DocumentState`], expose it through
/// `state`/`state_mut` and fill in the three hooks. Callers use the
/// provided wrappers — [`save`](Document::save), [`load`](Document::load),
/// [`init_new`](Document::init_new) — which keep the dirty flag, the
/// load/init exclusivity and event delivery consistent.
pub trait Document {
    fn state(&self) -> &DocumentState;

    fn state_mut(&mut self) -> &mut DocumentState;

    /// Writes the document to its file. Implementations must not clear the
    /// journal; the dirty flag is handled by [`save`](Document::save).
    ///
    /// # Errors
    ///
    /// Whatever the implementation reports; propagated untouched.
    fn save_document(&mut self) -> Result<()>;

    /// Reads the document from its file. The undo manager is active while
    /// this runs: every field mutation the loader performs is journaled,
    /// and the caller seals the whole load as one step. This is how owning
    /// references flow through the journal from the very beginning.
    ///
    /// # Errors
    ///
    /// Whatever the implementation reports; propagated untouched.
    fn load_document(&mut self) -> Result<()>;

    /// Populates an empty document with the content a new document has
    /// from the user's point of view. Mutually exclusive with
    /// [`load_document`](Document::load_document) per instance.
    fn init_new_document(&mut self, prefs: &Preferences) -> Status;

    /// Saves via [`save_document`](Document::save_document), then clears
    /// the dirty flag — and only the flag; undo history survives saving.
    ///
    /// # Errors
    ///
    /// Forwards the hook's error; the dirty flag is left untouched then.
    fn save(&mut self) -> Result<()> {
        self.save_document()?;
        self.state_mut().finish_save();
        Ok(())
    }

    /// Loads via [`load_document`](Document::load_document).
    ///
    /// # Errors
    ///
    /// [`DocError::AlreadyLoaded`] if the document was already loaded or
    /// initialized; otherwise forwards the hook's error, in which case the
    /// document may be loaded again.
    fn load(&mut self) -> Result<()> {
        self.state().ensure_not_loaded()?;
        self.load_document()?;
        self.state_mut().finish_load();
        Ok(())
    }

    /// Initializes via
    /// [`init_new_document`](Document::init_new_document).
    ///
    /// # Errors
    ///
    /// [`DocError::AlreadyLoaded`] if the document was already loaded or
    /// initialized. The hook's own outcome is returned as the `Status`.
    fn init_new(&mut self, prefs: &Preferences) -> Result<Status> {
        self.state().ensure_not_loaded()?;
        let status = self.init_new_document(prefs);
        if status.is_ok() {
            self.state_mut().mark_initialized();
        }
        Ok(status)
    }

    /// Seals the journal's current step — the end-of-gesture hook hosts
    /// call after a user-visible edit.
    fn close_undo_step(&mut self) {
        self.state_mut().close_undo_step();
    }
}
