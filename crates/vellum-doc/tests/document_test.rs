//! A concrete document host exercising the save/load/init contract.

use std::any::Any;
use std::fs;
use std::sync::mpsc;

use pretty_assertions::assert_eq;
use vellum_core::{AnyHandle, AutoreleasePool, Field, Handle, Managed, Preferences, Status};
use vellum_doc::{DocError, Document, DocumentEvent, DocumentState, Result};

struct Sketch {
    title: Field<String>,
    stroke_width: Field<i64>,
}

impl Managed for Sketch {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A minimal single-object document: its whole content is the sketch title.
struct SketchDocument {
    state: DocumentState,
    root: Handle<Sketch>,
    root_ref: AnyHandle,
}

impl SketchDocument {
    fn new(pool: &AutoreleasePool) -> Self {
        let root = Handle::new_in(
            pool,
            Sketch {
                title: Field::new(String::new()),
                stroke_width: Field::new(1),
            },
        );
        let root_ref = root.to_any();
        Self {
            state: DocumentState::new(),
            root,
            root_ref,
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(manager) = self.state.undo_manager_mut() {
            manager.set_value(&self.root_ref, &self.root.title, title.to_string());
        }
    }
}

impl Document for SketchDocument {
    fn state(&self) -> &DocumentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut DocumentState {
        &mut self.state
    }

    fn save_document(&mut self) -> Result<()> {
        let path = self.state.file().ok_or_else(|| DocError::io("no file"))?;
        fs::write(path, self.root.title.value()).map_err(DocError::io)
    }

    fn load_document(&mut self) -> Result<()> {
        let path = self.state.file().ok_or_else(|| DocError::io("no file"))?;
        let title = fs::read_to_string(path).map_err(DocError::io)?;
        // The manager is active during loading; the whole load is one step.
        if let Some(manager) = self.state.undo_manager_mut() {
            manager.record(&self.root_ref, &self.root.title);
        }
        self.root.title.set(title);
        self.close_undo_step();
        Ok(())
    }

    fn init_new_document(&mut self, prefs: &Preferences) -> Status {
        let stroke = prefs.get_i64("stroke_width").unwrap_or(1);
        if let Some(manager) = self.state.undo_manager_mut() {
            let status = manager.set_i64_in_range(
                &self.root_ref,
                &self.root.stroke_width,
                stroke,
                1,
                64,
            );
            if status.is_err() {
                return status;
            }
        }
        self.close_undo_step();
        Status::Ok
    }
}

#[test]
fn saving_clears_dirty_but_keeps_history() {
    let pool = AutoreleasePool::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sketch.vlm");

    let mut doc = SketchDocument::new(&pool);
    doc.state_mut().set_file(&path);

    doc.set_title("first");
    doc.close_undo_step();
    assert!(doc.state().is_changed());

    doc.save().expect("save");
    assert!(!doc.state().is_changed());
    assert_eq!(
        doc.state().undo_manager().map(|m| m.undo_count()),
        Some(1)
    );
    assert_eq!(fs::read_to_string(&path).expect("read back"), "first");

    // Editing after a save dirties the document again.
    doc.set_title("second");
    doc.close_undo_step();
    assert!(doc.state().is_changed());
}

#[test]
fn loading_is_journaled_as_one_undoable_step() {
    let pool = AutoreleasePool::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sketch.vlm");
    fs::write(&path, "loaded title").expect("fixture");

    let mut doc = SketchDocument::new(&pool);
    doc.state_mut().set_file(&path);

    doc.load().expect("load");
    assert_eq!(doc.root.title.value(), "loaded title");
    assert_eq!(
        doc.state().undo_manager().map(|m| m.undo_count()),
        Some(1)
    );

    doc.state_mut().undo().expect("undo the load");
    assert_eq!(doc.root.title.value(), "");
}

#[test]
fn load_and_init_are_mutually_exclusive() {
    let pool = AutoreleasePool::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sketch.vlm");
    fs::write(&path, "content").expect("fixture");

    let mut doc = SketchDocument::new(&pool);
    doc.state_mut().set_file(&path);

    doc.load().expect("load");
    assert_eq!(
        doc.init_new(&Preferences::new()),
        Err(DocError::AlreadyLoaded)
    );
    assert_eq!(doc.load(), Err(DocError::AlreadyLoaded));
}

#[test]
fn init_new_document_applies_preferences() {
    let pool = AutoreleasePool::new();
    let mut doc = SketchDocument::new(&pool);

    let mut prefs = Preferences::new();
    prefs.set("stroke_width", "4");
    assert_eq!(doc.init_new(&prefs), Ok(Status::Ok));
    assert_eq!(doc.root.stroke_width.get(), 4);

    // Initializing twice is refused regardless of preferences.
    assert_eq!(doc.init_new(&prefs), Err(DocError::AlreadyLoaded));
}

#[test]
fn init_rejecting_input_leaves_the_document_uninitialized() {
    let pool = AutoreleasePool::new();
    let mut doc = SketchDocument::new(&pool);

    let mut prefs = Preferences::new();
    prefs.set("stroke_width", "4096");
    assert_eq!(doc.init_new(&prefs), Ok(Status::InvalidInput));
    assert_eq!(doc.root.stroke_width.get(), 1);

    // A failed init does not consume the one-shot initialization.
    prefs.set("stroke_width", "8");
    assert_eq!(doc.init_new(&prefs), Ok(Status::Ok));
    assert_eq!(doc.root.stroke_width.get(), 8);
}

#[test]
fn failed_save_leaves_the_dirty_flag_alone() {
    let pool = AutoreleasePool::new();
    let mut doc = SketchDocument::new(&pool);

    doc.set_title("unsaved");
    doc.close_undo_step();
    assert!(doc.state().is_changed());

    // No file bound: the hook fails and the flag must survive.
    assert!(doc.save().is_err());
    assert!(doc.state().is_changed());
}

#[test]
fn document_events_cover_the_whole_cycle() {
    let pool = AutoreleasePool::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sketch.vlm");

    let (tx, rx) = mpsc::channel();
    let mut doc = SketchDocument::new(&pool);
    doc.state_mut().set_file(&path);
    doc.state_mut().set_event_channel(tx);

    doc.set_title("event test");
    doc.close_undo_step();
    doc.save().expect("save");

    let events: Vec<DocumentEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            DocumentEvent::StepClosed { changes: 1 },
            DocumentEvent::DirtyChanged(false),
            DocumentEvent::DocumentSaved {
                path: Some(path.clone())
            },
        ]
    );
}
