//! The reversible primitive edit
//!
//! A [`Change`] pairs one journaled field with the value it held when the
//! change was recorded, plus a counted reference to the owning object so
//! that owners referenced from the journal survive until the journal
//! forgets them. Undoing and redoing are the same operation — an exchange
//! of saved value and live field — so two consecutive swaps are a no-op.
//!
//! The C++ ancestry of this design used a class hierarchy with one subclass
//! per field type and raw pointers into objects; here the variants are one
//! tagged enum over typed [`Field`] slots, dispatched through a single
//! `match`.

use vellum_core::object::{AnyHandle, AnyWatch, Field, RegenFlag};
use vellum_core::types::{Color, Date, Point2, Point3};

/// One reversible mutation of one field, with the owner kept alive.
#[derive(Debug)]
pub struct Change {
    owner: AnyHandle,
    kind: ChangeKind,
}

impl Change {
    pub(crate) fn new(owner: AnyHandle, kind: ChangeKind) -> Self {
        Self { owner, kind }
    }

    /// The object this change belongs to. The journal holds one reference
    /// to it for as long as the change exists.
    #[must_use]
    pub fn owner(&self) -> &AnyHandle {
        &self.owner
    }

    #[must_use]
    pub fn kind(&self) -> &ChangeKind {
        &self.kind
    }

    /// Exchanges the saved value with the live field (or replays the
    /// marker). Two consecutive calls restore the original state for every
    /// value-carrying variant.
    pub(crate) fn swap(&mut self) {
        self.kind.swap();
    }
}

/// The supported primitive edits.
#[derive(Debug)]
pub enum ChangeKind {
    Bool(ValueChange<bool>),
    I8(ValueChange<i8>),
    U8(ValueChange<u8>),
    I16(ValueChange<i16>),
    U16(ValueChange<u16>),
    I32(ValueChange<i32>),
    U32(ValueChange<u32>),
    I64(ValueChange<i64>),
    U64(ValueChange<u64>),
    F32(ValueChange<f32>),
    F64(ValueChange<f64>),
    Str(ValueChange<String>),
    Point2(ValueChange<Point2>),
    Point3(ValueChange<Point3>),
    Date(ValueChange<Date>),
    Color(ValueChange<Color>),
    /// An object-reference slot. The slot owns its handle, so the swap
    /// moves the reference between the live graph and the journal.
    ObjectRef(ValueChange<Option<AnyHandle>>),
    /// An owned byte buffer; contents and length travel as one value.
    Buffer(ValueChange<Vec<u8>>),
    /// Re-flags a visual object for redraw on both undo and redo. No saved
    /// data.
    Regenerate(RegenFlag),
    /// The object left the live graph in this step; the step owns the
    /// reference while the edit is applied.
    Release(OwnershipMarker),
    /// The object joined the live graph in this step; the step takes a
    /// reference while the edit is undone.
    Retain(OwnershipMarker),
}

impl ChangeKind {
    fn swap(&mut self) {
        match self {
            Self::Bool(c) => c.swap(),
            Self::I8(c) => c.swap(),
            Self::U8(c) => c.swap(),
            Self::I16(c) => c.swap(),
            Self::U16(c) => c.swap(),
            Self::I32(c) => c.swap(),
            Self::U32(c) => c.swap(),
            Self::I64(c) => c.swap(),
            Self::U64(c) => c.swap(),
            Self::F32(c) => c.swap(),
            Self::F64(c) => c.swap(),
            Self::Str(c) => c.swap(),
            Self::Point2(c) => c.swap(),
            Self::Point3(c) => c.swap(),
            Self::Date(c) => c.swap(),
            Self::Color(c) => c.swap(),
            Self::ObjectRef(c) => c.swap(),
            Self::Buffer(c) => c.swap(),
            Self::Regenerate(flag) => flag.set(true),
            Self::Release(marker) | Self::Retain(marker) => marker.swap(),
        }
    }
}

/// A snapshot of one field: the slot and the value it held at record time.
#[derive(Debug)]
pub struct ValueChange<T> {
    field: Field<T>,
    saved: T,
}

impl<T: Clone> ValueChange<T> {
    pub(crate) fn capture(field: &Field<T>) -> Self {
        Self {
            field: field.clone(),
            saved: field.value(),
        }
    }
}

impl<T> ValueChange<T> {
    /// The currently saved (off-graph) value.
    #[must_use]
    pub fn saved(&self) -> &T {
        &self.saved
    }

    fn swap(&mut self) {
        self.field.swap_with(&mut self.saved);
    }
}

/// Which side currently owns an ownership marker's reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The live document graph owns the reference; the marker holds none.
    Live,
    /// The step owns the reference; the marker holds it.
    Journal,
}

/// Tracks one reference whose owner alternates between the live graph and
/// the journal as the surrounding step is undone and redone.
///
/// A *release* marker starts in [`Ownership::Journal`], built from the
/// reference the live graph gave up when the object was detached. A
/// *retain* marker starts in [`Ownership::Live`], holding nothing while the
/// newly attached object sits in the graph. Every swap toggles the state
/// and performs exactly one acquire or one release of the held reference.
#[derive(Debug)]
pub struct OwnershipMarker {
    watch: AnyWatch,
    hold: Option<AnyHandle>,
    state: Ownership,
}

impl OwnershipMarker {
    /// Marker for an object detached from the live graph; takes over the
    /// caller's reference.
    pub(crate) fn detached(object: AnyHandle) -> Self {
        Self {
            watch: object.downgrade(),
            hold: Some(object),
            state: Ownership::Journal,
        }
    }

    /// Marker for an object newly attached to the live graph; holds
    /// nothing until the attachment is undone.
    pub(crate) fn attached(object: &AnyHandle) -> Self {
        Self {
            watch: object.downgrade(),
            hold: None,
            state: Ownership::Live,
        }
    }

    /// Current owner of the tracked reference.
    #[must_use]
    pub fn state(&self) -> Ownership {
        self.state
    }

    fn swap(&mut self) {
        match self.state {
            Ownership::Journal => {
                self.hold = None;
                self.state = Ownership::Live;
            }
            Ownership::Live => {
                self.hold = self.watch.upgrade();
                self.state = Ownership::Journal;
            }
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Value types the journal can snapshot. Sealed: the variant set of
/// [`ChangeKind`] is closed.
pub trait JournalValue: sealed::Sealed + Clone + 'static {
    #[doc(hidden)]
    fn into_kind(change: ValueChange<Self>) -> ChangeKind
    where
        Self: Sized;
}

macro_rules! journal_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl JournalValue for $ty {
                fn into_kind(change: ValueChange<Self>) -> ChangeKind {
                    ChangeKind::$variant(change)
                }
            }
        )*
    };
}

journal_value! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Str,
    Point2 => Point2,
    Point3 => Point3,
    Date => Date,
    Color => Color,
    Option<AnyHandle> => ObjectRef,
    Vec<u8> => Buffer,
}
