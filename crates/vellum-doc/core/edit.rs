//! Validated record-and-assign helpers
//!
//! The raw protocol — record, then assign — is easy to get wrong in domain
//! setters. These helpers fold both halves into one call and report the
//! outcome as a [`Status`]: assigning the value a field already holds is
//! `NotChanged` and records nothing, rejected inputs record nothing either.

use vellum_core::object::{AnyHandle, Field, ObjectSlot};
use vellum_core::Status;

use super::change::JournalValue;
use super::history::UndoManager;

impl UndoManager {
    /// Journals and assigns `value`, unless the field already holds it.
    pub fn set_value<T: JournalValue + PartialEq>(
        &mut self,
        owner: &AnyHandle,
        field: &Field<T>,
        value: T,
    ) -> Status {
        if field.with(|current| *current == value) {
            return Status::NotChanged;
        }
        self.record(owner, field);
        field.set(value);
        Status::Ok
    }

    /// Journals and assigns a float, rejecting NaN with
    /// [`Status::InvalidInput`].
    pub fn set_f64(&mut self, owner: &AnyHandle, field: &Field<f64>, value: f64) -> Status {
        if value.is_nan() {
            return Status::InvalidInput;
        }
        self.set_value(owner, field, value)
    }

    /// Journals and assigns an integer after range-checking it against
    /// `[min, max]`; out-of-range values are rejected with
    /// [`Status::InvalidInput`].
    pub fn set_i64_in_range(
        &mut self,
        owner: &AnyHandle,
        field: &Field<i64>,
        value: i64,
        min: i64,
        max: i64,
    ) -> Status {
        if value < min || value > max {
            return Status::InvalidInput;
        }
        self.set_value(owner, field, value)
    }

    /// Journals and move-assigns an object reference. Identity equality:
    /// re-assigning the handle a slot already holds is `NotChanged`.
    pub fn set_object(
        &mut self,
        owner: &AnyHandle,
        slot: &ObjectSlot,
        value: Option<AnyHandle>,
    ) -> Status {
        if slot.with(|current| *current == value) {
            return Status::NotChanged;
        }
        self.record(owner, slot);
        slot.set(value);
        Status::Ok
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

    fn setup() -> (AutoreleasePool, AnyHandle, UndoManager) {
        let pool = AutoreleasePool::new();
        let owner = Handle::new_in(&pool, Obj).into_any();
        let mut manager = UndoManager::new();
        manager.set_active(true);
        (pool, owner, manager)
    }

    #[test]
    fn set_value_roundtrip() {
        let (_pool, owner, mut manager) = setup();
        let field = Field::new(String::from("old"));

        assert_eq!(
            manager.set_value(&owner, &field, String::from("new")),
            Status::Ok
        );
        manager.close_step();
        assert_eq!(field.value(), "new");

        assert!(manager.undo());
        assert_eq!(field.value(), "old");
    }

    #[test]
    fn unchanged_value_records_nothing() {
        let (_pool, owner, mut manager) = setup();
        let field = Field::new(13i64);

        assert_eq!(manager.set_value(&owner, &field, 13), Status::NotChanged);
        assert!(!manager.is_open());
        assert_eq!(manager.close_step(), 0);
    }

    #[test]
    fn nan_is_rejected_without_recording() {
        let (_pool, owner, mut manager) = setup();
        let field = Field::new(1.0f64);

        assert_eq!(
            manager.set_f64(&owner, &field, f64::NAN),
            Status::InvalidInput
        );
        assert!(!manager.is_open());
        assert_eq!(field.get(), 1.0);
    }

    #[test]
    fn range_check_rejects_out_of_bounds() {
        let (_pool, owner, mut manager) = setup();
        let field = Field::new(5i64);

        assert_eq!(
            manager.set_i64_in_range(&owner, &field, 11, 0, 10),
            Status::InvalidInput
        );
        assert_eq!(field.get(), 5);
        assert_eq!(manager.set_i64_in_range(&owner, &field, 10, 0, 10), Status::Ok);
        assert_eq!(field.get(), 10);
    }

    #[test]
    fn set_object_compares_identity() {
        let (pool, owner, mut manager) = setup();
        let slot = ObjectSlot::default();
        let child = Handle::new_in(&pool, Obj).into_any();
        let same = child.retain();

        assert_eq!(manager.set_object(&owner, &slot, Some(child)), Status::Ok);
        assert_eq!(
            manager.set_object(&owner, &slot, Some(same)),
            Status::NotChanged
        );
        manager.close_step();

        assert!(manager.undo());
        assert!(!slot.is_some());
    }
}
