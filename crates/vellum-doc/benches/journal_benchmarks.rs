//! Journal throughput: recording, sealing and replaying steps.

use std::any::Any;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use vellum_core::{AutoreleasePool, Field, Handle, Managed};
use vellum_doc::UndoManager;

struct Cell {
    value: Field<i64>,
    label: Field<String>,
}

impl Managed for Cell {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn cell(pool: &AutoreleasePool) -> Handle<Cell> {
    Handle::new_in(
        pool,
        Cell {
            value: Field::new(0),
            label: Field::new(String::new()),
        },
    )
}

fn bench_record_close(c: &mut Criterion) {
    let pool = AutoreleasePool::new();
    let obj = cell(&pool);
    let owner = obj.to_any();

    c.bench_function("record_and_close_100_changes", |b| {
        b.iter_batched(
            || {
                let mut manager = UndoManager::new();
                manager.set_active(true);
                manager
            },
            |mut manager| {
                for i in 0..100 {
                    manager.record(&owner, &obj.value);
                    obj.value.set(i);
                }
                manager.close_step();
                manager
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_undo_redo_cycle(c: &mut Criterion) {
    let pool = AutoreleasePool::new();
    let obj = cell(&pool);
    let owner = obj.to_any();

    let mut manager = UndoManager::new();
    manager.set_active(true);
    for i in 0..50 {
        manager.record(&owner, &obj.value);
        obj.value.set(i);
        manager.record(&owner, &obj.label);
        obj.label.set(format!("step {i}"));
        manager.close_step();
    }

    c.bench_function("undo_redo_50_steps", |b| {
        b.iter(|| {
            while manager.undo() {}
            while manager.redo() {}
        });
    });
}

criterion_group!(benches, bench_record_close, bench_undo_redo_cycle);
criterion_main!(benches);
