use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use fieldcan::{Action, State, Store};
use serde_json::json;

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| {
            let store = Store::new(black_box(State::new()));
            store
        });
    });
}

fn field_read_benchmark(c: &mut Criterion) {
    let store = Store::default();
    store.field("count").set(42).unwrap();

    c.bench_function("field_read", |b| {
        b.iter(|| {
            black_box(store.field("count").get().unwrap());
        });
    });
}

fn field_write_benchmark(c: &mut Criterion) {
    let store = Store::default();

    c.bench_function("field_write", |b| {
        let mut i = 0;
        b.iter(|| {
            store.field("count").set(black_box(i)).unwrap();
            i += 1;
        });
    });
}

fn dispatch_benchmark(c: &mut Criterion) {
    let store = Store::default();
    store.field("count").set(0).unwrap();
    store
        .register("INCREMENT", |store, _| {
            store.field("count").add(1)?;
            Ok(())
        })
        .unwrap();

    c.bench_function("dispatch", |b| {
        b.iter(|| {
            store.dispatch(black_box(Action::new("INCREMENT"))).unwrap();
        });
    });
}

// Listeners spread over many fields; each write only reaches the ones
// registered for the written field.
fn targeted_listeners_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("targeted_listeners");

    for listener_count in [1, 10, 100].iter() {
        let store = Store::default();
        let mut subscribers = Vec::new();

        for n in 0..*listener_count {
            subscribers.push(
                store
                    .subscribe([format!("field_{n}")], |_, _| {
                        // Empty listener
                    })
                    .unwrap(),
            );
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(listener_count),
            listener_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.field("field_0").set(black_box(i)).unwrap();
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn all_field_listeners_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_field_listeners");

    for listener_count in [1, 10, 100].iter() {
        let store = Store::default();
        let mut subscribers = Vec::new();

        for _ in 0..*listener_count {
            subscribers.push(
                store
                    .subscribe(Vec::<String>::new(), |_, _| {
                        // Empty listener
                    })
                    .unwrap(),
            );
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(listener_count),
            listener_count,
            |b, _| {
                let mut i = 0;
                b.iter(|| {
                    store.set_state(black_box(patch(i))).unwrap();
                    i += 1;
                });
            },
        );
    }
    group.finish();
}

fn patch(i: usize) -> State {
    let mut patch = State::new();
    patch.insert("value".to_string(), json!(i));
    patch
}

criterion_group!(
    benches,
    store_creation_benchmark,
    field_read_benchmark,
    field_write_benchmark,
    dispatch_benchmark,
    targeted_listeners_benchmark,
    all_field_listeners_benchmark,
);
criterion_main!(benches);
