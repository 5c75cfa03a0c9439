use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use std::rc::Rc;

use strata::{Action, StateView, Store};

fn counter(action: Option<&Action>, state: Option<&Value>) -> Value {
    let count = state.and_then(Value::as_i64).unwrap_or(0);
    match action {
        Some(action) if action.is("INCREMENT") => json!(count + 1),
        _ => json!(count),
    }
}

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| {
            Store::builder()
                .reducer(black_box("count"), counter)
                .build()
                .unwrap()
        });
    });
}

fn dispatch_benchmark(c: &mut Criterion) {
    let store = Store::builder().reducer("count", counter).build().unwrap();

    c.bench_function("dispatch_change", |b| {
        b.iter(|| store.dispatch(black_box("INCREMENT")));
    });

    c.bench_function("dispatch_no_op", |b| {
        b.iter(|| store.dispatch(black_box("UNKNOWN")));
    });
}

fn state_navigation_benchmark(c: &mut Criterion) {
    let view = StateView::from_value(json!({ "a": { "b": { "c": 5 } } })).unwrap();

    c.bench_function("state_path", |b| {
        b.iter(|| black_box(view.path("a.b.c")));
    });
}

fn dispatch_subscribers_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_subscribers");

    for subscriber_count in [1, 10, 100].iter() {
        let store = Store::builder().reducer("count", counter).build().unwrap();

        for _ in 0..*subscriber_count {
            store.subscribe(Rc::new(|_: &StateView, _: Option<&str>| {
                // Empty subscriber
            }));
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(subscriber_count),
            subscriber_count,
            |b, _| {
                b.iter(|| store.dispatch(black_box("INCREMENT")));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    store_creation_benchmark,
    dispatch_benchmark,
    state_navigation_benchmark,
    dispatch_subscribers_benchmark,
);
criterion_main!(benches);
