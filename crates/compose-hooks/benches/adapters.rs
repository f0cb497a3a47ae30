#![allow(non_snake_case)]

use compose_core::location_key;
use compose_hooks::{Composition, Effect, Memo, Ref, State, EVERY_RENDER};
use compose_macros::composable;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[composable]
fn Row(index: usize) -> usize {
    State(index, |(value, _)| {
        Ref(0usize, |renders| {
            renders.with_mut(|count| *count += 1);
            Memo(move || value * 2, (value,), |doubled| *doubled)
        })
    })
}

fn render_adapter_rows(c: &mut Criterion) {
    let mut composition = Composition::new();
    let key = location_key(file!(), line!(), column!());
    let rows = || (0..100).map(Row).sum::<usize>();

    composition.render(key, rows).expect("initial render");

    c.bench_function("render_100_adapter_rows", |b| {
        b.iter(|| black_box(composition.render(key, rows).expect("render")));
    });
}

fn effect_churn(c: &mut Criterion) {
    let mut composition = Composition::new();
    let key = location_key(file!(), line!(), column!());
    let effects = || {
        for _ in 0..50 {
            Effect(EVERY_RENDER, |scope| scope.on_cleanup(|| {}));
        }
    };

    composition.render(key, effects).expect("initial render");

    c.bench_function("rerun_50_every_render_effects", |b| {
        b.iter(|| {
            composition.render(key, effects).expect("render");
            black_box(composition.flush_effects())
        });
    });
}

criterion_group!(benches, render_adapter_rows, effect_churn);
criterion_main!(benches);
