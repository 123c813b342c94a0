// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for listener fan-out in the brightness-core crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use brightness_core::ListenerRegistry;

/// Benchmark `notify` against registries of increasing size.
///
/// Each listener does a single relaxed atomic add, so the measurement is
/// dominated by the snapshot clone and the unwind guard per call.
fn bench_notify(c: &mut Criterion) {
    let mut group = c.benchmark_group("notify");

    for count in [1usize, 8, 64] {
        let registry = ListenerRegistry::new();
        let total = Arc::new(AtomicU64::new(0));
        for _ in 0..count {
            let total = Arc::clone(&total);
            registry
                .add(Arc::new(move |v: f64| {
                    total.fetch_add((v * 255.0) as u64, Ordering::Relaxed);
                }))
                .expect("add listener");
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &registry, |b, registry| {
            b.iter(|| registry.notify(black_box(0.5)));
        });
    }

    group.finish();
}

/// Benchmark register/unregister churn.
fn bench_add_remove(c: &mut Criterion) {
    let registry = ListenerRegistry::new();
    c.bench_function("add_remove", |b| {
        b.iter(|| {
            let id = registry.add(Arc::new(|_: f64| {})).expect("add listener");
            black_box(registry.remove(id));
        });
    });
}

criterion_group!(benches, bench_notify, bench_add_remove);
criterion_main!(benches);
