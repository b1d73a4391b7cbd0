//! Benchmarks for the placement engine.
//!
//! Run with: cargo bench -p wayfinder-layout

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use wayfinder_core::{AnchorRule, Point, Rect, Size};
use wayfinder_layout::{PlacementEngine, PlacementMode, Viewport};

const RULES: [AnchorRule; 10] = [
    AnchorRule::Top,
    AnchorRule::TopLeft,
    AnchorRule::TopRight,
    AnchorRule::Bottom,
    AnchorRule::BottomLeft,
    AnchorRule::BottomRight,
    AnchorRule::Left,
    AnchorRule::Right,
    AnchorRule::Center,
    AnchorRule::Virtual,
];

fn viewport() -> Viewport {
    Viewport {
        size: Size::new(1440.0, 900.0),
        document_height: 4000.0,
        scroll: Point::ZERO,
    }
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement/compute");
    let engine = PlacementEngine::default();
    let vp = viewport();
    let target = Rect::new(600.0, 400.0, 120.0, 48.0);

    for rule in RULES {
        group.bench_with_input(BenchmarkId::new("popup", rule.as_str()), &rule, |b, &rule| {
            b.iter(|| black_box(engine.compute(black_box(target), rule, &vp, PlacementMode::Popup)))
        });
    }
    group.bench_function("marker/top", |b| {
        b.iter(|| {
            black_box(engine.compute(
                black_box(target),
                AnchorRule::Top,
                &vp,
                PlacementMode::Marker,
            ))
        })
    });

    group.finish();
}

fn bench_flip_sweep(c: &mut Criterion) {
    let engine = PlacementEngine::default();
    let vp = viewport();
    let targets: Vec<Rect> = (0..256)
        .map(|i| {
            let f = f64::from(i);
            Rect::new((f * 37.0) % 1440.0, (f * 53.0) % 4000.0, 80.0, 32.0)
        })
        .collect();

    c.bench_function("placement/flip_sweep_256", |b| {
        b.iter(|| {
            for t in &targets {
                black_box(engine.compute(*t, AnchorRule::Left, &vp, PlacementMode::Popup));
                black_box(engine.compute(*t, AnchorRule::TopRight, &vp, PlacementMode::Popup));
            }
        })
    });
}

criterion_group!(benches, bench_compute, bench_flip_sweep);
criterion_main!(benches);
