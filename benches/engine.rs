//! Benchmarks for the simulation and draw pass
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::Vec2;
use yanhua::engine::palette::{NIGHT_SKY, PALETTE};
use yanhua::engine::{Firework, NoGlyphs, Payload, Shape, sample_points};
use yanhua::render::{Surface, TerminalPresenter, draw_fireworks};

fn bench_sample_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_points");
    for shape in Shape::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(shape), &shape, |b, &shape| {
            let mut rng = fastrand::Rng::with_seed(1);
            b.iter(|| sample_points(black_box(shape), 200, 130.0, &mut rng))
        });
    }
    group.finish();
}

/// One rocket from launch until its last spark is gone.
fn bench_lifecycle(c: &mut Criterion) {
    c.bench_function("chrysanthemum_lifecycle", |b| {
        let mut rng = fastrand::Rng::with_seed(2);
        b.iter(|| {
            let mut fw = Firework::new(
                Vec2::new(400.0, 800.0),
                250.0,
                -11.0,
                PALETTE[0],
                Payload::Shape(Shape::Chrysanthemum),
            );
            let mut ticks = 0u32;
            while fw.step(800.0, &mut rng, &NoGlyphs) {
                ticks += 1;
            }
            black_box(ticks)
        })
    });
}

/// Draw and present a busy frame, the per-tick cost at 80x24 and scale 4.
fn bench_frame(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(3);
    let mut presenter = TerminalPresenter::new(4);
    let (width, height) = presenter.surface_size(80, 24);

    let mut fireworks: Vec<Firework> = (0..6)
        .map(|i| Firework::launch(&mut rng, 40.0 + i as f32 * 50.0, height as f32, None, None))
        .collect();
    for _ in 0..30 {
        for fw in &mut fireworks {
            fw.step(width as f32, &mut rng, &NoGlyphs);
        }
    }

    let mut surface = Surface::new(width, height, NIGHT_SKY);
    let mut group = c.benchmark_group("frame");
    group.bench_function("draw", |b| {
        b.iter(|| draw_fireworks(&mut surface, black_box(&fireworks), width, height, NIGHT_SKY))
    });
    group.bench_function("compose", |b| {
        b.iter(|| presenter.compose(black_box(&surface)).map(|out| out.len()))
    });
    group.finish();
}

criterion_group!(benches, bench_sample_points, bench_lifecycle, bench_frame);
criterion_main!(benches);
