//! Burst shapes. Each sampler returns offsets from the explosion center;
//! the firework turns every offset into a launch direction and speed.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Circle,
    Heart,
    Star,
    Ring,
    Chrysanthemum,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Circle,
        Shape::Heart,
        Shape::Star,
        Shape::Ring,
        Shape::Chrysanthemum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Heart => "heart",
            Shape::Star => "star",
            Shape::Ring => "ring",
            Shape::Chrysanthemum => "chrysanthemum",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const STAR_SPIKES: usize = 5;
const STAR_INNER: f32 = 0.4;
const RING_RADII: [f32; 3] = [0.5, 0.75, 1.0];
const PETALS: f32 = 12.0;

/// Samples up to `count` offsets for `shape` at the given radius.
///
/// Ring and star lay points out by integer division of `count`, so the
/// leftovers are dropped rather than redistributed. Only `Circle` draws
/// from `rng` (per-point radius jitter).
pub fn sample_points(shape: Shape, count: usize, radius: f32, rng: &mut fastrand::Rng) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    match shape {
        Shape::Circle => circle(count, radius, rng),
        Shape::Heart => heart(count, radius),
        Shape::Star => star(count, radius),
        Shape::Ring => ring(count, radius),
        Shape::Chrysanthemum => chrysanthemum(count, radius),
    }
}

fn fraction(i: usize, count: usize) -> f32 {
    i as f32 / count as f32
}

fn circle(count: usize, radius: f32, rng: &mut fastrand::Rng) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = fraction(i, count) * TAU;
            let r = radius * (0.8 + rng.f32() * 0.4);
            Vec2::from_angle(angle) * r
        })
        .collect()
}

fn heart(count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let t = fraction(i, count) * TAU;
            let x = radius * t.sin().powi(3);
            let y = -radius
                * (13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos())
                / 16.0;
            Vec2::new(x, y)
        })
        .collect()
}

fn star(count: usize, radius: f32) -> Vec<Vec2> {
    let period = count / STAR_SPIKES;
    let spike_len = count / (STAR_SPIKES * 2);

    (0..count)
        .map(|i| {
            let angle = fraction(i, count) * TAU - FRAC_PI_2;
            // Fewer than five points leaves no room for a spike.
            let on_spike = period > 0 && i % period < spike_len;
            let r = if on_spike { radius } else { radius * STAR_INNER };
            Vec2::from_angle(angle) * r
        })
        .collect()
}

fn ring(count: usize, radius: f32) -> Vec<Vec2> {
    let per_ring = count / RING_RADII.len();
    let mut points = Vec::with_capacity(per_ring * RING_RADII.len());

    for scale in RING_RADII {
        let r = radius * scale;
        for i in 0..per_ring {
            let angle = fraction(i, per_ring) * TAU;
            points.push(Vec2::from_angle(angle) * r);
        }
    }
    points
}

fn chrysanthemum(count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = fraction(i, count) * TAU;
            let petal_angle = angle * PETALS;
            let r = radius * (0.3 + 0.7 * (petal_angle / 2.0).cos().abs());
            let spread = fraction(i, count);
            Vec2::from_angle(angle) * r * spread
        })
        .collect()
}
