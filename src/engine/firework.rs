//! Rockets: ascent, the one-time explosion into a particle set, and the
//! afterglow until the last particle and trail sample are gone.

use super::glyph::{GlyphRasterizer, sample_text};
use super::palette::{self, Color, GLYPH_COLORS, PALETTE};
use super::particle::{Particle, TrailPoint};
use super::shapes::{Shape, sample_points};
use crate::error::ConfigError;
use glam::Vec2;
use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

pub const TRAIL_CAP: usize = 12;
pub const MAX_TEXT_PARTICLES: usize = 500;
const ASCENT_DRAG: f32 = 0.98;
/// A rocket slower than this bursts even short of its target height.
const BURNOUT_VY: f32 = -1.0;
const TRAIL_FADE: f32 = 0.9;
const TRAIL_CUTOFF: f32 = 0.01;

/// Which burst a rocket carries, as picked at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle,
    Heart,
    Star,
    Ring,
    Chrysanthemum,
    Text,
}

impl ShapeKind {
    /// Launch table; hearts come up three times as often as the rest.
    pub const WEIGHTED: [ShapeKind; 8] = [
        ShapeKind::Circle,
        ShapeKind::Heart,
        ShapeKind::Heart,
        ShapeKind::Star,
        ShapeKind::Ring,
        ShapeKind::Chrysanthemum,
        ShapeKind::Text,
        ShapeKind::Heart,
    ];

    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::WEIGHTED[rng.usize(..Self::WEIGHTED.len())]
    }

    pub fn geometric(self) -> Option<Shape> {
        match self {
            ShapeKind::Circle => Some(Shape::Circle),
            ShapeKind::Heart => Some(Shape::Heart),
            ShapeKind::Star => Some(Shape::Star),
            ShapeKind::Ring => Some(Shape::Ring),
            ShapeKind::Chrysanthemum => Some(Shape::Chrysanthemum),
            ShapeKind::Text => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self.geometric() {
            Some(shape) => shape.name(),
            None => "text",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(ShapeKind::Circle),
            "heart" => Ok(ShapeKind::Heart),
            "star" => Ok(ShapeKind::Star),
            "ring" => Ok(ShapeKind::Ring),
            "chrysanthemum" => Ok(ShapeKind::Chrysanthemum),
            "text" => Ok(ShapeKind::Text),
            _ => Err(ConfigError::UnknownShape(s.to_string())),
        }
    }
}

/// What the burst turns into. Only text bursts carry a blessing.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Shape(Shape),
    Text(String),
}

impl Payload {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Payload::Shape(Shape::Circle) => ShapeKind::Circle,
            Payload::Shape(Shape::Heart) => ShapeKind::Heart,
            Payload::Shape(Shape::Star) => ShapeKind::Star,
            Payload::Shape(Shape::Ring) => ShapeKind::Ring,
            Payload::Shape(Shape::Chrysanthemum) => ShapeKind::Chrysanthemum,
            Payload::Text(_) => ShapeKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ascending,
    Exploded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Firework {
    pub pos: Vec2,
    pub target_y: f32,
    pub vy: f32,
    pub color: Color,
    payload: Payload,
    stage: Stage,
    particles: Vec<Particle>,
    trail: VecDeque<TrailPoint>,
}

impl Firework {
    pub fn new(pos: Vec2, target_y: f32, vy: f32, color: Color, payload: Payload) -> Self {
        Self {
            pos,
            target_y,
            vy,
            color,
            payload,
            stage: Stage::Ascending,
            particles: Vec::new(),
            trail: VecDeque::with_capacity(TRAIL_CAP + 1),
        }
    }

    /// A rocket leaving the bottom edge (`origin_height`) at column `x`.
    ///
    /// It bursts between 15% and 50% of the height from the top. A forced
    /// blessing only applies when the shape comes out as text; an empty one
    /// makes the text rocket burst as a circle.
    pub fn launch(
        rng: &mut fastrand::Rng,
        x: f32,
        origin_height: f32,
        forced_shape: Option<ShapeKind>,
        forced_blessing: Option<&str>,
    ) -> Self {
        let kind = forced_shape.unwrap_or_else(|| ShapeKind::random(rng));
        let payload = match kind.geometric() {
            Some(shape) => Payload::Shape(shape),
            None => Payload::Text(
                forced_blessing
                    .map(str::to_owned)
                    .unwrap_or_else(|| palette::random_blessing(rng).to_owned()),
            ),
        };

        let target_y = origin_height * 0.15 + rng.f32() * origin_height * 0.35;
        let vy = -(8.0 + rng.f32() * 4.0);
        let color = palette::random_rocket_color(rng);

        Self::new(Vec2::new(x, origin_height), target_y, vy, color, payload)
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn kind(&self) -> ShapeKind {
        self.payload.kind()
    }

    pub fn blessing(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            Payload::Shape(_) => None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_exploded(&self) -> bool {
        self.stage == Stage::Exploded
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn trail(&self) -> &VecDeque<TrailPoint> {
        &self.trail
    }

    /// Whether the caller still needs to simulate and draw this firework.
    pub fn is_active(&self) -> bool {
        !self.is_exploded() || !self.particles.is_empty() || !self.trail.is_empty()
    }

    /// Advances one tick. Returns false once the firework can be dropped.
    ///
    /// `surface_width` only scales the font of text bursts.
    pub fn step(&mut self, surface_width: f32, rng: &mut fastrand::Rng, glyphs: &dyn GlyphRasterizer) -> bool {
        match self.stage {
            Stage::Ascending => {
                self.trail.push_back(TrailPoint {
                    pos: self.pos,
                    alpha: 1.0,
                });
                if self.trail.len() > TRAIL_CAP {
                    self.trail.pop_front();
                }

                self.pos.y += self.vy;
                self.vy *= ASCENT_DRAG;

                if self.pos.y <= self.target_y || self.vy >= BURNOUT_VY {
                    self.stage = Stage::Exploded;
                    self.particles =
                        explosion_particles(self.pos, &self.payload, self.color, surface_width, rng, glyphs);
                }
                true
            }
            Stage::Exploded => {
                self.particles.retain_mut(Particle::step);
                for t in self.trail.iter_mut() {
                    t.alpha *= TRAIL_FADE;
                }
                self.trail.retain(|t| t.alpha > TRAIL_CUTOFF);

                !self.particles.is_empty() || !self.trail.is_empty()
            }
        }
    }
}

/// Builds the whole burst for a rocket exploding at `center`.
///
/// A text payload with an empty blessing bursts as a circle.
pub fn explosion_particles(
    center: Vec2,
    payload: &Payload,
    color: Color,
    surface_width: f32,
    rng: &mut fastrand::Rng,
    glyphs: &dyn GlyphRasterizer,
) -> Vec<Particle> {
    match payload {
        Payload::Shape(shape) => shape_particles(center, *shape, color, rng),
        Payload::Text(text) if !text.is_empty() => text_particles(center, text, surface_width, rng, glyphs),
        Payload::Text(_) => shape_particles(center, Shape::Circle, color, rng),
    }
}

fn shape_particles(center: Vec2, shape: Shape, color: Color, rng: &mut fastrand::Rng) -> Vec<Particle> {
    let count = if shape == Shape::Chrysanthemum { 200 } else { 120 };
    let radius = 100.0 + rng.f32() * 60.0;

    sample_points(shape, count, radius, rng)
        .into_iter()
        .map(|offset| {
            let angle = offset.y.atan2(offset.x);
            let speed = offset.length() / 30.0 + rng.f32();
            // Roughly a third of the sparks take a random palette color.
            let color = if rng.f32() > 0.7 {
                PALETTE[rng.usize(..PALETTE.len())]
            } else {
                color
            };
            let life = 60.0 + rng.f32() * 40.0;
            let size = 2.0 + rng.f32() * 2.0;
            let decay = 0.008 + rng.f32() * 0.005;
            Particle::spark(center, Vec2::from_angle(angle) * speed, color, life, size, decay, 0.03)
        })
        .collect()
}

fn text_particles(
    center: Vec2,
    text: &str,
    surface_width: f32,
    rng: &mut fastrand::Rng,
    glyphs: &dyn GlyphRasterizer,
) -> Vec<Particle> {
    let targets = sample_text(glyphs, text, center, surface_width);
    let n = targets.len();
    let kept = n.min(MAX_TEXT_PARTICLES);

    // Spread the picks over the whole scan, first and last point included,
    // so the bottom rows of the text keep their share.
    (0..kept)
        .map(|i| if kept > 1 { targets[i * (n - 1) / (kept - 1)] } else { targets[0] })
        .map(|target| {
            let angle = rng.f32() * TAU;
            let speed = rng.f32() * 6.0 + 2.0;
            let color = PALETTE[rng.usize(..GLYPH_COLORS)];
            Particle::glyph(center, Vec2::from_angle(angle) * speed, target, color)
        })
        .collect()
}
