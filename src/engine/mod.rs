//! The simulation core: palette, shape and glyph sampling, particles and
//! fireworks. Nothing in here touches the terminal or audio.

pub mod firework;
pub mod glyph;
pub mod palette;
pub mod particle;
pub mod shapes;

pub use firework::{Firework, Payload, ShapeKind, Stage};
pub use glyph::{FontRasterizer, GlyphRasterizer, NoGlyphs};
pub use palette::{Color, Rgba};
pub use particle::{GlyphPhase, Motion, Particle, TrailPoint};
pub use shapes::{Shape, sample_points};
