//! Burst particles and their per-tick integration.
//!
//! Ballistic particles fly, fall and fade like ordinary sparks. Glyph
//! particles first burst outward without gravity, then switch once to
//! easing toward their target so the burst resolves into the text.

use super::palette::Color;
use glam::Vec2;
use std::collections::VecDeque;

/// Initial life of a glyph particle, in ticks.
pub const GLYPH_LIFE: f32 = 180.0;
/// Glyph particles start settling once life drops below this.
pub const SETTLE_BELOW: f32 = 140.0;
/// While settling, alpha is `life / FADE_TICKS`.
pub const FADE_TICKS: f32 = 60.0;
pub const GLYPH_SIZE: f32 = 2.5;

const SPARK_TRAIL: usize = 6;
const GLYPH_TRAIL: usize = 5;
const DRAG: f32 = 0.98;
const GLYPH_DRAG: f32 = 0.96;
const SETTLE_RATE: f32 = 0.08;
const SHRINK: f32 = 0.995;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphPhase {
    Flying,
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Ballistic { gravity: f32, decay: f32 },
    Glyph { target: Vec2, phase: GlyphPhase },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub alpha: f32,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    motion: Motion,
    trail: VecDeque<TrailPoint>,
}

impl Particle {
    pub fn spark(pos: Vec2, vel: Vec2, color: Color, life: f32, size: f32, decay: f32, gravity: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            alpha: 1.0,
            life,
            max_life: 100.0,
            size,
            motion: Motion::Ballistic { gravity, decay },
            trail: VecDeque::with_capacity(SPARK_TRAIL + 1),
        }
    }

    pub fn glyph(pos: Vec2, vel: Vec2, target: Vec2, color: Color) -> Self {
        Self {
            pos,
            vel,
            color,
            alpha: 1.0,
            life: GLYPH_LIFE,
            max_life: GLYPH_LIFE,
            size: GLYPH_SIZE,
            motion: Motion::Glyph {
                target,
                phase: GlyphPhase::Flying,
            },
            trail: VecDeque::with_capacity(GLYPH_TRAIL + 1),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.motion, Motion::Glyph { .. })
    }

    pub fn is_settling(&self) -> bool {
        matches!(
            self.motion,
            Motion::Glyph {
                phase: GlyphPhase::Settling,
                ..
            }
        )
    }

    pub fn target(&self) -> Option<Vec2> {
        match self.motion {
            Motion::Glyph { target, .. } => Some(target),
            Motion::Ballistic { .. } => None,
        }
    }

    pub fn trail(&self) -> &VecDeque<TrailPoint> {
        &self.trail
    }

    /// Advances one tick. Returns false once the particle should be dropped.
    pub fn step(&mut self) -> bool {
        match self.motion {
            Motion::Ballistic { gravity, decay } => {
                self.push_trail(self.alpha * 0.3, SPARK_TRAIL);
                self.pos += self.vel;
                self.vel.y += gravity;
                self.vel *= DRAG;
                self.alpha -= decay;
                self.life -= 1.0;
                self.size *= SHRINK;
                self.alpha > 0.0 && self.life > 0.0
            }
            Motion::Glyph {
                target,
                phase: GlyphPhase::Flying,
            } => {
                self.push_trail(self.alpha * 0.5, GLYPH_TRAIL);
                self.pos += self.vel;
                self.vel *= GLYPH_DRAG;
                self.life -= 1.0;
                if self.life < SETTLE_BELOW {
                    self.motion = Motion::Glyph {
                        target,
                        phase: GlyphPhase::Settling,
                    };
                }
                self.life > 0.0
            }
            Motion::Glyph {
                target,
                phase: GlyphPhase::Settling,
            } => {
                self.pos += (target - self.pos) * SETTLE_RATE;
                self.life -= 1.0;
                self.alpha = (self.life / FADE_TICKS).max(0.0);
                self.life > 0.0
            }
        }
    }

    fn push_trail(&mut self, alpha: f32, cap: usize) {
        self.trail.push_back(TrailPoint { pos: self.pos, alpha });
        while self.trail.len() > cap {
            self.trail.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::palette::PALETTE;

    fn spark() -> Particle {
        Particle::spark(Vec2::new(10.0, 20.0), Vec2::new(2.0, -1.0), PALETTE[0], 80.0, 3.0, 0.01, 0.03)
    }

    #[test]
    fn test_spark_single_step() {
        let mut p = spark();
        assert!(p.step());

        assert_eq!(p.pos, Vec2::new(12.0, 19.0));
        assert!((p.vel.x - 2.0 * 0.98).abs() < 1e-6);
        assert!((p.vel.y - (-1.0 + 0.03) * 0.98).abs() < 1e-6);
        assert!((p.alpha - 0.99).abs() < 1e-6);
        assert_eq!(p.life, 79.0);
        assert!((p.size - 3.0 * 0.995).abs() < 1e-6);

        // Trail records the pre-move position at a third of the alpha.
        let t = p.trail()[0];
        assert_eq!(t.pos, Vec2::new(10.0, 20.0));
        assert!((t.alpha - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_spark_trail_is_capped() {
        let mut p = spark();
        for _ in 0..20 {
            p.step();
        }
        assert_eq!(p.trail().len(), SPARK_TRAIL);
    }

    #[test]
    fn test_spark_dies_by_life_even_without_fading() {
        let mut p = Particle::spark(Vec2::ZERO, Vec2::ZERO, PALETTE[1], 60.0, 2.0, 0.0, 0.03);
        p.max_life = 60.0;
        let mut ticks = 0;
        while p.step() {
            ticks += 1;
            assert!(ticks <= p.max_life as usize);
        }
        assert!(p.alpha > 0.0);
        assert!(p.life <= 0.0);
    }

    #[test]
    fn test_spark_dies_by_alpha() {
        let mut p = Particle::spark(Vec2::ZERO, Vec2::ZERO, PALETTE[1], 100.0, 2.0, 0.5, 0.0);
        assert!(p.step());
        assert!(!p.step());
        assert!(p.life > 0.0);
    }

    #[test]
    fn test_glyph_flight_has_no_gravity() {
        let mut p = Particle::glyph(Vec2::ZERO, Vec2::new(0.0, 4.0), Vec2::new(50.0, 50.0), PALETTE[2]);
        p.step();
        assert_eq!(p.pos, Vec2::new(0.0, 4.0));
        assert!((p.vel.y - 4.0 * 0.96).abs() < 1e-6);
        assert_eq!(p.alpha, 1.0);
        assert!((p.trail()[0].alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_settling_flips_once_below_threshold() {
        let mut p = Particle::glyph(Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(100.0, 0.0), PALETTE[3]);
        let mut flips = Vec::new();
        let mut was = p.is_settling();
        let mut tick = 0;
        while p.step() {
            tick += 1;
            if p.is_settling() != was {
                flips.push((tick, p.life));
                was = p.is_settling();
            }
        }
        // 180 - 41 = 139 is the first life below 140.
        assert_eq!(flips, vec![(41, 139.0)]);
        assert!(p.is_settling());
    }

    #[test]
    fn test_settling_eases_and_derives_alpha() {
        let target = Vec2::new(100.0, -50.0);
        let mut p = Particle::glyph(Vec2::ZERO, Vec2::ZERO, target, PALETTE[0]);
        p.life = SETTLE_BELOW;
        p.step();
        assert!(p.is_settling());
        let trail_len = p.trail().len();

        let before = p.pos;
        p.step();
        let expected = before + (target - before) * 0.08;
        assert!((p.pos - expected).length() < 1e-4);
        assert!((p.alpha - p.life / 60.0).abs() < 1e-6);
        // Settling does not extend the trail.
        assert_eq!(p.trail().len(), trail_len);
    }

    #[test]
    fn test_glyph_survives_zero_alpha_until_life_ends() {
        let mut p = Particle::glyph(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, PALETTE[0]);
        p.alpha = 0.0;
        assert!(p.step());
        assert_eq!(p.life, 179.0);
    }

    #[test]
    fn test_glyph_converges_on_target() {
        let target = Vec2::new(-60.0, 35.0);
        let mut p = Particle::glyph(Vec2::ZERO, Vec2::new(8.0, -6.0), target, PALETTE[1]);
        let mut last = p.pos;
        while p.step() {
            last = p.pos;
        }
        assert!((last - target).length() < 0.05, "{}", (last - target).length());
        assert_eq!(p.alpha, 0.0);
    }
}
