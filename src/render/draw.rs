//! The per-frame draw pass. Reads fireworks, writes pixels, nothing else.

use super::surface::Surface;
use crate::engine::Firework;
use crate::engine::palette::Color;

/// Each frame darkens the previous one by this much, leaving streaks.
pub const FADE_ALPHA: f32 = 0.15;

const ROCKET_TRAIL: Color = Color::new(255, 220, 150);
const ROCKET_GLOW: Color = Color::new(255, 255, 200);
const ROCKET_TRAIL_RADIUS: f32 = 2.0;
const ROCKET_RADIUS: f32 = 3.0;
const ROCKET_GLOW_RADIUS: f32 = 8.0;
/// Particles larger than this get a halo.
const HALO_MIN_SIZE: f32 = 2.0;

pub fn draw_fireworks(surface: &mut Surface, fireworks: &[Firework], width: usize, height: usize, background: Color) {
    surface.fill_rect(0, 0, width, height, background.with_alpha(FADE_ALPHA));

    for fw in fireworks {
        if !fw.is_exploded() {
            for t in fw.trail() {
                surface.fill_circle(t.pos, ROCKET_TRAIL_RADIUS, ROCKET_TRAIL.with_alpha(t.alpha * 0.6));
            }
            surface.fill_circle(fw.pos, ROCKET_RADIUS, fw.color.with_alpha(1.0));
            surface.fill_radial(fw.pos, ROCKET_GLOW_RADIUS, ROCKET_GLOW.with_alpha(0.8));
        }

        for p in fw.particles() {
            for t in p.trail() {
                surface.fill_circle(t.pos, p.size * 0.5, p.color.with_alpha_byte(t.alpha * 80.0));
            }

            surface.fill_circle(p.pos, p.size, p.color.with_alpha_byte(p.alpha * 255.0));

            if p.size > HALO_MIN_SIZE {
                surface.fill_radial(p.pos, p.size * 3.0, p.color.with_alpha_byte(p.alpha * 60.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::palette::{NIGHT_SKY, PALETTE};
    use crate::engine::{NoGlyphs, Payload, Shape};
    use glam::Vec2;

    const WHITE: Color = Color::new(255, 255, 255);

    #[test]
    fn test_empty_frame_only_fades() {
        let mut s = Surface::new(8, 8, WHITE);
        draw_fireworks(&mut s, &[], 8, 8, NIGHT_SKY);
        let [r, g, b] = s.channels(4, 4).unwrap();
        assert!((r - (255.0 * 0.85 + 10.0 * 0.15)).abs() < 1e-3);
        assert!((g - (255.0 * 0.85 + 5.0 * 0.15)).abs() < 1e-3);
        assert!((b - (255.0 * 0.85 + 15.0 * 0.15)).abs() < 1e-3);
    }

    #[test]
    fn test_overlay_respects_bounds() {
        let mut s = Surface::new(8, 8, WHITE);
        draw_fireworks(&mut s, &[], 4, 8, NIGHT_SKY);
        assert_eq!(s.pixel(6, 6), Some(WHITE));
    }

    #[test]
    fn test_rocket_body_carries_its_color() {
        let mut s = Surface::new(40, 40, NIGHT_SKY);
        let red = PALETTE[0];
        let fw = Firework::new(Vec2::new(20.5, 20.5), 0.0, -10.0, red, Payload::Shape(Shape::Heart));
        draw_fireworks(&mut s, &[fw], 40, 40, NIGHT_SKY);

        // Two pixels from the center: fully inside the body, under 60% glow.
        let body = s.channels(22, 20).unwrap();
        let glow = [255.0, 255.0, 200.0];
        let own = [red.r as f32, red.g as f32, red.b as f32];
        for c in 0..3 {
            assert!((body[c] - (glow[c] * 0.6 + own[c] * 0.4)).abs() < 1e-3, "{body:?}");
        }

        // Six pixels out only the glow reaches, at 20%.
        let halo = s.channels(26, 20).unwrap();
        assert!((halo[0] - (255.0 * 0.2 + 10.0 * 0.8)).abs() < 1e-3, "{halo:?}");
        assert_eq!(s.pixel(0, 0), Some(NIGHT_SKY));
    }

    #[test]
    fn test_draw_does_not_touch_simulation() {
        let mut rng = fastrand::Rng::with_seed(12);
        let mut fw = Firework::new(Vec2::new(50.0, 100.0), 60.0, -10.0, PALETTE[0], Payload::Shape(Shape::Circle));
        for _ in 0..10 {
            fw.step(100.0, &mut rng, &NoGlyphs);
        }
        assert!(fw.is_exploded());
        let before = fw.clone();

        let mut s = Surface::new(100, 120, NIGHT_SKY);
        draw_fireworks(&mut s, std::slice::from_ref(&fw), 100, 120, NIGHT_SKY);
        draw_fireworks(&mut s, std::slice::from_ref(&fw), 100, 120, NIGHT_SKY);
        assert_eq!(fw, before);
    }
}
