use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use yanhua::audio::{AudioSink, Cue};
use yanhua::engine::glyph::{AlphaMask, GlyphRasterizer, sample_text};
use yanhua::engine::palette::{NIGHT_SKY, PALETTE};
use yanhua::engine::{Firework, FontRasterizer, NoGlyphs, Payload, ShapeKind};
use yanhua::render::{Surface, TerminalPresenter, draw_fireworks};
use yanhua::show::{Show, ShowSettings, TICK};

/// Inks one solid square per character, centered on the mask.
struct BlockGlyphs;

impl GlyphRasterizer for BlockGlyphs {
    fn rasterize(&self, text: &str, font_size: f32, width: usize, height: usize) -> Option<AlphaMask> {
        let mut mask = AlphaMask::new(width, height);
        let size = font_size as isize;
        let chars = text.chars().count() as isize;
        let left = (width as isize - chars * size) / 2;
        let top = (height as isize - size) / 2;
        for y in top..top + size {
            for x in left..left + chars * size {
                mask.blend_max(x, y, 255);
            }
        }
        Some(mask)
    }
}

#[derive(Clone, Default)]
struct Cues(Rc<RefCell<Vec<Cue>>>);

impl AudioSink for Cues {
    fn play(&mut self, cue: Cue) {
        self.0.borrow_mut().push(cue);
    }
}

fn explode(fw: &mut Firework, rng: &mut fastrand::Rng, glyphs: &dyn GlyphRasterizer) -> usize {
    let mut ticks = 0;
    while !fw.is_exploded() {
        fw.step(800.0, rng, glyphs);
        ticks += 1;
        assert!(ticks <= 200, "no burst after {ticks} ticks");
    }
    ticks
}

#[test]
fn launched_rockets_burst_in_time() {
    for seed in 0..50 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut fw = Firework::launch(&mut rng, 400.0, 800.0, None, None);
        assert_eq!(fw.pos, Vec2::new(400.0, 800.0));
        explode(&mut fw, &mut rng, &BlockGlyphs);
        assert!(fw.pos.y <= fw.target_y || fw.vy >= -1.0);
    }
}

#[test]
fn text_burst_resolves_into_the_glyphs() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut fw = Firework::new(
        Vec2::new(400.0, 800.0),
        200.0,
        -11.0,
        PALETTE[2],
        Payload::Text("测试".into()),
    );
    explode(&mut fw, &mut rng, &BlockGlyphs);

    let center = fw.pos;
    let expected = sample_text(&BlockGlyphs, "测试", center, 800.0).len().min(500);
    assert!(expected > 0);
    assert_eq!(fw.particles().len(), expected);
    assert!(fw.particles().iter().all(|p| p.is_text() && p.pos == center));

    // 40 ticks of flight, then easing toward the targets until life runs out.
    for _ in 0..179 {
        assert!(fw.step(800.0, &mut rng, &BlockGlyphs));
    }
    assert_eq!(fw.particles().len(), expected);
    for p in fw.particles() {
        let target = p.target().unwrap_or(Vec2::NAN);
        assert!(p.is_settling());
        assert!(p.pos.distance(target) < 0.05, "{:?} vs {target:?}", p.pos);
    }

    // The rocket trail faded long ago, so the firework is done.
    assert!(!fw.step(800.0, &mut rng, &BlockGlyphs));
    assert!(fw.particles().is_empty());
}

#[test]
fn drawing_is_repeatable_and_read_only() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut fireworks: Vec<Firework> = (0..4)
        .map(|i| Firework::launch(&mut rng, 100.0 + i as f32 * 150.0, 600.0, None, None))
        .collect();
    for _ in 0..60 {
        for fw in &mut fireworks {
            fw.step(800.0, &mut rng, &NoGlyphs);
        }
    }
    let snapshot = fireworks.clone();

    let mut a = Surface::new(800, 600, NIGHT_SKY);
    let mut b = Surface::new(800, 600, NIGHT_SKY);
    draw_fireworks(&mut a, &fireworks, 800, 600, NIGHT_SKY);
    draw_fireworks(&mut b, &fireworks, 800, 600, NIGHT_SKY);

    assert_eq!(fireworks, snapshot);
    for y in (0..600).step_by(7) {
        for x in (0..800).step_by(7) {
            assert_eq!(a.channels(x, y), b.channels(x, y));
        }
    }
}

#[test]
fn autoplay_show_runs_and_presents() {
    let cues = Cues::default();
    let settings = ShowSettings {
        seed: Some(2024),
        autoplay: true,
        scale: 2,
        ..ShowSettings::default()
    };
    let mut presenter = TerminalPresenter::new(2);
    let (width, height) = presenter.surface_size(80, 24);
    let mut show = Show::new(settings, width, height, Box::new(BlockGlyphs), Box::new(cues.clone()));

    show.click(80.0);
    let mut frame = Vec::new();
    for _ in 0..(20.0 / TICK) as usize {
        show.update(TICK);
        frame.clear();
        presenter.present(show.render(), &mut frame).unwrap();
    }

    assert!(show.explosions() > 0);
    assert!(frame.starts_with(b"\x1b[H"));
    let cells = String::from_utf8(frame).unwrap().matches('▄').count();
    assert_eq!(cells, 80 * 24);

    let heard = cues.0.borrow();
    assert!(heard.contains(&Cue::Launch));
    assert!(heard.contains(&Cue::Explosion));
    assert!(heard.contains(&Cue::Firecracker));
    assert!(show.fireworks().iter().all(|f| f.is_active()));
}

#[test]
fn forced_text_shape_uses_forced_blessing() {
    let settings = ShowSettings {
        seed: Some(3),
        forced_shape: Some(ShapeKind::Text),
        forced_blessing: Some("福".into()),
        ..ShowSettings::default()
    };
    let mut show = Show::new(settings, 800, 600, Box::new(BlockGlyphs), Box::new(Cues::default()));
    for x in [100.0, 300.0, 500.0] {
        show.click(x);
    }
    assert!(show.fireworks().iter().all(|f| f.blessing() == Some("福")));
}

#[test]
fn capped_text_burst_reaches_the_bottom_of_real_glyphs() {
    let Ok(font) = FontRasterizer::discover(None) else { return };
    let mut rng = fastrand::Rng::with_seed(5);

    for text in ["NEW", "HIM", "HAPPY"] {
        let mut fw = Firework::new(Vec2::new(400.0, 800.0), 300.0, -11.0, PALETTE[0], Payload::Text(text.into()));
        explode(&mut fw, &mut rng, &font);

        let points = sample_text(&font, text, fw.pos, 800.0);
        if points.len() <= 500 {
            continue;
        }
        assert_eq!(fw.particles().len(), 500, "{text}");

        let targets: Vec<Vec2> = fw.particles().iter().filter_map(|p| p.target()).collect();
        let lowest = |pts: &[Vec2]| pts.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let highest = |pts: &[Vec2]| pts.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert_eq!(lowest(&targets), lowest(&points), "{text}");
        assert_eq!(highest(&targets), highest(&points), "{text}");
    }
}
