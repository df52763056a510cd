//! The show: the live set of fireworks and everything around the engine
//! that decides when rockets go up and what gets announced.
//!
//! Clicks and the ambient timer only ever queue or append fireworks; all
//! queued work is applied at the start of a tick, so a tick never sees a
//! half-updated collection.

use crate::audio::{AudioSink, Cue};
use crate::config::Config;
use crate::engine::palette::Color;
use crate::engine::{Firework, GlyphRasterizer, ShapeKind};
use crate::render::{Surface, draw_fireworks};
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEvent, MouseEventKind};
use tracing::{debug, info, trace};

/// Fixed simulation step; one engine tick per 1/60 s.
pub const TICK: f32 = 1.0 / 60.0;

const AMBIENT_INTERVAL: f32 = 3.0;
const AMBIENT_CHANCE: f32 = 0.5;
const EXTRA_CHANCE: f32 = 0.5;
const EXTRA_SPREAD: f32 = 200.0;
const EXTRA_DELAY_MIN: f32 = 0.2;
const EXTRA_DELAY_SPAN: f32 = 0.3;
const FIRST_CRACKER_DELAY: f32 = 0.2;
const CRACKER_CHANCE: f32 = 0.4;
const CRACKER_DELAY: f32 = 0.1;
/// Every n-th click carries a blessing.
const TEXT_EVERY: u32 = 2;
const TIME_WRAP: f32 = 10000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ShowSettings {
    pub background: Color,
    pub forced_shape: Option<ShapeKind>,
    pub forced_blessing: Option<String>,
    pub seed: Option<u64>,
    pub autoplay: bool,
    /// Surface pixels per terminal column, for mapping mouse clicks.
    pub scale: usize,
}

impl From<&Config> for ShowSettings {
    fn from(config: &Config) -> Self {
        Self {
            background: config.background,
            forced_shape: config.shape,
            forced_blessing: config.blessing.clone(),
            seed: config.seed,
            autoplay: config.autoplay,
            scale: config.scale,
        }
    }
}

impl Default for ShowSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

enum Action {
    Launch(Firework),
    Cue(Cue),
}

struct Timer {
    due: f32,
    action: Action,
}

pub struct Show {
    width: usize,
    height: usize,
    scale: usize,
    background: Color,
    forced_shape: Option<ShapeKind>,
    forced_blessing: Option<String>,
    autoplay: bool,

    fireworks: Vec<Firework>,
    timers: Vec<Timer>,
    rng: fastrand::Rng,
    glyphs: Box<dyn GlyphRasterizer>,
    audio: Box<dyn AudioSink>,
    surface: Surface,

    time: f32,
    next_ambient: f32,
    clicks: u32,
    interacted: bool,
    explosions: u64,
    torn_down: bool,
}

impl Show {
    pub fn new(
        settings: ShowSettings,
        width: usize,
        height: usize,
        glyphs: Box<dyn GlyphRasterizer>,
        mut audio: Box<dyn AudioSink>,
    ) -> Self {
        let rng = match settings.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        if settings.autoplay {
            audio.init();
        }
        info!(width, height, seed = ?settings.seed, autoplay = settings.autoplay, "show started");

        Self {
            width,
            height,
            scale: settings.scale.max(1),
            background: settings.background,
            forced_shape: settings.forced_shape,
            forced_blessing: settings.forced_blessing,
            autoplay: settings.autoplay,
            fireworks: Vec::new(),
            timers: Vec::new(),
            rng,
            glyphs,
            audio,
            surface: Surface::new(width, height, settings.background),
            time: 0.0,
            next_ambient: AMBIENT_INTERVAL,
            clicks: 0,
            interacted: false,
            explosions: 0,
            torn_down: false,
        }
    }

    pub fn fireworks(&self) -> &[Firework] {
        &self.fireworks
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Bursts seen since the show started.
    pub fn explosions(&self) -> u64 {
        self.explosions
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        debug!(width, height, "resize");
        self.width = width;
        self.height = height;
        self.surface.resize(width, height, self.background);
    }

    /// Adds a firework as is, with no cue.
    pub fn spawn(&mut self, firework: Firework) {
        if !self.torn_down {
            self.fireworks.push(firework);
        }
    }

    /// A user tap at surface column `x`.
    pub fn click(&mut self, x: f32) {
        if self.torn_down {
            return;
        }
        if !self.interacted {
            self.interacted = true;
            self.audio.init();
            self.schedule(FIRST_CRACKER_DELAY, Action::Cue(Cue::Firecracker));
            // Ambient fire counts its interval from the first interaction.
            self.next_ambient = self.time + AMBIENT_INTERVAL;
            info!("first interaction, ambient fire enabled");
        }

        self.clicks += 1;
        let cadence = (self.clicks % TEXT_EVERY == 0).then_some(ShapeKind::Text);
        let firework = self.new_firework(x, cadence);
        debug!(x, kind = %firework.kind(), "launch");
        self.fireworks.push(firework);
        self.audio.play(Cue::Launch);

        if self.rng.f32() > 1.0 - EXTRA_CHANCE {
            let extra_x = (x + (self.rng.f32() - 0.5) * EXTRA_SPREAD).clamp(0.0, self.width as f32);
            let extra = self.new_firework(extra_x, None);
            let delay = EXTRA_DELAY_MIN + self.rng.f32() * EXTRA_DELAY_SPAN;
            trace!(x = extra_x, delay, "extra launch queued");
            self.schedule(delay, Action::Launch(extra));
        }
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(_),
                column,
                ..
            }) => {
                let x = (*column as f32 + 0.5) * self.scale as f32;
                self.click(x);
            }
            Event::Key(key) if key.kind == KeyEventKind::Press && key.code == KeyCode::Char(' ') => {
                let x = self.rng.f32() * self.width as f32;
                self.click(x);
            }
            _ => {}
        }
    }

    /// Runs one simulation tick and returns how many rockets burst in it.
    pub fn update(&mut self, dt: f32) -> usize {
        if self.torn_down {
            return 0;
        }

        self.time += dt;
        // Wrap time to keep f32 precision over long sessions
        if self.time > TIME_WRAP {
            self.time -= TIME_WRAP;
            self.next_ambient -= TIME_WRAP;
            for timer in &mut self.timers {
                timer.due -= TIME_WRAP;
            }
        }

        self.run_timers();
        self.ambient_fire();

        let exploded = self.step_fireworks();
        if exploded > 0 {
            self.explosions += exploded as u64;
            self.audio.play(Cue::Explosion);
            if self.rng.f32() > 1.0 - CRACKER_CHANCE {
                self.schedule(CRACKER_DELAY, Action::Cue(Cue::Firecracker));
            }
            debug!(exploded, total = self.explosions, "burst");
        }
        exploded
    }

    /// Draws the current state into the surface.
    pub fn render(&mut self) -> &Surface {
        draw_fireworks(&mut self.surface, &self.fireworks, self.width, self.height, self.background);
        &self.surface
    }

    /// Cancels everything still queued and shuts the audio sink down.
    /// Idempotent; also runs on drop.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let cancelled = self.timers.len();
        self.timers.clear();
        self.audio.shutdown();
        info!(cancelled, explosions = self.explosions, "show torn down");
    }

    fn new_firework(&mut self, x: f32, shape: Option<ShapeKind>) -> Firework {
        let shape = self.forced_shape.or(shape);
        Firework::launch(
            &mut self.rng,
            x,
            self.height as f32,
            shape,
            self.forced_blessing.as_deref(),
        )
    }

    fn schedule(&mut self, delay: f32, action: Action) {
        self.timers.push(Timer {
            due: self.time + delay,
            action,
        });
    }

    fn run_timers(&mut self) {
        let now = self.time;
        let (due, pending): (Vec<Timer>, Vec<Timer>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due <= now);
        self.timers = pending;

        for timer in due {
            match timer.action {
                Action::Launch(firework) => {
                    self.fireworks.push(firework);
                    self.audio.play(Cue::Launch);
                }
                Action::Cue(cue) => self.audio.play(cue),
            }
        }
    }

    fn ambient_fire(&mut self) {
        while self.time >= self.next_ambient {
            self.next_ambient += AMBIENT_INTERVAL;
            if (self.interacted || self.autoplay) && self.rng.f32() > 1.0 - AMBIENT_CHANCE {
                let x = self.rng.f32() * self.width as f32;
                let firework = self.new_firework(x, None);
                trace!(x, kind = %firework.kind(), "ambient launch");
                self.fireworks.push(firework);
            }
        }
    }

    fn step_fireworks(&mut self) -> usize {
        let width = self.width as f32;
        let rng = &mut self.rng;
        let glyphs = self.glyphs.as_ref();
        let mut exploded = 0;

        self.fireworks.retain_mut(|fw| {
            let was_exploded = fw.is_exploded();
            let keep = fw.step(width, rng, glyphs);
            if !was_exploded && fw.is_exploded() {
                exploded += 1;
                trace!(kind = %fw.kind(), x = fw.pos.x, y = fw.pos.y, particles = fw.particles().len(), "exploded");
            }
            keep
        });
        exploded
    }
}

impl Drop for Show {
    fn drop(&mut self) {
        self.teardown();
    }
}
