//! Sound cues. The show tells an [`AudioSink`] what happened; how (or
//! whether) that becomes sound is up to the sink. Sinks never fail loudly.

use std::io::{Stderr, Write};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Launch,
    Explosion,
    Firecracker,
}

pub trait AudioSink {
    /// Called on the first user interaction.
    fn init(&mut self) {}

    fn play(&mut self, cue: Cue);

    /// Called when the show is torn down. Later cues must be ignored.
    fn shutdown(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}

/// Rings the terminal bell for bursts. Launches stay quiet.
pub struct TerminalBell<W: Write> {
    out: W,
    ready: bool,
}

impl TerminalBell<Stderr> {
    /// Rings on stderr so the bell does not interleave with frame output.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out, ready: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn init(&mut self) {
        self.ready = true;
    }

    fn play(&mut self, cue: Cue) {
        if !self.ready || cue == Cue::Launch {
            return;
        }
        let rung = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        if let Err(e) = rung {
            trace!("bell failed: {e}");
        }
    }

    fn shutdown(&mut self) {
        self.ready = false;
    }
}
