//! Interactive fireworks for the terminal.
//!
//! [`engine`] simulates rockets and their bursts, [`render`] turns them into
//! pixels and half-block frames, and [`show::Show`] ties the two to clicks,
//! timers and sound cues.

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod render;
pub mod show;

pub use audio::{AudioSink, Cue, Silent, TerminalBell};
pub use config::{Command, Config, parse_args};
pub use error::{ConfigError, FontError};
pub use show::{Show, ShowSettings, TICK};
