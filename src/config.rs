//! Command line and config file handling.
//!
//! An optional TOML file (`--config PATH`) supplies defaults; flags given on
//! the command line win over it.

use crate::engine::ShapeKind;
use crate::engine::palette::{Color, NIGHT_SKY};
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SCALE: usize = 4;
pub const MAX_SCALE: usize = 16;

/// Settings as written by the user, before validation.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct RawConfig {
    pub bg_color: Option<String>,
    pub font: Option<PathBuf>,
    pub shape: Option<String>,
    pub blessing: Option<String>,
    pub seed: Option<u64>,
    pub scale: Option<usize>,
    pub sound: Option<bool>,
    pub autoplay: Option<bool>,
    pub log_dir: Option<PathBuf>,
}

impl RawConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Fields set in `overrides` replace ours.
    pub fn merge(self, overrides: RawConfig) -> Self {
        Self {
            bg_color: overrides.bg_color.or(self.bg_color),
            font: overrides.font.or(self.font),
            shape: overrides.shape.or(self.shape),
            blessing: overrides.blessing.or(self.blessing),
            seed: overrides.seed.or(self.seed),
            scale: overrides.scale.or(self.scale),
            sound: overrides.sound.or(self.sound),
            autoplay: overrides.autoplay.or(self.autoplay),
            log_dir: overrides.log_dir.or(self.log_dir),
        }
    }

    pub fn resolve(self) -> Result<Config, ConfigError> {
        let background = match self.bg_color {
            Some(hex) => Color::from_hex(&hex).ok_or(ConfigError::InvalidColor(hex))?,
            None => NIGHT_SKY,
        };

        let shape = self.shape.map(|s| s.parse::<ShapeKind>()).transpose()?;

        let scale = self.scale.unwrap_or(DEFAULT_SCALE);
        if !(1..=MAX_SCALE).contains(&scale) {
            return Err(ConfigError::InvalidValue {
                option: "--scale".into(),
                value: scale.to_string(),
            });
        }

        Ok(Config {
            background,
            font: self.font,
            shape,
            blessing: self.blessing.filter(|b| !b.trim().is_empty()),
            seed: self.seed,
            scale,
            sound: self.sound.unwrap_or(false),
            autoplay: self.autoplay.unwrap_or(false),
            log_dir: self.log_dir.unwrap_or_else(default_log_dir),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub background: Color,
    pub font: Option<PathBuf>,
    /// Overrides every launch, including the text cadence of clicks.
    pub shape: Option<ShapeKind>,
    pub blessing: Option<String>,
    pub seed: Option<u64>,
    /// Surface pixels per half-block pixel.
    pub scale: usize,
    pub sound: bool,
    pub autoplay: bool,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: NIGHT_SKY,
            font: None,
            shape: None,
            blessing: None,
            seed: None,
            scale: DEFAULT_SCALE,
            sound: false,
            autoplay: false,
            log_dir: default_log_dir(),
        }
    }
}

pub fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("yanhua")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
}

/// Parses arguments (without the program name).
pub fn parse_args<I>(args: I) -> Result<Command, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let mut cli = RawConfig::default();
    let mut config_file: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "help" | "--help" | "-h" => return Ok(Command::Help),
            "--sound" => {
                cli.sound = Some(true);
                i += 1;
            }
            "--autoplay" => {
                cli.autoplay = Some(true);
                i += 1;
            }
            "--bg-color" | "--font" | "--shape" | "--blessing" | "--seed" | "--scale" | "--config"
            | "--log-dir" => {
                let value = args
                    .get(i + 1)
                    .cloned()
                    .ok_or_else(|| ConfigError::MissingValue(arg.to_string()))?;
                match arg {
                    "--bg-color" => cli.bg_color = Some(value),
                    "--font" => cli.font = Some(PathBuf::from(value)),
                    "--shape" => cli.shape = Some(value),
                    "--blessing" => cli.blessing = Some(value),
                    "--seed" => cli.seed = Some(parse_number(arg, &value)?),
                    "--scale" => cli.scale = Some(parse_number(arg, &value)?),
                    "--config" => config_file = Some(PathBuf::from(value)),
                    _ => cli.log_dir = Some(PathBuf::from(value)),
                }
                i += 2;
            }
            _ => return Err(ConfigError::UnknownOption(arg.to_string())),
        }
    }

    let base = match config_file {
        Some(path) => RawConfig::load(&path)?,
        None => RawConfig::default(),
    };
    Ok(Command::Run(base.merge(cli).resolve()?))
}

fn parse_number<T: std::str::FromStr>(option: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    })
}
