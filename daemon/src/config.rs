use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ddc::DisplaySetting;

pub const MAX_LEVEL: u16 = 100;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

const DEFAULT_GAME_BRIGHTNESS: u16 = 80;
const DEFAULT_GAME_CONTRAST: u16 = 80;
const DEFAULT_DESKTOP_BRIGHTNESS: u16 = 50;
const DEFAULT_DESKTOP_CONTRAST: u16 = 50;

/// Root configuration structure, deserialized from config.toml in the app
/// data directory. Loaded once at startup; changing it requires a restart.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seconds between process-list polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Executable image names whose presence switches the monitor to the
    /// game profile. Matched verbatim; duplicates are harmless.
    #[serde(default = "default_game_processes")]
    pub game_processes: Vec<String>,
    #[serde(default = "default_game_mode")]
    pub game_mode: ModeSettings,
    #[serde(default = "default_desktop_mode")]
    pub desktop_mode: ModeSettings,
}

/// Brightness/contrast levels for one named profile.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModeSettings {
    pub brightness: u16,
    pub contrast: u16,
}

impl ModeSettings {
    pub fn as_setting(self) -> DisplaySetting {
        DisplaySetting {
            brightness: self.brightness,
            contrast: self.contrast,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            game_processes: default_game_processes(),
            game_mode: default_game_mode(),
            desktop_mode: default_desktop_mode(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{field} is {value}; must be between 0 and {MAX_LEVEL}")]
    LevelOutOfRange { field: &'static str, value: u16 },
    #[error("game_processes contains an empty name")]
    EmptyProcessName,
    #[error("poll_interval_secs must be at least 1")]
    ZeroPollInterval,
}

/// Loads and validates the config at `path`. A missing file yields the
/// defaults; a file that exists but cannot be read, parsed, or validated is
/// a startup-fatal error. Out-of-range levels are rejected here rather than
/// clamped, so a typo surfaces immediately instead of as a monitor stuck at
/// an unexpected setting.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        Config::default()
    };
    config.validate()?;
    Ok(config)
}

impl Config {
    fn validate(&self) -> Result<(), ConfigError> {
        check_level("game_mode.brightness", self.game_mode.brightness)?;
        check_level("game_mode.contrast", self.game_mode.contrast)?;
        check_level("desktop_mode.brightness", self.desktop_mode.brightness)?;
        check_level("desktop_mode.contrast", self.desktop_mode.contrast)?;
        if self.game_processes.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::EmptyProcessName);
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

fn check_level(field: &'static str, value: u16) -> Result<(), ConfigError> {
    if value > MAX_LEVEL {
        return Err(ConfigError::LevelOutOfRange { field, value });
    }
    Ok(())
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_game_processes() -> Vec<String> {
    vec![
        "EscapeFromTarkov.exe".to_string(),
        "EscapeFromTarkov_BE.exe".to_string(),
        "TarkovArena.exe".to_string(),
    ]
}

fn default_game_mode() -> ModeSettings {
    ModeSettings {
        brightness: DEFAULT_GAME_BRIGHTNESS,
        contrast: DEFAULT_GAME_CONTRAST,
    }
}

fn default_desktop_mode() -> ModeSettings {
    ModeSettings {
        brightness: DEFAULT_DESKTOP_BRIGHTNESS,
        contrast: DEFAULT_DESKTOP_CONTRAST,
    }
}
