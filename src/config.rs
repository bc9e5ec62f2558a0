//! Configuration for algoreplay
//!
//! Configuration is stored as YAML in the user's config directory.
//! Default location: ~/.config/algoreplay/config.yaml

use crate::errors::EngineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scrub playback settings
    pub playback: PlaybackConfig,
    /// Race settings
    pub race: RaceConfig,
    /// Random input generation
    pub input: InputConfig,
}

impl AppConfig {
    /// Reject settings the controllers cannot work with
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.playback.min_speed_ms > self.playback.max_speed_ms {
            return Err(EngineError::Config(format!(
                "playback.min_speed_ms ({}) exceeds playback.max_speed_ms ({})",
                self.playback.min_speed_ms, self.playback.max_speed_ms
            )));
        }
        if self.race.tick_ms == 0 {
            return Err(EngineError::Config("race.tick_ms must be positive".to_string()));
        }
        if self.input.max_value < 1 {
            return Err(EngineError::Config("input.max_value must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Scrub playback section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Delay between automatic steps
    pub speed_ms: u64,
    /// Amount `+`/`-` change the speed by
    pub speed_step_ms: u64,
    pub min_speed_ms: u64,
    pub max_speed_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_ms: 500,
            speed_step_ms: 50,
            min_speed_ms: 10,
            max_speed_ms: 2000,
        }
    }
}

impl PlaybackConfig {
    /// Starting speed, held to the configured bounds
    pub fn speed(&self) -> Duration {
        self.clamp(self.speed_ms)
    }

    /// Clamp a requested speed to the configured bounds
    pub fn clamp(&self, speed_ms: u64) -> Duration {
        Duration::from_millis(speed_ms.clamp(self.min_speed_ms, self.max_speed_ms))
    }
}

/// Race section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Delay after each unit of work in every participant
    pub speed_ms: u64,
    /// Period of the shared elapsed-time clock
    pub tick_ms: u64,
    /// Sample one series point every N steps (compare/swap always sampled)
    pub sample_stride: usize,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            speed_ms: 100,
            tick_ms: 1000,
            sample_stride: 5,
        }
    }
}

/// Random input section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Number of values when none are given
    pub size: usize,
    /// Values are drawn from 1..=max_value
    pub max_value: i64,
    /// Fixed seed so the same command shows the same array
    pub seed: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            size: 20,
            max_value: 100,
            seed: 42,
        }
    }
}

/// Get the default config file path
///
/// Returns: ~/.config/algoreplay/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
        .join("algoreplay")
        .join("config.yaml")
}

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
pub fn load_config(path: &Path) -> AppConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return AppConfig::default();
    }

    match try_load_config(path) {
        Ok(config) => {
            log::info!(
                "load_config: playback {}ms, race {}ms, input size {}",
                config.playback.speed_ms,
                config.race.speed_ms,
                config.input.size
            );
            config
        }
        Err(e) => {
            log::warn!("load_config: {}, using defaults", e);
            AppConfig::default()
        }
    }
}

/// Read, parse and check a config file without falling back
pub fn try_load_config(path: &Path) -> Result<AppConfig, EngineError> {
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents).map_err(|e| EngineError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Parse YAML text; missing sections and fields take their defaults
pub fn parse_config(contents: &str) -> Result<AppConfig, serde_yaml::Error> {
    serde_yaml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_speed_bounds_rejected() {
        let config = parse_config("playback:\n  min_speed_ms: 500\n  max_speed_ms: 100\n").unwrap();
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("algoreplay-no-such-dir").join("config.yaml");
        assert!(matches!(try_load_config(&path), Err(EngineError::Io(_))));
        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = parse_config("race:\n  speed_ms: 5\n").unwrap();
        assert_eq!(config.race.speed_ms, 5);
        assert_eq!(config.race.tick_ms, 1000);
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(parse_config("race: [1, 2").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_config(Path::new("/nonexistent/algoreplay/config.yaml"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_clamp_speed() {
        let playback = PlaybackConfig::default();
        assert_eq!(playback.clamp(1), Duration::from_millis(10));
        assert_eq!(playback.clamp(99_999), Duration::from_millis(2000));
    }

    #[test]
    fn test_starting_speed_within_bounds() {
        let playback = parse_config("playback:\n  speed_ms: 5\n").unwrap().playback;
        assert_eq!(playback.speed(), Duration::from_millis(10));
        assert_eq!(PlaybackConfig::default().speed(), Duration::from_millis(500));
    }
}
