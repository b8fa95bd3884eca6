//! Tunables for a session. Every field has a default, so a JSON config only
//! needs to name the values it overrides.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};

pub const CONFIG_ENV_VAR: &str = "CRAWLER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map_width: i32,
    pub map_height: i32,
    /// Player positions must satisfy `|x|, |y| <= playable_half_extent`.
    pub playable_half_extent: f32,
    /// Spawn candidates are drawn from `[-spawn_half_extent, spawn_half_extent)`.
    pub spawn_half_extent: f32,
    pub spawn_exclusion: f32,
    pub spawn_attempts: usize,
    pub initial_monsters: usize,
    pub tick_interval_ms: u64,
    pub move_cooldown_ms: u64,
    pub action_cooldown_ms: u64,
    pub player_damage: i32,
    pub attack_reach: f32,
    pub kill_exp: u32,
    pub chase_radius: f32,
    pub strike_radius: f32,
    pub chase_step: f32,
    pub potion_heal: i32,
    pub data_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            playable_half_extent: 9.5,
            spawn_half_extent: 9.0,
            spawn_exclusion: 2.0,
            spawn_attempts: 100,
            initial_monsters: 5,
            tick_interval_ms: 500,
            move_cooldown_ms: 150,
            action_cooldown_ms: 300,
            player_damage: 20,
            attack_reach: 1.5,
            kill_exp: 10,
            chase_radius: 5.0,
            strike_radius: 1.5,
            chase_step: 0.1,
            potion_heal: 50,
            data_dir: PathBuf::from(".sanctum-crawler"),
        }
    }
}

impl GameConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the generator or the simulation cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| Err(ConfigError::Invalid(reason.to_string()));

        if self.map_width <= 0 || self.map_height <= 0 {
            return invalid("map dimensions must be positive");
        }
        if !(self.spawn_half_extent > 0.0) {
            return invalid("spawn_half_extent must be positive");
        }
        if !(self.playable_half_extent > 0.0) {
            return invalid("playable_half_extent must be positive");
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms must be at least 1");
        }
        if !(self.chase_step >= 0.0) || !(self.attack_reach >= 0.0) {
            return invalid("chase_step and attack_reach must not be negative");
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&source)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by `CRAWLER_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn move_cooldown(&self) -> Duration {
        Duration::from_millis(self.move_cooldown_ms)
    }

    pub fn action_cooldown(&self) -> Duration {
        Duration::from_millis(self.action_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "map_width": 32, "kill_exp": 25 }"#).unwrap();
        assert_eq!(config.map_width, 32);
        assert_eq!(config.kill_exp, 25);
        assert_eq!(config.map_height, DEFAULT_MAP_HEIGHT);
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ map_width: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        for source in [
            r#"{ "spawn_half_extent": 0 }"#,
            r#"{ "spawn_half_extent": -3.5 }"#,
            r#"{ "map_width": 0 }"#,
            r#"{ "map_height": -20 }"#,
            r#"{ "tick_interval_ms": 0 }"#,
            r#"{ "chase_step": -0.1 }"#,
        ] {
            assert!(
                matches!(GameConfig::from_json(source), Err(ConfigError::Invalid(_))),
                "{source}"
            );
        }
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
