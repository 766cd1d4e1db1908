//! Game configuration loaded from `config.toml`.
//!
//! Every field has a default so a partial (or missing) file is fine. A file
//! that exists but does not parse is reported as an error.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GalagaError, Result};
use crate::sim::level::MAX_LEVEL;

const CONFIG_DIR: &str = "rustgalaga";
const CONFIG_FILE: &str = "config.toml";

/// Visual/audio theme. Only affects sprite palettes and the cue variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameType {
    #[default]
    Original,
    Holiday,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Original => "original",
            GameType::Holiday => "holiday",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = GalagaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(GameType::Original),
            "holiday" => Ok(GameType::Holiday),
            other => Err(GalagaError::UnsupportedGameType(other.to_string())),
        }
    }
}

/// Periods for the independent simulation drivers, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Timing {
    pub master_tick_ms: u64,
    pub projectile_ms: u64,
    pub enemy_move_ms: u64,
    pub player_hit_ms: u64,
    pub bonus_roll_ms: u64,
    pub power_up_ms: u64,
    pub bonus_min_delay_ms: u64,
    pub fire_cooldown_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            master_tick_ms: 16,
            projectile_ms: 16,
            enemy_move_ms: 100,
            player_hit_ms: 50,
            bonus_roll_ms: 1000,
            power_up_ms: 12_000,
            bonus_min_delay_ms: 25_000,
            fire_cooldown_ms: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub starting_level: u32,
    pub lives: u32,
    /// Kept as a string so an unknown theme surfaces as a typed error
    /// from [`GameConfig::game_type`] instead of a serde message.
    pub game_type: String,
    pub seed: Option<u64>,
    pub timing: Timing,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 640.0,
            canvas_height: 480.0,
            starting_level: 1,
            lives: 3,
            game_type: GameType::Original.as_str().to_string(),
            seed: None,
            timing: Timing::default(),
        }
    }
}

impl GameConfig {
    /// `<config_dir>/rustgalaga/config.toml`, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Directory used for the log file; falls back to the working directory.
    pub fn data_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn game_type(&self) -> Result<GameType> {
        self.game_type.parse()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(GalagaError::InvalidConfig(format!(
                "canvas must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.lives == 0 {
            return Err(GalagaError::InvalidConfig("lives must be at least 1".into()));
        }
        if !(1..=MAX_LEVEL).contains(&self.starting_level) {
            return Err(GalagaError::UnsupportedLevelTier(self.starting_level));
        }
        let t = &self.timing;
        let periods = [
            ("master_tick_ms", t.master_tick_ms),
            ("projectile_ms", t.projectile_ms),
            ("enemy_move_ms", t.enemy_move_ms),
            ("player_hit_ms", t.player_hit_ms),
            ("bonus_roll_ms", t.bonus_roll_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(GalagaError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        self.game_type()?;
        Ok(())
    }
}
