//! Game configuration and difficulty presets
//!
//! Persisted as JSON next to the high score on native hosts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::sim::obstacle::{ObstacleKind, SpawnPolicy};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Classic,
    Frantic,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Classic => "Classic",
            Difficulty::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "classic" | "normal" => Some(Difficulty::Classic),
            "frantic" | "hard" => Some(Difficulty::Frantic),
            _ => None,
        }
    }

    /// Tick interval at the start of a run (ms)
    pub fn initial_speed_ms(&self) -> u64 {
        match self {
            Difficulty::Relaxed => 180,
            Difficulty::Classic => 150,
            Difficulty::Frantic => 120,
        }
    }

    /// Fastest tick interval reachable (ms)
    pub fn min_speed_ms(&self) -> u64 {
        match self {
            Difficulty::Relaxed => 70,
            Difficulty::Classic => 50,
            Difficulty::Frantic => 40,
        }
    }

    /// How long a card stays on the board (ms)
    pub fn food_expiration_ms(&self) -> u64 {
        match self {
            Difficulty::Relaxed => 15_000,
            Difficulty::Classic => 10_000,
            Difficulty::Frantic => 7_000,
        }
    }

    /// Multiplier lost per second of play
    pub fn multiplier_deduction_rate(&self) -> f64 {
        match self {
            Difficulty::Relaxed => 0.02,
            Difficulty::Classic => 0.05,
            Difficulty::Frantic => 0.1,
        }
    }
}

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,

    // === Board ===
    /// Grid width in tiles
    pub grid_width: i32,
    /// Grid height in tiles
    pub grid_height: i32,
    /// Tile edge in pixels (obstacles live in pixel space)
    pub tile_size: f32,

    // === Snake ===
    pub initial_snake_length: usize,
    /// Starting tick interval (ms)
    pub initial_speed_ms: u64,
    /// Floor for the tick interval (ms)
    pub min_speed_ms: u64,
    /// Interval shaved off per pickup (ms)
    pub speed_decrease_ms: u64,

    // === Food ===
    pub max_food_items: usize,
    pub min_food_interval_ms: u64,
    pub food_expiration_ms: u64,
    /// Per-tick chance to spawn extra food once the interval has elapsed
    pub food_spawn_chance: f64,
    /// Shuffle four jokers into the deck
    pub jokers_enabled: bool,

    // === Scoring ===
    pub score_per_food: u64,
    pub score_length_multiplier: f64,
    pub ram_reward_multiplier: f64,
    pub max_hands: u32,
    pub max_multiplier_exponent: u32,
    pub multiplier_deduction_rate: f64,

    // === Obstacles ===
    pub obstacle_kind: ObstacleKind,
    pub obstacle_spawn: SpawnPolicy,
    /// Pixels travelled per tick
    pub obstacle_speed: f32,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let difficulty = Difficulty::Classic;
        Self {
            difficulty,

            grid_width: 30,
            grid_height: 20,
            tile_size: 20.0,

            initial_snake_length: 3,
            initial_speed_ms: difficulty.initial_speed_ms(),
            min_speed_ms: difficulty.min_speed_ms(),
            speed_decrease_ms: 2,

            max_food_items: 5,
            min_food_interval_ms: 3000,
            food_expiration_ms: difficulty.food_expiration_ms(),
            food_spawn_chance: 0.1,
            jokers_enabled: true,

            score_per_food: 10,
            score_length_multiplier: 1.0,
            ram_reward_multiplier: 5.0,
            max_hands: 5,
            max_multiplier_exponent: 10,
            multiplier_deduction_rate: difficulty.multiplier_deduction_rate(),

            obstacle_kind: ObstacleKind::Bird,
            obstacle_spawn: SpawnPolicy::PerHand,
            obstacle_speed: 2.0,
            obstacle_width: 30.0,
            obstacle_height: 15.0,
        }
    }
}

impl GameConfig {
    /// Create a config from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut config = Self::default();
        config.apply_preset(preset);
        config
    }

    /// Apply a difficulty preset (updates preset-dependent values)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.initial_speed_ms = preset.initial_speed_ms();
        self.min_speed_ms = preset.min_speed_ms();
        self.food_expiration_ms = preset.food_expiration_ms();
        self.multiplier_deduction_rate = preset.multiplier_deduction_rate();

        // Frantic swaps the calm per-hand birds for a steady stream of arrows
        if preset == Difficulty::Frantic {
            self.obstacle_kind = ObstacleKind::Arrow;
            self.obstacle_spawn = SpawnPolicy::Interval { ms: 4000 };
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 2 || self.grid_height < 2 {
            return Err(GameError::InvalidConfig(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.initial_snake_length == 0
            || self.initial_snake_length > self.grid_width as usize
        {
            return Err(GameError::InvalidConfig(format!(
                "initial snake length {} does not fit a row of {}",
                self.initial_snake_length, self.grid_width
            )));
        }
        if self.min_speed_ms == 0 || self.min_speed_ms > self.initial_speed_ms {
            return Err(GameError::InvalidConfig(
                "min_speed_ms must be in 1..=initial_speed_ms".to_string(),
            ));
        }
        if self.max_food_items == 0 {
            return Err(GameError::InvalidConfig(
                "max_food_items must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.food_spawn_chance) {
            return Err(GameError::InvalidConfig(
                "food_spawn_chance must be a probability".to_string(),
            ));
        }
        if self.max_multiplier_exponent == 0 || self.max_hands == 0 {
            return Err(GameError::InvalidConfig(
                "max_multiplier_exponent and max_hands must be positive".to_string(),
            ));
        }
        let sizes = [
            ("tile_size", self.tile_size),
            ("obstacle_speed", self.obstacle_speed),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_height", self.obstacle_height),
        ];
        for (name, value) in sizes {
            // NaN fails this too
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        let rates = [
            ("score_length_multiplier", self.score_length_multiplier),
            ("ram_reward_multiplier", self.ram_reward_multiplier),
            ("multiplier_deduction_rate", self.multiplier_deduction_rate),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Load a config file, validating it
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults when missing or broken
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::info!("Using default config ({err})");
                Self::default()
            }
        }
    }

    /// Save the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Config saved to {}", path.display());
        Ok(())
    }
}
