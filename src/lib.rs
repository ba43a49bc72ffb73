//! Poker Serpent - snake on a torus where every pickup is a playing card
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake, deck, food, poker scoring, obstacles)
//! - `session`: Tick timer, joker suspension and collaborator ports
//! - `platform`: Time source abstraction
//! - `highscores`: High-score persistence port
//! - `achievements`: Fire-and-forget achievement tracker

pub mod achievements;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{GameError, Result};
pub use highscores::{HighScoreStore, JsonFileHighScore, MemoryHighScore};
pub use session::Session;
pub use settings::{Difficulty, GameConfig};

/// Game constants that are not player-tunable
pub mod consts {
    /// Cards in a complete hand
    pub const HAND_SIZE: usize = 5;
    /// Standard deck without jokers
    pub const STANDARD_DECK_SIZE: usize = 52;
    /// Jokers shuffled in when enabled
    pub const JOKER_COUNT: usize = 4;

    /// Random cell samples before falling back to a board scan
    pub const MAX_PLACEMENT_ATTEMPTS: usize = 256;
    /// Food shows as expiring during its last 2 seconds
    pub const FOOD_EXPIRY_WARNING_MS: u64 = 2000;
    /// Score popups stay alive for 2 seconds
    pub const HAND_ANIMATION_MS: u64 = 2000;

    /// Cosmetic convergence walk bounds
    pub const CONVERGENCE_MIN: u8 = 1;
    pub const CONVERGENCE_MAX: u8 = 5;
    pub const CONVERGENCE_START: u8 = 3;
}

/// Euclidean modulo into [0, size)
#[inline]
pub fn wrap(value: i32, size: i32) -> i32 {
    value.rem_euclid(size)
}
