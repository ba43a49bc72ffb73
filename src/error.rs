//! Error type shared by the simulation, session and persistence layers

use std::fmt;

use crate::sim::joker::JokerChoice;

/// Everything that can go wrong inside the game core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A card draw was attempted against an empty deck
    DeckExhausted,
    /// A card was pushed onto a hand that already holds five cards
    HandFull,
    /// The evaluator needs exactly five cards
    InvalidHandSize(usize),
    /// `resolve_joker` called while no joker choice is pending
    NoJokerPending,
    /// The chosen joker option is not available for the pending offer
    JokerOptionUnavailable(JokerChoice),
    /// Configuration rejected by `GameConfig::validate`
    InvalidConfig(String),
    /// High-score or config storage failed
    Persistence(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::DeckExhausted => write!(f, "deck is empty"),
            GameError::HandFull => write!(f, "hand already holds five cards"),
            GameError::InvalidHandSize(n) => {
                write!(f, "poker hands need exactly 5 cards, got {n}")
            }
            GameError::NoJokerPending => write!(f, "no joker choice is pending"),
            GameError::JokerOptionUnavailable(choice) => {
                write!(f, "joker option '{}' is not available", choice.as_str())
            }
            GameError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            GameError::Persistence(msg) => write!(f, "persistence failed: {msg}"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
