//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only enters through `now_ms` arguments
//! - Seeded RNG only
//! - Stable iteration order (plain `Vec`s, no hash maps)
//! - No rendering, storage or platform dependencies

pub mod cards;
pub mod collision;
pub mod deck;
pub mod food;
pub mod grid;
pub mod joker;
pub mod obstacle;
pub mod poker;
pub mod score;
pub mod snake;
pub mod state;
pub mod tick;

pub use cards::{Card, Rank, Suit, full_deck};
pub use collision::Aabb;
pub use deck::Deck;
pub use food::{FoodItem, FoodManager, FoodRules};
pub use grid::{Direction, Grid, Position, Turn};
pub use joker::{JokerChoice, JokerOffer, JokerOptions, JokerOutcome};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleManager, SpawnPolicy};
pub use poker::{HandEvaluation, HandType, evaluate};
pub use score::{HandAnimation, HandRecord, ScoreState};
pub use snake::{MoveOutcome, Segment, SegmentKind, Snake};
pub use state::{GameEvent, GameOverReason, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, autopilot_direction, resolve_joker, tick};
