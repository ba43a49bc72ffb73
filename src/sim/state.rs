//! Game state and core simulation types
//!
//! One `GameState` owns every subsystem plus the seeded RNG, so a run is
//! reproducible from its seed and the sequence of inputs and timestamps.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::deck::Deck;
use super::food::{FoodItem, FoodManager, FoodRules};
use super::grid::{Direction, Grid, Position, Turn};
use super::joker::{JokerChoice, JokerOffer};
use super::obstacle::{Obstacle, ObstacleKind, ObstacleManager};
use super::score::{HandAnimation, HandRecord, ScoreState};
use super::snake::{Segment, Snake};
use crate::error::Result;
use crate::settings::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Board dealt, waiting for the player to start
    Waiting,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// A joker was eaten; ticks are suspended until the player chooses
    AwaitingJoker,
    /// Run ended
    GameOver,
}

/// Why a run ended. Exactly one is reported per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// Head ran into the body without a ram head
    Collision,
    /// Nothing left to draw and nothing left on the board
    DeckEmpty,
    /// Played the maximum number of hands
    Hands,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::Collision => "collision",
            GameOverReason::DeckEmpty => "deck empty",
            GameOverReason::Hands => "hands",
        }
    }
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    FoodEaten { card: Card, position: Position, points: u64 },
    FoodExpired { cards: Vec<Card> },
    HandScored(HandRecord),
    ObstacleCaught { kind: ObstacleKind, multiplier_exponent: u32 },
    RamCut { segments: usize, reward: u64 },
    SpeedChanged { interval_ms: u64 },
    JokerOffered(JokerOffer),
    JokerResolved { choice: JokerChoice },
    GameOver {
        reason: GameOverReason,
        score: u64,
        best_hand: Option<HandRecord>,
    },
}

/// Read-only view handed to the renderer once per tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub segments: Vec<Segment>,
    pub foods: Vec<FoodItem>,
    pub expiring_foods: Vec<Position>,
    pub hand: Vec<Card>,
    pub last_hand: Option<HandRecord>,
    pub best_hand: Option<HandRecord>,
    pub animations: Vec<HandAnimation>,
    pub obstacles: Vec<Obstacle>,
    pub multiplier: f64,
    pub score: u64,
    pub high_score: u64,
    pub hands_played: u32,
    pub deck_remaining: usize,
    /// A draw found the deck empty since the last reshuffle
    pub deck_exhausted: bool,
    pub interval_ms: u64,
    pub pending_joker: Option<JokerOffer>,
    pub game_over_reason: Option<GameOverReason>,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub is_waiting: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) config: GameConfig,
    pub(crate) grid: Grid,
    pub(crate) phase: GamePhase,
    pub(crate) snake: Snake,
    pub(crate) deck: Deck,
    pub(crate) food: FoodManager,
    pub(crate) obstacles: ObstacleManager,
    pub(crate) score: ScoreState,
    /// Current tick interval (ms); shrinks as the snake eats
    pub(crate) interval_ms: u64,
    /// Most recent non-joker card collected, for joker options
    pub(crate) last_card: Option<Card>,
    pub(crate) pending_joker: Option<JokerOffer>,
    pub(crate) game_over_reason: Option<GameOverReason>,
    /// Timestamp the multiplier decay was last applied at
    pub(crate) last_update_ms: u64,
    /// When play was last suspended (pause or joker choice)
    pub(crate) suspended_at_ms: Option<u64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Deal a fresh board. The run starts in `Waiting`.
    pub fn new(config: GameConfig, seed: u64, high_score: u64, now_ms: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::new(config.grid_width, config.grid_height);
        let snake = Snake::new(grid, config.initial_snake_length);
        let mut deck = Deck::new(config.jokers_enabled, &mut rng);
        let mut food = FoodManager::new(grid, FoodRules::from(&config), now_ms);
        food.update(&snake.positions(), &mut deck, &mut rng, now_ms)?;

        Ok(Self {
            seed,
            rng,
            grid,
            phase: GamePhase::Waiting,
            snake,
            deck,
            food,
            obstacles: ObstacleManager::new(grid, &config, now_ms),
            score: ScoreState::new(&config, high_score),
            interval_ms: config.initial_speed_ms,
            last_card: None,
            pending_joker: None,
            game_over_reason: None,
            last_update_ms: now_ms,
            suspended_at_ms: None,
            time_ticks: 0,
            events: Vec::new(),
            config,
        })
    }

    /// Same config and seed stream, new board. Keeps the best known high score.
    pub fn reset(&mut self, now_ms: u64) -> Result<()> {
        let high_score = self.score.high_score().max(self.score.score());
        let next_seed = self.seed.wrapping_add(1);
        *self = Self::new(self.config.clone(), next_seed, high_score, now_ms)?;
        Ok(())
    }

    /// Leave `Waiting` and begin play
    pub fn start(&mut self, now_ms: u64) {
        if self.phase == GamePhase::Waiting {
            self.phase = GamePhase::Playing;
            self.last_update_ms = now_ms;
            self.obstacles.restart_clock(now_ms);
            log::info!("Run started (seed {})", self.seed);
        }
    }

    /// Pause or resume. Ignored outside `Playing`/`Paused`.
    pub fn toggle_pause(&mut self, now_ms: u64) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.suspend(now_ms);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.resume(now_ms);
            }
            _ => {}
        }
    }

    pub(crate) fn suspend(&mut self, now_ms: u64) {
        self.suspended_at_ms = Some(now_ms);
    }

    /// Shift the play clocks past the suspension. Time played before it still
    /// counts toward decay and interval spawns; time away does not.
    pub(crate) fn resume(&mut self, now_ms: u64) {
        if let Some(since) = self.suspended_at_ms.take() {
            let away_ms = now_ms.saturating_sub(since);
            self.last_update_ms = self.last_update_ms.saturating_add(away_ms);
            self.obstacles.skip_time(away_ms);
        }
    }

    fn accepts_input(&self) -> bool {
        matches!(self.phase, GamePhase::Waiting | GamePhase::Playing)
    }

    /// Steer by raw deltas. Diagonals, zero vectors and reversals are ignored.
    pub fn set_direction(&mut self, dx: i32, dy: i32) -> bool {
        match Direction::from_delta(dx, dy) {
            Some(dir) if self.accepts_input() => self.snake.set_direction(dir),
            _ => false,
        }
    }

    pub fn turn(&mut self, turn: Turn) -> bool {
        self.accepts_input() && self.snake.set_direction(turn.into())
    }

    /// Single funnel for every terminal condition. Only the first call counts.
    pub fn end_game(&mut self, reason: GameOverReason) {
        if self.game_over_reason.is_some() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason);
        self.pending_joker = None;
        let best_hand = self.score.best_hand().cloned();
        log::info!(
            "Game over ({}): score {}, best hand {:?}",
            reason.as_str(),
            self.score.score(),
            best_hand.as_ref().map(|h| h.hand_type)
        );
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.score.score(),
            best_hand,
        });
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn food(&self) -> &FoodManager {
        &self.food
    }

    pub fn obstacles(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn pending_joker(&self) -> Option<&JokerOffer> {
        self.pending_joker.as_ref()
    }

    pub fn last_card(&self) -> Option<Card> {
        self.last_card
    }

    pub fn is_new_high_score(&self) -> bool {
        self.score.is_new_high_score()
    }

    /// Every card across deck, board, hand and discard pile, sorted. Equal to
    /// `sorted_full_deck` while no card is lost or duplicated.
    #[cfg(test)]
    pub(crate) fn owned_cards(&self) -> Vec<Card> {
        let mut cards = self.deck.cards().to_vec();
        cards.extend(self.food.foods().iter().map(|f| f.card));
        cards.extend_from_slice(self.score.hand());
        cards.extend_from_slice(self.score.discarded());
        cards.sort();
        cards
    }

    /// Replace the snake (scripted scenarios and tests)
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    /// Place a card on the board directly (scripted scenarios and tests).
    ///
    /// The card is pulled from the deck when present so the card count holds.
    pub fn place_food(&mut self, position: Position, card: Card, now_ms: u64) {
        if !self.deck.take_card(card) {
            log::debug!("{card} placed without a deck copy");
        }
        self.food.place(FoodItem {
            position,
            created_at_ms: now_ms,
            card,
        });
    }

    pub fn snapshot(&self, now_ms: u64) -> Snapshot {
        Snapshot {
            phase: self.phase,
            segments: self.snake.segments().to_vec(),
            foods: self.food.foods().to_vec(),
            expiring_foods: self
                .food
                .foods()
                .iter()
                .filter(|f| self.food.is_expiring(f, now_ms))
                .map(|f| f.position)
                .collect(),
            hand: self.score.hand().to_vec(),
            last_hand: self.score.last_hand().cloned(),
            best_hand: self.score.best_hand().cloned(),
            animations: self.score.animations().to_vec(),
            obstacles: self.obstacles.obstacles().to_vec(),
            multiplier: self.score.multiplier(),
            score: self.score.score(),
            high_score: self.score.high_score().max(self.score.score()),
            hands_played: self.score.hands_played(),
            deck_remaining: self.deck.len(),
            deck_exhausted: self.deck.is_exhausted(),
            interval_ms: self.interval_ms,
            pending_joker: self.pending_joker.clone(),
            game_over_reason: self.game_over_reason,
            is_game_over: self.phase == GamePhase::GameOver,
            is_paused: self.phase == GamePhase::Paused,
            is_waiting: self.phase == GamePhase::Waiting,
        }
    }
}

#[cfg(test)]
pub(crate) fn sorted_full_deck(with_jokers: bool) -> Vec<Card> {
    let mut cards = super::cards::full_deck(with_jokers);
    cards.sort();
    cards
}
