//! Score, multiplier and the hand in progress

use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::grid::Position;
use super::poker::{HandType, evaluate};
use crate::consts::{HAND_ANIMATION_MS, HAND_SIZE};
use crate::error::{GameError, Result};
use crate::settings::GameConfig;

/// A scored poker hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_type: HandType,
    pub base_score: u64,
    pub multiplier: f64,
    pub final_score: u64,
    /// Highest value first
    pub cards: Vec<Card>,
}

/// Score popup shown where the completing card was eaten (renderer hint)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandAnimation {
    pub hand_type: HandType,
    pub score: u64,
    pub position: Position,
    pub start_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreState {
    score: u64,
    /// Best score from earlier runs, as loaded from storage
    high_score: u64,
    multiplier_exponent: u32,
    max_multiplier_exponent: u32,
    multiplier_deduction: f64,
    deduction_rate: f64,
    score_per_food: u64,
    score_length_multiplier: f64,
    hand: Vec<Card>,
    hands_played: u32,
    max_hands: u32,
    /// Cards that left play for good (scored hands, spent jokers)
    discarded: Vec<Card>,
    last_hand: Option<HandRecord>,
    best_hand: Option<HandRecord>,
    animations: Vec<HandAnimation>,
}

impl ScoreState {
    pub fn new(config: &GameConfig, high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
            multiplier_exponent: 1,
            max_multiplier_exponent: config.max_multiplier_exponent,
            multiplier_deduction: 0.0,
            deduction_rate: config.multiplier_deduction_rate,
            score_per_food: config.score_per_food,
            score_length_multiplier: config.score_length_multiplier,
            hand: Vec::with_capacity(HAND_SIZE),
            hands_played: 0,
            max_hands: config.max_hands,
            discarded: Vec::new(),
            last_hand: None,
            best_hand: None,
            animations: Vec::new(),
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Adopt a stored high score if it beats the one we started with
    pub fn raise_high_score(&mut self, stored: u64) {
        self.high_score = self.high_score.max(stored);
    }

    pub fn is_new_high_score(&self) -> bool {
        self.score > self.high_score
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hands_played(&self) -> u32 {
        self.hands_played
    }

    pub fn hands_reached(&self) -> bool {
        self.hands_played >= self.max_hands
    }

    pub fn discarded(&self) -> &[Card] {
        &self.discarded
    }

    pub fn last_hand(&self) -> Option<&HandRecord> {
        self.last_hand.as_ref()
    }

    pub fn best_hand(&self) -> Option<&HandRecord> {
        self.best_hand.as_ref()
    }

    pub fn animations(&self) -> &[HandAnimation] {
        &self.animations
    }

    pub fn multiplier_exponent(&self) -> u32 {
        self.multiplier_exponent
    }

    pub fn multiplier_deduction(&self) -> f64 {
        self.multiplier_deduction
    }

    /// Effective hand multiplier, never below 1
    pub fn multiplier(&self) -> f64 {
        (self.multiplier_exponent as f64 - self.multiplier_deduction).max(1.0)
    }

    /// Continuous multiplier decay over `elapsed_secs` of play
    pub fn decay(&mut self, elapsed_secs: f64) {
        if elapsed_secs > 0.0 {
            self.multiplier_deduction += self.deduction_rate * elapsed_secs;
        }
    }

    /// Obstacle caught: bump the exponent (capped) and restart the decay
    pub fn catch_obstacle(&mut self) -> u32 {
        self.multiplier_exponent = (self.multiplier_exponent + 1).min(self.max_multiplier_exponent);
        self.multiplier_deduction = 0.0;
        self.multiplier_exponent
    }

    pub fn add_points(&mut self, points: u64) {
        self.score += points;
    }

    /// Flat reward for eating any card
    pub fn award_pickup(&mut self, snake_len: usize) -> u64 {
        let length_bonus = (snake_len as f64 * self.score_length_multiplier).floor() as u64;
        let points = self.score_per_food + length_bonus;
        self.add_points(points);
        points
    }

    /// Add a card to the hand; the fifth card scores the hand.
    ///
    /// Returns the scored hand when this card completed it.
    pub fn push_card(&mut self, card: Card) -> Result<Option<HandRecord>> {
        if self.hand.len() >= HAND_SIZE {
            return Err(GameError::HandFull);
        }
        self.hand.push(card);
        if self.hand.len() < HAND_SIZE {
            return Ok(None);
        }
        self.score_hand().map(Some)
    }

    fn score_hand(&mut self) -> Result<HandRecord> {
        let eval = evaluate(&self.hand)?;
        let multiplier = self.multiplier();
        let final_score = (eval.base_score as f64 * multiplier).floor() as u64;
        self.score += final_score;
        self.hands_played += 1;
        self.discarded.append(&mut self.hand);

        let record = HandRecord {
            hand_type: eval.hand_type,
            base_score: eval.base_score,
            multiplier,
            final_score,
            cards: eval.cards,
        };
        if self
            .best_hand
            .as_ref()
            .is_none_or(|best| record.final_score > best.final_score)
        {
            self.best_hand = Some(record.clone());
        }
        self.last_hand = Some(record.clone());
        Ok(record)
    }

    /// Permanently remove a card from play without scoring it
    pub fn discard(&mut self, card: Card) {
        self.discarded.push(card);
    }

    pub fn add_animation(&mut self, animation: HandAnimation) {
        self.animations.push(animation);
    }

    pub fn prune_animations(&mut self, now_ms: u64) {
        self.animations
            .retain(|a| now_ms.saturating_sub(a.start_ms) < HAND_ANIMATION_MS);
    }
}
