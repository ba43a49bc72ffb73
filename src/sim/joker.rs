//! Joker side-choice
//!
//! Eating a joker suspends play until the player picks one of three options.
//! Which options are offered depends on what is still in the deck.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::deck::Deck;
use super::food::FoodManager;
use super::grid::Position;
use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JokerChoice {
    /// Draw a card with the last card's suit
    SameSuit,
    /// Draw a card one rank above the last card (King wraps to Ace)
    RankPlusOne,
    /// Return every board card to the deck and shuffle
    Reshuffle,
}

impl JokerChoice {
    pub const ALL: [JokerChoice; 3] = [
        JokerChoice::SameSuit,
        JokerChoice::RankPlusOne,
        JokerChoice::Reshuffle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JokerChoice::SameSuit => "same-suit",
            JokerChoice::RankPlusOne => "rank-plus-one",
            JokerChoice::Reshuffle => "reshuffle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokerOptions {
    pub same_suit: bool,
    pub rank_plus_one: bool,
    pub reshuffle: bool,
}

impl JokerOptions {
    /// Availability given the last collected card and the current deck
    pub fn compute(last_card: Option<Card>, deck: &Deck) -> Self {
        let same_suit = last_card.is_some_and(|c| deck.has_suit(c.suit));
        let rank_plus_one = last_card
            .and_then(|c| c.rank.next())
            .is_some_and(|r| deck.has_rank(r));
        Self {
            same_suit,
            rank_plus_one,
            reshuffle: true,
        }
    }

    pub fn allows(&self, choice: JokerChoice) -> bool {
        match choice {
            JokerChoice::SameSuit => self.same_suit,
            JokerChoice::RankPlusOne => self.rank_plus_one,
            JokerChoice::Reshuffle => self.reshuffle,
        }
    }

    pub fn available(&self) -> Vec<JokerChoice> {
        JokerChoice::ALL
            .into_iter()
            .filter(|&c| self.allows(c))
            .collect()
    }
}

/// A pending joker decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerOffer {
    /// Where the joker was eaten
    pub position: Position,
    pub last_card: Option<Card>,
    pub options: JokerOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokerOutcome {
    /// A card pulled from the deck, destined for the hand
    Card(Card),
    Reshuffled,
}

/// Carry out `choice` against the deck and board
pub fn apply<R: Rng + ?Sized>(
    choice: JokerChoice,
    offer: &JokerOffer,
    deck: &mut Deck,
    food: &mut FoodManager,
    rng: &mut R,
) -> Result<JokerOutcome> {
    if !offer.options.allows(choice) {
        return Err(GameError::JokerOptionUnavailable(choice));
    }

    let unavailable = || GameError::JokerOptionUnavailable(choice);
    match choice {
        JokerChoice::SameSuit => {
            let suit = offer.last_card.ok_or_else(unavailable)?.suit;
            deck.take_suit(suit, rng)
                .map(JokerOutcome::Card)
                .ok_or_else(unavailable)
        }
        JokerChoice::RankPlusOne => {
            let rank = offer
                .last_card
                .and_then(|c| c.rank.next())
                .ok_or_else(unavailable)?;
            deck.take_rank(rank, rng)
                .map(JokerOutcome::Card)
                .ok_or_else(unavailable)
        }
        JokerChoice::Reshuffle => {
            food.reshuffle(deck, rng);
            Ok(JokerOutcome::Reshuffled)
        }
    }
}
