//! Five-card poker hand evaluation
//!
//! Pure and stateless. Hand types are checked strongest first and the first
//! match wins. Aces are always high; A-2-3-4-5 is not a straight.

use serde::{Deserialize, Serialize};

use super::cards::Card;
use crate::consts::HAND_SIZE;
use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandType {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandType {
    pub const ALL: [HandType; 10] = [
        HandType::HighCard,
        HandType::Pair,
        HandType::TwoPair,
        HandType::ThreeOfAKind,
        HandType::Straight,
        HandType::Flush,
        HandType::FullHouse,
        HandType::FourOfAKind,
        HandType::StraightFlush,
        HandType::RoyalFlush,
    ];

    /// Base score; each tier doubles the one below it
    pub fn base_score(&self) -> u64 {
        match self {
            HandType::RoyalFlush => 5120,
            HandType::StraightFlush => 2560,
            HandType::FourOfAKind => 1280,
            HandType::FullHouse => 640,
            HandType::Flush => 320,
            HandType::Straight => 160,
            HandType::ThreeOfAKind => 80,
            HandType::TwoPair => 40,
            HandType::Pair => 20,
            HandType::HighCard => 10,
        }
    }

    /// Stable identifier, also used as the achievement id
    pub fn id(&self) -> &'static str {
        match self {
            HandType::RoyalFlush => "royal_flush",
            HandType::StraightFlush => "straight_flush",
            HandType::FourOfAKind => "four_of_a_kind",
            HandType::FullHouse => "full_house",
            HandType::Flush => "flush",
            HandType::Straight => "straight",
            HandType::ThreeOfAKind => "three_of_a_kind",
            HandType::TwoPair => "two_pair",
            HandType::Pair => "pair",
            HandType::HighCard => "high_card",
        }
    }
}

/// Evaluator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub hand_type: HandType,
    pub base_score: u64,
    /// The five cards, highest value first
    pub cards: Vec<Card>,
}

/// Classify exactly five cards
pub fn evaluate(hand: &[Card]) -> Result<HandEvaluation> {
    if hand.len() != HAND_SIZE {
        return Err(GameError::InvalidHandSize(hand.len()));
    }

    let mut cards = hand.to_vec();
    // Suit breaks ties so the output does not depend on input order
    cards.sort_by(|a, b| {
        b.rank
            .value()
            .cmp(&a.rank.value())
            .then_with(|| a.suit.cmp(&b.suit))
    });
    let values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let is_straight = values.windows(2).all(|w| w[0] == w[1] + 1);

    // Indexed by rank value, 2..=14
    let mut rank_counts = [0u8; 15];
    for &v in &values {
        rank_counts[usize::from(v)] += 1;
    }
    let mut counts: Vec<u8> = rank_counts.into_iter().filter(|&n| n > 0).collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    let top = counts[0];
    let second = counts.get(1).copied().unwrap_or(0);

    let hand_type = if is_flush && is_straight && values[0] == 14 {
        HandType::RoyalFlush
    } else if is_flush && is_straight {
        HandType::StraightFlush
    } else if top == 4 {
        HandType::FourOfAKind
    } else if top == 3 && second == 2 {
        HandType::FullHouse
    } else if is_flush {
        HandType::Flush
    } else if is_straight {
        HandType::Straight
    } else if top == 3 {
        HandType::ThreeOfAKind
    } else if top == 2 && second == 2 {
        HandType::TwoPair
    } else if top == 2 {
        HandType::Pair
    } else {
        HandType::HighCard
    };

    Ok(HandEvaluation {
        hand_type,
        base_score: hand_type.base_score(),
        cards,
    })
}
