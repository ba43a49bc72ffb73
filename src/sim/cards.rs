//! Playing cards

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::JOKER_COUNT;

/// Card suit (jokers carry their own pseudo-suit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
    Joker,
}

impl Suit {
    /// The four suits that appear in a standard deck
    pub const STANDARD: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn symbol(&self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
            Suit::Joker => '★',
        }
    }
}

/// Card rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    /// Ranks in display order (Ace first, as dealt)
    pub const STANDARD: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Value used for straights and sorting. Aces are always high.
    pub fn value(&self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
            Rank::Joker => 0,
        }
    }

    /// Next rank in dealing order; King wraps to Ace
    pub fn next(&self) -> Option<Rank> {
        let idx = Self::STANDARD.iter().position(|r| r == self)?;
        Some(Self::STANDARD[(idx + 1) % Self::STANDARD.len()])
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Joker => "JOKER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { suit, rank }
    }

    pub const fn joker() -> Self {
        Self {
            suit: Suit::Joker,
            rank: Rank::Joker,
        }
    }

    pub fn is_joker(&self) -> bool {
        self.rank == Rank::Joker
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_joker() {
            write!(f, "JOKER")
        } else {
            write!(f, "{}{}", self.rank.label(), self.suit.symbol())
        }
    }
}

/// Unshuffled deck: 52 standard cards, plus four jokers when enabled
pub fn full_deck(with_jokers: bool) -> Vec<Card> {
    let mut cards: Vec<Card> = Suit::STANDARD
        .iter()
        .flat_map(|&suit| Rank::STANDARD.iter().map(move |&rank| Card::new(rank, suit)))
        .collect();
    if with_jokers {
        cards.extend(std::iter::repeat_n(Card::joker(), JOKER_COUNT));
    }
    cards
}
