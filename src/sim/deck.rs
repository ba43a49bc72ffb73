//! Finite shuffled deck backing the food supply

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::cards::{Card, Rank, Suit, full_deck};
use crate::error::{GameError, Result};

/// The draw pile. Cards leave it as food and only come back when food expires
/// or the board is reshuffled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    /// Set once a draw hits an empty pile; cleared by `reshuffle`
    exhausted: bool,
}

impl Deck {
    /// Build and Fisher–Yates shuffle a full deck
    pub fn new<R: Rng + ?Sized>(with_jokers: bool, rng: &mut R) -> Self {
        let mut cards = full_deck(with_jokers);
        cards.shuffle(rng);
        Self {
            cards,
            exhausted: false,
        }
    }

    /// Deck with a fixed draw order (top of the deck is the last element)
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            exhausted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Pop the top card
    pub fn draw(&mut self) -> Result<Card> {
        match self.cards.pop() {
            Some(card) => Ok(card),
            None => {
                self.exhausted = true;
                Err(GameError::DeckExhausted)
            }
        }
    }

    /// Put a card back at a uniformly random position
    pub fn return_card<R: Rng + ?Sized>(&mut self, card: Card, rng: &mut R) {
        let idx = rng.random_range(0..=self.cards.len());
        self.cards.insert(idx, card);
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Shuffle and forget any earlier exhaustion
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.shuffle(rng);
        self.exhausted = false;
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|c| c.suit == suit)
    }

    pub fn has_rank(&self, rank: Rank) -> bool {
        self.cards.iter().any(|c| c.rank == rank)
    }

    /// Remove a uniformly chosen card of `suit`, if any remain
    pub fn take_suit<R: Rng + ?Sized>(&mut self, suit: Suit, rng: &mut R) -> Option<Card> {
        self.take_matching(|c| c.suit == suit, rng)
    }

    /// Remove a uniformly chosen card of `rank`, if any remain
    pub fn take_rank<R: Rng + ?Sized>(&mut self, rank: Rank, rng: &mut R) -> Option<Card> {
        self.take_matching(|c| c.rank == rank, rng)
    }

    /// Remove one copy of `card` if present
    pub fn take_card(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|c| *c == card) {
            Some(idx) => {
                self.cards.remove(idx);
                true
            }
            None => false,
        }
    }

    fn take_matching<R, F>(&mut self, pred: F, rng: &mut R) -> Option<Card>
    where
        R: Rng + ?Sized,
        F: Fn(&Card) -> bool,
    {
        let matches: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| pred(c))
            .map(|(i, _)| i)
            .collect();
        if matches.is_empty() {
            return None;
        }
        let pick = matches[rng.random_range(0..matches.len())];
        Some(self.cards.remove(pick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_new_deck_is_shuffled_permutation() {
        let mut rng = Pcg32::seed_from_u64(7);
        let deck = Deck::new(false, &mut rng);
        assert_eq!(deck.len(), 52);
        let unique: HashSet<Card> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), 52);
        assert_ne!(deck.cards(), full_deck(false).as_slice());
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = Deck::new(true, &mut Pcg32::seed_from_u64(42));
        let b = Deck::new(true, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn test_draw_until_exhausted() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut deck = Deck::new(false, &mut rng);
        for _ in 0..52 {
            assert!(deck.draw().is_ok());
        }
        assert!(!deck.is_exhausted());
        assert_eq!(deck.draw(), Err(GameError::DeckExhausted));
        assert!(deck.is_exhausted());

        deck.return_card(Card::new(Rank::Two, Suit::Clubs), &mut rng);
        deck.reshuffle(&mut rng);
        assert!(!deck.is_exhausted());
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_return_card_keeps_count() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut deck = Deck::new(false, &mut rng);
        let card = deck.draw().unwrap();
        assert_eq!(deck.len(), 51);
        deck.return_card(card, &mut rng);
        assert_eq!(deck.len(), 52);
        assert!(deck.cards().contains(&card));
    }

    #[test]
    fn test_take_suit_and_rank() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut deck = Deck::from_cards(vec![
            Card::new(Rank::Two, Suit::Hearts),
            Card::new(Rank::King, Suit::Spades),
            Card::new(Rank::Ace, Suit::Hearts),
        ]);

        let spade = deck.take_suit(Suit::Spades, &mut rng).unwrap();
        assert_eq!(spade, Card::new(Rank::King, Suit::Spades));
        assert!(!deck.has_suit(Suit::Spades));
        assert_eq!(deck.take_suit(Suit::Spades, &mut rng), None);

        let ace = deck.take_rank(Rank::Ace, &mut rng).unwrap();
        assert_eq!(ace.suit, Suit::Hearts);
        assert_eq!(deck.len(), 1);
        assert!(deck.has_rank(Rank::Two));
        assert_eq!(deck.take_rank(Rank::Queen, &mut rng), None);
    }
}
