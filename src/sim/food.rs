//! Card tokens on the board
//!
//! Every food item carries a card drawn from the deck. Expired food hands its
//! card back to the deck; collected food does not.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::deck::Deck;
use super::grid::{Grid, Position};
use crate::consts::{FOOD_EXPIRY_WARNING_MS, MAX_PLACEMENT_ATTEMPTS};
use crate::error::Result;
use crate::settings::GameConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub position: Position,
    pub created_at_ms: u64,
    pub card: Card,
}

impl FoodItem {
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }
}

/// Spawn and expiry rules for food
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FoodRules {
    pub max_items: usize,
    pub min_interval_ms: u64,
    pub expiration_ms: u64,
    pub spawn_chance: f64,
}

impl From<&GameConfig> for FoodRules {
    fn from(config: &GameConfig) -> Self {
        Self {
            max_items: config.max_food_items,
            min_interval_ms: config.min_food_interval_ms,
            expiration_ms: config.food_expiration_ms,
            spawn_chance: config.food_spawn_chance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodManager {
    grid: Grid,
    rules: FoodRules,
    foods: Vec<FoodItem>,
    last_spawn_ms: u64,
}

impl FoodManager {
    pub fn new(grid: Grid, rules: FoodRules, now_ms: u64) -> Self {
        Self {
            grid,
            rules,
            foods: Vec::new(),
            last_spawn_ms: now_ms,
        }
    }

    pub fn foods(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    fn is_occupied(&self, pos: Position, snake: &[Position]) -> bool {
        snake.contains(&pos) || self.foods.iter().any(|f| f.position == pos)
    }

    /// Pick a free cell: bounded random sampling, then a scan of what is left
    fn find_free_cell<R: Rng + ?Sized>(&self, snake: &[Position], rng: &mut R) -> Option<Position> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let pos = Position::new(
                rng.random_range(0..self.grid.width),
                rng.random_range(0..self.grid.height),
            );
            if !self.is_occupied(pos, snake) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = self
            .grid
            .cells()
            .filter(|&p| !self.is_occupied(p, snake))
            .collect();
        if free.is_empty() {
            None
        } else {
            Some(free[rng.random_range(0..free.len())])
        }
    }

    /// Draw a card and place it on a free cell.
    ///
    /// Fails with `DeckExhausted` on an empty deck. Returns `Ok(None)` when
    /// the board has no free cell; the card goes back into the deck.
    pub fn generate_food<R: Rng + ?Sized>(
        &self,
        snake: &[Position],
        deck: &mut Deck,
        rng: &mut R,
        now_ms: u64,
    ) -> Result<Option<FoodItem>> {
        let card = deck.draw()?;
        match self.find_free_cell(snake, rng) {
            Some(position) => Ok(Some(FoodItem {
                position,
                created_at_ms: now_ms,
                card,
            })),
            None => {
                log::debug!("No free cell for {card}, skipping spawn");
                deck.return_card(card, rng);
                Ok(None)
            }
        }
    }

    fn spawn<R: Rng + ?Sized>(
        &mut self,
        snake: &[Position],
        deck: &mut Deck,
        rng: &mut R,
        now_ms: u64,
    ) -> Result<()> {
        if let Some(food) = self.generate_food(snake, deck, rng, now_ms)? {
            self.foods.push(food);
            self.last_spawn_ms = now_ms;
        }
        Ok(())
    }

    /// Expire old food and spawn new food.
    ///
    /// Returns the cards that expired back into the deck. Fails with
    /// `DeckExhausted` when the board is empty and nothing is left to draw.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        snake: &[Position],
        deck: &mut Deck,
        rng: &mut R,
        now_ms: u64,
    ) -> Result<Vec<Card>> {
        let expiration = self.rules.expiration_ms;
        let (expired, kept): (Vec<FoodItem>, Vec<FoodItem>) = std::mem::take(&mut self.foods)
            .into_iter()
            .partition(|f| f.age_ms(now_ms) >= expiration);
        self.foods = kept;

        let expired_cards: Vec<Card> = expired.into_iter().map(|f| f.card).collect();
        for &card in &expired_cards {
            deck.return_card(card, rng);
        }

        if self.foods.is_empty() {
            self.spawn(snake, deck, rng, now_ms)?;
            return Ok(expired_cards);
        }

        if self.foods.len() < self.rules.max_items
            && !deck.is_empty()
            && now_ms.saturating_sub(self.last_spawn_ms) > self.rules.min_interval_ms
            && rng.random_bool(self.rules.spawn_chance)
        {
            self.spawn(snake, deck, rng, now_ms)?;
        }

        Ok(expired_cards)
    }

    /// Remove the first food on `pos`. Its card is consumed, not returned.
    pub fn remove_food_at(&mut self, pos: Position) -> Option<FoodItem> {
        let idx = self.foods.iter().position(|f| f.position == pos)?;
        Some(self.foods.remove(idx))
    }

    /// Return every board card to the deck and shuffle
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, deck: &mut Deck, rng: &mut R) {
        let returned = self.foods.len();
        for food in self.foods.drain(..) {
            deck.return_card(food.card, rng);
        }
        deck.reshuffle(rng);
        log::info!("Reshuffled {returned} board card(s), deck now {}", deck.len());
    }

    /// True during the last couple of seconds before expiry
    pub fn is_expiring(&self, food: &FoodItem, now_ms: u64) -> bool {
        let time_left = self.rules.expiration_ms.saturating_sub(food.age_ms(now_ms));
        time_left < FOOD_EXPIRY_WARNING_MS
    }

    /// Place a food item directly (scripted scenarios)
    pub fn place(&mut self, food: FoodItem) {
        self.foods.push(food);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::sim::cards::{Rank, Suit};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rules() -> FoodRules {
        FoodRules {
            max_items: 5,
            min_interval_ms: 3000,
            expiration_ms: 10_000,
            spawn_chance: 0.1,
        }
    }

    fn setup(seed: u64) -> (FoodManager, Deck, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let deck = Deck::new(false, &mut rng);
        (FoodManager::new(Grid::new(10, 10), rules(), 0), deck, rng)
    }

    #[test]
    fn test_update_spawns_when_board_empty() {
        let (mut food, mut deck, mut rng) = setup(1);
        food.update(&[], &mut deck, &mut rng, 0).unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(deck.len(), 51);
    }

    #[test]
    fn test_food_avoids_snake() {
        let (mut food, mut deck, mut rng) = setup(2);
        let grid = Grid::new(10, 10);
        // Leave one free cell
        let snake: Vec<Position> = grid.cells().filter(|p| *p != Position::new(4, 4)).collect();
        food.update(&snake, &mut deck, &mut rng, 0).unwrap();
        assert_eq!(food.foods()[0].position, Position::new(4, 4));
    }

    #[test]
    fn test_full_board_skips_spawn() {
        let (mut food, mut deck, mut rng) = setup(3);
        let snake: Vec<Position> = Grid::new(10, 10).cells().collect();
        food.update(&snake, &mut deck, &mut rng, 0).unwrap();
        assert!(food.is_empty());
        assert_eq!(deck.len(), 52);
    }

    #[test]
    fn test_expired_food_returns_to_deck() {
        let (mut food, mut deck, mut rng) = setup(4);
        food.update(&[], &mut deck, &mut rng, 0).unwrap();
        let card = food.foods()[0].card;

        let expired = food.update(&[], &mut deck, &mut rng, 10_000).unwrap();
        assert_eq!(expired, vec![card]);
        // Respawned immediately since the board was empty
        assert_eq!(food.len(), 1);
        assert_eq!(deck.len() + food.len(), 52);
    }

    #[test]
    fn test_remove_food_consumes_card() {
        let (mut food, mut deck, mut rng) = setup(5);
        food.update(&[], &mut deck, &mut rng, 0).unwrap();
        let pos = food.foods()[0].position;
        let eaten = food.remove_food_at(pos).unwrap();
        assert!(food.is_empty());
        assert_eq!(deck.len(), 51);
        assert!(!deck.cards().contains(&eaten.card));
        assert!(food.remove_food_at(pos).is_none());
    }

    #[test]
    fn test_empty_deck_and_board_is_exhausted() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut deck = Deck::from_cards(Vec::new());
        let mut food = FoodManager::new(Grid::new(5, 5), rules(), 0);
        assert_eq!(
            food.update(&[], &mut deck, &mut rng, 0),
            Err(GameError::DeckExhausted)
        );
        assert!(deck.is_exhausted());
    }

    #[test]
    fn test_no_extra_spawn_from_empty_deck() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut deck = Deck::from_cards(vec![Card::new(Rank::Two, Suit::Hearts)]);
        let mut food = FoodManager::new(Grid::new(5, 5), rules(), 0);
        food.update(&[], &mut deck, &mut rng, 0).unwrap();
        for t in 0..200 {
            assert!(food.update(&[], &mut deck, &mut rng, 3001 + t).is_ok());
        }
        assert_eq!(food.len(), 1);
    }

    #[test]
    fn test_spawn_rate_is_gated() {
        let (mut food, mut deck, mut rng) = setup(8);
        food.update(&[], &mut deck, &mut rng, 0).unwrap();
        // Interval not yet elapsed
        for _ in 0..100 {
            food.update(&[], &mut deck, &mut rng, 2000).unwrap();
        }
        assert_eq!(food.len(), 1);

        // With p = 0.1 the chance of no spawn in 200 ticks is about 7e-10
        let mut spawned = false;
        for _ in 0..200 {
            food.update(&[], &mut deck, &mut rng, 3500).unwrap();
            if food.len() > 1 {
                spawned = true;
                break;
            }
        }
        assert!(spawned);
    }

    #[test]
    fn test_max_items_respected() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut deck = Deck::new(false, &mut rng);
        let rules = FoodRules {
            expiration_ms: u64::MAX,
            ..rules()
        };
        let mut food = FoodManager::new(Grid::new(10, 10), rules, 0);
        let mut now = 0;
        for _ in 0..5000 {
            now += 100;
            food.update(&[], &mut deck, &mut rng, now).unwrap();
            assert!(food.len() <= 5);
        }
        assert_eq!(food.len(), 5);
        assert_eq!(deck.len(), 47);
    }

    #[test]
    fn test_reshuffle_returns_board_cards() {
        let (mut food, mut deck, mut rng) = setup(10);
        food.update(&[], &mut deck, &mut rng, 0).unwrap();
        let _ = deck.draw();
        food.reshuffle(&mut deck, &mut rng);
        assert!(food.is_empty());
        assert_eq!(deck.len(), 51);
    }

    #[test]
    fn test_is_expiring() {
        let (mut food, mut deck, mut rng) = setup(11);
        food.update(&[], &mut deck, &mut rng, 0).unwrap();
        let item = food.foods()[0].clone();
        assert!(!food.is_expiring(&item, 7000));
        assert!(food.is_expiring(&item, 8500));
    }
}
