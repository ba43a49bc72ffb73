//! Achievements
//!
//! The game reports ids and forgets about them. What a host does with an id
//! (toast, save, ignore) is up to the `AchievementSink` it plugs in.

use serde::Serialize;

use crate::sim::HandType;

pub const BIRD_CATCH_ID: &str = "bird_catch";
pub const COMPLETION_ID: &str = "completion";

/// Fire-and-forget achievement reporting
pub trait AchievementSink {
    fn check_achievement(&mut self, id: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const fn info(id: &'static str, title: &'static str, description: &'static str) -> AchievementInfo {
    AchievementInfo {
        id,
        title,
        description,
    }
}

/// Every achievement except completion
pub static REGULAR: [AchievementInfo; 11] = [
    info("high_card", "High Card", "Better than nothing"),
    info("pair", "Pair", "Score your first Pair"),
    info("two_pair", "Two Pair", "Score your first Two Pair"),
    info("three_of_a_kind", "Three of a Kind", "Score your first Three of a Kind"),
    info("straight", "Straight", "Score your first Straight"),
    info("flush", "Flush", "Score your first Flush"),
    info("full_house", "Full House", "Score your first Full House"),
    info("four_of_a_kind", "Four of a Kind", "Score your first Four of a Kind"),
    info("straight_flush", "Straight Flush", "Score your first Straight Flush"),
    info("royal_flush", "Royal Flush", "Score your first Royal Flush"),
    info(BIRD_CATCH_ID, "Bird Catcher", "Catch your first bird"),
];

pub static COMPLETION: AchievementInfo =
    info(COMPLETION_ID, "Poker Serpent Master", "Unlock all achievements");

/// Look up a known achievement by id
pub fn find(id: &str) -> Option<&'static AchievementInfo> {
    REGULAR
        .iter()
        .chain(std::iter::once(&COMPLETION))
        .find(|a| a.id == id)
}

/// Id reported when a hand of this type is scored
pub fn hand_achievement_id(hand_type: HandType) -> &'static str {
    hand_type.id()
}

/// In-memory tracker. Each id unlocks once; completion follows the rest.
#[derive(Debug, Clone, Default)]
pub struct AchievementBook {
    /// Unlock order
    unlocked: Vec<&'static AchievementInfo>,
    newly_unlocked: Vec<&'static AchievementInfo>,
}

impl AchievementBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|a| a.id == id)
    }

    pub fn unlocked(&self) -> &[&'static AchievementInfo] {
        &self.unlocked
    }

    /// Unlocks since the last call
    pub fn take_newly_unlocked(&mut self) -> Vec<&'static AchievementInfo> {
        std::mem::take(&mut self.newly_unlocked)
    }

    pub fn clear(&mut self) {
        self.unlocked.clear();
        self.newly_unlocked.clear();
    }

    fn unlock(&mut self, achievement: &'static AchievementInfo) -> bool {
        if self.is_unlocked(achievement.id) {
            return false;
        }
        log::info!("Achievement unlocked: {}", achievement.title);
        self.unlocked.push(achievement);
        self.newly_unlocked.push(achievement);
        true
    }
}

impl AchievementSink for AchievementBook {
    fn check_achievement(&mut self, id: &str) {
        // Completion is earned, never reported directly
        let Some(achievement) = REGULAR.iter().find(|a| a.id == id) else {
            log::debug!("Ignoring unknown achievement id {id:?}");
            return;
        };
        if self.unlock(achievement) && REGULAR.iter().all(|a| self.is_unlocked(a.id)) {
            self.unlock(&COMPLETION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_hand_type_has_an_achievement() {
        for hand_type in HandType::ALL {
            assert!(find(hand_achievement_id(hand_type)).is_some(), "{hand_type:?}");
        }
        assert!(find(BIRD_CATCH_ID).is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_unlocks_once() {
        let mut book = AchievementBook::new();
        book.check_achievement("pair");
        book.check_achievement("pair");
        assert!(book.is_unlocked("pair"));
        assert_eq!(book.unlocked().len(), 1);
        assert_eq!(book.take_newly_unlocked().len(), 1);
        assert!(book.take_newly_unlocked().is_empty());
    }

    #[test]
    fn test_unknown_and_completion_ids_ignored() {
        let mut book = AchievementBook::new();
        book.check_achievement("made_up");
        book.check_achievement(COMPLETION_ID);
        assert!(book.unlocked().is_empty());
    }

    #[test]
    fn test_completion_after_all_regular() {
        let mut book = AchievementBook::new();
        for a in &REGULAR[..REGULAR.len() - 1] {
            book.check_achievement(a.id);
        }
        assert!(!book.is_unlocked(COMPLETION_ID));
        book.check_achievement(BIRD_CATCH_ID);
        assert!(book.is_unlocked(COMPLETION_ID));
        assert_eq!(book.unlocked().len(), REGULAR.len() + 1);
        assert_eq!(book.unlocked().last().map(|a| a.id), Some(COMPLETION_ID));
    }

    #[test]
    fn test_clear() {
        let mut book = AchievementBook::new();
        book.check_achievement(BIRD_CATCH_ID);
        book.clear();
        assert!(!book.is_unlocked(BIRD_CATCH_ID));
    }
}
