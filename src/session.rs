//! Game session: the timer-driven shell around the simulation
//!
//! `Session` owns the clock, the tick timer and the collaborator ports. Hosts
//! call `poll` from their loop; a tick runs whenever the timer is due.

use crate::achievements::{AchievementSink, BIRD_CATCH_ID, hand_achievement_id};
use crate::error::Result;
use crate::highscores::HighScoreStore;
use crate::platform::Clock;
use crate::settings::GameConfig;
use crate::sim::{
    GameEvent, GamePhase, GameState, JokerChoice, JokerOffer, JokerOutcome,
    Snapshot, TickInput, Turn, resolve_joker, tick,
};

/// Single-shot repeating timer, re-armed after every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickTimer {
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl TickTimer {
    pub fn start(&mut self, now_ms: u64, interval_ms: u64) {
        self.interval_ms = interval_ms;
        self.next_due_ms = Some(now_ms.saturating_add(interval_ms));
    }

    /// Safe to call on a stopped timer
    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    /// Schedule the next tick, possibly at a new interval
    pub fn rearm(&mut self, now_ms: u64, interval_ms: u64) {
        self.start(now_ms, interval_ms);
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.next_due_ms.is_some_and(|due| now_ms >= due)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

pub struct Session<C: Clock, H: HighScoreStore, A: AchievementSink> {
    clock: C,
    high_scores: H,
    achievements: A,
    state: GameState,
    timer: TickTimer,
    input: TickInput,
}

impl<C: Clock, H: HighScoreStore, A: AchievementSink> Session<C, H, A> {
    pub fn new(
        config: GameConfig,
        seed: u64,
        clock: C,
        high_scores: H,
        achievements: A,
    ) -> Result<Self> {
        let state = GameState::new(config, seed, high_scores.get(), clock.now_ms())?;
        Ok(Self {
            clock,
            high_scores,
            achievements,
            state,
            timer: TickTimer::default(),
            input: TickInput::default(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn high_scores(&self) -> &H {
        &self.high_scores
    }

    pub fn achievements(&self) -> &A {
        &self.achievements
    }

    pub fn timer(&self) -> TickTimer {
        self.timer
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(self.clock.now_ms())
    }

    pub fn pending_joker(&self) -> Option<&JokerOffer> {
        self.state.pending_joker()
    }

    /// Let the built-in autopilot steer
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    pub fn start(&mut self) {
        let now = self.clock.now_ms();
        self.state.start(now);
        self.sync_timer(now);
    }

    pub fn toggle_pause(&mut self) {
        let now = self.clock.now_ms();
        self.state.toggle_pause(now);
        self.sync_timer(now);
    }

    pub fn set_direction(&mut self, dx: i32, dy: i32) -> bool {
        self.state.set_direction(dx, dy)
    }

    pub fn turn(&mut self, turn: Turn) -> bool {
        self.state.turn(turn)
    }

    /// Run a tick if one is due. Returns the events it produced.
    pub fn poll(&mut self) -> Vec<GameEvent> {
        let now = self.clock.now_ms();
        if !self.timer.is_due(now) {
            return Vec::new();
        }
        tick(&mut self.state, &self.input, now);
        let events = self.dispatch_events();
        self.sync_timer(now);
        events
    }

    /// Apply the player's joker choice and restart the timer
    pub fn resolve_joker(&mut self, choice: JokerChoice) -> Result<JokerOutcome> {
        let now = self.clock.now_ms();
        let outcome = resolve_joker(&mut self.state, choice, now)?;
        self.dispatch_events();
        self.sync_timer(now);
        Ok(outcome)
    }

    /// Host is going away (quit, window closed). Play is paused and the
    /// timer stopped; a beaten high score is saved. No game over is reported
    /// since the run did not end by its own rules.
    pub fn quit(&mut self) {
        if self.state.phase() == GamePhase::Playing {
            self.state.toggle_pause(self.clock.now_ms());
        }
        self.timer.stop();
        self.record_high_score(self.state.score().score());
    }

    /// Deal a new board; the session waits for `start` again
    pub fn reset(&mut self) -> Result<()> {
        let now = self.clock.now_ms();
        self.state.reset(now)?;
        self.state.score.raise_high_score(self.high_scores.get());
        self.timer.stop();
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..Default::default()
        };
        Ok(())
    }

    /// Only `Playing` keeps the timer alive
    fn sync_timer(&mut self, now_ms: u64) {
        if self.state.phase() == GamePhase::Playing {
            self.timer.rearm(now_ms, self.state.interval_ms());
        } else {
            self.timer.stop();
        }
    }

    fn dispatch_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::HandScored(record) => {
                    self.achievements
                        .check_achievement(hand_achievement_id(record.hand_type));
                }
                GameEvent::ObstacleCaught { .. } => {
                    self.achievements.check_achievement(BIRD_CATCH_ID);
                }
                GameEvent::GameOver { score, .. } => self.record_high_score(*score),
                _ => {}
            }
        }
        events
    }

    fn record_high_score(&mut self, score: u64) {
        if score <= self.high_scores.get() {
            return;
        }
        if let Err(err) = self.high_scores.set(score) {
            log::warn!("Failed to save high score: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementBook;
    use crate::error::GameError;
    use crate::highscores::MemoryHighScore;
    use crate::platform::ManualClock;
    use crate::sim::{Card, Position, Rank, Suit};
    use crate::sim::state::sorted_full_deck;

    type TestSession = Session<ManualClock, MemoryHighScore, AchievementBook>;

    fn session(config: GameConfig, seed: u64, high_score: u64) -> TestSession {
        Session::new(
            config,
            seed,
            ManualClock::new(0),
            MemoryHighScore::new(high_score),
            AchievementBook::new(),
        )
        .unwrap()
    }

    fn no_jokers() -> GameConfig {
        GameConfig {
            jokers_enabled: false,
            ..GameConfig::default()
        }
    }

    /// Advance one interval and poll
    fn step(s: &mut TestSession) -> Vec<GameEvent> {
        s.clock().advance(s.timer().interval_ms());
        s.poll()
    }

    fn lay_row(s: &mut TestSession, cards: &[Card]) {
        let state = &mut s.state;
        state.food.reshuffle(&mut state.deck, &mut state.rng);
        let head = state.snake().head();
        for (i, &card) in cards.iter().enumerate() {
            let pos = state.grid().wrap(Position::new(head.x + 1 + i as i32, head.y));
            state.place_food(pos, card, 0);
        }
    }

    #[test]
    fn test_timer() {
        let mut timer = TickTimer::default();
        assert!(!timer.is_due(1_000_000));
        timer.start(100, 150);
        assert!(!timer.is_due(249));
        assert!(timer.is_due(250));
        timer.stop();
        timer.stop();
        assert!(!timer.is_running());
        assert!(!timer.is_due(10_000));
        timer.rearm(300, 148);
        assert_eq!(timer.interval_ms(), 148);
        assert!(timer.is_due(448));
    }

    #[test]
    fn test_poll_waits_for_timer() {
        let mut s = session(no_jokers(), 1, 0);
        assert!(s.poll().is_empty());
        s.start();
        assert!(s.timer().is_running());
        let head = s.state().snake().head();

        s.clock().advance(100);
        s.poll();
        assert_eq!(s.state().snake().head(), head);

        s.clock().advance(50);
        s.poll();
        assert_ne!(s.state().snake().head(), head);
        assert_eq!(s.state().time_ticks, 1);
    }

    #[test]
    fn test_pause_stops_timer() {
        let mut s = session(no_jokers(), 2, 0);
        s.start();
        s.toggle_pause();
        assert!(!s.timer().is_running());
        s.clock().advance(10_000);
        assert!(s.poll().is_empty());
        s.toggle_pause();
        assert!(s.timer().is_running());
    }

    #[test]
    fn test_speed_up_rearms_with_shorter_interval() {
        let mut s = session(no_jokers(), 3, 0);
        s.start();
        lay_row(&mut s, &[Card::new(Rank::Four, Suit::Clubs)]);
        step(&mut s);
        assert_eq!(s.timer().interval_ms(), 148);
    }

    #[test]
    fn test_joker_stops_and_restarts_timer() {
        let mut s = session(GameConfig::default(), 4, 0);
        s.start();
        lay_row(&mut s, &[Card::joker()]);
        let events = step(&mut s);
        assert!(events.iter().any(|e| matches!(e, GameEvent::JokerOffered(_))));
        assert!(!s.timer().is_running());
        assert!(s.pending_joker().is_some());

        s.clock().advance(5000);
        assert!(s.poll().is_empty());

        assert!(matches!(
            s.resolve_joker(JokerChoice::SameSuit),
            Err(GameError::JokerOptionUnavailable(_))
        ));
        assert!(!s.timer().is_running());

        s.resolve_joker(JokerChoice::Reshuffle).unwrap();
        assert!(s.timer().is_running());
        assert_eq!(s.timer().interval_ms(), s.state().interval_ms());
    }

    #[test]
    fn test_hand_reports_achievement_and_high_score() {
        let config = GameConfig {
            max_hands: 1,
            ..no_jokers()
        };
        let mut s = session(config, 5, 10);
        s.start();
        lay_row(
            &mut s,
            &[
                Card::new(Rank::King, Suit::Spades),
                Card::new(Rank::King, Suit::Hearts),
                Card::new(Rank::Nine, Suit::Diamonds),
                Card::new(Rank::Nine, Suit::Clubs),
                Card::new(Rank::Two, Suit::Spades),
            ],
        );
        for _ in 0..5 {
            step(&mut s);
        }

        assert!(s.state().is_game_over());
        assert!(!s.timer().is_running());
        assert!(s.achievements().is_unlocked("two_pair"));
        assert_eq!(s.high_scores().get(), s.state().score().score());
        assert!(s.high_scores().get() > 10);
    }

    #[test]
    fn test_quit_keeps_higher_stored_score() {
        let mut s = session(no_jokers(), 6, 1_000_000);
        s.start();
        s.state.score.add_points(50);
        s.quit();
        assert_eq!(s.high_scores().get(), 1_000_000);
        assert!(!s.timer().is_running());
        assert_eq!(s.state().phase(), GamePhase::Paused);
        s.clock().advance(10_000);
        assert!(s.poll().is_empty());
    }

    #[test]
    fn test_quit_saves_beaten_score_without_game_over() {
        let mut s = session(no_jokers(), 6, 10);
        s.start();
        s.state.score.add_points(500);
        s.quit();
        assert_eq!(s.high_scores().get(), 500);
        assert_eq!(s.state().game_over_reason(), None);
        assert!(
            !s.state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );
    }

    #[test]
    fn test_obstacle_catch_reports_bird_achievement() {
        let mut s = session(no_jokers(), 7, 0);
        s.start();
        let grid = s.state().grid();
        let body = [Position::new(29, 5), Position::new(28, 5), Position::new(27, 5)];
        s.state.set_snake(crate::sim::Snake::from_positions(
            grid,
            &body,
            crate::sim::Direction::RIGHT,
        )
        .unwrap());
        s.state.obstacles.spawn_in_row(5);
        step(&mut s);
        assert!(s.achievements().is_unlocked(BIRD_CATCH_ID));
    }

    #[test]
    fn test_reset_picks_up_stored_high_score() {
        let mut s = session(no_jokers(), 8, 0);
        s.start();
        s.high_scores.set(777).unwrap();
        s.reset().unwrap();
        assert_eq!(s.state().phase(), GamePhase::Waiting);
        assert_eq!(s.state().score().high_score(), 777);
        assert!(!s.timer().is_running());
    }

    #[test]
    fn test_autopilot_runs_to_game_over() {
        let config = GameConfig {
            grid_width: 12,
            grid_height: 10,
            ..GameConfig::default()
        };
        let mut s = session(config, 9, 0);
        s.set_autopilot(true);
        s.start();
        for _ in 0..20_000 {
            if s.state().is_game_over() {
                break;
            }
            if let Some(offer) = s.pending_joker() {
                let choice = offer.options.available()[0];
                s.resolve_joker(choice).unwrap();
            }
            step(&mut s);
        }
        let snap = s.snapshot();
        assert_eq!(snap.is_game_over, s.state().is_game_over());
        assert_eq!(s.state().owned_cards(), sorted_full_deck(true));
    }
}
