//! Poker Serpent entry point
//!
//! Headless native run: the autopilot plays one game on a manual clock and
//! the result is printed. Usage: `poker-serpent [seed] [config.json]`.

use std::path::Path;

use poker_serpent::achievements::AchievementBook;
use poker_serpent::platform::{Clock, ManualClock, SystemClock};
use poker_serpent::sim::{GameEvent, JokerChoice};
use poker_serpent::{GameConfig, HighScoreStore, JsonFileHighScore, Session};

/// Hard stop in case the autopilot circles forever
const MAX_STEPS: u32 = 100_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| SystemClock.now_ms());
    let config = match args.next() {
        Some(path) => GameConfig::load_or_default(Path::new(&path)),
        None => GameConfig::default(),
    };
    log::info!(
        "Poker Serpent (headless) starting: seed {seed}, difficulty {}",
        config.difficulty.as_str()
    );

    let high_scores =
        JsonFileHighScore::open(std::env::temp_dir().join("poker-serpent-highscore.json"));
    let mut session = match Session::new(
        config,
        seed,
        ManualClock::new(0),
        high_scores,
        AchievementBook::new(),
    ) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Cannot start: {err}");
            std::process::exit(1);
        }
    };

    session.set_autopilot(true);
    session.start();

    let mut steps = 0;
    while !session.state().is_game_over() && steps < MAX_STEPS {
        if let Some(offer) = session.pending_joker() {
            // Prefer a card over a reshuffle
            let choice = offer
                .options
                .available()
                .first()
                .copied()
                .unwrap_or(JokerChoice::Reshuffle);
            if let Err(err) = session.resolve_joker(choice) {
                log::warn!("Joker choice rejected: {err}");
            }
        }

        let interval = session.timer().interval_ms();
        session.clock().advance(interval);
        for event in session.poll() {
            if let GameEvent::HandScored(hand) = event {
                println!(
                    "{:<16} {:>6} x{:.2} -> {}",
                    format!("{:?}", hand.hand_type),
                    hand.base_score,
                    hand.multiplier,
                    hand.final_score
                );
            }
        }
        steps += 1;
    }

    let state = session.state();
    let reason = state
        .game_over_reason()
        .map(|r| r.as_str())
        .unwrap_or("step limit");
    println!("\nGame over: {reason}");
    println!("Score:      {}", state.score().score());
    println!("Hands:      {}", state.score().hands_played());
    if let Some(best) = state.score().best_hand() {
        println!("Best hand:  {:?} ({})", best.hand_type, best.final_score);
    }
    println!("High score: {}", session.high_scores().get());
    for achievement in session.achievements().unlocked() {
        println!("Unlocked:   {}", achievement.title);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Session` from their own frame loop
}
