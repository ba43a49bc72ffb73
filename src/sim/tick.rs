//! Fixed-interval simulation tick
//!
//! One call advances the board by a single snake step. The caller owns the
//! timer; `now_ms` is the only notion of time the simulation sees.

use super::cards::Card;
use super::food::FoodItem;
use super::grid::{Direction, Position};
use super::joker::{self, JokerChoice, JokerOffer, JokerOptions, JokerOutcome};
use super::obstacle::SpawnPolicy;
use super::score::HandAnimation;
use super::snake::SegmentKind;
use super::state::{GameEvent, GameOverReason, GamePhase, GameState};
use crate::error::{GameError, Result};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Requested heading; reversals are ignored
    pub direction: Option<Direction>,
    /// Leave the waiting screen
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Steer toward the nearest card automatically
    pub autopilot: bool,
}

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if input.pause {
        state.toggle_pause(now_ms);
    }
    if input.start {
        state.start(now_ms);
    }

    // Waiting, paused, joker choice and game over all freeze the board
    if state.phase != GamePhase::Playing {
        return;
    }

    let direction = if input.autopilot {
        autopilot_direction(state).or(input.direction)
    } else {
        input.direction
    };
    if let Some(dir) = direction {
        state.snake.set_direction(dir);
    }

    state.time_ticks += 1;
    let elapsed_ms = now_ms.saturating_sub(state.last_update_ms);
    state.score.decay(elapsed_ms as f64 / 1000.0);
    state.last_update_ms = now_ms;
    state.score.prune_animations(now_ms);

    state.obstacles.update(&mut state.rng, now_ms);

    let snake_cells = state.snake.positions();
    match state
        .food
        .update(&snake_cells, &mut state.deck, &mut state.rng, now_ms)
    {
        Ok(expired) if !expired.is_empty() => {
            log::debug!("{} card(s) expired back into the deck", expired.len());
            state.events.push(GameEvent::FoodExpired { cards: expired });
        }
        Ok(_) => {}
        Err(GameError::DeckExhausted) => {
            state.end_game(GameOverReason::DeckEmpty);
            return;
        }
        Err(e) => log::warn!("Food update failed: {e}"),
    }

    let outcome = state.snake.advance(&mut state.rng);
    if outcome.collided {
        state.end_game(GameOverReason::Collision);
        return;
    }

    if outcome.segments_cut > 0 {
        let reward =
            (outcome.segments_cut as f64 * state.config.ram_reward_multiplier).floor() as u64;
        state.score.add_points(reward);
        log::debug!("Ram cut {} segment(s) for {reward}", outcome.segments_cut);
        state.events.push(GameEvent::RamCut {
            segments: outcome.segments_cut,
            reward,
        });
    }

    if let Some(obstacle) = state.obstacles.check_collision(outcome.new_head) {
        let multiplier_exponent = state.score.catch_obstacle();
        state.snake.set_head_kind(SegmentKind::Ram);
        log::debug!("Caught {:?}, exponent now {multiplier_exponent}", obstacle.kind);
        state.events.push(GameEvent::ObstacleCaught {
            kind: obstacle.kind,
            multiplier_exponent,
        });
    }

    if let Some(food) = state.food.remove_food_at(outcome.new_head) {
        eat_food(state, food, now_ms);
    }

    if state.phase == GamePhase::Playing && state.deck.is_empty() && state.food.is_empty() {
        state.end_game(GameOverReason::DeckEmpty);
    }
}

fn eat_food(state: &mut GameState, food: FoodItem, now_ms: u64) {
    let points = state.score.award_pickup(state.snake.len());
    state.events.push(GameEvent::FoodEaten {
        card: food.card,
        position: food.position,
        points,
    });

    // A pickup spends the ram charge
    if state.snake.head_kind() == SegmentKind::Ram {
        state.snake.set_head_kind(SegmentKind::Head);
    }
    let kind = if state.interval_ms <= state.config.min_speed_ms {
        SegmentKind::Speedy
    } else {
        SegmentKind::Normal
    };
    state.snake.grow(kind);

    let next_interval = state
        .interval_ms
        .saturating_sub(state.config.speed_decrease_ms)
        .max(state.config.min_speed_ms);
    if next_interval != state.interval_ms {
        state.interval_ms = next_interval;
        state.events.push(GameEvent::SpeedChanged {
            interval_ms: next_interval,
        });
    }

    if food.card.is_joker() {
        offer_joker(state, food.card, food.position, now_ms);
    } else {
        collect_card(state, food.card, food.position, now_ms);
    }
}

fn offer_joker(state: &mut GameState, joker_card: Card, position: Position, now_ms: u64) {
    state.score.discard(joker_card);
    let offer = JokerOffer {
        position,
        last_card: state.last_card,
        options: JokerOptions::compute(state.last_card, &state.deck),
    };
    log::debug!("Joker offered: {:?}", offer.options.available());
    state.pending_joker = Some(offer.clone());
    state.phase = GamePhase::AwaitingJoker;
    state.suspend(now_ms);
    state.events.push(GameEvent::JokerOffered(offer));
}

/// Put a card into the hand, scoring it when it completes five
fn collect_card(state: &mut GameState, card: Card, position: Position, now_ms: u64) {
    state.last_card = Some(card);
    match state.score.push_card(card) {
        Ok(Some(record)) => {
            log::info!(
                "{:?} for {} ({:.2}x)",
                record.hand_type,
                record.final_score,
                record.multiplier
            );
            state.score.add_animation(HandAnimation {
                hand_type: record.hand_type,
                score: record.final_score,
                position,
                start_ms: now_ms,
            });
            if state.obstacles.policy() == SpawnPolicy::PerHand {
                state.obstacles.spawn(&mut state.rng);
            }
            state.events.push(GameEvent::HandScored(record));
            if state.score.hands_reached() {
                state.end_game(GameOverReason::Hands);
            }
        }
        Ok(None) => {}
        Err(e) => {
            log::warn!("Dropping {card}: {e}");
            state.score.discard(card);
        }
    }
}

/// Apply the player's joker choice and resume play.
///
/// On error the offer stays pending and nothing changes.
pub fn resolve_joker(
    state: &mut GameState,
    choice: JokerChoice,
    now_ms: u64,
) -> Result<JokerOutcome> {
    if state.phase != GamePhase::AwaitingJoker {
        return Err(GameError::NoJokerPending);
    }
    let offer = state
        .pending_joker
        .clone()
        .ok_or(GameError::NoJokerPending)?;
    let outcome = joker::apply(
        choice,
        &offer,
        &mut state.deck,
        &mut state.food,
        &mut state.rng,
    )?;

    state.pending_joker = None;
    state.phase = GamePhase::Playing;
    state.resume(now_ms);
    state.events.push(GameEvent::JokerResolved { choice });
    log::debug!("Joker resolved with {}", choice.as_str());

    if let JokerOutcome::Card(card) = outcome {
        collect_card(state, card, offer.position, now_ms);
    }
    Ok(outcome)
}

/// Greedy heading toward the nearest card that does not bite the body
pub fn autopilot_direction(state: &GameState) -> Option<Direction> {
    let grid = state.grid;
    let head = state.snake.head();
    let current = state.snake.direction();
    let body = state.snake.positions();
    // The tail cell frees up as the snake moves
    let blocking = &body[..body.len().saturating_sub(1)];

    let target = state
        .food
        .foods()
        .iter()
        .map(|f| f.position)
        .min_by_key(|&p| grid.distance(head, p));

    let safe = [
        current,
        Direction::UP,
        Direction::RIGHT,
        Direction::DOWN,
        Direction::LEFT,
    ]
    .into_iter()
    .filter(|d| !d.is_reverse_of(current))
    .filter(|&d| !blocking.contains(&grid.step(head, d)));

    match target {
        Some(target) => safe.min_by_key(|&d| grid.distance(grid.step(head, d), target)),
        None => safe.into_iter().next(),
    }
}
