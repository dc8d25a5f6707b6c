//! Clamber entry point
//!
//! Runs a headless demo: a scripted pilot climbs the platform field at
//! the fixed tick rate until the scroll catches it, then the best score
//! is persisted. A real frontend would drive `tick` the same way with
//! resolved player input.
//!
//! Usage: `clamber [seed] [max-ticks]`

use std::time::{SystemTime, UNIX_EPOCH};

use clamber::consts::*;
use clamber::highscores::{HIGH_SCORE_FILE, HighScore};
use clamber::sim::{GameState, TickInput, tick};

/// Default demo length, in ticks
const RUN_BUDGET: u64 = 5 * 60 * TICK_HZ as u64;

/// Steer toward the next platform up, hop whenever the budget allows,
/// and spend accrued score on cards
fn pilot(state: &GameState, input: &mut TickInput) {
    if let Some(platform) = state.field.nearest_above(state.player.rect.top()) {
        let dx = platform.rect.center_x() - state.player.rect.center_x();
        input.move_left = dx < -PLAYER_SPEED;
        input.move_right = dx > PLAYER_SPEED;
    }
    let overlay = state.cards.overlay_open;
    input.jump = !overlay && state.player.jumps > 0 && state.player.vel.y >= 0.0;

    // Every card is affordable at 50; step past rejected boosts
    input.toggle_overlay = !overlay && state.score >= 50;
    input.activate = overlay;
    input.select_next = overlay
        && state
            .cards
            .hand
            .get(state.cards.selected)
            .map(|card| card.invalid_flash > 0)
            .unwrap_or(false);
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    let budget = args.next().and_then(|s| s.parse().ok()).unwrap_or(RUN_BUDGET);
    log::info!("clamber starting with seed {}", seed);

    let mut best = HighScore::load(HIGH_SCORE_FILE);
    let mut state = GameState::new(seed);
    state.high_score = best.best;

    let mut input = TickInput::default();
    for i in 0..budget {
        pilot(&state, &mut input);
        tick(&mut state, &input, i * 1000 / TICK_HZ as u64);
        if state.game_over {
            break;
        }
    }

    if best.update(state.final_score) {
        best.save(HIGH_SCORE_FILE);
    }
    println!(
        "final score: {} (best {})",
        state.final_score, best.best
    );
}
