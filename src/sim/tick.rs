//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. Ability
//! triggers land before physics integration, so a teleport or bomb takes
//! effect before gravity is applied in the same tick.

use super::abilities;
use super::camera::ScrollMode;
use super::collision::{Contact, classify};
use super::state::GameState;
use crate::consts::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move left (held)
    pub move_left: bool,
    /// Move right (held)
    pub move_right: bool,
    /// Jump
    pub jump: bool,
    /// Open or close the ability overlay
    pub toggle_overlay: bool,
    /// Move the card selection left
    pub select_prev: bool,
    /// Move the card selection right
    pub select_next: bool,
    /// Trigger the selected card (overlay only)
    pub activate: bool,
    /// Return the hand to the deck and redraw (overlay only)
    pub reshuffle: bool,
    /// Start a fresh run (game over only)
    pub restart: bool,
}

/// Advance the game by one tick
///
/// `now_ms` is a monotonic millisecond clock; buff deadlines compare
/// against it, so buffs keep expiring on the wall clock even while the
/// overlay freeze holds the world still.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) {
    if state.game_over {
        if input.restart {
            state.restart();
            log::info!("run restarted");
        }
        return;
    }
    state.tick_count += 1;

    // Overlay and card intents
    if input.toggle_overlay {
        toggle_overlay(state);
    }
    if input.select_prev {
        state.cards.select_prev();
    }
    if input.select_next {
        state.cards.select_next();
    }
    if state.cards.overlay_open && input.activate {
        abilities::trigger_selected(state, now_ms);
    }
    if state.cards.overlay_open && input.reshuffle {
        abilities::reshuffle_hand(state);
    }

    // Movement and jumping
    if input.jump && state.player.jumps > 0 {
        jump(state);
    }
    apply_movement(state, input);

    // Integrate the player
    let ts = state.time_scale;
    let zero_g = state.buffs.zero_gravity.active;
    let player = &mut state.player;
    if !player.grounded && !zero_g && player.vel.y < TERMINAL_FALL_SPEED {
        player.vel.y += player.gravity * ts;
    }
    player.rect.pos += player.vel * ts;

    // Weather follows the world
    let scroll = state.camera.scroll(ts);
    state.particles.refill_rain(&mut state.rng);
    state.particles.advance_rain(scroll, ts);
    state
        .particles
        .advance_splashes(scroll, state.player.gravity, ts);
    state.particles.advance_smoke();

    // World scroll, platform recycling, scoring
    state.player.rect.pos.y += scroll;
    let recycled = state.field.advance(&mut state.rng, scroll);
    award_recycled(state, recycled);

    splash_surfaces(state);
    resolve_platform_contacts(state);

    state.camera.update(ts, state.player.gravity);
    expire_buffs(state, now_ms);
    check_floor(state);
    state.particles.advance_bursts(ts);

    if state.cards.overlay_open {
        state.cards.update();
    }
}

/// Flip the overlay; opening freezes the world and deals the cards back
/// into their slots
fn toggle_overlay(state: &mut GameState) {
    state.cards.overlay_open = !state.cards.overlay_open;
    if state.cards.overlay_open {
        state.cards.reposition();
        state.time_scale = 0.0;
    } else {
        state.time_scale = 1.0;
    }
}

/// Horizontal intent maps straight to horizontal velocity
fn apply_movement(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    if input.move_left {
        player.vel.x = -player.speed;
    } else if input.move_right {
        player.vel.x = player.speed;
    } else {
        player.vel.x = 0.0;
    }

    let fresh_press = (input.move_left && !player.holding_left)
        || (input.move_right && !player.holding_right);
    player.holding_left = input.move_left;
    player.holding_right = input.move_right;

    // A fresh press near the top of an arc kicks up dust
    if fresh_press && (0.0..=1.0).contains(&player.vel.y) {
        let rect = player.rect;
        state.particles.spawn_smoke(&mut state.rng, &rect, 2, 0.0, 20.0);
    }
}

fn jump(state: &mut GameState) {
    state.camera.kick();
    if (0.0..=1.0).contains(&state.player.vel.y) {
        let rect = state.player.rect;
        state.particles.spawn_smoke(&mut state.rng, &rect, 5, -20.0, 0.0);
    }
    let player = &mut state.player;
    player.grounded = false;
    player.vel.y = -state.buffs.jump_force();
    if !state.buffs.unlimited_jumps.active {
        player.jumps -= 1;
    }
}

/// Recycled platforms feed both scores; an armed bomb suppresses the
/// spendable one
fn award_recycled(state: &mut GameState, recycled: u32) {
    if recycled == 0 {
        return;
    }
    let points = recycled * state.buffs.platform_points();
    state.final_score += points;
    if !state.bomb_armed {
        state.score += points;
    }
}

/// Rain splashes off platforms and the player
fn splash_surfaces(state: &mut GameState) {
    for i in 0..state.field.platforms.len() {
        let rect = state.field.platforms[i].rect;
        state.particles.splash_on(&mut state.rng, &rect);
    }
    let player = state.player.rect;
    state.particles.splash_on(&mut state.rng, &player);
}

/// Resolve every platform overlapping the player this tick
///
/// While the bomb is armed, ascending contact shatters the platform and
/// the first descending contact disarms the bomb and resets the scroll.
/// Otherwise each overlap resolves by its classification.
fn resolve_platform_contacts(state: &mut GameState) {
    let overlapping: Vec<usize> = state
        .field
        .platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| p.rect.overlaps(&state.player.rect))
        .map(|(i, _)| i)
        .collect();

    if overlapping.is_empty() {
        state.player.grounded = false;
        return;
    }

    for i in overlapping {
        let platform = state.field.platforms[i].rect;
        if state.bomb_armed {
            if state.player.vel.y < 0.0 {
                state.field.platforms[i].consumed = true;
                let gravity = state.player.gravity;
                state.particles.shatter(&mut state.rng, platform.pos, gravity);
            } else {
                state.camera.reset_to_initial();
                state.bomb_armed = false;
                log::debug!("bomb disarmed by descending contact");
            }
            continue;
        }

        let zero_g = state.buffs.zero_gravity.active;
        let max_jumps = state.buffs.max_jumps();
        let player = &mut state.player;
        match classify(&player.rect, &platform) {
            Some(Contact::Landing) => {
                player.jumps = max_jumps;
                if player.reviving {
                    player.reviving = false;
                    player.gravity = GRAVITY;
                }
                player.grounded = true;
                player.vel.y = 0.0;
                player.rect.set_bottom(platform.top());
            }
            Some(Contact::HeadBump) => {
                player.rect.set_top(platform.bottom());
                if !zero_g {
                    player.vel.y = 0.5;
                }
            }
            Some(Contact::WallOnLeft) => {
                player.rect.set_left(platform.right());
                player.grounded = false;
            }
            Some(Contact::WallOnRight) => {
                player.rect.set_right(platform.left());
                player.grounded = false;
            }
            None => {}
        }
    }
    state.field.sweep_consumed();
}

/// Tick every buff deadline and undo effects that revert on expiry
fn expire_buffs(state: &mut GameState, now_ms: u64) {
    if state.buffs.unlimited_jumps.expired(now_ms) {
        log::debug!("unlimited jumps expired");
    }
    if state.buffs.triple_jump.expired(now_ms) {
        log::debug!("triple jump expired");
    }
    if state.buffs.jump_boost.expired(now_ms) {
        log::debug!("jump boost expired");
    }
    if state.buffs.extra_points.expired(now_ms) {
        log::debug!("extra points expired");
    }
    if state.buffs.speed_boost.expired(now_ms) {
        state.player.speed /= BOOST_FACTOR;
        log::debug!("speed boost expired");
    }
    if state.buffs.extra_life.expired(now_ms) {
        state.buffs.extra_lives = 0;
        log::debug!("extra life window closed");
    }
    if state.buffs.zero_gravity.expired(now_ms) {
        if state.camera.mode == ScrollMode::Locked {
            state.camera.reset_to_initial();
        }
        log::debug!("zero gravity expired");
    } else if state.buffs.zero_gravity.active && state.camera.mode == ScrollMode::Locked {
        state.camera.lock(state.player.vel.y);
    }
}

/// Death and revival at the viewport bottom
///
/// Falling fully below the view kills, unless the bomb launch is still
/// ascending. An extra life turns death into a revive at the top.
fn check_floor(state: &mut GameState) {
    if state.player.rect.top() < VIEW_H {
        return;
    }
    if state.bomb_armed && state.player.vel.y <= 0.0 {
        return;
    }
    if state.buffs.extra_lives > 0 {
        revive(state);
    } else {
        die(state);
    }
    state.camera.stop();
}

fn revive(state: &mut GameState) {
    let player = &mut state.player;
    player.vel.y = 0.0;
    player.rect.set_bottom(0.0);
    player.gravity = REVIVE_GRAVITY;
    player.reviving = true;
    log::info!("revived, {} extra lives held", state.buffs.extra_lives);
}

fn die(state: &mut GameState) {
    state.bomb_armed = false;
    state.game_over = true;
    state.cards.overlay_open = false;
    state.time_scale = 0.0;
    state.player.alive = false;
    if state.final_score > state.high_score {
        state.high_score = state.final_score;
    }
    log::info!("game over at {} platforms", state.final_score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::abilities::{AbilityCard, AbilityKind, slot_position};
    use crate::sim::particles::SHATTER_COLOR;
    use crate::sim::platforms::Platform;
    use crate::sim::rect::Rect;
    use proptest::prelude::*;

    /// Run `n` default ticks at one tick per clock step
    fn run(state: &mut GameState, n: u64) {
        let input = TickInput::default();
        for _ in 0..n {
            let now_ms = state.tick_count * 1000 / TICK_HZ as u64;
            tick(state, &input, now_ms);
        }
    }

    fn land(state: &mut GameState) {
        for _ in 0..120 {
            run(state, 1);
            if state.player.grounded {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn test_initial_fall_lands_on_seed_platform() {
        let mut state = GameState::new(12345);
        let platform_top = state.field.platforms[0].rect.top();
        land(&mut state);
        assert_eq!(state.player.rect.bottom(), platform_top);
        assert_eq!(state.player.jumps, BASE_JUMPS);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_jump_spends_budget_and_starts_scroll() {
        let mut state = GameState::new(12345);
        land(&mut state);
        assert_eq!(state.camera.mode, ScrollMode::Idle);

        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0);
        assert_eq!(state.player.jumps, BASE_JUMPS - 1);
        assert!(state.player.vel.y < 0.0);
        assert!(!state.player.grounded);
        assert_eq!(state.camera.mode, ScrollMode::Accelerating);
        assert!(state.camera.speed >= SCROLL_INITIAL);
    }

    #[test]
    fn test_jump_budget_never_underflows() {
        let mut state = GameState::new(12345);
        land(&mut state);
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        // Far more jump presses than budget
        for _ in 0..10 {
            tick(&mut state, &input, 0);
        }
        assert_eq!(state.player.jumps, 0);
    }

    #[test]
    fn test_overlay_freezes_the_world() {
        let mut state = GameState::new(12345);
        land(&mut state);
        let toggle = TickInput {
            toggle_overlay: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, 0);
        assert!(state.cards.overlay_open);
        assert_eq!(state.time_scale, 0.0);

        let pos = state.player.rect.pos;
        run(&mut state, 30);
        assert_eq!(state.player.rect.pos, pos);

        tick(&mut state, &toggle, 0);
        assert!(!state.cards.overlay_open);
        assert_eq!(state.time_scale, 1.0);
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let mut state = GameState::new(12345);
        let prev = TickInput {
            select_prev: true,
            ..Default::default()
        };
        let next = TickInput {
            select_next: true,
            ..Default::default()
        };
        assert_eq!(state.cards.selected, 0);
        tick(&mut state, &prev, 0);
        assert_eq!(state.cards.selected, HAND_SIZE - 1);
        tick(&mut state, &next, 0);
        assert_eq!(state.cards.selected, 0);
    }

    #[test]
    fn test_trigger_scenario_bomb_then_reset() {
        let mut state = GameState::new(12345);
        state.score = 30;
        state.cards.hand[0] = AbilityCard::new(AbilityKind::Bomb, slot_position(0));
        state.cards.hand[1] = AbilityCard::new(AbilityKind::ResetCamera, slot_position(1));

        let open = TickInput {
            toggle_overlay: true,
            ..Default::default()
        };
        let activate = TickInput {
            activate: true,
            ..Default::default()
        };

        // Bomb costs 50: rejected, nothing deducted
        tick(&mut state, &open, 0);
        tick(&mut state, &activate, 0);
        assert_eq!(state.score, 30);
        assert!(!state.bomb_armed);
        assert!(state.cards.hand[0].invalid_flash > 0);
        assert!(state.cards.overlay_open);

        // Reset-camera costs 15: accepted, scroll back to initial
        state.camera.kick();
        state.camera.speed = SCROLL_MAX;
        let next = TickInput {
            select_next: true,
            ..Default::default()
        };
        tick(&mut state, &next, 0);
        tick(&mut state, &activate, 0);
        assert_eq!(state.score, 15);
        assert_eq!(state.camera.mode, ScrollMode::Accelerating);
        assert!(state.camera.speed < SCROLL_INITIAL + 0.01);
        assert!(!state.cards.overlay_open);
    }

    #[test]
    fn test_bomb_shatters_platforms_on_the_way_up() {
        let mut state = GameState::new(12345);
        land(&mut state);
        state.score = 50;
        state.cards.hand[0] = AbilityCard::new(AbilityKind::Bomb, slot_position(0));
        state.cards.selected = 0;
        // A tall wall over the player's column that the launch cannot
        // step across between ticks
        state.field.platforms.push(Platform {
            rect: Rect::new(state.player.rect.left() - 50.0, -600.0, PLATFORM_W, 600.0),
            consumed: false,
        });

        let open = TickInput {
            toggle_overlay: true,
            ..Default::default()
        };
        let activate = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &open, 0);
        tick(&mut state, &activate, 0);
        assert!(state.bomb_armed);
        assert_eq!(state.player.jumps, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.camera.mode, ScrollMode::Explosive);

        // Ride the launch until the wall shatters
        let mut shattered = false;
        for _ in 0..20 {
            run(&mut state, 1);
            if state.particles.bursts.iter().any(|b| b.color == SHATTER_COLOR) {
                shattered = true;
                break;
            }
        }
        assert!(shattered);
        // Shattering does not disarm, and platforms recycled while armed
        // count only toward the final score
        assert!(state.bomb_armed);
        assert_eq!(state.score, 0);
        assert!(state.final_score > 0);
    }

    #[test]
    fn test_bomb_disarms_on_descending_contact() {
        let mut state = GameState::new(12345);
        land(&mut state);
        state.bomb_armed = true;
        state.camera.detonate();
        state.player.vel.y = 1.0;

        let before = state.field.platforms.len();
        run(&mut state, 1);
        assert!(!state.bomb_armed);
        assert_eq!(state.camera.mode, ScrollMode::Accelerating);
        assert!(state.camera.speed < SCROLL_INITIAL + 0.01);
        // The platform survives a descending contact
        assert_eq!(state.field.platforms.len(), before);
    }

    #[test]
    fn test_revive_consumes_window_not_count() {
        let mut state = GameState::new(12345);
        state.buffs.extra_lives = 1;
        state.buffs.extra_life.start(0, 60_000);
        state.player.rect.set_top(VIEW_H + 1.0);

        tick(&mut state, &TickInput::default(), 1_000);
        assert!(!state.game_over);
        assert!(state.player.reviving);
        assert_eq!(state.player.gravity, REVIVE_GRAVITY);
        assert_eq!(state.player.rect.bottom(), 0.0);
        // The count survives the revive and dies with the window
        assert_eq!(state.buffs.extra_lives, 1);

        tick(&mut state, &TickInput::default(), 61_000);
        assert_eq!(state.buffs.extra_lives, 0);
    }

    #[test]
    fn test_death_freezes_and_keeps_high_score() {
        let mut state = GameState::new(12345);
        state.final_score = 40;
        state.high_score = 25;
        state.player.rect.set_top(VIEW_H + 1.0);

        tick(&mut state, &TickInput::default(), 0);
        assert!(state.game_over);
        assert!(!state.player.alive);
        assert_eq!(state.time_scale, 0.0);
        assert_eq!(state.high_score, 40);

        // Dead state ignores every intent except restart
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let frozen = state.final_score;
        for _ in 0..10 {
            tick(&mut state, &jump, 0);
        }
        assert_eq!(state.final_score, frozen);
        assert!(state.game_over);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0);
        assert!(!state.game_over);
        assert_eq!(state.final_score, 0);
        assert_eq!(state.high_score, 40);
    }

    #[test]
    fn test_landing_resets_triple_budget() {
        let mut state = GameState::new(12345);
        state.buffs.triple_jump.start(0, 20_000);
        land(&mut state);
        assert_eq!(state.player.jumps, TRIPLE_JUMPS);
    }

    #[test]
    fn test_speed_boost_round_trips_through_expiry() {
        let mut state = GameState::new(12345);
        land(&mut state);
        let base_speed = state.player.speed;
        state.score = 20;
        state.cards.hand[0] = AbilityCard::new(AbilityKind::SpeedBoost, slot_position(0));
        state.cards.selected = 0;

        let open = TickInput {
            toggle_overlay: true,
            ..Default::default()
        };
        let activate = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &open, 0);
        tick(&mut state, &activate, 0);
        assert_eq!(state.player.speed, base_speed * BOOST_FACTOR);

        // Past the deadline the exact base speed comes back
        tick(&mut state, &TickInput::default(), 20_000);
        assert!(!state.buffs.speed_boost.active);
        assert_eq!(state.player.speed, base_speed);
    }

    #[test]
    fn test_zero_gravity_locks_then_releases_camera() {
        let mut state = GameState::new(12345);
        land(&mut state);
        state.score = 25;
        state.cards.hand[0] = AbilityCard::new(AbilityKind::ZeroGravity, slot_position(0));
        state.cards.selected = 0;

        let open = TickInput {
            toggle_overlay: true,
            ..Default::default()
        };
        let activate = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &open, 0);
        tick(&mut state, &activate, 0);
        assert_eq!(state.camera.mode, ScrollMode::Locked);
        // Drift holds without gravity
        run(&mut state, 5);
        assert_eq!(state.player.vel.y, -ZERO_G_DRIFT);

        tick(&mut state, &TickInput::default(), 20_000);
        assert!(!state.buffs.zero_gravity.active);
        assert_eq!(state.camera.mode, ScrollMode::Accelerating);
        assert_eq!(state.camera.speed, SCROLL_INITIAL);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        let inputs = [
            TickInput::default(),
            TickInput {
                jump: true,
                ..Default::default()
            },
            TickInput {
                move_right: true,
                ..Default::default()
            },
        ];
        for i in 0..600u64 {
            let input = inputs[(i % 3) as usize];
            tick(&mut a, &input, i * 16);
            tick(&mut b, &input, i * 16);
        }
        assert_eq!(a.player.rect.pos, b.player.rect.pos);
        assert_eq!(a.player.vel, b.player.vel);
        assert_eq!(a.score, b.score);
        assert_eq!(a.final_score, b.final_score);
        assert_eq!(a.field.platforms.len(), b.field.platforms.len());
    }

    proptest! {
        /// Jump budget stays within its band under arbitrary inputs
        #[test]
        fn test_jump_budget_stays_in_band(seed in 0u64..1000, presses in proptest::collection::vec(proptest::bool::ANY, 200)) {
            let mut state = GameState::new(seed);
            for (i, press) in presses.iter().enumerate() {
                let input = TickInput {
                    jump: *press,
                    ..Default::default()
                };
                tick(&mut state, &input, i as u64 * 16);
                prop_assert!(state.player.jumps <= TRIPLE_JUMPS);
            }
        }
    }
}
