//! Clamber - an endless vertical platformer simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, platforms, abilities, particles)
//! - `highscores`: Best-run persistence

pub mod highscores;
pub mod sim;

pub use highscores::HighScore;

/// Game configuration constants
pub mod consts {
    /// Viewport dimensions (world units)
    pub const VIEW_W: f32 = 1530.0;
    pub const VIEW_H: f32 = 800.0;

    /// Simulation rate
    pub const TICK_HZ: u32 = 60;

    /// Player dimensions
    pub const PLAYER_W: f32 = 20.0;
    pub const PLAYER_H: f32 = 40.0;
    /// Horizontal run speed (per tick)
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Upward speed a jump imparts
    pub const JUMP_FORCE: f32 = 10.0;
    /// Upward speed of the instant-jump ability
    pub const INSTANT_JUMP_SPEED: f32 = 15.0;
    /// Jump budget granted by a landing
    pub const BASE_JUMPS: u32 = 2;
    /// Jump budget while triple-jump is active
    pub const TRIPLE_JUMPS: u32 = 3;
    /// Multiplier applied by the jump/speed boost buffs
    pub const BOOST_FACTOR: f32 = 1.5;

    /// Gravity (per-tick velocity increment)
    pub const GRAVITY: f32 = 0.4;
    /// Gravity during the post-revive glide
    pub const REVIVE_GRAVITY: f32 = 0.05;
    /// Gravity stops accelerating a fall past this speed
    pub const TERMINAL_FALL_SPEED: f32 = 20.0;
    /// Upward drift while zero-gravity is active
    pub const ZERO_G_DRIFT: f32 = 5.0;

    /// Platform dimensions
    pub const PLATFORM_W: f32 = 150.0;
    pub const PLATFORM_H: f32 = 20.0;
    /// Horizontal inset that separates landing from wall contact
    pub const LANDING_INSET: f32 = 10.0;
    /// Platforms generated per refill batch
    pub const PLATFORM_BATCH: u32 = 50;
    /// Refill triggers when the live count drops to this
    pub const PLATFORM_LOW_WATER: usize = 10;
    /// Horizontal distance between consecutive platforms
    pub const HOP_OFFSET_MIN: f32 = 300.0;
    pub const HOP_OFFSET_MAX: f32 = 350.0;
    /// Vertical rise between consecutive platforms
    pub const HOP_RISE_MIN: f32 = 200.0;
    pub const HOP_RISE_MAX: f32 = 250.0;
    /// Platforms keep this margin from the viewport's side edges
    pub const FIELD_MARGIN: f32 = 150.0;
    /// Gap between the player's feet and the seed platform at spawn
    pub const SPAWN_GAP: f32 = 10.0;

    /// Scroll speeds
    pub const SCROLL_INITIAL: f32 = 2.0;
    pub const SCROLL_MAX: f32 = 4.0;
    pub const SCROLL_ACCEL: f32 = 0.0005;
    /// Scroll speed while the bomb launch is in flight
    pub const BOMB_SCROLL: f32 = 100.0;
    /// Upward speed of the bomb launch
    pub const BOMB_LAUNCH: f32 = 100.0;

    /// Cards held at once
    pub const HAND_SIZE: usize = 4;
    pub const RESHUFFLE_COST: u32 = 5;
    /// Duration of the rejected-purchase flash
    pub const INVALID_FLASH_TICKS: u32 = 8;
    /// Duration of a card slide animation
    pub const CARD_SLIDE_TICKS: u32 = 30;
    /// How far a selected card rises above its slot
    pub const SELECTED_CARD_LIFT: f32 = 30.0;
    /// Gap between card slots on the overlay bar
    pub const CARD_MARGIN: f32 = 20.0;

    /// Rain pool target count
    pub const RAIN_TARGET: usize = 100;
    /// Rain drop dimensions
    pub const RAIN_W: f32 = 5.0;
    pub const RAIN_H: f32 = 50.0;
}

/// Decrease `value` toward zero by `amount` without crossing it
#[inline]
pub fn approach_zero(value: f32, amount: f32) -> f32 {
    if value.abs() <= amount {
        0.0
    } else {
        value - amount.copysign(value)
    }
}
