//! Game state and core simulation types
//!
//! Everything a tick reads or mutates lives on `GameState`; components
//! receive it by mutable reference instead of reaching into globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::abilities::{Buffs, Cards};
use super::camera::Camera;
use super::particles::Particles;
use super::platforms::PlatformField;
use super::rect::Rect;
use crate::consts::*;

/// The player body
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    /// Remaining jumps before a landing is required
    pub jumps: u32,
    pub grounded: bool,
    /// Horizontal run speed; speed-boost scales it in place
    pub speed: f32,
    /// Current gravity; reduced during the post-revive glide
    pub gravity: f32,
    pub alive: bool,
    /// Gliding down from the top after a revive
    pub reviving: bool,
    /// Previous tick's held movement keys, for edge detection
    pub holding_left: bool,
    pub holding_right: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            rect: Rect::new(
                (VIEW_W - PLAYER_W) / 2.0,
                (VIEW_H - PLAYER_H) / 2.0,
                PLAYER_W,
                PLAYER_H,
            ),
            vel: Vec2::ZERO,
            jumps: BASE_JUMPS,
            grounded: false,
            speed: PLAYER_SPEED,
            gravity: GRAVITY,
            alive: true,
            reviving: false,
            holding_left: false,
            holding_right: false,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub player: Player,
    pub field: PlatformField,
    pub camera: Camera,
    pub cards: Cards,
    pub buffs: Buffs,
    pub particles: Particles,
    /// Spendable score (platforms traversed minus purchases)
    pub score: u32,
    /// Total platforms traversed, never spent
    pub final_score: u32,
    /// Best final score seen, seeded from persistence at startup
    pub high_score: u32,
    /// Bomb launch in flight: platforms shatter on the way up, the first
    /// contact on the way down disarms it
    pub bomb_armed: bool,
    pub game_over: bool,
    /// Motion multiplier: 1 while running, 0 while the overlay is open
    /// or the run has ended
    pub time_scale: f32,
    pub tick_count: u64,
    pub rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(Pcg32::seed_from_u64(seed), 0)
    }

    fn from_rng(mut rng: Pcg32, high_score: u32) -> Self {
        let player = Player::new();
        let field = PlatformField::new(&mut rng, &player.rect);
        let mut cards = Cards::new();
        cards.fill_hand(&mut rng);
        Self {
            player,
            field,
            camera: Camera::new(),
            cards,
            buffs: Buffs::new(),
            particles: Particles::new(),
            score: 0,
            final_score: 0,
            high_score,
            bomb_armed: false,
            game_over: false,
            time_scale: 1.0,
            tick_count: 0,
            rng,
        }
    }

    /// Fresh run, keeping the RNG stream and the best score
    pub fn restart(&mut self) {
        let rng = self.rng.clone();
        let high_score = self.high_score;
        *self = Self::from_rng(rng, high_score);
    }
}
