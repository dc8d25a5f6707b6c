//! Scroll-speed controller
//!
//! The camera itself never moves; the world is shifted downward past it.
//! This module owns the single speed scalar that is added to every
//! world-space rectangle's vertical position each tick.

use crate::consts::*;

/// Behavior currently driving the scroll speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// No scrolling (game start, after death or revive, after an
    /// explosive fall completes)
    Idle,
    /// Speed creeps toward the maximum each tick
    Accelerating,
    /// Bomb launch: speed starts huge and decays by gravity each tick
    Explosive,
    /// Pinned to a value derived from the player's vertical speed
    /// while zero-gravity is active
    Locked,
}

/// Scroll speed plus the mode that is currently steering it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub mode: ScrollMode,
    pub speed: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            mode: ScrollMode::Idle,
            speed: 0.0,
        }
    }

    /// World shift to apply this tick
    #[inline]
    pub fn scroll(&self, time_scale: f32) -> f32 {
        self.speed * time_scale
    }

    /// First jump of a run starts the scroll
    pub fn kick(&mut self) {
        if self.mode == ScrollMode::Idle {
            self.mode = ScrollMode::Accelerating;
            self.speed = SCROLL_INITIAL;
        }
    }

    /// Drop back to the initial scroll speed and resume accelerating
    pub fn reset_to_initial(&mut self) {
        self.mode = ScrollMode::Accelerating;
        self.speed = SCROLL_INITIAL;
    }

    /// Bomb launch
    pub fn detonate(&mut self) {
        self.mode = ScrollMode::Explosive;
        self.speed = BOMB_SCROLL;
    }

    /// Pin the speed for zero-gravity, clamped to the normal scroll band
    pub fn lock(&mut self, vertical_speed: f32) {
        self.mode = ScrollMode::Locked;
        self.speed = (vertical_speed.abs() - 0.5).clamp(0.0, SCROLL_MAX);
    }

    /// Halt scrolling entirely
    pub fn stop(&mut self) {
        self.mode = ScrollMode::Idle;
        self.speed = 0.0;
    }

    /// Advance the speed scalar one tick
    ///
    /// Acceleration honors the time scale; the explosive decay does not,
    /// so a bomb keeps winding down even while the overlay is open.
    pub fn update(&mut self, time_scale: f32, gravity: f32) {
        match self.mode {
            ScrollMode::Accelerating => {
                self.speed = (self.speed + SCROLL_ACCEL * time_scale).min(SCROLL_MAX);
            }
            ScrollMode::Explosive => {
                self.speed -= gravity;
                if self.speed <= 0.0 {
                    self.stop();
                }
            }
            ScrollMode::Idle | ScrollMode::Locked => {}
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
