//! Infinite platform field
//!
//! Platforms are generated in batches above the highest one so far (the
//! frontier) and recycled once they scroll past the viewport bottom. The
//! field always holds more platforms above the view than one batch can
//! exhaust: a refill fires whenever the live count drops to the low-water
//! mark.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::consts::*;

/// A single platform
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub rect: Rect,
    /// Destroyed from below by the bomb; scores nothing when removed
    pub consumed: bool,
}

impl Platform {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            rect: Rect::new(x, y, PLATFORM_W, PLATFORM_H),
            consumed: false,
        }
    }
}

/// The live platform set plus its generation frontier
#[derive(Debug, Clone)]
pub struct PlatformField {
    /// Live platforms in creation order (later entries sit higher)
    pub platforms: Vec<Platform>,
    /// Top-left corner of the highest platform generated so far
    frontier: Vec2,
}

impl PlatformField {
    /// Seed the field: one platform centered under the player, then a
    /// full batch climbing above it
    pub fn new(rng: &mut Pcg32, player: &Rect) -> Self {
        let first = Platform::new(
            player.center_x() - PLATFORM_W / 2.0,
            player.bottom() + SPAWN_GAP,
        );
        let mut field = Self {
            platforms: vec![first],
            frontier: first.rect.pos,
        };
        field.generate(rng, PLATFORM_BATCH);
        field
    }

    /// Append `count` platforms above the current frontier
    ///
    /// Each hop moves a random horizontal offset from the previous
    /// platform, direction forced inward near the side margins, and rises
    /// a random step.
    pub fn generate(&mut self, rng: &mut Pcg32, count: u32) {
        for _ in 0..count {
            let offset = rng.random_range(HOP_OFFSET_MIN..=HOP_OFFSET_MAX);
            let x = if self.frontier.x + offset > VIEW_W - FIELD_MARGIN {
                self.frontier.x - offset
            } else if self.frontier.x - offset < FIELD_MARGIN {
                self.frontier.x + offset
            } else if rng.random_bool(0.5) {
                self.frontier.x + offset
            } else {
                self.frontier.x - offset
            };
            let y = self.frontier.y - rng.random_range(HOP_RISE_MIN..=HOP_RISE_MAX);
            self.platforms.push(Platform::new(x, y));
            self.frontier = Vec2::new(x, y);
        }
        log::trace!("platform field refilled to {}", self.platforms.len());
    }

    /// Scroll the whole field down, cull platforms fully below the view,
    /// and refill when the count runs low
    ///
    /// Returns how many un-consumed platforms were recycled this tick,
    /// which is what scoring counts.
    pub fn advance(&mut self, rng: &mut Pcg32, scroll: f32) -> u32 {
        let mut recycled = 0;
        for platform in &mut self.platforms {
            platform.rect.pos.y += scroll;
        }
        self.frontier.y += scroll;
        self.platforms.retain(|p| {
            if p.rect.top() >= VIEW_H {
                if !p.consumed {
                    recycled += 1;
                }
                false
            } else {
                true
            }
        });
        if self.platforms.len() <= PLATFORM_LOW_WATER {
            self.generate(rng, PLATFORM_BATCH);
        }
        recycled
    }

    /// Drop platforms shattered by the bomb this tick
    pub fn sweep_consumed(&mut self) {
        self.platforms.retain(|p| !p.consumed);
    }

    /// Highest platform whose top edge is at or below the viewport top
    pub fn highest_on_screen(&self) -> Option<&Platform> {
        self.platforms.iter().rev().find(|p| p.rect.top() >= 0.0)
    }

    /// Nearest platform strictly above the given height
    pub fn nearest_above(&self, y: f32) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.rect.top() < y)
    }
}
