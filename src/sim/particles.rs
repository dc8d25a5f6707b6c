//! Rain, splash, smoke, and burst pools
//!
//! Pure kinematics: every particle is a rectangle advanced by simple
//! Euler integration and culled by its own predicate. Colors live here
//! because they are part of the state handed to the renderer.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::rect::Rect;
use crate::approach_zero;
use crate::consts::*;

/// Rain and splash color
pub const RAIN_COLOR: [u8; 3] = [47, 48, 42];
/// Debris color where the bomb destroys a platform
pub const SHATTER_COLOR: [u8; 3] = [13, 13, 13];
/// Card purchase confetti
pub const PURCHASE_COLOR: [u8; 3] = [252, 136, 109];
/// Bomb exhaust palette
pub const BLAST_COLORS: [[u8; 3]; 3] = [[255, 124, 5], [255, 150, 55], [255, 166, 85]];

/// Horizontal deceleration applied to splashes per tick
const SPLASH_DRAG: f32 = 0.1;
/// Splashes spawned per consumed rain drop
const SPLASH_COUNT: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct RainDrop {
    pub rect: Rect,
    vel: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct Splash {
    pub rect: Rect,
    vel: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct SmokePuff {
    pub rect: Rect,
    /// Gray level, darkening toward zero
    pub gray: f32,
    /// Size shrink per tick
    decay: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct BurstMember {
    pub rect: Rect,
    vel: Vec2,
}

/// One multi-member burst emission
///
/// Dies only once every member has fallen below the viewport.
#[derive(Debug, Clone)]
pub struct Burst {
    pub members: Vec<BurstMember>,
    pub color: [u8; 3],
    drag: f32,
    /// Gravity snapshotted at spawn time
    gravity: f32,
    /// Whether member motion honors the global time scale
    scaled: bool,
}

/// All four particle pools
#[derive(Debug, Clone, Default)]
pub struct Particles {
    pub rain: Vec<RainDrop>,
    pub splashes: Vec<Splash>,
    pub smoke: Vec<SmokePuff>,
    pub bursts: Vec<Burst>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top the rain pool back up to its target count
    ///
    /// Fresh drops start well above the viewport so they trickle in
    /// instead of popping into view.
    pub fn refill_rain(&mut self, rng: &mut Pcg32) {
        while self.rain.len() < RAIN_TARGET {
            let rect = Rect::new(
                rng.random_range(0.0..=VIEW_W),
                rng.random_range(-2000.0..=-50.0),
                RAIN_W,
                RAIN_H,
            );
            let vel = Vec2::new(
                rng.random_range(-0.001..=0.001),
                rng.random_range(5.0..=10.0),
            );
            self.rain.push(RainDrop { rect, vel });
        }
    }

    /// Fall plus the world scroll; drops below the view are dropped
    pub fn advance_rain(&mut self, scroll: f32, time_scale: f32) {
        for drop in &mut self.rain {
            drop.rect.pos.y += drop.vel.y * time_scale + scroll;
            drop.rect.pos.x += drop.vel.x * time_scale;
        }
        self.rain.retain(|d| d.rect.top() < VIEW_H);
    }

    /// Burst the first rain drop overlapping `surface` into splashes
    pub fn splash_on(&mut self, rng: &mut Pcg32, surface: &Rect) {
        let Some(i) = self.rain.iter().position(|d| d.rect.overlaps(surface)) else {
            return;
        };
        let drop = self.rain.remove(i);
        let size = rng.random_range(5.0..=8.0);
        for _ in 0..SPLASH_COUNT {
            let vel = Vec2::new(
                rng.random_range(-5.0..=5.0),
                rng.random_range(-8.0..=-5.0),
            );
            self.splashes.push(Splash {
                rect: Rect::new(drop.rect.left(), drop.rect.top(), size, size),
                vel,
            });
        }
    }

    /// Gravity arc with horizontal air resistance; culled below the view
    pub fn advance_splashes(&mut self, scroll: f32, gravity: f32, time_scale: f32) {
        for splash in &mut self.splashes {
            splash.rect.pos.y += scroll;
            splash.vel.y += gravity * time_scale;
            splash.rect.pos.y += splash.vel.y * time_scale;
            splash.rect.pos.x += splash.vel.x * time_scale;
            splash.vel.x = approach_zero(splash.vel.x, SPLASH_DRAG * time_scale);
        }
        self.splashes.retain(|s| s.rect.top() < VIEW_H);
    }

    /// Puffs kicked up around the player's feet by running and jumping
    pub fn spawn_smoke(
        &mut self,
        rng: &mut Pcg32,
        player: &Rect,
        count: u32,
        y_jitter_lo: f32,
        y_jitter_hi: f32,
    ) {
        for _ in 0..count {
            let x = player.left() - 10.0 + rng.random_range(-20.0..=20.0);
            let y = player.top() + PLAYER_H / 2.0 + rng.random_range(y_jitter_lo..=y_jitter_hi);
            let size = rng.random_range(10.0..=25.0);
            self.smoke.push(SmokePuff {
                rect: Rect::new(x, y, size, size),
                gray: rng.random_range(80.0..=100.0),
                decay: rng.random_range(0.1..=0.2),
            });
        }
    }

    /// Smoke darkens and shrinks until it is gone
    pub fn advance_smoke(&mut self) {
        for puff in &mut self.smoke {
            puff.gray = (puff.gray - 0.5).max(0.0);
            puff.rect.size -= Vec2::splat(puff.decay);
        }
        self.smoke.retain(|p| p.rect.size.x > 0.0);
    }

    /// Three exhaust groups under the bomb launch
    pub fn bomb_blast(&mut self, rng: &mut Pcg32, at: Vec2, gravity: f32) {
        for _ in 0..3 {
            let color = BLAST_COLORS[rng.random_range(0..BLAST_COLORS.len())];
            let size = rng.random_range(10.0..=15.0);
            let members = (0..10)
                .map(|_| BurstMember {
                    rect: Rect::new(at.x, at.y, size, size),
                    vel: Vec2::new(
                        rng.random_range(-10.0..=10.0),
                        rng.random_range(10.0..=15.0),
                    ),
                })
                .collect();
            self.bursts.push(Burst {
                members,
                color,
                drag: 0.01,
                gravity,
                scaled: true,
            });
        }
    }

    /// Debris where the bomb destroys a platform
    pub fn shatter(&mut self, rng: &mut Pcg32, at: Vec2, gravity: f32) {
        let members = (0..30)
            .map(|_| BurstMember {
                rect: Rect::new(at.x, at.y, 10.0, 10.0),
                vel: Vec2::new(
                    rng.random_range(-10.0..=10.0),
                    rng.random_range(-10.0..=-5.0),
                ),
            })
            .collect();
        self.bursts.push(Burst {
            members,
            color: SHATTER_COLOR,
            drag: 0.06,
            gravity,
            scaled: true,
        });
    }

    /// Confetti at the card a successful purchase came from
    ///
    /// Unscaled, so it keeps falling while the overlay freeze lifts.
    pub fn purchase_burst(&mut self, rng: &mut Pcg32, at: Vec2, gravity: f32) {
        let members = (0..10)
            .map(|_| BurstMember {
                rect: Rect::new(at.x, at.y, 10.0, 10.0),
                vel: Vec2::new(
                    rng.random_range(-10.0..=10.0),
                    rng.random_range(-10.0..=-5.0),
                ),
            })
            .collect();
        self.bursts.push(Burst {
            members,
            color: PURCHASE_COLOR,
            drag: 0.06,
            gravity,
            scaled: false,
        });
    }

    /// Advance every burst; a burst dies once all members leave the view
    pub fn advance_bursts(&mut self, time_scale: f32) {
        for burst in &mut self.bursts {
            let step = if burst.scaled { time_scale } else { 1.0 };
            for member in &mut burst.members {
                member.rect.pos.y += member.vel.y * step;
                member.vel.y += burst.gravity * step;
                member.rect.pos.x += member.vel.x * step;
                member.vel.x = approach_zero(member.vel.x, burst.drag * step);
            }
        }
        self.bursts
            .retain(|b| b.members.iter().any(|m| m.rect.top() < VIEW_H));
    }

    /// Renderable rectangles with colors, in paint order
    pub fn visuals(&self) -> impl Iterator<Item = (Rect, [u8; 3])> + '_ {
        let rain = self.rain.iter().map(|d| (d.rect, RAIN_COLOR));
        let splashes = self.splashes.iter().map(|s| (s.rect, RAIN_COLOR));
        let smoke = self.smoke.iter().map(|p| {
            let g = p.gray as u8;
            (p.rect, [g, g, g])
        });
        let bursts = self
            .bursts
            .iter()
            .flat_map(|b| b.members.iter().map(move |m| (m.rect, b.color)));
        rain.chain(splashes).chain(smoke).chain(bursts)
    }
}
