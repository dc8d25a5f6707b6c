//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or input dependencies

pub mod abilities;
pub mod camera;
pub mod collision;
pub mod particles;
pub mod platforms;
pub mod rect;
pub mod state;
pub mod tick;

pub use abilities::{AbilityCard, AbilityKind, BuffTimer, Buffs, Cards};
pub use camera::{Camera, ScrollMode};
pub use collision::{Contact, classify};
pub use particles::Particles;
pub use platforms::{Platform, PlatformField};
pub use rect::Rect;
pub use state::{GameState, Player};
pub use tick::{TickInput, tick};
