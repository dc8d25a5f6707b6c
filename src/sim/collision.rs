//! Player vs platform contact classification
//!
//! The tricky part of the contact model: several platforms can overlap
//! the player in one tick, and each overlap resolves by direction. The
//! player's horizontal position against a shrunk version of the
//! platform's span decides landing/head-bump versus wall contact, with
//! the vertical or horizontal order as the tie-break.

use super::rect::Rect;
use crate::consts::*;

/// How a single player/platform overlap resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Feet on top: snap the player's bottom to the platform top
    Landing,
    /// Head into the underside: snap the top, nudge downward
    HeadBump,
    /// Side hit with the platform on the player's left
    WallOnLeft,
    /// Side hit with the platform on the player's right
    WallOnRight,
}

/// Classify one overlap
///
/// The landing band is the platform's span widened by the player's width
/// and shrunk by the landing inset on both sides; inside it the vertical
/// order picks landing versus head bump, outside it the horizontal order
/// picks the wall side. Exact ties resolve to no contact.
pub fn classify(player: &Rect, platform: &Rect) -> Option<Contact> {
    let x = player.left();
    if platform.left() - PLAYER_W + LANDING_INSET < x && x < platform.right() - LANDING_INSET {
        if platform.top() > player.top() {
            Some(Contact::Landing)
        } else if platform.top() < player.top() {
            Some(Contact::HeadBump)
        } else {
            None
        }
    } else if platform.left() < x {
        Some(Contact::WallOnLeft)
    } else if platform.left() > x {
        Some(Contact::WallOnRight)
    } else {
        None
    }
}
