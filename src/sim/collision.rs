//! Collision geometry
//!
//! The ship is a circle around a fixed point near the bottom of the viewport.
//! Objects are treated as circles whose reach is a fraction of their glyph
//! size, which makes catching feel generous.

use glam::Vec2;

use super::state::FallingObject;
use crate::tuning::Tuning;

/// Result of testing one object against the ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactResult {
    /// Whether the object touches the ship
    pub hit: bool,
    /// Distance between centers
    pub distance: f32,
    /// Distance at which contact starts
    pub reach: f32,
}

/// Point the ship collides around
#[inline]
pub fn player_contact_point(player_x: f32, viewport_height: f32, tuning: &Tuning) -> Vec2 {
    Vec2::new(player_x, tuning.player_y(viewport_height))
}

/// Test an object against the ship's contact point
pub fn object_player_contact(obj: &FallingObject, contact: Vec2, tuning: &Tuning) -> ContactResult {
    let distance = obj.pos.distance(contact);
    let reach = tuning.player_hit_radius() + obj.size / tuning.object_hit_divisor;
    ContactResult {
        hit: distance < reach,
        distance,
        reach,
    }
}

/// Check if an object has dropped far enough below the viewport to discard
#[inline]
pub fn object_out_of_bounds(obj: &FallingObject, viewport_height: f32, tuning: &Tuning) -> bool {
    obj.pos.y > tuning.discard_line(viewport_height)
}
