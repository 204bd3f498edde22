//! Per-tick kinematics and collision resolution
//!
//! Speeds are defined per nominal frame; displacement is scaled by the real
//! frame time so a 120 Hz display and a 60 Hz display fall at the same rate.

use super::collision::{object_out_of_bounds, object_player_contact, player_contact_point};
use super::state::{Category, FallingObject, GameEvent, Viewport};
use crate::tuning::Tuning;

/// Everything one physics step did to the run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collisions {
    /// Points earned from caught scoring objects
    pub score_gained: u32,
    /// Life-costing objects caught
    pub lives_lost: u32,
    /// Objects that fell out of the viewport
    pub pruned: usize,
    /// `Collect`/`Hit` in resolution order
    pub events: Vec<GameEvent>,
}

impl Collisions {
    pub fn is_empty(&self) -> bool {
        self.score_gained == 0 && self.lives_lost == 0 && self.pruned == 0
    }
}

/// Move every object, drop the ones that left the viewport and resolve
/// contacts with the ship.
pub fn advance(
    objects: &mut Vec<FallingObject>,
    dt: f32,
    player_x: f32,
    viewport: Viewport,
    tuning: &Tuning,
) -> Collisions {
    let frames = dt * tuning.nominal_frame_rate;

    for obj in objects.iter_mut() {
        obj.pos.y += obj.speed * frames;
        obj.rotation += obj.rotation_speed * frames;
    }

    let contact = player_contact_point(player_x, viewport.height, tuning);
    let mut out = Collisions::default();

    objects.retain(|obj| {
        if object_out_of_bounds(obj, viewport.height, tuning) {
            out.pruned += 1;
            return false;
        }

        let result = object_player_contact(obj, contact, tuning);
        if !result.hit {
            return true;
        }

        match obj.category {
            Category::Scores => {
                out.score_gained += tuning.collect_reward;
                out.events.push(GameEvent::Collect { id: obj.id });
                log::debug!("Caught #{} {} (+{})", obj.id, obj.glyph, tuning.collect_reward);
            }
            Category::CostsLife => {
                out.lives_lost += 1;
                out.events.push(GameEvent::Hit { id: obj.id });
                log::debug!("Hit by #{} {}", obj.id, obj.glyph);
            }
        }
        false
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 800.0)
    }

    fn object(id: u32, x: f32, y: f32, speed: f32, category: Category) -> FallingObject {
        FallingObject {
            id,
            pos: Vec2::new(x, y),
            speed,
            category,
            glyph: "📦",
            size: 45.0,
            rotation: 0.0,
            rotation_speed: 1.5,
        }
    }

    #[test]
    fn test_objects_fall_and_spin() {
        let tuning = Tuning::default();
        let mut objects = vec![object(1, 50.0, 0.0, 4.0, Category::Scores)];

        let out = advance(&mut objects, DT, 400.0, viewport(), &tuning);
        assert!(out.is_empty());
        assert!((objects[0].pos.y - 4.0).abs() < 1e-4);
        assert!((objects[0].rotation - 1.5).abs() < 1e-4);
        assert_eq!(objects[0].pos.x, 50.0);
    }

    #[test]
    fn test_zero_dt_is_a_stalled_frame() {
        let tuning = Tuning::default();
        let mut objects = vec![object(1, 50.0, 100.0, 4.0, Category::Scores)];
        advance(&mut objects, 0.0, 400.0, viewport(), &tuning);
        assert_eq!(objects[0].pos.y, 100.0);
    }

    #[test]
    fn test_frame_rate_independent() {
        let tuning = Tuning::default();
        let mut at_60 = vec![object(1, 50.0, 0.0, 3.0, Category::Scores)];
        let mut at_120 = at_60.clone();

        for _ in 0..60 {
            advance(&mut at_60, 1.0 / 60.0, 400.0, viewport(), &tuning);
        }
        for _ in 0..120 {
            advance(&mut at_120, 1.0 / 120.0, 400.0, viewport(), &tuning);
        }

        // One second at 3 px per nominal frame
        assert!((at_60[0].pos.y - 180.0).abs() < 0.01);
        assert!((at_60[0].pos.y - at_120[0].pos.y).abs() < 0.01);
    }

    #[test]
    fn test_pruned_after_crossing_discard_line() {
        let tuning = Tuning::default();
        let mut objects = vec![object(1, 20.0, -50.0, 5.0, Category::CostsLife)];

        // -50 + 5 * 179 = 845: still inside the margin
        for _ in 0..179 {
            advance(&mut objects, DT, 400.0, viewport(), &tuning);
        }
        assert_eq!(objects.len(), 1);
        assert!(objects[0].pos.y < 850.0);

        // Two more frames put it past 850
        let mut pruned = 0;
        for _ in 0..2 {
            pruned += advance(&mut objects, DT, 400.0, viewport(), &tuning).pruned;
        }
        assert!(objects.is_empty());
        assert_eq!(pruned, 1);
    }

    #[test]
    fn test_pruned_objects_never_score() {
        let tuning = Tuning::default();
        // Below the discard line and right under the ship's x
        let mut objects = vec![object(1, 400.0, 900.0, 0.0, Category::Scores)];
        let out = advance(&mut objects, DT, 400.0, viewport(), &tuning);
        assert_eq!(out.pruned, 1);
        assert_eq!(out.score_gained, 0);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_collect_scores() {
        let tuning = Tuning::default();
        let mut objects = vec![object(7, 400.0, 700.0, 2.0, Category::Scores)];
        let out = advance(&mut objects, DT, 400.0, viewport(), &tuning);
        assert!(objects.is_empty());
        assert_eq!(out.score_gained, 10);
        assert_eq!(out.lives_lost, 0);
        assert_eq!(out.events, vec![GameEvent::Collect { id: 7 }]);
    }

    #[test]
    fn test_hit_costs_life() {
        let tuning = Tuning::default();
        let mut objects = vec![object(3, 400.0, 700.0, 2.0, Category::CostsLife)];
        let out = advance(&mut objects, DT, 400.0, viewport(), &tuning);
        assert!(objects.is_empty());
        assert_eq!(out.score_gained, 0);
        assert_eq!(out.lives_lost, 1);
        assert_eq!(out.events, vec![GameEvent::Hit { id: 3 }]);
    }

    #[test]
    fn test_many_contacts_in_one_frame() {
        let tuning = Tuning::default();
        let mut objects = vec![
            object(1, 390.0, 690.0, 0.0, Category::Scores),
            object(2, 410.0, 700.0, 0.0, Category::Scores),
            object(3, 400.0, 710.0, 0.0, Category::CostsLife),
            object(4, 100.0, 100.0, 0.0, Category::CostsLife),
        ];
        let out = advance(&mut objects, DT, 400.0, viewport(), &tuning);
        assert_eq!(out.score_gained, 20);
        assert_eq!(out.lives_lost, 1);
        assert_eq!(out.events.len(), 3);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].id, 4);
    }

    #[test]
    fn test_missed_objects_keep_falling() {
        let tuning = Tuning::default();
        let mut objects = vec![object(1, 100.0, 700.0, 1.0, Category::CostsLife)];
        let out = advance(&mut objects, DT, 600.0, viewport(), &tuning);
        assert!(out.is_empty());
        assert_eq!(objects.len(), 1);
    }
}
