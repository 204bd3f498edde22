//! Object spawning
//!
//! Fixed cadence, randomized everything else. The caller supplies the RNG so
//! runs are reproducible from a seed.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Category, FallingObject, Viewport};
use crate::clamp_span;
use crate::tuning::Tuning;

/// Spawn timer and id allocator
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Seconds since the last spawn
    pub elapsed: f32,
    next_id: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            next_id: 1,
        }
    }
}

impl Spawner {
    /// Prime the spawn timer so the first frame of a run spawns. Ids keep
    /// counting so they never repeat.
    pub fn reset(&mut self, interval: f32) {
        self.elapsed = interval;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Accumulate `dt` and emit an object once the spawn interval has passed
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        viewport: Viewport,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Option<FallingObject> {
        self.elapsed += dt;
        if self.elapsed <= tuning.spawn_interval {
            return None;
        }
        self.elapsed = 0.0;

        let id = self.next_entity_id();
        let obj = spawn_object(id, viewport, tuning, rng);
        log::debug!(
            "Spawned #{} {:?} at x={:.0} speed={:.2}",
            obj.id,
            obj.category,
            obj.pos.x,
            obj.speed
        );
        Some(obj)
    }
}

/// Roll a new object just above the viewport
pub fn spawn_object<R: Rng + ?Sized>(
    id: u32,
    viewport: Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> FallingObject {
    let category = if rng.random_bool(tuning.costs_life_chance) {
        Category::CostsLife
    } else {
        Category::Scores
    };
    let glyph = category.glyphs().choose(rng).copied().unwrap_or("?");

    let size = rng.random_range(tuning.object_size_min..=tuning.object_size_max);

    // Keep the whole glyph inside the viewport
    let half = size / 2.0;
    let x = if viewport.width - half > half {
        rng.random_range(half..=viewport.width - half)
    } else {
        clamp_span(0.0, size, viewport.width)
    };

    let height_scale = viewport.height / tuning.reference_height;
    let speed = rng.random_range(tuning.fall_speed_min..=tuning.fall_speed_max) * height_scale;

    let rotation = rng.random_range(0.0..360.0);
    let rotation_speed =
        rng.random_range(-tuning.rotation_speed_max..=tuning.rotation_speed_max);

    FallingObject {
        id,
        pos: Vec2::new(x, tuning.spawn_y),
        speed,
        category,
        glyph,
        size,
        rotation,
        rotation_speed,
    }
}
