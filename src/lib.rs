//! Space Sweep - catch falling debris, dodge the valuables
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, collisions, run state)
//! - `tuning`: Data-driven game balance
//! - `settings`: Host preferences (audio, visual cues)
//! - `audio`: Sound effect mapping and Web Audio synthesis
//! - `renderer`: Canvas2D presentation (wasm only)

pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Length of a run in seconds
    pub const GAME_DURATION: f32 = 60.0;
    /// Lives at the start of a run
    pub const MAX_LIVES: u32 = 3;

    /// Player ship glyph size (pixels), also its horizontal footprint
    pub const PLAYER_SIZE: f32 = 60.0;
    /// Distance of the ship's collision point above the viewport bottom
    pub const PLAYER_OFFSET_FROM_BOTTOM: f32 = 100.0;
    /// Extra reach added to half the ship size
    pub const HIT_PADDING: f32 = 10.0;
    /// Object size is divided by this before being added to the hit radius
    pub const OBJECT_HIT_DIVISOR: f32 = 3.0;

    /// Seconds between spawns
    pub const SPAWN_INTERVAL: f32 = 0.6;
    /// Probability that a spawned object costs a life
    pub const COSTS_LIFE_CHANCE: f64 = 0.3;
    /// Spawn height (above the top edge)
    pub const SPAWN_Y: f32 = -50.0;

    /// Fall speed range in pixels per nominal frame
    pub const FALL_SPEED_MIN: f32 = 2.0;
    pub const FALL_SPEED_MAX: f32 = 5.0;
    /// Viewport height at which fall speeds are unscaled
    pub const REFERENCE_HEIGHT: f32 = 800.0;

    /// Object glyph size range (pixels)
    pub const OBJECT_SIZE_MIN: f32 = 40.0;
    pub const OBJECT_SIZE_MAX: f32 = 60.0;
    /// Max spin in degrees per nominal frame (either direction)
    pub const ROTATION_SPEED_MAX: f32 = 2.0;

    /// Objects this far below the bottom edge are discarded
    pub const OVERFLOW_MARGIN: f32 = 50.0;
    /// Points per caught scoring object
    pub const COLLECT_REWARD: u32 = 10;

    /// Frame rate at which per-frame speeds are defined
    pub const NOMINAL_FRAME_RATE: f32 = 60.0;
    /// HUD warns when fewer whole seconds than this remain
    pub const LOW_TIME_WARNING: u32 = 10;

    /// Longest frame a host feeds the simulation in one go (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Seconds between two animation-frame timestamps (milliseconds), capped at
/// [`consts::MAX_FRAME_DT`].
///
/// The cap means a run's countdown follows simulated time, not wall-clock
/// time: a backgrounded tab or a breakpoint pauses the clock instead of
/// draining it in one jump. The first frame of a run (`last == None`) is a
/// zero step.
#[inline]
pub fn frame_delta(last_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_ms {
        Some(last) => sanitize_dt(((now_ms - last) / 1000.0) as f32).min(consts::MAX_FRAME_DT),
        None => 0.0,
    }
}

/// Clamp a frame delta to something the simulation can consume.
///
/// Stalled or garbage frames (NaN, infinite, negative) become a zero step.
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Clamp a horizontal centre so a span of `size` stays inside `[0, width]`.
///
/// Falls back to the middle of the viewport when the span does not fit.
#[inline]
pub fn clamp_span(x: f32, size: f32, width: f32) -> f32 {
    let half = size / 2.0;
    let max = width - half;
    if max < half {
        width / 2.0
    } else {
        x.clamp(half, max)
    }
}
