//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Time only enters through the `dt` passed to `tick`
//! - Seeded RNG only
//! - Objects kept in spawn order
//! - No rendering, audio or input dependencies

pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{ContactResult, object_player_contact, player_contact_point};
pub use physics::{Collisions, advance};
pub use spawn::{Spawner, spawn_object};
pub use state::{
    Category, FallingObject, GameEvent, GameState, HudStats, PlayerState, RunPhase, RunStats,
    Snapshot, Viewport,
};
pub use tick::tick;
