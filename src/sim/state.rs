//! Game state and core simulation types
//!
//! The run controller owns everything here. Hosts only see owned
//! [`Snapshot`]s and drained [`GameEvent`]s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::spawn::Spawner;
use crate::clamp_span;
use crate::consts::LOW_TIME_WARNING;
use crate::tuning::{Tuning, TuningError};

/// What catching an object does, named by effect rather than by what it looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    /// Debris: adds to the score when caught
    Scores,
    /// Valuables: costs a life when caught
    CostsLife,
}

impl Category {
    /// Emoji the renderer may draw for this category
    pub fn glyphs(self) -> &'static [&'static str] {
        match self {
            Category::Scores => &["🗑️", "🥤", "🥫", "🔩", "🔧", "📦"],
            Category::CostsLife => &["👩‍🚀", "💎", "🛰️", "💊", "👽"],
        }
    }
}

/// One object in flight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallingObject {
    pub id: u32,
    /// Center in viewport pixels (y grows downward)
    pub pos: Vec2,
    /// Pixels per nominal frame
    pub speed: f32,
    pub category: Category,
    pub glyph: &'static str,
    /// Glyph size in pixels
    pub size: f32,
    /// Degrees (cosmetic)
    pub rotation: f32,
    /// Degrees per nominal frame (cosmetic)
    pub rotation_speed: f32,
}

/// Aggregate statistics for the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunStats {
    pub score: u32,
    pub lives: u32,
    /// Seconds left on the countdown
    pub time_remaining: f32,
}

impl RunStats {
    pub fn fresh(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.max_lives,
            time_remaining: tuning.game_duration,
        }
    }

    /// True when the run can no longer continue
    pub fn is_exhausted(&self) -> bool {
        self.time_remaining <= 0.0 || self.lives == 0
    }

    /// Integer view for the HUD
    pub fn hud(&self) -> HudStats {
        HudStats {
            score: self.score,
            lives: self.lives,
            time_left: self.time_remaining.ceil() as u32,
        }
    }
}

/// What the HUD displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudStats {
    pub score: u32,
    pub lives: u32,
    /// Whole seconds, rounded up
    pub time_left: u32,
}

impl HudStats {
    pub fn time_running_low(&self) -> bool {
        self.time_left < LOW_TIME_WARNING
    }
}

/// The player's ship
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerState {
    /// Resolved horizontal center (pixels)
    pub x: f32,
    /// Last requested coordinate from input; `None` recenters
    pub target: Option<f32>,
    /// Pointer/touch held (flame cue only)
    pub propelling: bool,
    /// Viewport width `x` was last resolved against
    #[serde(skip)]
    pub bounds_width: Option<f32>,
}

impl PlayerState {
    /// Apply the pending target against the current viewport width
    pub fn resolve(&mut self, viewport_width: f32, player_size: f32) {
        let wanted = self.target.unwrap_or(viewport_width / 2.0);
        self.x = clamp_span(wanted, player_size, viewport_width);
        self.bounds_width = Some(viewport_width);
    }

    /// Drop the input target and move back to the centre of the last known width
    pub fn recenter(&mut self, player_size: f32) {
        self.target = None;
        if let Some(width) = self.bounds_width {
            self.resolve(width, player_size);
        }
    }
}

/// Viewport size in pixels, supplied by the host every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let clean = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: clean(width),
            height: clean(height),
        }
    }
}

/// Run controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    /// Nothing started yet
    Idle,
    /// Ticks advance the simulation
    Running,
    /// Run ended; inert until the next start
    Terminated,
}

/// Discrete notifications for audio and screen transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    Start,
    /// A scoring object was caught
    Collect { id: u32 },
    /// A life-costing object was caught
    Hit { id: u32 },
    GameOver { score: u32 },
}

/// Read-only copy of everything the presentation layer draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: RunPhase,
    pub player: PlayerState,
    pub objects: Vec<FallingObject>,
    pub stats: RunStats,
    pub hud: HudStats,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Complete simulation state for one player
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: RunPhase,
    pub stats: RunStats,
    pub player: PlayerState,
    /// Live objects in spawn order
    pub objects: Vec<FallingObject>,
    pub spawner: Spawner,
    /// Single source of spawn randomness
    pub rng: Pcg32,
    /// Seconds simulated since the current run started
    pub run_clock: f64,
    /// Runs started on this state
    pub runs_started: u32,
    events: Vec<GameEvent>,
    last_hud: Option<HudStats>,
}

impl GameState {
    /// Create an idle game with default tuning and a seeded RNG
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), Pcg32::seed_from_u64(seed))
    }

    /// Create an idle game with explicit tuning and RNG. Rejects tuning that
    /// would make spawning or collision math meaningless.
    pub fn with_rng(tuning: Tuning, rng: Pcg32) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning, rng))
    }

    fn build(tuning: Tuning, rng: Pcg32) -> Self {
        Self {
            stats: RunStats::fresh(&tuning),
            tuning,
            phase: RunPhase::Idle,
            player: PlayerState::default(),
            objects: Vec::new(),
            spawner: Spawner::default(),
            rng,
            run_clock: 0.0,
            runs_started: 0,
            events: Vec::new(),
            last_hud: None,
        }
    }

    /// Begin a run. Ignored while one is already running.
    pub fn start(&mut self) -> bool {
        if self.phase == RunPhase::Running {
            log::warn!("start() ignored: run already in progress");
            return false;
        }

        self.stats = RunStats::fresh(&self.tuning);
        self.objects.clear();
        self.player.recenter(self.tuning.player_size);
        self.player.propelling = false;
        self.spawner.reset(self.tuning.spawn_interval);
        self.run_clock = 0.0;
        self.runs_started += 1;
        self.last_hud = None;
        self.phase = RunPhase::Running;
        self.events.push(GameEvent::Start);

        log::info!(
            "Run {} started: {}s, {} lives",
            self.runs_started,
            self.tuning.game_duration,
            self.tuning.max_lives
        );
        true
    }

    /// End the run and report the final score
    pub(crate) fn finish(&mut self) {
        self.phase = RunPhase::Terminated;
        self.events.push(GameEvent::GameOver {
            score: self.stats.score,
        });
        log::info!(
            "Run {} over: score {}, lives {}, {:.1}s left",
            self.runs_started,
            self.stats.score,
            self.stats.lives,
            self.stats.time_remaining
        );
    }

    pub(crate) fn push_events(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.events.extend(events);
    }

    /// Host viewport changed (or is known for the first time). Re-clamps the
    /// ship right away so snapshots taken before the next tick are in bounds.
    pub fn resize(&mut self, viewport: Viewport) {
        self.player.resolve(viewport.width, self.tuning.player_size);
    }

    /// Input: horizontal pointer position in viewport pixels
    pub fn set_player_target(&mut self, x: f32) {
        if x.is_finite() {
            self.player.target = Some(x);
        } else {
            log::trace!("Ignoring non-finite player target");
        }
    }

    /// Input: pointer/touch held
    pub fn set_propelling(&mut self, active: bool) {
        self.player.propelling = active;
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn hud(&self) -> HudStats {
        self.stats.hud()
    }

    /// HUD values if they changed since the last call
    pub fn take_hud_update(&mut self) -> Option<HudStats> {
        let hud = self.hud();
        if self.last_hud == Some(hud) {
            return None;
        }
        self.last_hud = Some(hud);
        Some(hud)
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            player: self.player.clone(),
            objects: self.objects.clone(),
            stats: self.stats,
            hud: self.hud(),
        }
    }
}
