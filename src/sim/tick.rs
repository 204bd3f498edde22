//! Variable timestep simulation tick
//!
//! Core game loop that advances a run by one rendered frame.

use super::physics::advance;
use super::state::{GameState, RunPhase, Viewport};
use crate::sanitize_dt;

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, dt: f32, viewport: Viewport) {
    // Don't tick unless a run is in progress
    if state.phase != RunPhase::Running {
        log::trace!("tick ignored in {:?}", state.phase);
        return;
    }

    let dt = sanitize_dt(dt);
    let before = state.stats;

    // Countdown
    state.run_clock += f64::from(dt);
    state.stats.time_remaining = (state.stats.time_remaining - dt).max(0.0);

    state.player.resolve(viewport.width, state.tuning.player_size);

    // Nothing spawns or moves once the run is already spent
    if state.stats.is_exhausted() {
        state.finish();
        return;
    }

    if let Some(obj) = state
        .spawner
        .maybe_spawn(dt, viewport, &state.tuning, &mut state.rng)
    {
        state.objects.push(obj);
    }

    let collisions = advance(
        &mut state.objects,
        dt,
        state.player.x,
        viewport,
        &state.tuning,
    );

    state.stats.score += collisions.score_gained;
    state.stats.lives = state.stats.lives.saturating_sub(collisions.lives_lost);
    state.push_events(collisions.events);

    debug_assert!(state.stats.score >= before.score, "score decreased");
    debug_assert!(state.stats.lives <= before.lives, "lives increased");
    debug_assert!(
        (0.0..=state.tuning.game_duration).contains(&state.stats.time_remaining),
        "timer out of range"
    );
    debug_assert!(
        state
            .objects
            .iter()
            .all(|o| o.pos.y <= state.tuning.discard_line(viewport.height)),
        "stale object survived the tick"
    );

    if state.stats.is_exhausted() {
        state.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Category, FallingObject, GameEvent};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 800.0)
    }

    /// A running game that never spawns on its own
    fn quiet_game() -> GameState {
        let tuning = Tuning {
            spawn_interval: f32::MAX,
            ..Tuning::default()
        };
        let mut state = GameState::with_rng(tuning, Pcg32::seed_from_u64(1)).unwrap();
        state.start();
        state.drain_events().for_each(drop);
        state
    }

    fn object_at_player(id: u32, category: Category) -> FallingObject {
        FallingObject {
            id,
            // Ship is centred at x=400, collision point y=700
            pos: Vec2::new(400.0, 700.0),
            speed: 5.0,
            category,
            glyph: "📦",
            size: 45.0,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn test_tick_before_start_is_noop() {
        let mut state = GameState::new(5);
        let before = state.snapshot();
        tick(&mut state, DT, viewport());
        assert_eq!(state.snapshot(), before);
        assert_eq!(state.drain_events().count(), 0);
    }

    #[test]
    fn test_countdown() {
        let mut state = quiet_game();
        tick(&mut state, 0.5, viewport());
        assert!((state.stats.time_remaining - 59.5).abs() < 1e-5);
        assert_eq!(state.hud().time_left, 60);
        assert!((state.run_clock - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_bad_dt_is_stalled_frame() {
        let mut state = quiet_game();
        tick(&mut state, f32::NAN, viewport());
        tick(&mut state, -3.0, viewport());
        tick(&mut state, f32::INFINITY, viewport());
        assert_eq!(state.stats.time_remaining, 60.0);
        assert!(state.is_running());
    }

    #[test]
    fn test_collect_scenario() {
        let mut state = quiet_game();
        state.objects.push(object_at_player(1, Category::Scores));

        tick(&mut state, DT, viewport());

        assert_eq!(state.stats.score, 10);
        assert!(state.objects.is_empty());
        assert_eq!(
            state.drain_events().collect::<Vec<_>>(),
            vec![GameEvent::Collect { id: 1 }]
        );
    }

    #[test]
    fn test_last_life_scenario() {
        let mut state = quiet_game();
        state.stats.lives = 1;
        state.objects.push(object_at_player(1, Category::CostsLife));

        tick(&mut state, DT, viewport());

        assert_eq!(state.stats.lives, 0);
        assert_eq!(state.phase, RunPhase::Terminated);
        assert_eq!(
            state.drain_events().collect::<Vec<_>>(),
            vec![GameEvent::Hit { id: 1 }, GameEvent::GameOver { score: 0 }]
        );
    }

    #[test]
    fn test_time_up_scenario() {
        let mut state = GameState::new(9);
        state.start();
        state.drain_events().for_each(drop);

        tick(&mut state, 60.0, viewport());

        assert_eq!(state.stats.time_remaining, 0.0);
        assert_eq!(state.phase, RunPhase::Terminated);
        // Terminated before anything could spawn
        assert!(state.objects.is_empty());
        assert_eq!(
            state.drain_events().collect::<Vec<_>>(),
            vec![GameEvent::GameOver { score: 0 }]
        );
    }

    #[test]
    fn test_timer_floor() {
        let mut state = quiet_game();
        tick(&mut state, 1.0e9, viewport());
        assert_eq!(state.stats.time_remaining, 0.0);
        assert_eq!(state.hud().time_left, 0);
    }

    #[test]
    fn test_terminated_is_final() {
        let mut state = quiet_game();
        state.stats.lives = 1;
        state.objects.push(object_at_player(1, Category::CostsLife));
        state.objects.push(FallingObject {
            pos: Vec2::new(50.0, 0.0),
            ..object_at_player(2, Category::Scores)
        });
        tick(&mut state, DT, viewport());
        assert_eq!(state.phase, RunPhase::Terminated);
        state.drain_events().for_each(drop);

        let frozen = state.snapshot();
        for _ in 0..30 {
            tick(&mut state, DT, viewport());
        }
        assert_eq!(state.snapshot(), frozen);
        assert_eq!(state.drain_events().count(), 0);
    }

    #[test]
    fn test_player_follows_target_and_clamps() {
        let mut state = quiet_game();
        tick(&mut state, DT, viewport());
        assert_eq!(state.player.x, 400.0);

        state.set_player_target(-500.0);
        tick(&mut state, DT, viewport());
        assert_eq!(state.player.x, 30.0);

        // Viewport shrinks between frames; the core re-clamps
        state.set_player_target(780.0);
        tick(&mut state, DT, Viewport::new(600.0, 800.0));
        assert_eq!(state.player.x, 570.0);
    }

    #[test]
    fn test_spawns_on_cadence() {
        let mut state = GameState::new(42);
        state.start();
        // First frame of a run spawns right away
        tick(&mut state, DT, viewport());
        assert_eq!(state.objects.len(), 1);
        // 0.5s: nothing new; a further 0.2s crosses the 0.6s interval
        tick(&mut state, 0.5, viewport());
        assert_eq!(state.objects.len(), 1);
        tick(&mut state, 0.2, viewport());
        assert_eq!(state.objects.len(), 2);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = quiet_game();
        tick(&mut state, 100.0, viewport());
        assert_eq!(state.phase, RunPhase::Terminated);

        assert!(state.start());
        assert!(state.is_running());
        assert_eq!(state.stats.time_remaining, 60.0);
        assert_eq!(state.runs_started, 2);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start();
        state2.start();

        for i in 0..600 {
            let x = 400.0 + 300.0 * (i as f32 * 0.02).sin();
            state1.set_player_target(x);
            state2.set_player_target(x);
            tick(&mut state1, DT, viewport());
            tick(&mut state2, DT, viewport());
        }

        assert_eq!(state1.snapshot(), state2.snapshot());
        assert_eq!(
            state1.drain_events().collect::<Vec<_>>(),
            state2.drain_events().collect::<Vec<_>>()
        );
    }
}
