//! Audio system
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a single oscillator with a frequency and gain ramp. The
//! recipes are plain data so they can be inspected off the web; playback uses
//! the Web Audio API on wasm32.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Scoring object caught
    Collect,
    /// Life-costing object caught
    Hit,
    /// Run started
    Start,
    /// Run ended
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::Start => SoundEffect::Start,
            GameEvent::Collect { .. } => SoundEffect::Collect,
            GameEvent::Hit { .. } => SoundEffect::Hit,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }

    /// Synthesis recipe for this effect
    pub fn tone(self) -> Tone {
        match self {
            // High pitched bling
            SoundEffect::Collect => Tone {
                wave: Wave::Sine,
                freq: (500.0, 1000.0),
                ramp: Ramp::Exponential,
                gain: (0.1, 0.01),
                duration: 0.1,
            },
            // Low buzz
            SoundEffect::Hit => Tone {
                wave: Wave::Sawtooth,
                freq: (150.0, 50.0),
                ramp: Ramp::Linear,
                gain: (0.1, 0.01),
                duration: 0.3,
            },
            // Power up
            SoundEffect::Start => Tone {
                wave: Wave::Triangle,
                freq: (220.0, 440.0),
                ramp: Ramp::Linear,
                gain: (0.1, 0.01),
                duration: 0.3,
            },
            // Long falling tone
            SoundEffect::GameOver => Tone {
                wave: Wave::Square,
                freq: (300.0, 100.0),
                ramp: Ramp::Linear,
                gain: (0.1, 0.001),
                duration: 1.0,
            },
        }
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How parameters move from start to end value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// One oscillator note with start/end frequency and gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    /// Hz at start and end
    pub freq: (f32, f32),
    pub ramp: Ramp,
    /// Gain at start and end, before volume scaling
    pub gain: (f32, f32),
    /// Seconds
    pub duration: f64,
}

impl Tone {
    /// Gain envelope scaled by a volume. Exponential ramps can't reach zero,
    /// so the tail is floored at a tiny positive value.
    pub fn scaled_gain(&self, volume: f32) -> (f32, f32) {
        let floor = 1.0e-4;
        (
            (self.gain.0 * volume).max(floor),
            (self.gain.1 * volume).max(floor),
        )
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioParam, OscillatorType};

    use super::{Ramp, SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        /// Pick up volume/mute changes
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            if self.play_tone(ctx, &effect.tone()).is_none() {
                log::warn!("Failed to play {:?}", effect);
            }
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) -> Option<()> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match tone.wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time();
            let end = t + tone.duration;
            let (g0, g1) = tone.scaled_gain(self.volume);

            ramp(&osc.frequency(), tone.ramp, tone.freq.0, tone.freq.1, t, end)?;
            ramp(&gain.gain(), tone.ramp, g0, g1, t, end)?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(end).ok()?;
            Some(())
        }
    }

    fn ramp(param: &AudioParam, kind: Ramp, from: f32, to: f32, t: f64, end: f64) -> Option<()> {
        param.set_value_at_time(from, t).ok()?;
        match kind {
            Ramp::Linear => param.linear_ramp_to_value_at_time(to, end).ok()?,
            Ramp::Exponential => param.exponential_ramp_to_value_at_time(to, end).ok()?,
        };
        Some(())
    }
}

/// Sounds for a batch of events, respecting mute
pub fn sounds_for<'a>(
    events: impl IntoIterator<Item = &'a GameEvent>,
    settings: &Settings,
) -> Vec<SoundEffect> {
    if settings.effective_volume() <= 0.0 {
        return Vec::new();
    }
    events.into_iter().map(SoundEffect::for_event).collect()
}
