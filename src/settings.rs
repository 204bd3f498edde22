//! Host preferences
//!
//! Audio levels and cosmetic cues. Nothing here affects the simulation.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Visual cues ===
    /// Draw the exhaust flame while the pointer is held
    pub flame_cue: bool,
    /// Pulse the timer when time is running low
    pub low_time_pulse: bool,

    // === Accessibility ===
    /// Reduced motion (no object spin, no timer pulse)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            flame_cue: true,
            low_time_pulse: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, clamping volumes into range
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.set_master_volume(settings.master_volume);
        settings.set_sfx_volume(settings.sfx_volume);
        Ok(settings)
    }

    /// Parse settings from host-supplied JSON, falling back to defaults
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({}) - using defaults", e);
                Self::default()
            }
        }
    }

    /// Flip mute; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = clamp_volume(vol);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = clamp_volume(vol);
    }

    /// Volume applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Whether objects should be drawn rotated
    pub fn effective_spin(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective timer pulse (respects reduced_motion)
    pub fn effective_low_time_pulse(&self) -> bool {
        self.low_time_pulse && !self.reduced_motion
    }
}

fn clamp_volume(vol: f32) -> f32 {
    if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);

        settings.set_sfx_volume(0.5);
        assert!((settings.effective_volume() - 0.4).abs() < 1e-6);

        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_clamped() {
        let mut settings = Settings::default();
        settings.set_master_volume(3.0);
        assert_eq!(settings.master_volume, 1.0);
        settings.set_master_volume(-1.0);
        assert_eq!(settings.master_volume, 0.0);
        settings.set_master_volume(f32::NAN);
        assert_eq!(settings.master_volume, 0.0);
    }

    #[test]
    fn test_reduced_motion() {
        let mut settings = Settings::default();
        assert!(settings.effective_spin());
        assert!(settings.effective_low_time_pulse());

        settings.reduced_motion = true;
        assert!(!settings.effective_spin());
        assert!(!settings.effective_low_time_pulse());
    }

    #[test]
    fn test_from_json() {
        let settings = Settings::from_json(r#"{ "master_volume": 1.7, "flame_cue": false }"#).unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert!(!settings.flame_cue);
        assert_eq!(settings.sfx_volume, 1.0);

        assert!(Settings::from_json("42").is_err());
    }

    #[test]
    fn test_from_json_or_default() {
        let settings = Settings::from_json_or_default(r#"{ "muted": true, "sfx_volume": -2 }"#);
        assert!(settings.muted);
        assert_eq!(settings.sfx_volume, 0.0);

        assert_eq!(Settings::from_json_or_default("not json"), Settings::default());
    }

    #[test]
    fn test_toggle_mute() {
        let mut settings = Settings::default();
        assert!(settings.toggle_mute());
        assert_eq!(settings.effective_volume(), 0.0);
        assert!(!settings.toggle_mute());
        assert!(settings.effective_volume() > 0.0);
    }
}
