//! Data-driven game balance
//!
//! Every game-feel constant lives here so a run can be retuned from JSON
//! without touching the simulation. Missing fields fall back to the values
//! in [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Run length (seconds)
    pub game_duration: f32,
    /// Lives at run start
    pub max_lives: u32,

    /// Ship glyph size / horizontal footprint (pixels)
    pub player_size: f32,
    /// Collision point height above the viewport bottom (pixels)
    pub player_offset_from_bottom: f32,
    /// Added to half the ship size to form the hit radius
    pub hit_padding: f32,
    /// Divisor applied to object size when testing contact
    pub object_hit_divisor: f32,

    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Chance a spawn costs a life when caught (0..=1)
    pub costs_life_chance: f64,
    /// Spawn height (pixels, negative is above the top edge)
    pub spawn_y: f32,
    /// Fall speed range (pixels per nominal frame)
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    /// Viewport height at which fall speed is unscaled
    pub reference_height: f32,
    /// Object size range (pixels)
    pub object_size_min: f32,
    pub object_size_max: f32,
    /// Max spin (degrees per nominal frame)
    pub rotation_speed_max: f32,

    /// Distance below the bottom edge at which objects are discarded
    pub overflow_margin: f32,
    /// Points per caught scoring object
    pub collect_reward: u32,
    /// Frame rate that per-frame speeds refer to
    pub nominal_frame_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_duration: GAME_DURATION,
            max_lives: MAX_LIVES,

            player_size: PLAYER_SIZE,
            player_offset_from_bottom: PLAYER_OFFSET_FROM_BOTTOM,
            hit_padding: HIT_PADDING,
            object_hit_divisor: OBJECT_HIT_DIVISOR,

            spawn_interval: SPAWN_INTERVAL,
            costs_life_chance: COSTS_LIFE_CHANCE,
            spawn_y: SPAWN_Y,
            fall_speed_min: FALL_SPEED_MIN,
            fall_speed_max: FALL_SPEED_MAX,
            reference_height: REFERENCE_HEIGHT,
            object_size_min: OBJECT_SIZE_MIN,
            object_size_max: OBJECT_SIZE_MAX,
            rotation_speed_max: ROTATION_SPEED_MAX,

            overflow_margin: OVERFLOW_MARGIN,
            collect_reward: COLLECT_REWARD,
            nominal_frame_rate: NOMINAL_FRAME_RATE,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every knob is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: "must be a non-negative finite number",
                })
            }
        }

        positive("game_duration", self.game_duration)?;
        if self.max_lives == 0 {
            return Err(TuningError::Invalid {
                field: "max_lives",
                reason: "must be at least 1",
            });
        }

        positive("player_size", self.player_size)?;
        non_negative("player_offset_from_bottom", self.player_offset_from_bottom)?;
        non_negative("hit_padding", self.hit_padding)?;
        positive("object_hit_divisor", self.object_hit_divisor)?;

        positive("spawn_interval", self.spawn_interval)?;
        if !(0.0..=1.0).contains(&self.costs_life_chance) {
            return Err(TuningError::Invalid {
                field: "costs_life_chance",
                reason: "must be between 0 and 1",
            });
        }
        if !self.spawn_y.is_finite() {
            return Err(TuningError::Invalid {
                field: "spawn_y",
                reason: "must be finite",
            });
        }

        positive("fall_speed_min", self.fall_speed_min)?;
        positive("fall_speed_max", self.fall_speed_max)?;
        if self.fall_speed_min > self.fall_speed_max {
            return Err(TuningError::Invalid {
                field: "fall_speed_min",
                reason: "must not exceed fall_speed_max",
            });
        }
        positive("reference_height", self.reference_height)?;

        positive("object_size_min", self.object_size_min)?;
        positive("object_size_max", self.object_size_max)?;
        if self.object_size_min > self.object_size_max {
            return Err(TuningError::Invalid {
                field: "object_size_min",
                reason: "must not exceed object_size_max",
            });
        }
        non_negative("rotation_speed_max", self.rotation_speed_max)?;

        non_negative("overflow_margin", self.overflow_margin)?;
        positive("nominal_frame_rate", self.nominal_frame_rate)?;

        Ok(())
    }

    /// Radius of the ship's hit circle (before object size is added)
    #[inline]
    pub fn player_hit_radius(&self) -> f32 {
        self.player_size / 2.0 + self.hit_padding
    }

    /// Height of the ship's collision point for a viewport height
    #[inline]
    pub fn player_y(&self, viewport_height: f32) -> f32 {
        viewport_height - self.player_offset_from_bottom
    }

    /// Objects below this line are discarded
    #[inline]
    pub fn discard_line(&self, viewport_height: f32) -> f32 {
        viewport_height + self.overflow_margin
    }
}

/// Why a tuning file was rejected
#[derive(Debug)]
pub enum TuningError {
    /// JSON was malformed or had the wrong shape
    Parse(serde_json::Error),
    /// A value parsed but is out of range
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "failed to parse tuning: {e}"),
            TuningError::Invalid { field, reason } => {
                write!(f, "invalid tuning value `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.player_hit_radius(), 40.0);
        assert_eq!(tuning.player_y(800.0), 700.0);
        assert_eq!(tuning.discard_line(800.0), 850.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let tuning = Tuning::from_json(r#"{ "game_duration": 30.0, "max_lives": 5 }"#).unwrap();
        assert_eq!(tuning.game_duration, 30.0);
        assert_eq!(tuning.max_lives, 5);
        // Untouched fields keep their defaults
        assert_eq!(tuning.collect_reward, COLLECT_REWARD);
        assert_eq!(tuning.spawn_interval, SPAWN_INTERVAL);
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let err = Tuning::from_json(r#"{ "fall_speed_min": 9.0, "fall_speed_max": 3.0 }"#)
            .unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "fall_speed_min"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut tuning = Tuning::default();
        tuning.max_lives = 0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.costs_life_chance = 1.5;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.spawn_interval = 0.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.nominal_frame_rate = f32::NAN;
        let msg = tuning.validate().unwrap_err().to_string();
        assert!(msg.contains("nominal_frame_rate"));
    }
}
