//! Data-driven game balance
//!
//! Values that shape how the game plays. Defaults match the shipped game;
//! the native binary accepts a JSON override file for experiments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a tuning override was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for `Tuning`
    Json(serde_json::Error),
    /// Parsed, but a value would break the simulation
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Json(e) => write!(f, "bad tuning json: {}", e),
            TuningError::Invalid { field, reason } => {
                write!(f, "tuning `{}` {}", field, reason)
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Json(e)
    }
}

/// Balance knobs consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Player movement speed (pixels/s)
    pub player_speed: f32,
    /// Half the player's sprite frame, used to keep it on screen
    pub player_half_extent: f32,
    /// Walk cycle rate (frames/s)
    pub player_anim_fps: f32,

    // === Attackers ===
    /// Attacker speed range (pixels/s)
    pub attacker_speed_min: f32,
    pub attacker_speed_max: f32,
    pub attacker_half_extent: f32,
    /// Strafe oscillation frequency range (rad/s)
    pub orbit_freq_min: f32,
    pub orbit_freq_max: f32,
    /// Strafe amplitude range (pixels)
    pub orbit_radius_min: f32,
    pub orbit_radius_max: f32,
    /// Attackers closer than this push each other apart
    pub separation_radius: f32,
    /// Separation weight relative to the unit chase vector
    pub separation_weight: f32,
    /// Attackers start on a ring of this radius
    pub spawn_ring_radius: f32,

    // === Shooting ===
    /// Seconds between shots per attacker
    pub shot_interval: f32,
    /// Max random initial cooldown so attackers don't volley together
    pub shot_jitter: f32,
    /// Arrow speed (pixels/s)
    pub projectile_speed: f32,
    /// Arrow lifetime (seconds)
    pub projectile_life: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 350.0,
            player_half_extent: 24.0,
            player_anim_fps: 10.0,

            attacker_speed_min: 95.0,
            attacker_speed_max: 125.0,
            attacker_half_extent: 24.0,
            orbit_freq_min: 0.7,
            orbit_freq_max: 1.3,
            orbit_radius_min: 170.0,
            orbit_radius_max: 250.0,
            separation_radius: 300.0,
            separation_weight: 3.0,
            spawn_ring_radius: 150.0,

            shot_interval: 3.0,
            shot_jitter: 2.0,
            projectile_speed: 260.0,
            projectile_life: 5.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value the simulation samples from or divides by
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("player_speed", self.player_speed),
            ("player_half_extent", self.player_half_extent),
            ("player_anim_fps", self.player_anim_fps),
            ("attacker_speed_min", self.attacker_speed_min),
            ("attacker_speed_max", self.attacker_speed_max),
            ("attacker_half_extent", self.attacker_half_extent),
            ("orbit_freq_min", self.orbit_freq_min),
            ("orbit_freq_max", self.orbit_freq_max),
            ("orbit_radius_min", self.orbit_radius_min),
            ("orbit_radius_max", self.orbit_radius_max),
            ("separation_radius", self.separation_radius),
            ("separation_weight", self.separation_weight),
            ("spawn_ring_radius", self.spawn_ring_radius),
            ("shot_interval", self.shot_interval),
            ("shot_jitter", self.shot_jitter),
            ("projectile_speed", self.projectile_speed),
            ("projectile_life", self.projectile_life),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite and not negative",
                });
            }
        }

        let ranges = [
            ("attacker_speed_min", self.attacker_speed_min, self.attacker_speed_max),
            ("orbit_freq_min", self.orbit_freq_min, self.orbit_freq_max),
            ("orbit_radius_min", self.orbit_radius_min, self.orbit_radius_max),
        ];
        for (field, min, max) in ranges {
            if min > max {
                return Err(TuningError::Invalid {
                    field,
                    reason: "is greater than its max",
                });
            }
        }

        let positive = [
            ("player_anim_fps", self.player_anim_fps),
            ("separation_radius", self.separation_radius),
            ("shot_interval", self.shot_interval),
            ("projectile_life", self.projectile_life),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "shot_interval": 1.5 }"#).unwrap();
        assert_eq!(tuning.shot_interval, 1.5);
        assert_eq!(tuning.projectile_speed, Tuning::default().projectile_speed);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            Tuning::from_json("{ shot_interval: "),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Tuning::from_json(r#"{ "attacker_speed_min": 200.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "attacker_speed_min",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_jitter_rejected() {
        let err = Tuning::from_json(r#"{ "shot_jitter": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "shot_jitter", .. }));
    }

    #[test]
    fn test_zero_separation_radius_rejected() {
        assert!(Tuning::from_json(r#"{ "separation_radius": 0.0 }"#).is_err());
    }
}
