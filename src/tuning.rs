//! Game balance tuning
//!
//! Every gameplay knob that is not pure geometry. Loaded from JSON so
//! balance passes do not need a rebuild; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Balance parameters (speeds in units/second, durations in seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Player walk speed
    pub player_speed: f32,
    /// Adversary chase speed
    pub chase_speed: f32,
    /// Adversary speed while fleeing after a hit
    pub flee_speed: f32,
    /// Speed multiplier while overlapping a tree
    pub obstacle_slow_factor: f32,

    // === Hit response ===
    /// How long the player cannot move after a hit
    pub stun_secs: f32,
    /// How long further hits are ignored (shorter than stun)
    pub invuln_secs: f32,
    /// How long a hitting adversary runs away
    pub flee_secs: f32,
    /// Distance from the player the adversary is pushed back to
    pub retreat_distance: f32,

    // === Pickups ===
    /// Seconds added per bonus collectible
    pub bonus_time_secs: f32,

    // === Feedback ===
    /// Upper bound on live particles
    pub max_particles: usize,
    /// Screen shake added per hit (0.0 - 1.0)
    pub hit_shake: f32,

    /// Seconds before a completed level advances on its own (None = wait for input)
    pub level_complete_auto_advance: Option<f32>,
}

impl Default for Tuning {
    fn default() -> Self {
        use crate::consts::{ADVERSARY_RADIUS, PLAYER_RADIUS};

        Self {
            player_speed: 192.0,
            chase_speed: 126.0,
            flee_speed: 168.0,
            obstacle_slow_factor: 0.45,

            stun_secs: 1.8,
            invuln_secs: 1.4,
            flee_secs: 1.2,
            retreat_distance: PLAYER_RADIUS + ADVERSARY_RADIUS + 35.0,

            bonus_time_secs: 5.0,

            max_particles: 256,
            hit_shake: 0.6,

            level_complete_auto_advance: None,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from a JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read tuning from a JSON file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read tuning from a file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(err) => {
                log::warn!("Using default tuning ({err})");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invuln_shorter_than_stun() {
        let tuning = Tuning::default();
        assert!(tuning.invuln_secs < tuning.stun_secs);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 250.0 }"#).unwrap();
        assert_eq!(tuning.player_speed, 250.0);
        assert_eq!(tuning.chase_speed, Tuning::default().chase_speed);
        assert_eq!(tuning.level_complete_auto_advance, None);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load("/definitely/not/here/tuning.json");
        assert_eq!(tuning, Tuning::default());
    }
}
