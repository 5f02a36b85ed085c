//! Data-driven game balance
//!
//! Every knob defaults to the shipped value in [`crate::consts`]. Tuning files
//! are JSON and may name only the fields they override.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance values read by the level generator and shot controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Ammo before the `level / 2` bonus
    pub base_balls: u32,
    /// Seconds before the per-level bonus
    pub base_time: f32,
    /// Seconds added per level index
    pub time_per_level: f32,
    pub target_radius: f32,
    pub projectile_radius: f32,
    pub launch_speed: f32,
    /// Aim vectors with length `<=` this are rejected
    pub min_aim_length: f32,
    pub off_field_margin: f32,
    /// Cannon height above the bottom edge
    pub cannon_height: f32,
    pub three_star_ratio: f32,
    pub two_star_ratio: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_balls: BASE_BALLS,
            base_time: BASE_TIME,
            time_per_level: TIME_PER_LEVEL,
            target_radius: TARGET_RADIUS,
            projectile_radius: PROJECTILE_RADIUS,
            launch_speed: LAUNCH_SPEED,
            min_aim_length: MIN_AIM_LENGTH,
            off_field_margin: OFF_FIELD_MARGIN,
            cannon_height: CANNON_HEIGHT,
            three_star_ratio: THREE_STAR_RATIO,
            two_star_ratio: TWO_STAR_RATIO,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json).map_err(io::Error::from)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Replace values the simulation cannot work with by their defaults
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        };
        let non_negative = |value: f32, fallback: f32| {
            if value.is_finite() && value >= 0.0 { value } else { fallback }
        };
        let ratio = |value: f32, fallback: f32| {
            if (0.0..=1.0).contains(&value) { value } else { fallback }
        };

        let mut tuning = Self {
            base_balls: self.base_balls,
            base_time: positive(self.base_time, defaults.base_time),
            time_per_level: non_negative(self.time_per_level, defaults.time_per_level),
            target_radius: positive(self.target_radius, defaults.target_radius),
            projectile_radius: positive(self.projectile_radius, defaults.projectile_radius),
            launch_speed: positive(self.launch_speed, defaults.launch_speed),
            min_aim_length: non_negative(self.min_aim_length, defaults.min_aim_length),
            off_field_margin: non_negative(self.off_field_margin, defaults.off_field_margin),
            cannon_height: non_negative(self.cannon_height, defaults.cannon_height),
            three_star_ratio: ratio(self.three_star_ratio, defaults.three_star_ratio),
            two_star_ratio: ratio(self.two_star_ratio, defaults.two_star_ratio),
        };

        if tuning.two_star_ratio > tuning.three_star_ratio {
            log::warn!(
                "two_star_ratio {} above three_star_ratio {}, using defaults",
                tuning.two_star_ratio,
                tuning.three_star_ratio
            );
            tuning.three_star_ratio = defaults.three_star_ratio;
            tuning.two_star_ratio = defaults.two_star_ratio;
        }
        tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "launch_speed": 900.0 }"#).unwrap();
        assert_eq!(tuning.launch_speed, 900.0);
        assert_eq!(tuning.base_balls, BASE_BALLS);
        assert_eq!(tuning.base_time, BASE_TIME);
    }

    #[test]
    fn test_sanitize_rejects_bad_values() {
        let tuning = Tuning {
            launch_speed: -1.0,
            target_radius: f32::NAN,
            three_star_ratio: 1.5,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.launch_speed, LAUNCH_SPEED);
        assert_eq!(tuning.target_radius, TARGET_RADIUS);
        assert_eq!(tuning.three_star_ratio, THREE_STAR_RATIO);
    }

    #[test]
    fn test_inverted_star_ratios_fall_back() {
        let tuning = Tuning {
            three_star_ratio: 0.2,
            two_star_ratio: 0.5,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.three_star_ratio, THREE_STAR_RATIO);
        assert_eq!(tuning.two_star_ratio, TWO_STAR_RATIO);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }
}
