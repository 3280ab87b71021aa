//! Data-driven gameplay constants
//!
//! Everything a balance pass would want to touch lives here. Defaults match
//! the classic ruleset; `validate` rejects configurations the simulation
//! cannot run with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected at construction: the simulation never runs with a bad config.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("gun power range is empty: min {min} >= max {max}")]
    EmptyPowerRange { min: f32, max: f32 },
    #[error("target radius range is empty: min {min} > max {max}")]
    EmptyRadiusRange { min: f32, max: f32 },
    #[error("restitution {0} must be in (0, 1)")]
    RestitutionOutOfRange(f32),
    #[error("at least one target per round is required")]
    NoTargets,
}

/// Gameplay constants, persisted separately from game saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Vertical mount speed while a move key is held (units/tick)
    pub gun_speed: f32,
    /// Charge gained per tick while the trigger is held
    pub power_gain: f32,
    /// Charge immediately after firing, and the floor of the charge band
    pub min_power: f32,
    /// Charge ceiling
    pub max_power: f32,
    /// Barrel length at zero charge
    pub barrel_base_len: f32,

    /// Projectile radius
    pub ball_radius: f32,
    /// Velocity fraction kept through a bounce
    pub restitution: f32,
    /// Below this speed a floor contact stops the ball
    pub stop_speed: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Upward nudge applied before damping a floor bounce
    pub floor_kick: f32,

    /// Targets spawned per round
    pub num_targets: u32,
    pub target_radius_min: f32,
    pub target_radius_max: f32,

    /// Ticks the round-over text stays up before the automatic restart
    pub victory_display_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gun_speed: 1.0,
            power_gain: 1.0,
            min_power: 10.0,
            max_power: 70.0,
            barrel_base_len: 20.0,

            ball_radius: 10.0,
            restitution: 0.7,
            stop_speed: 3.0,
            gravity: 1.6,
            floor_kick: 1.8,

            num_targets: 4,
            target_radius_min: 10.0,
            target_radius_max: 20.0,

            victory_display_ticks: 100,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("gun_speed", self.gun_speed),
            ("power_gain", self.power_gain),
            ("min_power", self.min_power),
            ("ball_radius", self.ball_radius),
            ("stop_speed", self.stop_speed),
            ("gravity", self.gravity),
            ("target_radius_min", self.target_radius_min),
        ];
        for (name, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if self.min_power >= self.max_power {
            return Err(ConfigError::EmptyPowerRange {
                min: self.min_power,
                max: self.max_power,
            });
        }
        if self.target_radius_min > self.target_radius_max {
            return Err(ConfigError::EmptyRadiusRange {
                min: self.target_radius_min,
                max: self.target_radius_max,
            });
        }
        if !(self.restitution > 0.0 && self.restitution < 1.0) {
            return Err(ConfigError::RestitutionOutOfRange(self.restitution));
        }
        if self.num_targets == 0 {
            return Err(ConfigError::NoTargets);
        }
        Ok(())
    }
}
