//! Serializable game state
//!
//! A snapshot captures everything needed to rebuild the simulation exactly:
//! entity positions and velocities, gun charge state, bullet numbering, the
//! round banner, and which jobs were live (as booleans - concrete job ids are
//! rebuilt on restore). Exploding balls are not captured; a fireball caught
//! mid-animation simply does not survive the save.
//!
//! Validation runs before any state is touched, so loading a malformed
//! snapshot leaves the current game intact.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::events::Color;
use crate::tuning::Tuning;

#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must be positive, got {value}")]
    NonPositiveRadius { field: &'static str, value: f32 },
    #[error("gun power {power} outside [{min}, {max}]")]
    PowerOutOfRange { power: f32, min: f32, max: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GunSnapshot {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub power: f32,
    pub charging: bool,
    pub angle: f32,
    pub job_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub color: Color,
    pub job_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: Color,
    pub life: u32,
    pub job_active: bool,
    pub explosion_job_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub gun: GunSnapshot,
    pub targets: Vec<TargetSnapshot>,
    pub bullets: Vec<BallSnapshot>,
    pub bullet_counter: u32,
    pub last_hit_bullet_number: Option<u32>,
    pub round_text: String,
    pub victory_watcher_active: bool,
    pub restart_job_active: bool,
}

/// Complete save: score plus the whole arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u32,
    pub arena: ArenaSnapshot,
}

fn finite(field: &'static str, value: f32) -> Result<(), SnapshotError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SnapshotError::NonFinite { field })
    }
}

impl Snapshot {
    /// Reject snapshots the simulation could not run with. Called before any
    /// restore work so a failure leaves the running game untouched.
    pub fn validate(&self, tuning: &Tuning) -> Result<(), SnapshotError> {
        let gun = &self.arena.gun;
        finite("gun.x", gun.x)?;
        finite("gun.y", gun.y)?;
        finite("gun.vy", gun.vy)?;
        finite("gun.power", gun.power)?;
        finite("gun.angle", gun.angle)?;
        if !(gun.power >= tuning.min_power && gun.power <= tuning.max_power) {
            return Err(SnapshotError::PowerOutOfRange {
                power: gun.power,
                min: tuning.min_power,
                max: tuning.max_power,
            });
        }

        for t in &self.arena.targets {
            finite("target.x", t.x)?;
            finite("target.y", t.y)?;
            finite("target.r", t.r)?;
            if !(t.r > 0.0) {
                return Err(SnapshotError::NonPositiveRadius {
                    field: "target.r",
                    value: t.r,
                });
            }
        }

        for b in &self.arena.bullets {
            finite("bullet.x", b.x)?;
            finite("bullet.y", b.y)?;
            finite("bullet.vx", b.vx)?;
            finite("bullet.vy", b.vy)?;
        }

        Ok(())
    }
}
