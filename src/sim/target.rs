//! Targets the player shoots at
//!
//! Targets are stationary circles spawned at random positions in the right
//! half of the field. Each carries an idle job so that pause/resume treats
//! targets uniformly with every other entity.

use glam::Vec2;
use rand::Rng;

use crate::consts::{FIELD_H, FIELD_W, MARGIN};
use crate::sim::events::Color;
use crate::sim::scheduler::JobSlot;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Target {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub job: JobSlot,
}

impl Target {
    /// Random spawn within the target zone: x in [0.4*W, W - margin],
    /// y in [0.4*H, H - margin].
    pub fn spawn<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let x = rng.random_range(FIELD_W * 0.4..=FIELD_W - MARGIN);
        let y = rng.random_range(FIELD_H * 0.4..=FIELD_H - MARGIN);
        let radius = rng.random_range(tuning.target_radius_min..=tuning.target_radius_max);
        Self {
            pos: Vec2::new(x, y),
            radius,
            color: Color::random_spawn(rng),
            job: JobSlot::None,
        }
    }

    /// Rebuild a target from saved fields.
    pub fn from_parts(pos: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            radius,
            color,
            job: JobSlot::None,
        }
    }
}
