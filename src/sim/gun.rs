//! Gun aiming and firing state machine
//!
//! The gun sits at a fixed x, slides vertically inside its band, charges
//! while the trigger is held, and re-aims at the polled pointer position
//! every tick. Firing hands a `Shot` back to the arena, which owns ball
//! creation and numbering.

use glam::Vec2;

use crate::angle_dir;
use crate::consts::{FIELD_H, FLOOR_Y, GUN_START_Y, GUN_X, VERTICAL_AIM_ANGLE};
use crate::sim::scheduler::JobSlot;
use crate::tuning::Tuning;

/// Spawn parameters for a ball released by `fire_end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone)]
pub struct Gun {
    /// Mount position; x never changes
    pub pos: Vec2,
    /// Vertical mount velocity (screen-down positive)
    pub vy: f32,
    /// Stored charge, clamped to [min_power, max_power]
    pub power: f32,
    pub charging: bool,
    /// Aim angle in screen coordinates
    pub angle: f32,
    /// Last polled pointer position; blanked on pause so resuming never
    /// replays stale input
    pub pointer: Option<Vec2>,
    pub job: JobSlot,
}

impl Gun {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(GUN_X, GUN_START_Y),
            vy: 0.0,
            power: tuning.min_power,
            charging: false,
            angle: VERTICAL_AIM_ANGLE,
            pointer: None,
            job: JobSlot::None,
        }
    }

    /// One tick while running: charge, slide within the band, re-aim.
    pub fn step(&mut self, tuning: &Tuning) {
        if self.charging && self.power < tuning.max_power {
            // Clamp so a gain that does not evenly divide the band cannot
            // push the charge past the ceiling
            self.power = (self.power + tuning.power_gain).min(tuning.max_power);
        }

        self.pos.y = (self.pos.y + self.vy).clamp(FIELD_H / 2.0, FLOOR_Y);

        if let Some(pointer) = self.pointer {
            let d = pointer - self.pos;
            self.angle = if d.x == 0.0 {
                VERTICAL_AIM_ANGLE
            } else {
                d.y.atan2(d.x)
            };
        }
    }

    /// Barrel end point; barrel length tracks the stored charge.
    pub fn tip(&self, tuning: &Tuning) -> Vec2 {
        self.pos + angle_dir(self.angle) * (self.power + tuning.barrel_base_len)
    }

    pub fn fire_start(&mut self) {
        self.charging = true;
    }

    /// Release the trigger: returns the shot to spawn and resets the charge.
    pub fn fire_end(&mut self, tuning: &Tuning) -> Shot {
        self.charging = false;
        let shot = Shot {
            pos: self.tip(tuning),
            vel: Vec2::new(
                self.power * self.angle.cos(),
                -self.power * self.angle.sin(),
            ),
        };
        self.power = tuning.min_power;
        shot
    }

    pub fn move_up(&mut self, tuning: &Tuning) {
        self.vy = -tuning.gun_speed;
    }

    pub fn move_down(&mut self, tuning: &Tuning) {
        self.vy = tuning.gun_speed;
    }

    pub fn halt(&mut self) {
        self.vy = 0.0;
    }

    /// Drop all transient input state (pause and stop both go through here).
    pub fn release_inputs(&mut self) {
        self.charging = false;
        self.vy = 0.0;
        self.pointer = None;
    }
}
