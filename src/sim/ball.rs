//! Ball flight and explosion
//!
//! A ball integrates under gravity each tick, bounces off the side walls and
//! the floor with damping, and detonates once it is crawling along the floor.
//! The explosion is its own staged animation driven by a separate job, so a
//! pause mid-fireball resumes exactly where it left off.

use glam::Vec2;

use crate::consts::{
    DETONATION_BAND, EXPLOSION_RADIUS_STEP, EXPLOSION_RISE, EXPLOSION_STAGES, FLOOR_Y, LEFT_X,
    RIGHT_X,
};
use crate::sim::events::Color;
use crate::sim::scheduler::JobSlot;
use crate::tuning::Tuning;

/// What `integrate` decided for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// Still in flight; bounce and reschedule.
    Flying,
    /// Too slow near the floor; begin the explosion.
    Spent,
}

/// One step of the explosion animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionPhase {
    /// Fireball grew another stage; schedule the next one.
    Growing,
    /// Animation finished; remove the ball.
    Done,
}

#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    /// Velocity with y pointing up, unlike screen coordinates
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Sequence number within the current round, first shot is 1
    pub bullet_number: u32,
    /// Vestigial hit-point counter, carried through saves
    pub life: u32,
    /// 0 while live; counts explosion stages once detonated
    pub explosion_stage: u8,
    pub job: JobSlot,
    pub explosion_job: JobSlot,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, color: Color, bullet_number: u32, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel,
            radius: tuning.ball_radius,
            color,
            bullet_number,
            life: crate::consts::BALL_LIFE,
            explosion_stage: 0,
            job: JobSlot::None,
            explosion_job: JobSlot::None,
        }
    }

    /// Still flying, not yet detonated.
    pub fn is_live(&self) -> bool {
        self.explosion_stage == 0
    }

    /// Advance one tick of flight: move, apply gravity, and check whether the
    /// ball has spent itself crawling along the floor.
    pub fn integrate(&mut self, tuning: &Tuning) -> MotionOutcome {
        self.pos.x += self.vel.x;
        self.pos.y -= self.vel.y;
        self.vel.y -= tuning.gravity;

        // Inclusive so a ball sitting exactly at the stop speed detonates
        let slow = self.vel.length_squared() <= tuning.stop_speed * tuning.stop_speed;
        if slow && FLOOR_Y - self.pos.y < DETONATION_BAND {
            MotionOutcome::Spent
        } else {
            MotionOutcome::Flying
        }
    }

    /// Reflect off walls and floor with damping. Wall bounces mirror the
    /// position about the bound; floor bounces get an upward kick first, and
    /// a rebound slower than the stop speed is zeroed so the ball settles.
    pub fn bounce(&mut self, tuning: &Tuning) {
        let j = tuning.restitution;

        if self.pos.x < LEFT_X {
            self.vel.x = -self.vel.x * j;
            self.vel.y *= j;
            self.pos.x = 2.0 * LEFT_X - self.pos.x;
        } else if self.pos.x > RIGHT_X {
            self.vel.x = -self.vel.x * j;
            self.vel.y *= j;
            self.pos.x = 2.0 * RIGHT_X - self.pos.x;
        }

        if self.pos.y > FLOOR_Y {
            self.vel.x *= j;
            self.vel.y += tuning.floor_kick;
            self.vel.y = -self.vel.y * j;
            if self.vel.y.abs() < tuning.stop_speed {
                self.vel.y = 0.0;
            }
            self.pos.y = 2.0 * FLOOR_Y - self.pos.y;
        }
    }

    /// Advance the explosion one stage. The first call recolors the ball into
    /// a fireball; each stage grows the radius and drifts the ball upward.
    pub fn explode_step(&mut self) -> ExplosionPhase {
        if self.explosion_stage == 0 {
            self.color = Color::Yellow;
        }
        if self.explosion_stage < EXPLOSION_STAGES {
            // Radius uses the pre-increment stage, so the first frame is a
            // point that grows over the following frames
            self.radius = EXPLOSION_RADIUS_STEP * f32::from(self.explosion_stage);
            self.pos.y -= EXPLOSION_RISE;
            self.explosion_stage += 1;
            ExplosionPhase::Growing
        } else {
            ExplosionPhase::Done
        }
    }
}
