//! Gunfield - a deterministic artillery range simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, entities, collisions, snapshots)
//! - `persistence`: Save/load of snapshots as JSON
//! - `tuning`: Data-driven gameplay constants with validation
//!
//! Rendering, menus and input binding are external collaborators: the core
//! consumes abstract input events and emits abstract shape/score events.

pub mod persistence;
pub mod sim;
pub mod tuning;

pub use sim::game::Game;
pub use tuning::Tuning;

use glam::Vec2;

/// Field geometry and fixed gameplay constants
pub mod consts {
    /// Playing field dimensions (logical pixels, y grows downward)
    pub const FIELD_W: f32 = 800.0;
    pub const FIELD_H: f32 = 600.0;
    /// Border kept clear around the playable area
    pub const MARGIN: f32 = 100.0;
    /// Floor line balls bounce off
    pub const FLOOR_Y: f32 = FIELD_H - MARGIN;
    /// Left and right bounce bounds
    pub const LEFT_X: f32 = MARGIN;
    pub const RIGHT_X: f32 = FIELD_W - MARGIN;

    /// Gun mount: fixed x, starting y; the mount moves in [FIELD_H/2, FLOOR_Y]
    pub const GUN_X: f32 = MARGIN + 20.0;
    pub const GUN_START_Y: f32 = FIELD_H * 0.66;

    /// Aim angle used when the pointer sits exactly vertical of the muzzle.
    /// Deliberately 1 radian, not pi/2; saves depend on it (see DESIGN.md).
    pub const VERTICAL_AIM_ANGLE: f32 = 1.0;

    /// Explosion staging: radius scales with stage index and the fireball
    /// drifts up a little each stage
    pub const EXPLOSION_STAGES: u8 = 7;
    pub const EXPLOSION_RADIUS_STEP: f32 = 4.6;
    pub const EXPLOSION_RISE: f32 = 3.6;

    /// A ball slower than the stop speed within this distance of the floor
    /// detonates instead of bouncing
    pub const DETONATION_BAND: f32 = 5.0;

    /// Vestigial per-ball life value, carried through saves
    pub const BALL_LIFE: u32 = 100;
}

/// Unit direction vector for an angle in screen coordinates
#[inline]
pub fn angle_dir(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
