//! Events emitted toward the presentation layer
//!
//! The arena accumulates events during a tick; `Game::step` drains them.
//! Shape events are the abstract rendering sink (create/update/delete with
//! position, radius, color); the rest report scoring and round flow.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Palette shared by balls and targets. Yellow marks explosions; orange and
/// black are reserved for the gun barrel (charging / idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Green,
    Red,
    Brown,
    Yellow,
    Orange,
    Black,
}

impl Color {
    const SPAWN_CHOICES: [Color; 4] = [Color::Blue, Color::Green, Color::Red, Color::Brown];

    /// Random spawn color for a new ball or target.
    pub fn random_spawn<R: Rng>(rng: &mut R) -> Color {
        Self::SPAWN_CHOICES[rng.random_range(0..Self::SPAWN_CHOICES.len())]
    }
}

/// What kind of shape an entity presents as. Balls and targets are circles;
/// the gun barrel is not an entity and reports through `GunMoved` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
}

/// Events drained from the arena after each tick.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EntityCreated {
        id: u64,
        kind: ShapeKind,
        x: f32,
        y: f32,
        r: f32,
        color: Color,
    },
    EntityMoved {
        id: u64,
        x: f32,
        y: f32,
        r: f32,
        color: Color,
    },
    EntityDestroyed {
        id: u64,
    },
    /// Gun barrel segment from mount to tip; tip position encodes both the
    /// aim angle and the stored charge (barrel length grows while charging).
    /// Orange while the trigger is held, black otherwise.
    GunMoved {
        x: f32,
        y: f32,
        tip_x: f32,
        tip_y: f32,
        color: Color,
    },
    /// A ball passed through a target this tick.
    HitScored {
        bullet_number: u32,
        target_id: u64,
    },
    /// All targets are gone; a delayed restart has been scheduled.
    RoundOver {
        shots: u32,
    },
    /// A fresh round just began (manual new game or delayed restart).
    RoundStarted,
}
