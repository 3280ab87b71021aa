//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed logical tick only (no wall-clock time)
//! - Seeded RNG only
//! - Stable iteration order (entities keyed by id in BTreeMaps)
//! - No rendering or platform dependencies

pub mod arena;
pub mod ball;
pub mod collision;
pub mod events;
pub mod game;
pub mod gun;
pub mod scheduler;
pub mod snapshot;
pub mod target;

pub use arena::Arena;
pub use ball::{Ball, ExplosionPhase, MotionOutcome};
pub use collision::is_hit;
pub use events::{Color, GameEvent, ShapeKind};
pub use game::Game;
pub use gun::{Gun, Shot};
pub use scheduler::{JobId, JobKind, JobMode, JobSlot, Scheduler};
pub use snapshot::{Snapshot, SnapshotError};
pub use target::Target;
