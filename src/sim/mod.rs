//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use level::{clamp_level, default_level_for_stage, enemy_count, level_in_stage, stage_of};
pub use state::{Boss, Bullet, Checkpoint, Enemy, GameEvent, GameSession, Player, Screen};
pub use tick::{TickInput, tick};
