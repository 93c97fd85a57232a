//! Pixel Commando - a side-scrolling run-and-gun platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game session)
//! - `ads`: Rewarded-ad broker and vendor adapters
//! - `progress`: Persistent player progress and the character shop
//! - `settings`: Device-local preferences (vendor choice, mute)
//! - `audio`: Web Audio tone synthesis with ad ducking
//! - `app`: Top-level `Game` aggregate and presentation snapshot

pub mod ads;
pub mod app;
pub mod audio;
pub mod progress;
pub mod settings;
pub mod sim;

pub use ads::{AdBroker, AdOutcome, AdPurpose, VendorKind};
pub use app::{Command, Game, Snapshot};
pub use progress::Progress;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Reference simulation rate (one tick per display frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Level dimensions
    pub const LEVEL_WIDTH: f32 = 3000.0;
    pub const GROUND_Y: f32 = 400.0;

    /// Level/stage layout
    pub const TOTAL_STAGES: u32 = 8;
    pub const LEVELS_PER_STAGE: u32 = 10;
    pub const TOTAL_LEVELS: u32 = TOTAL_STAGES * LEVELS_PER_STAGE;

    /// Player defaults
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 55.0;
    pub const PLAYER_HEIGHT: f32 = 75.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_JUMP: f32 = 12.0;
    pub const PLAYER_MAX_HEALTH: i32 = 100;

    /// Constant downward acceleration per tick
    pub const GRAVITY: f32 = 0.6;

    /// Invincibility windows (ticks)
    pub const SPAWN_INVINCIBILITY: u32 = 60;
    pub const HIT_INVINCIBILITY: u32 = 40;
    pub const REVIVE_INVINCIBILITY: u32 = 90;

    /// Damage amounts
    pub const ENEMY_CONTACT_DAMAGE: i32 = 25;
    pub const BOSS_CONTACT_DAMAGE: i32 = 35;
    pub const ENEMY_BULLET_DAMAGE: i32 = 20;
    pub const PLAYER_BULLET_DAMAGE: i32 = 12;

    /// Coin rewards
    pub const ENEMY_KILL_REWARD: u64 = 20;
    pub const BOSS_KILL_REWARD: u64 = 200;
    pub const WIN_BASE_REWARD: u64 = 100;

    /// Enemy cap per level
    pub const MAX_ENEMIES: u32 = 16;

    /// Boss tuning
    pub const BOSS_MAX_HEALTH: i32 = 450;
    /// Player x that triggers the boss spawn
    pub const BOSS_TRIGGER_X: f32 = LEVEL_WIDTH - 800.0;
    /// Player x past which the cleared level is won
    pub const WIN_ZONE_X: f32 = LEVEL_WIDTH - 100.0;

    /// Bullets are culled outside [-margin, LEVEL_WIDTH + margin]
    pub const BULLET_CULL_MARGIN: f32 = 20.0;

    /// Rewarded-ad lifecycle bounds (ticks)
    pub const AD_TIMEOUT_TICKS: u32 = 9 * TICKS_PER_SECOND;
    /// Simulated-vendor delay before granting
    pub const SIMULATED_AD_TICKS: u32 = 24;
}
