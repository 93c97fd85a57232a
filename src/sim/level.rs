//! Stage/level arithmetic and per-level spawn generation
//!
//! Levels are numbered 1..=TOTAL_LEVELS and grouped into stages of
//! LEVELS_PER_STAGE. Spawning is deterministic given the session RNG, which
//! `GameSession::start_level` reseeds from (seed, level).

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Boss, Enemy};
use crate::consts::*;

/// Clamp a requested level id into the valid range
pub fn clamp_level(id: u32) -> u32 {
    id.clamp(1, TOTAL_LEVELS)
}

/// Stage a level belongs to, `ceil(level / LEVELS_PER_STAGE)`
pub fn stage_of(level: u32) -> u32 {
    level.div_ceil(LEVELS_PER_STAGE).clamp(1, TOTAL_STAGES)
}

/// 1-based index of a level within its stage
pub fn level_in_stage(level: u32) -> u32 {
    (clamp_level(level) - 1) % LEVELS_PER_STAGE + 1
}

/// Level highlighted when entering a stage on the level-select screen:
/// the stage start if nothing there is unlocked yet, otherwise the
/// furthest unlocked level within the stage.
pub fn default_level_for_stage(stage: u32, unlocked_level: u32) -> u32 {
    let stage_start = (stage - 1) * LEVELS_PER_STAGE + 1;
    let stage_end = stage * LEVELS_PER_STAGE;
    if unlocked_level < stage_start {
        stage_start
    } else {
        unlocked_level.min(stage_end)
    }
}

/// Enemy count for a level, scaling with stage and in-stage index
pub fn enemy_count(stage: u32, in_stage: u32) -> u32 {
    (4 + stage + in_stage / 2).min(MAX_ENEMIES)
}

/// Generate the enemy set for a level attempt
pub fn spawn_enemies(level: u32, rng: &mut Pcg32) -> Vec<Enemy> {
    let stage = stage_of(level);
    let in_stage = level_in_stage(level);
    let count = enemy_count(stage, in_stage);

    let spread = (LEVEL_WIDTH - 900.0) / count as f32;
    (0..count)
        .map(|i| {
            let spawn_x = 500.0 + i as f32 * spread + rng.random_range(0.0..100.0);
            Enemy {
                pos: Vec2::new(spawn_x, GROUND_Y - 75.0),
                size: Vec2::new(55.0, 75.0),
                speed: 1.8 + stage as f32 * 0.08,
                range: 120.0 + in_stage as f32 * 6.0,
                start_x: spawn_x,
                facing: -1,
                shoot_cooldown: rng.random_range(70..160),
            }
        })
        .collect()
}

/// The end-of-level boss, parked near the far end of the level
pub fn spawn_boss() -> Boss {
    Boss {
        pos: Vec2::new(LEVEL_WIDTH - 320.0, GROUND_Y - 100.0),
        size: Vec2::new(90.0, 100.0),
        speed: 2.2,
        range: 180.0,
        start_x: LEVEL_WIDTH - 320.0,
        facing: -1,
        health: BOSS_MAX_HEALTH,
        max_health: BOSS_MAX_HEALTH,
        shoot_cooldown: 40,
    }
}
