//! Axis-aligned collision detection and combat resolution
//!
//! Every test is a strict-inequality AABB overlap. The resolver runs its
//! passes in a fixed order and marks entities for removal first, compacting
//! the lists only after each scan completes, so a removal can never skip or
//! double-count a neighbour.

use glam::Vec2;

use super::state::{GameEvent, GameSession, Screen};
use crate::consts::*;

/// Axis-aligned bounding box, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Strict-inequality overlap: touching edges do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

/// Apply damage to the player, gated entirely by the invincibility window
pub(crate) fn damage_player(s: &mut GameSession, amount: i32) {
    if s.player.invincible > 0 {
        return;
    }
    s.player.health -= amount;
    s.player.invincible = HIT_INVINCIBILITY;
    s.events.push(GameEvent::Hit);
    if s.player.health <= 0 {
        s.screen = Screen::GameOver;
        log::info!("player down on level {}", s.current_level);
    }
}

/// Run all combat passes for one tick, in the required order:
/// enemy contact, boss contact, player bullets vs enemies, player bullets
/// vs boss, enemy bullets vs player.
pub(crate) fn resolve_combat(s: &mut GameSession) {
    let player_box = s.player.aabb();

    // 1. Player vs each enemy (stable spawn order)
    let contact_hits = s
        .enemies
        .iter()
        .filter(|e| player_box.overlaps(&e.aabb()))
        .count();
    for _ in 0..contact_hits {
        damage_player(s, ENEMY_CONTACT_DAMAGE);
    }

    // 2. Player vs boss
    if s.boss.as_ref().is_some_and(|b| player_box.overlaps(&b.aabb())) {
        damage_player(s, BOSS_CONTACT_DAMAGE);
    }

    // 3. Player bullets vs enemies: mark both sides, compact afterwards
    let bullet_boxes: Vec<Aabb> = s.bullets.iter().map(|b| b.aabb()).collect();
    let enemy_boxes: Vec<Aabb> = s.enemies.iter().map(|e| e.aabb()).collect();
    let mut bullet_used = vec![false; bullet_boxes.len()];
    let mut enemy_dead = vec![false; enemy_boxes.len()];

    for (bi, bullet_box) in bullet_boxes.iter().enumerate() {
        for (ei, enemy_box) in enemy_boxes.iter().enumerate() {
            if enemy_dead[ei] || bullet_used[bi] {
                continue;
            }
            if bullet_box.overlaps(enemy_box) {
                bullet_used[bi] = true;
                enemy_dead[ei] = true;
                s.award_coins(ENEMY_KILL_REWARD);
                s.events.push(GameEvent::Hit);
            }
        }
    }

    // 4. Remaining player bullets vs boss, in order; the bullet that drops
    //    boss health to zero removes the boss, later bullets fly on
    for (bi, bullet_box) in bullet_boxes.iter().enumerate() {
        if bullet_used[bi] {
            continue;
        }
        let mut boss_killed = false;
        if let Some(boss) = s.boss.as_mut() {
            if bullet_box.overlaps(&boss.aabb()) {
                bullet_used[bi] = true;
                boss.health -= PLAYER_BULLET_DAMAGE;
                boss_killed = boss.health <= 0;
            }
        } else {
            break;
        }
        if boss_killed {
            s.boss = None;
            s.award_coins(BOSS_KILL_REWARD);
            s.events.push(GameEvent::Hit);
            log::info!("boss defeated on level {}", s.current_level);
        }
    }

    let mut keep = bullet_used.iter().map(|used| !used);
    s.bullets.retain(|_| keep.next().unwrap_or(true));
    let mut keep = enemy_dead.iter().map(|dead| !dead);
    s.enemies.retain(|_| keep.next().unwrap_or(true));

    // 5. Enemy bullets vs player
    let mut hits = 0u32;
    let player_box = s.player.aabb();
    s.enemy_bullets.retain(|b| {
        if b.aabb().overlaps(&player_box) {
            hits += 1;
            false
        } else {
            true
        }
    });
    for _ in 0..hits {
        damage_player(s, ENEMY_BULLET_DAMAGE);
    }
}
