//! Fixed timestep simulation tick
//!
//! Advances one frame: player physics, enemy/boss patrol and fire, bullet
//! integration, combat resolution, then the win check.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::level;
use super::state::{Bullet, GameEvent, GameSession, Screen};
use crate::consts::*;

/// Input sampled for a single tick. Direction flags are level-triggered
/// (held), jump/shoot are edge-triggered and cleared by the driver after
/// each frame.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
}

/// Advance the session by exactly one frame
pub fn tick(s: &mut GameSession, input: &TickInput) {
    // The invincibility window runs down in every screen, floored at zero
    if s.player.invincible > 0 {
        s.player.invincible -= 1;
    }

    if s.screen != Screen::Play {
        return;
    }

    update_player(s, input);
    update_enemies(s);

    // Every level has an end boss, spawned exactly once per attempt
    if !s.boss_spawned && s.player.pos.x > BOSS_TRIGGER_X {
        s.boss = Some(level::spawn_boss());
        s.boss_spawned = true;
        log::info!("boss spawned on level {}", s.current_level);
    }
    update_boss(s);

    integrate_bullets(s);
    collision::resolve_combat(s);

    // Win requires all three: boss triggered, boss defeated, end zone reached
    if s.boss_spawned && s.boss.is_none() && s.player.pos.x > WIN_ZONE_X {
        s.level_complete();
    }
}

fn update_player(s: &mut GameSession, input: &TickInput) {
    // Instantaneous horizontal velocity, no acceleration or friction
    if input.right {
        s.player.vel.x = PLAYER_SPEED;
        s.player.facing = 1;
    } else if input.left {
        s.player.vel.x = -PLAYER_SPEED;
        s.player.facing = -1;
    } else {
        s.player.vel.x = 0.0;
    }

    if input.jump && s.player.on_ground {
        s.player.vel.y = -PLAYER_JUMP;
        s.player.on_ground = false;
        s.events.push(GameEvent::Jump);
    }

    s.player.vel.y += GRAVITY;
    let vel = s.player.vel;
    s.player.pos += vel;

    // Ground clamp
    if s.player.pos.y + s.player.size.y > GROUND_Y {
        s.player.pos.y = GROUND_Y - s.player.size.y;
        s.player.vel.y = 0.0;
        s.player.on_ground = true;
    } else {
        s.player.on_ground = false;
    }

    // Revive checkpoint follows the player through active play
    s.checkpoint.pos = s.player.pos;

    // Level boundaries
    let max_x = LEVEL_WIDTH - s.player.size.x;
    s.player.pos.x = s.player.pos.x.clamp(0.0, max_x);

    if input.shoot {
        let bullet = spawn_bullet(
            s.player.pos,
            s.player.size,
            s.player.facing,
            28.0,
            8.0,
            Vec2::new(14.0, 6.0),
            10.0,
        );
        s.bullets.push(bullet);
        s.events.push(GameEvent::PlayerShot);
    }
}

/// Build a bullet at an entity's leading edge
fn spawn_bullet(
    pos: Vec2,
    size: Vec2,
    facing: i8,
    y_offset: f32,
    speed: f32,
    bullet_size: Vec2,
    back_offset: f32,
) -> Bullet {
    let x = if facing >= 0 {
        pos.x + size.x
    } else {
        pos.x - back_offset
    };
    Bullet {
        pos: Vec2::new(x, pos.y + y_offset),
        size: bullet_size,
        speed: speed * f32::from(facing),
    }
}

fn update_enemies(s: &mut GameSession) {
    let player_x = s.player.pos.x;
    for enemy in &mut s.enemies {
        // Reflecting patrol around the spawn point
        enemy.pos.x += enemy.speed;
        if (enemy.pos.x - enemy.start_x).abs() > enemy.range {
            enemy.speed = -enemy.speed;
        }
        enemy.facing = if player_x >= enemy.pos.x { 1 } else { -1 };

        enemy.shoot_cooldown -= 1;
        if enemy.shoot_cooldown <= 0 {
            let bullet = spawn_bullet(
                enemy.pos,
                enemy.size,
                enemy.facing,
                25.0,
                6.0,
                Vec2::new(12.0, 5.0),
                8.0,
            );
            s.enemy_bullets.push(bullet);
            s.events.push(GameEvent::EnemyShot);
            enemy.shoot_cooldown = s.rng.random_range(120..220);
        }
    }
}

fn update_boss(s: &mut GameSession) {
    let player_x = s.player.pos.x;
    let Some(boss) = s.boss.as_mut() else { return };

    boss.pos.x += boss.speed;
    if (boss.pos.x - boss.start_x).abs() > boss.range {
        boss.speed = -boss.speed;
    }
    boss.facing = if player_x >= boss.pos.x { 1 } else { -1 };

    boss.shoot_cooldown -= 1;
    if boss.shoot_cooldown <= 0 {
        // Two-round volley at staggered heights and speeds
        let high = spawn_bullet(boss.pos, boss.size, boss.facing, 40.0, 8.0, Vec2::new(14.0, 6.0), 10.0);
        let low = spawn_bullet(boss.pos, boss.size, boss.facing, 52.0, 7.0, Vec2::new(14.0, 6.0), 10.0);
        s.enemy_bullets.push(high);
        s.enemy_bullets.push(low);
        s.events.push(GameEvent::EnemyShot);
        boss.shoot_cooldown = s.rng.random_range(70..105);
    }
}

fn integrate_bullets(s: &mut GameSession) {
    for bullet in &mut s.bullets {
        bullet.pos.x += bullet.speed;
    }
    s.bullets.retain(|b| !b.out_of_bounds());

    for bullet in &mut s.enemy_bullets {
        bullet.pos.x += bullet.speed;
    }
    s.enemy_bullets.retain(|b| !b.out_of_bounds());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Progress;
    use crate::sim::state::Boss;

    fn session_in_play() -> GameSession {
        let mut s = GameSession::new(7, Progress::default());
        s.start_level(1);
        // Drop spawn immunity and settle on the ground for most scenarios
        s.player.invincible = 0;
        s.player.pos.y = GROUND_Y - s.player.size.y;
        s.player.on_ground = true;
        // Park enemies out of the way unless a test places them
        for e in &mut s.enemies {
            e.pos.x = LEVEL_WIDTH - 500.0;
            e.start_x = e.pos.x;
            e.shoot_cooldown = 10_000;
        }
        s
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn invincibility_is_monotonically_non_increasing() {
        let mut s = session_in_play();
        s.player.invincible = 3;
        let mut last = s.player.invincible;
        for _ in 0..10 {
            tick(&mut s, &idle());
            assert!(s.player.invincible <= last);
            last = s.player.invincible;
        }
        assert_eq!(s.player.invincible, 0);
    }

    #[test]
    fn invincibility_runs_down_outside_play() {
        let mut s = GameSession::new(7, Progress::default());
        s.player.invincible = 2;
        assert_eq!(s.screen, Screen::Home);
        tick(&mut s, &idle());
        assert_eq!(s.player.invincible, 1);
    }

    #[test]
    fn gravity_pulls_an_airborne_player_down() {
        let mut s = session_in_play();
        s.player.pos.y = 100.0;
        s.player.on_ground = false;
        tick(&mut s, &idle());
        assert!(s.player.vel.y > 0.0);
        assert!(s.player.pos.y > 100.0);
        assert!(!s.player.on_ground);
    }

    #[test]
    fn ground_clamp_zeroes_vertical_velocity() {
        let mut s = session_in_play();
        s.player.pos.y = GROUND_Y - s.player.size.y - 1.0;
        s.player.vel.y = 50.0;
        s.player.on_ground = false;
        tick(&mut s, &idle());
        assert_eq!(s.player.pos.y, GROUND_Y - s.player.size.y);
        assert_eq!(s.player.vel.y, 0.0);
        assert!(s.player.on_ground);
    }

    #[test]
    fn jump_requires_ground_contact() {
        let mut s = session_in_play();
        let input = TickInput {
            jump: true,
            ..TickInput::default()
        };
        tick(&mut s, &input);
        assert!(s.player.vel.y < 0.0 || s.player.pos.y < GROUND_Y - s.player.size.y);
        assert!(!s.player.on_ground);

        // Airborne jump is ignored
        let vel_before = s.player.vel.y;
        tick(&mut s, &input);
        assert!(s.player.vel.y > vel_before - PLAYER_JUMP);
    }

    #[test]
    fn player_is_clamped_to_level_bounds() {
        let mut s = session_in_play();
        s.player.pos.x = 1.0;
        let input = TickInput {
            left: true,
            ..TickInput::default()
        };
        tick(&mut s, &input);
        assert_eq!(s.player.pos.x, 0.0);
        assert_eq!(s.player.facing, -1);
    }

    #[test]
    fn enemy_patrol_reflects_at_range() {
        let mut s = session_in_play();
        s.enemies.truncate(1);
        let e = &mut s.enemies[0];
        e.start_x = 1000.0;
        e.pos.x = 1000.0 + e.range;
        let speed_before = e.speed;
        assert!(speed_before > 0.0);
        tick(&mut s, &idle());
        // Stepping past the range flips the sign instead of teleporting back
        assert_eq!(s.enemies[0].speed, -speed_before);
        assert!((s.enemies[0].pos.x - (1000.0 + s.enemies[0].range + speed_before)).abs() < 1e-3);
    }

    #[test]
    fn enemies_face_the_player() {
        let mut s = session_in_play();
        s.enemies.truncate(1);
        s.enemies[0].pos.x = 2000.0;
        s.player.pos.x = 100.0;
        tick(&mut s, &idle());
        assert_eq!(s.enemies[0].facing, -1);
        s.player.pos.x = 2500.0;
        tick(&mut s, &idle());
        assert_eq!(s.enemies[0].facing, 1);
    }

    #[test]
    fn enemy_fires_when_cooldown_expires() {
        let mut s = session_in_play();
        s.enemies.truncate(1);
        s.enemies[0].shoot_cooldown = 1;
        tick(&mut s, &idle());
        assert_eq!(s.enemy_bullets.len(), 1);
        // Cooldown reset into the randomized window
        assert!((120..220).contains(&s.enemies[0].shoot_cooldown));
    }

    #[test]
    fn boss_spawns_once_past_the_trigger() {
        let mut s = session_in_play();
        s.player.pos.x = BOSS_TRIGGER_X + 10.0;
        tick(&mut s, &idle());
        assert!(s.boss_spawned);
        assert!(s.boss.is_some());

        // Clearing the boss does not respawn it
        s.boss = None;
        tick(&mut s, &idle());
        assert!(s.boss.is_none());
    }

    #[test]
    fn boss_volley_is_two_bullets() {
        let mut s = session_in_play();
        s.boss_spawned = true;
        let mut boss = crate::sim::level::spawn_boss();
        boss.shoot_cooldown = 1;
        // Keep the boss away from the player so no contact damage muddies this
        s.player.pos.x = 100.0;
        s.boss = Some(boss);
        tick(&mut s, &idle());
        assert_eq!(s.enemy_bullets.len(), 2);
    }

    #[test]
    fn contact_damage_respects_invincibility_within_a_tick() {
        let mut s = session_in_play();
        // Overlap one enemy and the boss simultaneously
        s.enemies.truncate(1);
        s.enemies[0].pos = s.player.pos;
        s.enemies[0].start_x = s.player.pos.x;
        s.boss_spawned = true;
        let boss = Boss {
            pos: s.player.pos,
            start_x: s.player.pos.x,
            ..crate::sim::level::spawn_boss()
        };
        s.boss = Some(boss);

        tick(&mut s, &idle());
        // Enemy contact lands first (25), boss contact is absorbed
        assert_eq!(s.player.health, 75);
        assert_eq!(s.player.invincible, HIT_INVINCIBILITY);
    }

    #[test]
    fn player_bullet_kill_awards_coins() {
        let mut s = session_in_play();
        s.enemies.truncate(1);
        s.enemies[0].pos = Vec2::new(600.0, GROUND_Y - 75.0);
        s.enemies[0].start_x = 600.0;
        s.enemies[0].speed = 0.0;
        s.bullets.push(Bullet {
            pos: Vec2::new(595.0, GROUND_Y - 50.0),
            size: Vec2::new(14.0, 6.0),
            speed: 8.0,
        });
        let coins_before = s.progress.coins;
        tick(&mut s, &idle());
        assert!(s.enemies.is_empty());
        assert!(s.bullets.is_empty());
        assert_eq!(s.progress.coins, coins_before + ENEMY_KILL_REWARD);
        assert!(s.progress_dirty);
    }

    #[test]
    fn boss_dies_on_the_killing_bullet() {
        let mut s = session_in_play();
        s.enemies.clear();
        s.boss_spawned = true;
        let boss = Boss {
            pos: Vec2::new(1500.0, GROUND_Y - 100.0),
            start_x: 1500.0,
            speed: 0.0,
            shoot_cooldown: 10_000,
            ..crate::sim::level::spawn_boss()
        };
        s.boss = Some(boss);
        // 38 bullets x 12 damage = 456 >= 450
        for i in 0..38 {
            s.bullets.push(Bullet {
                pos: Vec2::new(1500.0 + i as f32 * 0.5, GROUND_Y - 50.0),
                size: Vec2::new(14.0, 6.0),
                speed: 0.0,
            });
        }
        let coins_before = s.progress.coins;
        tick(&mut s, &idle());
        assert!(s.boss.is_none());
        assert_eq!(s.progress.coins, coins_before + BOSS_KILL_REWARD);
    }

    #[test]
    fn boss_survives_37_bullets() {
        let mut s = session_in_play();
        s.enemies.clear();
        s.boss_spawned = true;
        let boss = Boss {
            pos: Vec2::new(1500.0, GROUND_Y - 100.0),
            start_x: 1500.0,
            speed: 0.0,
            shoot_cooldown: 10_000,
            ..crate::sim::level::spawn_boss()
        };
        s.boss = Some(boss);
        for i in 0..37 {
            s.bullets.push(Bullet {
                pos: Vec2::new(1500.0 + i as f32 * 0.5, GROUND_Y - 50.0),
                size: Vec2::new(14.0, 6.0),
                speed: 0.0,
            });
        }
        tick(&mut s, &idle());
        assert_eq!(s.boss.as_ref().map(|b| b.health), Some(BOSS_MAX_HEALTH - 37 * PLAYER_BULLET_DAMAGE));
    }

    #[test]
    fn bullets_are_culled_at_the_margin() {
        let mut s = session_in_play();
        s.bullets.push(Bullet {
            pos: Vec2::new(LEVEL_WIDTH + BULLET_CULL_MARGIN - 1.0, 100.0),
            size: Vec2::new(14.0, 6.0),
            speed: 8.0,
        });
        s.enemy_bullets.push(Bullet {
            pos: Vec2::new(-BULLET_CULL_MARGIN + 1.0, 100.0),
            size: Vec2::new(12.0, 5.0),
            speed: -6.0,
        });
        tick(&mut s, &idle());
        assert!(s.bullets.is_empty());
        assert!(s.enemy_bullets.is_empty());
    }

    #[test]
    fn win_fires_on_the_tick_all_conditions_hold() {
        let mut s = session_in_play();
        s.enemies.clear();
        s.boss_spawned = true;
        s.boss = None;
        s.player.pos.x = WIN_ZONE_X - 3.0;
        let run = TickInput {
            right: true,
            ..TickInput::default()
        };
        tick(&mut s, &run);
        assert_eq!(s.screen, Screen::Win);
    }

    #[test]
    fn no_win_while_the_boss_lives() {
        let mut s = session_in_play();
        s.enemies.clear();
        s.boss_spawned = true;
        let boss = Boss {
            pos: Vec2::new(100.0, GROUND_Y - 100.0),
            start_x: 100.0,
            shoot_cooldown: 10_000,
            ..crate::sim::level::spawn_boss()
        };
        s.boss = Some(boss);
        s.player.pos.x = WIN_ZONE_X + 10.0;
        s.player.invincible = 10_000;
        tick(&mut s, &idle());
        assert_eq!(s.screen, Screen::Play);
    }

    #[test]
    fn win_advances_the_frontier_by_one() {
        let mut s = session_in_play();
        assert_eq!(s.progress.unlocked_level, 1);
        s.enemies.clear();
        s.boss_spawned = true;
        s.boss = None;
        s.player.pos.x = WIN_ZONE_X + 1.0;
        tick(&mut s, &idle());
        assert_eq!(s.screen, Screen::Win);
        assert_eq!(s.progress.unlocked_level, 2);
        assert_eq!(s.progress.coins, WIN_BASE_REWARD);

        // Replaying a cleared level never advances or regresses the frontier
        s.progress.unlocked_level = 5;
        s.start_level(1);
        s.enemies.clear();
        s.boss_spawned = true;
        s.boss = None;
        s.player.pos.x = WIN_ZONE_X + 1.0;
        s.player.invincible = 0;
        tick(&mut s, &idle());
        assert_eq!(s.progress.unlocked_level, 5);
    }

    #[test]
    fn checkpoint_tracks_the_player() {
        let mut s = session_in_play();
        let run = TickInput {
            right: true,
            ..TickInput::default()
        };
        for _ in 0..5 {
            tick(&mut s, &run);
        }
        assert_eq!(s.checkpoint.pos, s.player.pos);
    }

    #[test]
    fn paused_session_does_not_advance_entities() {
        let mut s = session_in_play();
        s.pause();
        let positions: Vec<f32> = s.enemies.iter().map(|e| e.pos.x).collect();
        tick(&mut s, &idle());
        let after: Vec<f32> = s.enemies.iter().map(|e| e.pos.x).collect();
        assert_eq!(positions, after);
    }
}
