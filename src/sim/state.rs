//! Game session and core simulation types
//!
//! The [`GameSession`] aggregate owns every piece of per-run state. Nothing
//! here touches storage or the platform; the app layer flushes
//! [`Progress`] whenever `progress_dirty` is set.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::level;
use crate::consts::*;
use crate::progress::Progress;

/// Current screen of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Home,
    LevelSelect,
    Shop,
    Play,
    Pause,
    Win,
    GameOver,
}

impl Screen {
    /// Stable name exposed to the presentation layer
    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::LevelSelect => "levelSelect",
            Screen::Shop => "shop",
            Screen::Play => "play",
            Screen::Pause => "pause",
            Screen::Win => "win",
            Screen::GameOver => "gameOver",
        }
    }
}

/// Number of entries on the home menu (Play / Levels / Shop)
pub const HOME_MENU_LEN: usize = 3;

/// Sound-relevant things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    PlayerShot,
    EnemyShot,
    Hit,
    Win,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// +1 right, -1 left
    pub facing: i8,
    pub health: i32,
    pub max_health: i32,
    /// Ticks of damage immunity remaining (0 = vulnerable)
    pub invincible: u32,
    pub on_ground: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_SPAWN_X, GROUND_Y - PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            facing: 1,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            invincible: 0,
            on_ground: false,
        }
    }
}

impl Player {
    /// Back to the spawn point with full health and spawn immunity
    pub fn reset(&mut self) {
        self.pos = Vec2::new(PLAYER_SPAWN_X, GROUND_Y - self.size.y);
        self.vel = Vec2::ZERO;
        self.facing = 1;
        self.health = self.max_health;
        self.invincible = SPAWN_INVINCIBILITY;
        self.on_ground = false;
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Signed patrol speed; the sign flips at the patrol bounds
    pub speed: f32,
    /// Maximum displacement from `start_x` before reversing
    pub range: f32,
    pub start_x: f32,
    pub facing: i8,
    pub shoot_cooldown: i32,
}

impl Enemy {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// The per-level end boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub range: f32,
    pub start_x: f32,
    pub facing: i8,
    pub health: i32,
    pub max_health: i32,
    pub shoot_cooldown: i32,
}

impl Boss {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A projectile; player-owned and enemy-owned bullets live in separate lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Signed horizontal speed per tick
    pub speed: f32,
}

impl Bullet {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// True once the bullet has left the level (plus cull margin)
    pub fn out_of_bounds(&self) -> bool {
        self.pos.x < -BULLET_CULL_MARGIN || self.pos.x > LEVEL_WIDTH + BULLET_CULL_MARGIN
    }
}

/// Last safe position, used only by the ad-gated revive flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Checkpoint {
    pub pos: Vec2,
}

/// Complete per-run game state, owned by the state machine
pub struct GameSession {
    /// Base seed; each level reseeds the RNG from (seed, level)
    pub seed: u64,
    pub screen: Screen,
    pub menu_index: usize,
    pub current_level: u32,
    pub selected_stage: u32,
    pub selected_level: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    /// Set exactly once per level attempt
    pub boss_spawned: bool,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub checkpoint: Checkpoint,
    /// Guards the win-screen ad bonus against double grants
    pub ad_claimed_on_win: bool,
    pub progress: Progress,
    /// Set whenever `progress` mutates; cleared by the app after flushing
    pub progress_dirty: bool,
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    pub fn new(seed: u64, progress: Progress) -> Self {
        let player = Player::default();
        let checkpoint = Checkpoint { pos: player.pos };
        Self {
            seed,
            screen: Screen::Home,
            menu_index: 0,
            current_level: 1,
            selected_stage: 1,
            selected_level: 1,
            player,
            enemies: Vec::new(),
            boss: None,
            boss_spawned: false,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            checkpoint,
            ad_claimed_on_win: false,
            progress,
            progress_dirty: false,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Stage of the level currently being played
    pub fn stage(&self) -> u32 {
        level::stage_of(self.current_level)
    }

    /// In-stage index of the level currently being played
    pub fn level_in_stage(&self) -> u32 {
        level::level_in_stage(self.current_level)
    }

    /// Add coins and mark progress for persistence
    pub(crate) fn award_coins(&mut self, amount: u64) {
        self.progress.coins += amount;
        self.progress_dirty = true;
    }

    /// Drain the events accumulated since the last drain
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Level lifecycle ===

    /// Start a level attempt. Out-of-range ids are clamped, never an error.
    pub fn start_level(&mut self, id: u32) {
        let id = level::clamp_level(id);
        self.current_level = id;
        self.selected_stage = level::stage_of(id);
        self.selected_level = id;
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(u64::from(id)));
        self.player.reset();
        self.enemies = level::spawn_enemies(id, &mut self.rng);
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.boss = None;
        self.boss_spawned = false;
        self.ad_claimed_on_win = false;
        self.checkpoint = Checkpoint {
            pos: self.player.pos,
        };
        self.screen = Screen::Play;
        log::info!(
            "starting level {id} (stage {} - {}): {} enemies",
            self.stage(),
            self.level_in_stage(),
            self.enemies.len()
        );
    }

    /// Win transition: base reward now, frontier advances by exactly one
    pub(crate) fn level_complete(&mut self) {
        self.screen = Screen::Win;
        self.progress.coins += WIN_BASE_REWARD;
        if self.progress.unlocked_level == self.current_level
            && self.progress.unlocked_level < TOTAL_LEVELS
        {
            self.progress.unlocked_level += 1;
        }
        self.progress_dirty = true;
        self.ad_claimed_on_win = false;
        self.events.push(GameEvent::Win);
        log::info!("level {} complete", self.current_level);
    }

    // === Screen transitions ===

    pub fn pause(&mut self) {
        if self.screen == Screen::Play {
            self.screen = Screen::Pause;
        }
    }

    pub fn resume(&mut self) {
        if self.screen == Screen::Pause {
            self.screen = Screen::Play;
        }
    }

    pub fn go_home(&mut self) {
        self.screen = Screen::Home;
    }

    /// Escape semantics: pause/resume in a run, back out of sub-screens
    pub fn back(&mut self) {
        match self.screen {
            Screen::Play => self.pause(),
            Screen::Pause => self.resume(),
            Screen::Shop | Screen::LevelSelect => self.go_home(),
            _ => {}
        }
    }

    /// Retry the current level after a game over or from the pause screen
    pub fn retry(&mut self) {
        self.start_level(self.current_level);
    }

    /// Advance from the win screen; past the final level, return home
    pub fn next_level(&mut self) {
        if self.current_level < TOTAL_LEVELS {
            self.start_level(self.current_level + 1);
        } else {
            self.go_home();
        }
    }

    /// Leave the game-over screen without reviving
    pub fn abandon(&mut self) {
        self.player.reset();
        self.go_home();
    }

    // === Home menu ===

    pub fn menu_up(&mut self) {
        if self.screen == Screen::Home {
            self.menu_index = (self.menu_index + HOME_MENU_LEN - 1) % HOME_MENU_LEN;
        }
    }

    pub fn menu_down(&mut self) {
        if self.screen == Screen::Home {
            self.menu_index = (self.menu_index + 1) % HOME_MENU_LEN;
        }
    }

    pub fn menu_confirm(&mut self) {
        if self.screen != Screen::Home {
            return;
        }
        match self.menu_index {
            0 => self.start_level(self.progress.unlocked_level),
            1 => self.open_level_select(),
            _ => self.screen = Screen::Shop,
        }
    }

    // === Level select ===

    pub fn open_level_select(&mut self) {
        self.selected_stage = level::stage_of(self.progress.unlocked_level);
        self.selected_level =
            level::default_level_for_stage(self.selected_stage, self.progress.unlocked_level);
        self.screen = Screen::LevelSelect;
    }

    pub fn stage_prev(&mut self) {
        if self.screen == Screen::LevelSelect && self.selected_stage > 1 {
            self.selected_stage -= 1;
            self.selected_level =
                level::default_level_for_stage(self.selected_stage, self.progress.unlocked_level);
        }
    }

    pub fn stage_next(&mut self) {
        if self.screen == Screen::LevelSelect && self.selected_stage < TOTAL_STAGES {
            self.selected_stage += 1;
            self.selected_level =
                level::default_level_for_stage(self.selected_stage, self.progress.unlocked_level);
        }
    }

    /// First tap highlights an unlocked level, second tap starts it
    pub fn select_level(&mut self, id: u32) {
        if self.screen != Screen::LevelSelect || id > self.progress.unlocked_level {
            return;
        }
        if self.selected_level == id {
            self.start_level(id);
        } else {
            self.selected_level = level::clamp_level(id);
        }
    }

    /// Start the currently highlighted level
    pub fn level_confirm(&mut self) {
        if self.screen == Screen::LevelSelect {
            let id = self.selected_level;
            if id <= self.progress.unlocked_level {
                self.start_level(id);
            }
        }
    }

    // === Shop ===

    /// Equip an owned character, or buy it if affordable
    pub fn shop_select(&mut self, index: usize) {
        if self.screen != Screen::Shop {
            return;
        }
        if self.progress.select_or_buy(index) {
            self.progress_dirty = true;
        }
    }

    // === Ad outcomes ===

    /// Apply a resolved rewarded-ad request. Failures are silent; a granted
    /// reward is applied at most once per opportunity, no matter how late it
    /// resolves.
    pub fn apply_ad_outcome(
        &mut self,
        purpose: crate::ads::AdPurpose,
        outcome: crate::ads::AdOutcome,
    ) {
        use crate::ads::{AdOutcome, AdPurpose};
        if outcome != AdOutcome::Granted {
            log::info!("rewarded ad for {purpose:?} not granted ({outcome:?})");
            return;
        }
        match purpose {
            AdPurpose::WinBonus => {
                if !self.ad_claimed_on_win {
                    self.ad_claimed_on_win = true;
                    self.award_coins(WIN_BASE_REWARD);
                }
            }
            AdPurpose::Revive => {
                // Only meaningful while the failed attempt is still on screen
                if self.screen == Screen::GameOver {
                    self.revive_at_checkpoint();
                }
            }
        }
    }

    fn revive_at_checkpoint(&mut self) {
        let max_x = LEVEL_WIDTH - self.player.size.x;
        self.player.pos.x = self.checkpoint.pos.x.clamp(0.0, max_x);
        self.player.pos.y = self.checkpoint.pos.y;
        self.player.vel = Vec2::ZERO;
        self.player.health = (self.player.max_health / 2).max(45);
        self.player.invincible = REVIVE_INVINCIBILITY;
        self.screen = Screen::Play;
        log::info!("revived at checkpoint ({:.0}, {:.0})", self.player.pos.x, self.player.pos.y);
    }
}
