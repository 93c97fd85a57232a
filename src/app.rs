//! Top-level game aggregate
//!
//! Wires the simulation session, ad broker, audio and persisted state, and
//! exposes the two surfaces the host needs: a per-frame drive call plus a
//! discrete command surface for menus, and a read-only snapshot for the
//! presentation layer.

use serde::Serialize;

use crate::ads::{AdBroker, AdPurpose, AdVendorAdapter, VendorEvent, VendorKind};
use crate::audio::{AudioManager, SoundEffect};
use crate::progress::Progress;
use crate::settings::Settings;
use crate::sim::state::{Boss, Bullet, Enemy, GameEvent, Player, Screen};
use crate::sim::{GameSession, TickInput, tick};

/// Discrete control events, distinct from the held-key state in
/// [`TickInput`]. Commands that make no sense on the current screen are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MenuUp,
    MenuDown,
    MenuConfirm,
    /// Escape: pause/resume in a run, back out of sub-screens
    Back,
    StagePrev,
    StageNext,
    /// Highlight a level on the select screen; twice in a row starts it
    SelectLevel(u32),
    /// Start the highlighted level
    LevelConfirm,
    ShopSelect(usize),
    /// Restart the current level (game-over or pause screen)
    Retry,
    /// Advance from the win screen
    NextLevel,
    /// Return home from a popup screen
    Home,
    /// Context-sensitive rewarded ad: win bonus or revive
    WatchAd,
    ToggleMute,
    /// Debug: rotate to the next ad vendor
    CycleVendor,
}

/// Read-only per-frame view for the presentation layer
#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub screen: &'static str,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub boss: Option<&'a Boss>,
    pub bullets: &'a [Bullet],
    pub enemy_bullets: &'a [Bullet],
    pub progress: &'a Progress,
    pub level: u32,
    pub stage: u32,
    pub level_in_stage: u32,
    pub menu_index: usize,
    pub selected_stage: u32,
    pub selected_level: u32,
    pub boss_spawned: bool,
    pub ad_busy: bool,
    pub muted: bool,
}

/// Game instance holding all state
pub struct Game {
    session: GameSession,
    broker: AdBroker,
    audio: AudioManager,
    settings: Settings,
}

impl Game {
    /// Build a game from persisted settings and progress
    pub fn new(seed: u64) -> Self {
        let settings = Settings::load();
        let vendor = settings.vendor.adapter();
        Self::with_vendor(seed, settings, vendor)
    }

    /// Build a game with an explicit vendor adapter (hosts and tests)
    pub fn with_vendor(seed: u64, settings: Settings, vendor: Box<dyn AdVendorAdapter>) -> Self {
        let mut progress = Progress::load();
        progress.sanitize();
        let mut audio = AudioManager::new();
        audio.set_muted(settings.muted);
        Self {
            session: GameSession::new(seed, progress),
            broker: AdBroker::new(vendor),
            audio,
            settings,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn vendor_kind(&self) -> VendorKind {
        self.broker.vendor_kind()
    }

    /// Advance one display frame: simulate, sound, persist, resolve ads
    pub fn frame(&mut self, input: &TickInput) {
        tick(&mut self.session, input);

        for event in self.session.take_events() {
            self.audio.play(sound_for(event));
        }
        self.flush_progress();

        if let Some(resolution) = self.broker.poll(&mut self.audio) {
            self.session
                .apply_ad_outcome(resolution.purpose, resolution.outcome);
            self.flush_progress();
        }
    }

    /// Handle a discrete input event
    pub fn command(&mut self, command: Command) {
        match command {
            Command::MenuUp => self.session.menu_up(),
            Command::MenuDown => self.session.menu_down(),
            Command::MenuConfirm => self.session.menu_confirm(),
            Command::Back => self.session.back(),
            Command::StagePrev => self.session.stage_prev(),
            Command::StageNext => self.session.stage_next(),
            Command::SelectLevel(id) => self.session.select_level(id),
            Command::LevelConfirm => self.session.level_confirm(),
            Command::ShopSelect(index) => {
                self.session.shop_select(index);
                self.flush_progress();
            }
            Command::Retry => {
                if matches!(self.session.screen, Screen::GameOver | Screen::Pause) {
                    self.session.retry();
                }
            }
            Command::NextLevel => {
                if self.session.screen == Screen::Win {
                    self.session.next_level();
                }
            }
            Command::Home => match self.session.screen {
                Screen::GameOver => self.session.abandon(),
                Screen::Pause | Screen::Win => self.session.go_home(),
                _ => {}
            },
            Command::WatchAd => self.watch_ad(),
            Command::ToggleMute => {
                let muted = self.audio.toggle_muted();
                self.settings.muted = muted;
                self.settings.save();
                if !muted {
                    self.audio.play(SoundEffect::UnmuteBlip);
                }
            }
            Command::CycleVendor => {
                let kind = self.settings.cycle_vendor();
                self.settings.save();
                self.broker = AdBroker::new(kind.adapter());
                log::info!("ad vendor switched to {}", kind.as_str());
            }
        }
    }

    /// Forward a host-side SDK lifecycle event to the active vendor
    pub fn handle_vendor_event(&mut self, event: VendorEvent) {
        self.broker.handle_vendor_event(event);
    }

    /// Read-only view of the current frame
    pub fn snapshot(&self) -> Snapshot<'_> {
        let s = &self.session;
        Snapshot {
            screen: s.screen.as_str(),
            player: &s.player,
            enemies: &s.enemies,
            boss: s.boss.as_ref(),
            bullets: &s.bullets,
            enemy_bullets: &s.enemy_bullets,
            progress: &s.progress,
            level: s.current_level,
            stage: s.stage(),
            level_in_stage: s.level_in_stage(),
            menu_index: s.menu_index,
            selected_stage: s.selected_stage,
            selected_level: s.selected_level,
            boss_spawned: s.boss_spawned,
            ad_busy: self.broker.busy(),
            muted: self.audio.muted(),
        }
    }

    fn watch_ad(&mut self) {
        match self.session.screen {
            Screen::Win => {
                // The 2x button goes dead once the bonus is claimed
                if !self.session.ad_claimed_on_win {
                    self.broker.request(AdPurpose::WinBonus, &mut self.audio);
                }
            }
            Screen::GameOver => {
                self.broker.request(AdPurpose::Revive, &mut self.audio);
            }
            _ => {}
        }
    }

    fn flush_progress(&mut self) {
        if self.session.progress_dirty {
            self.session.progress.save();
            self.session.progress_dirty = false;
        }
    }
}

fn sound_for(event: GameEvent) -> SoundEffect {
    match event {
        GameEvent::Jump => SoundEffect::Jump,
        GameEvent::PlayerShot => SoundEffect::PlayerShoot,
        GameEvent::EnemyShot => SoundEffect::EnemyShoot,
        GameEvent::Hit => SoundEffect::Hit,
        GameEvent::Win => SoundEffect::Win,
    }
}
