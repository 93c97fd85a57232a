//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no asset files. The manager also
//! carries the two gates the rest of the game cares about: the player's
//! mute toggle and the ad-broker duck (an ad in flight silences the game
//! without pausing it).

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires
    PlayerShoot,
    /// Enemy or boss fires
    EnemyShoot,
    /// Something took damage
    Hit,
    /// Player left the ground
    Jump,
    /// Level cleared
    Win,
    /// Audio re-enabled chirp
    UnmuteBlip,
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
    /// Forced silence while a rewarded ad is showing
    ducked: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.9,
            muted: false,
            ducked: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            master_volume: 0.9,
            muted: false,
            ducked: false,
        }
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip the mute toggle, returning the new state
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn ducked(&self) -> bool {
        self.ducked
    }

    /// Duck (or restore) game audio around an ad presentation
    pub fn set_ducked(&mut self, ducked: bool) {
        self.ducked = ducked;
    }

    /// Volume after the mute and duck gates
    fn effective_volume(&self) -> f32 {
        if self.muted || self.ducked {
            0.0
        } else {
            self.master_volume
        }
    }

    /// Play a sound effect
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::PlayerShoot => {
                self.tone(ctx, 680.0, Some(360.0), 0.08, OscillatorType::Square, vol * 0.06, 0.0);
            }
            SoundEffect::EnemyShoot => {
                self.tone(ctx, 240.0, Some(170.0), 0.09, OscillatorType::Sawtooth, vol * 0.05, 0.0);
            }
            SoundEffect::Hit => {
                self.tone(ctx, 150.0, Some(85.0), 0.12, OscillatorType::Triangle, vol * 0.07, 0.0);
            }
            SoundEffect::Jump => {
                self.tone(ctx, 260.0, Some(430.0), 0.09, OscillatorType::Square, vol * 0.05, 0.0);
            }
            SoundEffect::Win => {
                // Rising two-note fanfare
                self.tone(ctx, 520.0, Some(620.0), 0.08, OscillatorType::Triangle, vol * 0.06, 0.0);
                self.tone(ctx, 700.0, Some(860.0), 0.12, OscillatorType::Triangle, vol * 0.06, 0.09);
            }
            SoundEffect::UnmuteBlip => {
                self.tone(ctx, 740.0, Some(880.0), 0.05, OscillatorType::Triangle, vol * 0.04, 0.0);
            }
        }
    }

    /// Native stub: gates are tracked, playback is a no-op
    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, _effect: SoundEffect) {}

    /// One oscillator with an exponential gain envelope, optionally sweeping
    /// to `end_freq`, scheduled `delay` seconds out
    #[cfg(target_arch = "wasm32")]
    fn tone(
        &self,
        ctx: &AudioContext,
        freq: f32,
        end_freq: Option<f32>,
        duration: f64,
        osc_type: OscillatorType,
        volume: f32,
        delay: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(volume, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + duration)
            .ok();

        osc.frequency().set_value_at_time(freq, t).ok();
        if let Some(end) = end_freq {
            osc.frequency()
                .linear_ramp_to_value_at_time(end, t + duration)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + duration + 0.01).ok();
    }

    /// Create an oscillator routed through a fresh gain node
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }
}
