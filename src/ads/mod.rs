//! Rewarded-ad broker
//!
//! One uniform contract over zero-to-many vendor SDKs: request a rewarded
//! ad, get exactly one purpose-tagged resolution later. The broker owns the
//! at-most-one-in-flight invariant and the audio-ducking side effect, and
//! bounds every vendor with a timeout so a hung SDK still resolves to
//! failure.

pub mod vendor;

pub use vendor::{
    AdVendorAdapter, CrazyGamesVendor, GameDistributionVendor, GameMonetizeVendor, NullVendor,
    RequestAck, VendorEvent, VendorKind,
};

use crate::audio::AudioManager;
use crate::consts::AD_TIMEOUT_TICKS;

/// How a rewarded-ad request ended. Everything that is not `Granted` is
/// routed to the failure path; callers never see vendor-specific errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdOutcome {
    /// Viewer earned the reward
    Granted,
    /// Vendor error, rejection, or broker timeout
    Failed,
    /// Vendor had no rewarded-ad capability to offer
    Unavailable,
}

/// What the game promised the player for watching the ad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdPurpose {
    /// Double the win-screen coin reward
    WinBonus,
    /// Resume a failed attempt from the checkpoint
    Revive,
}

/// A finished request, handed to the state machine once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdResolution {
    pub purpose: AdPurpose,
    pub outcome: AdOutcome,
}

#[derive(Debug)]
struct Pending {
    purpose: AdPurpose,
    ticks_left: u32,
    /// Set when the vendor refused up front; resolved on the next poll so
    /// the busy window still opens and closes like any other request
    forced: Option<AdOutcome>,
}

/// Broker guaranteeing at most one rewarded-ad request in flight
pub struct AdBroker {
    vendor: Box<dyn AdVendorAdapter>,
    pending: Option<Pending>,
}

impl AdBroker {
    pub fn new(mut vendor: Box<dyn AdVendorAdapter>) -> Self {
        let ready = vendor.initialize();
        log::info!(
            "ad broker using vendor {} (ready: {ready})",
            vendor.kind().as_str()
        );
        Self {
            vendor,
            pending: None,
        }
    }

    pub fn vendor_kind(&self) -> VendorKind {
        self.vendor.kind()
    }

    /// True while a request is in flight
    pub fn busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Request a rewarded ad. A call while one is already in flight is
    /// dropped (not queued) and returns false. Audio is ducked for the
    /// whole request window.
    pub fn request(&mut self, purpose: AdPurpose, audio: &mut AudioManager) -> bool {
        if self.pending.is_some() {
            log::debug!("rewarded-ad request dropped: one already in flight");
            return false;
        }
        audio.set_ducked(true);
        let forced = match self.vendor.request_rewarded() {
            RequestAck::Accepted => None,
            RequestAck::Unavailable => Some(AdOutcome::Unavailable),
        };
        self.pending = Some(Pending {
            purpose,
            ticks_left: AD_TIMEOUT_TICKS,
            forced,
        });
        true
    }

    /// Forward a host-side SDK event to the active vendor
    pub fn handle_vendor_event(&mut self, event: VendorEvent) {
        self.vendor.handle_event(event);
    }

    /// Drive the in-flight request by one frame. Returns the resolution
    /// exactly once: vendor outcome, up-front refusal, or timeout.
    pub fn poll(&mut self, audio: &mut AudioManager) -> Option<AdResolution> {
        let pending = self.pending.as_mut()?;

        let outcome = if let Some(forced) = pending.forced {
            forced
        } else if let Some(resolved) = self.vendor.poll() {
            resolved
        } else if pending.ticks_left == 0 {
            log::warn!("rewarded ad timed out; resolving to failure");
            AdOutcome::Failed
        } else {
            pending.ticks_left -= 1;
            return None;
        };

        let purpose = pending.purpose;
        self.pending = None;
        audio.set_ducked(false);
        Some(AdResolution { purpose, outcome })
    }
}
