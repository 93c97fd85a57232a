//! Rewarded-ad vendor adapters
//!
//! Each monetization SDK speaks its own dialect of lifecycle events. The
//! host glue (browser-side) forwards whatever the SDK emits as
//! [`VendorEvent`]s; an adapter normalizes them into a single
//! [`AdOutcome`](super::AdOutcome) that the broker collects via `poll`.
//! Unknown or out-of-sequence events are ignored rather than propagated.

use serde::{Deserialize, Serialize};

use super::AdOutcome;
use crate::consts::SIMULATED_AD_TICKS;

/// Which monetization SDK is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VendorKind {
    #[default]
    None,
    CrazyGames,
    GameMonetize,
    GameDistribution,
}

impl VendorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VendorKind::None => "none",
            VendorKind::CrazyGames => "crazygames",
            VendorKind::GameMonetize => "gamemonetize",
            VendorKind::GameDistribution => "gamedistribution",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(VendorKind::None),
            "crazygames" => Some(VendorKind::CrazyGames),
            "gamemonetize" => Some(VendorKind::GameMonetize),
            "gamedistribution" => Some(VendorKind::GameDistribution),
            _ => None,
        }
    }

    /// Next mode in the debug rotation (bound to F8)
    pub fn next(self) -> Self {
        match self {
            VendorKind::None => VendorKind::CrazyGames,
            VendorKind::CrazyGames => VendorKind::GameMonetize,
            VendorKind::GameMonetize => VendorKind::GameDistribution,
            VendorKind::GameDistribution => VendorKind::None,
        }
    }

    /// Build the adapter for this vendor
    pub fn adapter(self) -> Box<dyn AdVendorAdapter> {
        match self {
            VendorKind::None => Box::new(NullVendor::default()),
            VendorKind::CrazyGames => Box::new(CrazyGamesVendor::default()),
            VendorKind::GameMonetize => Box::new(GameMonetizeVendor::default()),
            VendorKind::GameDistribution => Box::new(GameDistributionVendor::default()),
        }
    }
}

/// Lifecycle signal forwarded from the host-side SDK glue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorEvent {
    /// The SDK finished loading and is ready to serve
    SdkReady,
    /// An ad presentation began
    AdStarted,
    /// The ad ran to completion (reward earned)
    AdFinished,
    /// The SDK reported an error
    AdError,
    /// SDK asked the game to pause (ad showing)
    GamePause,
    /// SDK handed control back to the game
    GameStart,
    /// Promise-style SDKs report whether the reward was actually earned
    RewardResult { rewarded: bool },
}

/// Immediate answer to a rewarded-ad request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAck {
    /// Request dispatched; the outcome arrives later via `poll`
    Accepted,
    /// Vendor cannot serve rewarded ads right now; must fail, never block
    Unavailable,
}

/// Uniform adapter contract the broker depends on
pub trait AdVendorAdapter {
    fn kind(&self) -> VendorKind;

    /// True once the vendor is ready to serve rewarded ads
    fn initialize(&mut self) -> bool;

    /// Kick off one rewarded-ad presentation
    fn request_rewarded(&mut self) -> RequestAck;

    /// Feed a vendor lifecycle event from the host glue
    fn handle_event(&mut self, event: VendorEvent);

    /// Take the resolved outcome of an in-flight request, if any
    fn poll(&mut self) -> Option<AdOutcome>;
}

/// No SDK configured: simulate the full lifecycle (busy, short delay,
/// success) so game logic never special-cases the vendor-less build.
#[derive(Debug, Default)]
pub struct NullVendor {
    delay: Option<u32>,
}

impl AdVendorAdapter for NullVendor {
    fn kind(&self) -> VendorKind {
        VendorKind::None
    }

    fn initialize(&mut self) -> bool {
        true
    }

    fn request_rewarded(&mut self) -> RequestAck {
        self.delay = Some(SIMULATED_AD_TICKS);
        RequestAck::Accepted
    }

    fn handle_event(&mut self, _event: VendorEvent) {}

    fn poll(&mut self) -> Option<AdOutcome> {
        match self.delay.as_mut() {
            Some(0) => {
                self.delay = None;
                Some(AdOutcome::Granted)
            }
            Some(ticks) => {
                *ticks -= 1;
                None
            }
            None => None,
        }
    }
}

/// CrazyGames: callback dialect (adStarted / adFinished / adError)
#[derive(Debug, Default)]
pub struct CrazyGamesVendor {
    ready: bool,
    in_flight: bool,
    outcome: Option<AdOutcome>,
}

impl AdVendorAdapter for CrazyGamesVendor {
    fn kind(&self) -> VendorKind {
        VendorKind::CrazyGames
    }

    fn initialize(&mut self) -> bool {
        self.ready
    }

    fn request_rewarded(&mut self) -> RequestAck {
        if !self.ready {
            return RequestAck::Unavailable;
        }
        self.in_flight = true;
        RequestAck::Accepted
    }

    fn handle_event(&mut self, event: VendorEvent) {
        match event {
            VendorEvent::SdkReady => self.ready = true,
            VendorEvent::AdFinished if self.in_flight => {
                self.outcome = Some(AdOutcome::Granted);
            }
            VendorEvent::AdError if self.in_flight => {
                self.outcome = Some(AdOutcome::Failed);
            }
            _ => {}
        }
    }

    fn poll(&mut self) -> Option<AdOutcome> {
        let outcome = self.outcome.take();
        if outcome.is_some() {
            self.in_flight = false;
        }
        outcome
    }
}

/// GameMonetize: global event dialect. SDK_GAME_START while an ad is in
/// flight means the ad finished and play resumed; SDK_ERROR fails it.
#[derive(Debug, Default)]
pub struct GameMonetizeVendor {
    ready: bool,
    in_flight: bool,
    outcome: Option<AdOutcome>,
}

impl AdVendorAdapter for GameMonetizeVendor {
    fn kind(&self) -> VendorKind {
        VendorKind::GameMonetize
    }

    fn initialize(&mut self) -> bool {
        self.ready
    }

    fn request_rewarded(&mut self) -> RequestAck {
        if !self.ready {
            return RequestAck::Unavailable;
        }
        self.in_flight = true;
        RequestAck::Accepted
    }

    fn handle_event(&mut self, event: VendorEvent) {
        match event {
            VendorEvent::SdkReady => self.ready = true,
            VendorEvent::GameStart if self.in_flight => {
                self.outcome = Some(AdOutcome::Granted);
            }
            VendorEvent::AdError if self.in_flight => {
                self.outcome = Some(AdOutcome::Failed);
            }
            _ => {}
        }
    }

    fn poll(&mut self) -> Option<AdOutcome> {
        let outcome = self.outcome.take();
        if outcome.is_some() {
            self.in_flight = false;
        }
        outcome
    }
}

/// GameDistribution: promise dialect; the resolved value says whether the
/// viewer actually earned the reward.
#[derive(Debug, Default)]
pub struct GameDistributionVendor {
    ready: bool,
    in_flight: bool,
    outcome: Option<AdOutcome>,
}

impl AdVendorAdapter for GameDistributionVendor {
    fn kind(&self) -> VendorKind {
        VendorKind::GameDistribution
    }

    fn initialize(&mut self) -> bool {
        self.ready
    }

    fn request_rewarded(&mut self) -> RequestAck {
        if !self.ready {
            return RequestAck::Unavailable;
        }
        self.in_flight = true;
        RequestAck::Accepted
    }

    fn handle_event(&mut self, event: VendorEvent) {
        match event {
            VendorEvent::SdkReady => self.ready = true,
            VendorEvent::RewardResult { rewarded } if self.in_flight => {
                self.outcome = Some(if rewarded {
                    AdOutcome::Granted
                } else {
                    AdOutcome::Failed
                });
            }
            VendorEvent::AdError if self.in_flight => {
                self.outcome = Some(AdOutcome::Failed);
            }
            _ => {}
        }
    }

    fn poll(&mut self) -> Option<AdOutcome> {
        let outcome = self.outcome.take();
        if outcome.is_some() {
            self.in_flight = false;
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_kind_round_trips_through_names() {
        for kind in [
            VendorKind::None,
            VendorKind::CrazyGames,
            VendorKind::GameMonetize,
            VendorKind::GameDistribution,
        ] {
            assert_eq!(VendorKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(VendorKind::from_str("something-else"), None);
    }

    #[test]
    fn cycle_visits_every_mode() {
        let mut kind = VendorKind::None;
        for _ in 0..4 {
            kind = kind.next();
        }
        assert_eq!(kind, VendorKind::None);
    }

    #[test]
    fn null_vendor_grants_after_the_simulated_delay() {
        let mut vendor = NullVendor::default();
        assert_eq!(vendor.request_rewarded(), RequestAck::Accepted);
        for _ in 0..SIMULATED_AD_TICKS {
            assert_eq!(vendor.poll(), None);
        }
        assert_eq!(vendor.poll(), Some(AdOutcome::Granted));
        // Resolved exactly once
        assert_eq!(vendor.poll(), None);
    }

    #[test]
    fn unready_vendor_is_unavailable() {
        let mut vendor = CrazyGamesVendor::default();
        assert!(!vendor.initialize());
        assert_eq!(vendor.request_rewarded(), RequestAck::Unavailable);
    }

    #[test]
    fn crazygames_maps_callbacks_to_outcomes() {
        let mut vendor = CrazyGamesVendor::default();
        vendor.handle_event(VendorEvent::SdkReady);
        assert_eq!(vendor.request_rewarded(), RequestAck::Accepted);
        vendor.handle_event(VendorEvent::AdStarted);
        assert_eq!(vendor.poll(), None);
        vendor.handle_event(VendorEvent::AdFinished);
        assert_eq!(vendor.poll(), Some(AdOutcome::Granted));
        assert_eq!(vendor.poll(), None);
    }

    #[test]
    fn gamemonetize_resolves_on_game_start() {
        let mut vendor = GameMonetizeVendor::default();
        vendor.handle_event(VendorEvent::SdkReady);
        // A stray GameStart with no ad in flight is ignored
        vendor.handle_event(VendorEvent::GameStart);
        assert_eq!(vendor.poll(), None);

        assert_eq!(vendor.request_rewarded(), RequestAck::Accepted);
        vendor.handle_event(VendorEvent::GamePause);
        vendor.handle_event(VendorEvent::GameStart);
        assert_eq!(vendor.poll(), Some(AdOutcome::Granted));
    }

    #[test]
    fn gamedistribution_checks_the_reward_flag() {
        let mut vendor = GameDistributionVendor::default();
        vendor.handle_event(VendorEvent::SdkReady);
        assert_eq!(vendor.request_rewarded(), RequestAck::Accepted);
        vendor.handle_event(VendorEvent::RewardResult { rewarded: false });
        assert_eq!(vendor.poll(), Some(AdOutcome::Failed));

        assert_eq!(vendor.request_rewarded(), RequestAck::Accepted);
        vendor.handle_event(VendorEvent::RewardResult { rewarded: true });
        assert_eq!(vendor.poll(), Some(AdOutcome::Granted));
    }
}
