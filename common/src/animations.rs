//! Blink timers for the approach indicators.
//!
//! Each route has two independent channels: "far" (bus left two stops
//! back) and "near" (bus left the previous stop). A channel flips on/off
//! whenever its period has elapsed since the last flip.
//!
//! # Channel Rules
//!
//! - Disabled: forced off every tick, `last_toggle` untouched, never flips
//! - Enabled: flips when `now - last_toggle >= period`, then
//!   `last_toggle = now`
//! - Re-enabled: `last_toggle = now`, so the next flip is a full period away
//!
//! A repeated `advance` with the same `now` never flips (zero interval).
//!
//! # Periods
//!
//! Periods are rolled once when a route's state is created, from
//! [`FAR_PERIOD_MS`] and [`NEAR_PERIOD_MS`], so neighbouring rows drift out
//! of phase. They stay fixed for the route's lifetime.
//!
//! # Ownership
//!
//! Timers live in a [`BlinkBank`] owned by the rendering session, keyed by
//! route identity rather than row index so a reordered route keeps its
//! phase. A repeated id falls back to the slot index for the later row.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use rand::Rng;
use tracing::{debug, warn};

use crate::document::{DisplayDocument, RouteEntry};

// =============================================================================
// Blink Timing Constants
// =============================================================================

/// Far channel period range in milliseconds.
pub const FAR_PERIOD_MS: Range<f32> = 600.0..1600.0;

/// Near channel period range in milliseconds.
pub const NEAR_PERIOD_MS: Range<f32> = 500.0..1300.0;

// =============================================================================
// Blink Channel
// =============================================================================

/// One on/off indicator with its own period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkChannel {
    on: bool,
    enabled: bool,
    period_ms: f32,
    last_toggle: u64,
}

impl BlinkChannel {
    pub const fn new(enabled: bool, initially_on: bool, period_ms: f32, now: u64) -> Self {
        Self {
            on: enabled && initially_on,
            enabled,
            period_ms,
            last_toggle: now,
        }
    }

    pub const fn is_on(&self) -> bool {
        self.on
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn period_ms(&self) -> f32 {
        self.period_ms
    }

    pub const fn last_toggle(&self) -> u64 {
        self.last_toggle
    }

    /// Step the channel to `now`. Returns `true` if it flipped.
    pub fn advance(&mut self, now: u64) -> bool {
        if !self.enabled {
            self.on = false;
            return false;
        }
        let elapsed = now.saturating_sub(self.last_toggle) as f32;
        if elapsed >= self.period_ms {
            self.on = !self.on;
            self.last_toggle = now;
            true
        } else {
            false
        }
    }

    /// Apply the route's enable flag. Re-enabling restarts the period.
    pub fn set_enabled(&mut self, enabled: bool, now: u64) {
        if enabled && !self.enabled {
            self.last_toggle = now;
        }
        if !enabled {
            self.on = false;
        }
        self.enabled = enabled;
    }
}

// =============================================================================
// Per-Route State
// =============================================================================

/// Both channels of one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkState {
    pub far: BlinkChannel,
    pub near: BlinkChannel,
}

impl BlinkState {
    /// Roll fresh periods. The far channel starts lit when enabled; the
    /// near channel starts dark.
    pub fn new<R: Rng + ?Sized>(far_enabled: bool, near_enabled: bool, now: u64, rng: &mut R) -> Self {
        let far_period = rng.gen_range(FAR_PERIOD_MS);
        let near_period = rng.gen_range(NEAR_PERIOD_MS);
        Self::with_periods(far_enabled, near_enabled, far_period, near_period, now)
    }

    pub const fn with_periods(far_enabled: bool, near_enabled: bool, far_period: f32, near_period: f32, now: u64) -> Self {
        Self {
            far: BlinkChannel::new(far_enabled, true, far_period, now),
            near: BlinkChannel::new(near_enabled, false, near_period, now),
        }
    }

    pub fn for_route<R: Rng + ?Sized>(route: &RouteEntry, now: u64, rng: &mut R) -> Self {
        Self::new(route.approach_far_blink, route.approach_near_blink, now, rng)
    }

    pub fn advance(&mut self, now: u64) {
        self.far.advance(now);
        self.near.advance(now);
    }

    pub fn apply_flags(&mut self, far_enabled: bool, near_enabled: bool, now: u64) {
        self.far.set_enabled(far_enabled, now);
        self.near.set_enabled(near_enabled, now);
    }

    pub const fn far_on(&self) -> bool {
        self.far.is_on()
    }

    pub const fn near_on(&self) -> bool {
        self.near.is_on()
    }
}

// =============================================================================
// Blink Bank
// =============================================================================

/// Stable identity of a route across edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteKey {
    /// Route carries an explicit id.
    Id(String),
    /// No id: fall back to the slot index.
    Slot(usize),
}

impl RouteKey {
    pub fn for_route(index: usize, route: &RouteEntry) -> Self {
        match &route.id {
            Some(id) if !id.is_empty() => Self::Id(id.clone()),
            _ => Self::Slot(index),
        }
    }
}

/// Blink state for every present route.
#[derive(Debug, Clone, Default)]
pub struct BlinkBank {
    states: HashMap<RouteKey, BlinkState>,
    /// Key each slot resolved to at the last `sync`.
    slot_keys: Vec<Option<RouteKey>>,
}

impl BlinkBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the bank to the document: create state for new routes, drop
    /// state for routes that are gone, apply enable flag changes.
    ///
    /// A route whose id is already taken by an earlier slot is keyed by its
    /// slot index instead, so every row keeps its own timers.
    pub fn sync<R: Rng + ?Sized>(&mut self, document: &DisplayDocument, now: u64, rng: &mut R) {
        let mut live = HashSet::with_capacity(self.states.len());
        self.slot_keys.clear();
        self.slot_keys.resize(document.slot_count(), None);

        for (index, route) in document.present_routes() {
            let mut key = RouteKey::for_route(index, route);
            if live.contains(&key) {
                warn!(?key, slot = index, "duplicate route id, keying blink state by slot");
                key = RouteKey::Slot(index);
            }
            match self.states.get_mut(&key) {
                Some(state) => state.apply_flags(route.approach_far_blink, route.approach_near_blink, now),
                None => {
                    debug!(?key, "creating blink state");
                    self.states.insert(key.clone(), BlinkState::for_route(route, now, rng));
                }
            }
            if let Some(slot_key) = self.slot_keys.get_mut(index) {
                *slot_key = Some(key.clone());
            }
            live.insert(key);
        }

        let before = self.states.len();
        self.states.retain(|key, _| live.contains(key));
        if self.states.len() != before {
            debug!(dropped = before - self.states.len(), "dropped blink state for removed routes");
        }
    }

    /// Step every route's channels to `now`.
    pub fn advance(&mut self, now: u64) {
        for state in self.states.values_mut() {
            state.advance(now);
        }
    }

    pub fn state(&self, key: &RouteKey) -> Option<&BlinkState> {
        self.states.get(key)
    }

    /// State for the route in slot `index`.
    pub fn state_for(&self, index: usize, route: &RouteEntry) -> Option<&BlinkState> {
        match self.slot_keys.get(index).and_then(Option::as_ref) {
            Some(key) => self.states.get(key),
            None => self.states.get(&RouteKey::for_route(index, route)),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tracing_test::traced_test;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn doc_with(routes: Vec<Option<RouteEntry>>) -> DisplayDocument {
        DisplayDocument {
            routes,
            ..DisplayDocument::default()
        }
    }

    #[test]
    fn test_disabled_channel_never_toggles() {
        let mut channel = BlinkChannel::new(false, true, 600.0, 0);
        assert!(!channel.is_on(), "disabled channel starts off");
        for now in (0..10_000).step_by(100) {
            assert!(!channel.advance(now));
            assert!(!channel.is_on());
        }
        assert_eq!(channel.last_toggle(), 0, "disabled channel keeps its timestamp");
    }

    #[test]
    fn test_toggles_once_per_period() {
        let mut channel = BlinkChannel::new(true, false, 800.0, 1_000);
        assert!(!channel.advance(1_000));
        assert!(!channel.advance(1_799));
        assert!(channel.advance(1_800), "flips exactly one period later");
        assert!(channel.is_on());
        assert!(!channel.advance(1_800), "same now is a no-op");
        assert_eq!(channel.last_toggle(), 1_800);
    }

    #[test]
    fn test_reenable_waits_full_period() {
        let mut channel = BlinkChannel::new(true, true, 1_000.0, 0);
        channel.set_enabled(false, 500);
        assert!(!channel.is_on());
        channel.advance(5_000);

        channel.set_enabled(true, 5_000);
        assert!(!channel.advance(5_000), "no instant toggle on re-enable");
        assert!(!channel.advance(5_999));
        assert!(channel.advance(6_000));
    }

    #[test]
    fn test_set_enabled_while_enabled_keeps_phase() {
        let mut channel = BlinkChannel::new(true, false, 700.0, 0);
        channel.set_enabled(true, 600);
        assert!(channel.advance(700), "no reset when already enabled");
    }

    #[test]
    fn test_clock_going_backwards_does_not_toggle() {
        let mut channel = BlinkChannel::new(true, false, 500.0, 10_000);
        assert!(!channel.advance(2_000));
    }

    #[test]
    fn test_new_state_periods_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let state = BlinkState::new(true, true, 0, &mut rng);
            assert!(FAR_PERIOD_MS.contains(&state.far.period_ms()));
            assert!(NEAR_PERIOD_MS.contains(&state.near.period_ms()));
        }
    }

    #[test]
    fn test_initial_states() {
        let state = BlinkState::with_periods(true, true, 1_000.0, 800.0, 0);
        assert!(state.far_on(), "far starts lit");
        assert!(!state.near_on(), "near starts dark");

        let state = BlinkState::with_periods(false, true, 1_000.0, 800.0, 0);
        assert!(!state.far_on(), "disabled far starts dark");
    }

    #[test]
    fn test_route_key_prefers_id() {
        let route = RouteEntry { id: Some("kanazawa-19".into()), ..RouteEntry::default() };
        assert_eq!(RouteKey::for_route(3, &route), RouteKey::Id("kanazawa-19".into()));
        assert_eq!(RouteKey::for_route(3, &RouteEntry::default()), RouteKey::Slot(3));

        let blank = RouteEntry { id: Some(String::new()), ..RouteEntry::default() };
        assert_eq!(RouteKey::for_route(1, &blank), RouteKey::Slot(1), "blank id falls back to slot");
    }

    #[test]
    fn test_sync_creates_and_drops_states() {
        let mut bank = BlinkBank::new();
        let mut rng = rng();
        let mut doc = doc_with(vec![Some(RouteEntry::default()), None, Some(RouteEntry::default())]);

        bank.sync(&doc, 0, &mut rng);
        assert_eq!(bank.len(), 2, "absent slots get no state");
        assert!(bank.state(&RouteKey::Slot(1)).is_none());

        doc.routes.truncate(1);
        bank.sync(&doc, 100, &mut rng);
        assert_eq!(bank.len(), 1);
        assert!(bank.state(&RouteKey::Slot(2)).is_none());
    }

    #[test]
    fn test_sync_applies_flag_changes() {
        let mut bank = BlinkBank::new();
        let mut rng = rng();
        let mut doc = doc_with(vec![Some(RouteEntry::default())]);
        bank.sync(&doc, 0, &mut rng);

        doc.routes[0].as_mut().unwrap().approach_far_blink = false;
        bank.sync(&doc, 50, &mut rng);
        bank.advance(10_000);
        let state = bank.state(&RouteKey::Slot(0)).unwrap();
        assert!(!state.far_on(), "far forced off");
        assert!(!state.far.is_enabled());

        doc.routes[0].as_mut().unwrap().approach_far_blink = true;
        bank.sync(&doc, 20_000, &mut rng);
        assert_eq!(bank.state(&RouteKey::Slot(0)).unwrap().far.last_toggle(), 20_000);
    }

    #[test]
    fn test_reordered_route_keeps_state() {
        let mut bank = BlinkBank::new();
        let mut rng = rng();
        let a = RouteEntry { id: Some("a".into()), ..RouteEntry::default() };
        let b = RouteEntry { id: Some("b".into()), ..RouteEntry::default() };

        let doc = doc_with(vec![Some(a.clone()), Some(b.clone())]);
        bank.sync(&doc, 0, &mut rng);
        let before = *bank.state(&RouteKey::Id("a".into())).unwrap();

        let swapped = doc_with(vec![Some(b.clone()), Some(a.clone())]);
        bank.sync(&swapped, 10, &mut rng);
        assert_eq!(bank.state_for(1, &a), Some(&before), "route a keeps its periods after moving");
    }

    #[test]
    #[traced_test]
    fn test_duplicate_ids_get_independent_state() {
        let mut bank = BlinkBank::new();
        let mut rng = rng();
        let a = RouteEntry { id: Some("x".into()), ..RouteEntry::default() };
        let b = RouteEntry { id: Some("x".into()), approach_far_blink: false, ..RouteEntry::default() };
        let doc = doc_with(vec![Some(a.clone()), Some(b.clone())]);

        let mut flips = 0;
        let mut last = None;
        for now in (0..20_000).step_by(20) {
            bank.sync(&doc, now, &mut rng);
            bank.advance(now);
            let far_on = bank.state_for(0, &a).expect("route a has state").far_on();
            if last.is_some_and(|previous| previous != far_on) {
                flips += 1;
            }
            last = Some(far_on);
            assert!(!bank.state_for(1, &b).expect("route b has state").far_on(), "route b far stays off");
        }

        assert_eq!(bank.len(), 2, "each row owns its state");
        assert!(flips > 10, "route a should keep blinking on its own, flips={flips}");
        assert!(logs_contain("duplicate route id"));
    }

    proptest! {
        #[test]
        fn prop_disabled_never_on(period in 500.0f32..1600.0, steps in proptest::collection::vec(0u64..5_000, 1..50)) {
            let mut channel = BlinkChannel::new(false, true, period, 0);
            let mut now = 0u64;
            for step in steps {
                now += step;
                prop_assert!(!channel.advance(now));
                prop_assert!(!channel.is_on());
            }
        }

        #[test]
        fn prop_exactly_one_toggle_across_period(period in 500u64..1600, start in 0u64..1_000_000) {
            let mut channel = BlinkChannel::new(true, false, period as f32, start);
            let mut flips = 0;
            if channel.advance(start) { flips += 1; }
            if channel.advance(start + period) { flips += 1; }
            prop_assert_eq!(flips, 1);
        }

        #[test]
        fn prop_reenable_never_early(period in 500u64..1600, t in 0u64..1_000_000, probe in 0u64..1600) {
            let mut channel = BlinkChannel::new(true, true, period as f32, 0);
            channel.set_enabled(false, t / 2);
            channel.set_enabled(true, t);
            let early = probe % period;
            prop_assert!(!channel.advance(t + early));
        }
    }
}
