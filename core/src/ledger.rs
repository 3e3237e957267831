//! Reward ledger
//!
//! Holds the authoritative in-memory `RewardState` for a session. Every
//! mutation is written through to the persistent store and, when a user
//! is signed in, handed to the remote sync for a debounced push.
//!
//! Ledger operations never fail. Store and sync problems are logged and
//! dropped: the local state keeps going as if offline.

use crate::clock::Clock;
use crate::error::StoreError;
use crate::state::{RewardRules, RewardState};
use std::sync::Arc;

/// Durable single-slot storage for the reward record
pub trait StateStore: Send + Sync {
    /// Stored state, or defaults when the slot is empty or unreadable
    fn load(&self) -> RewardState;

    /// Whether the slot holds a readable record
    fn has_record(&self) -> bool;

    /// Write `state` along with the mining power the ledger derived for it
    fn save(&self, state: &RewardState, mining_power: u64) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

/// Receiver of state changes for a signed-in user
pub trait SyncSink: Send + Sync {
    /// Queue `state` for upload. Must not block and must not fail.
    fn schedule(&self, user_id: &str, state: &RewardState);
}

struct RemoteBinding {
    user_id: String,
    sync: Arc<dyn SyncSink>,
}

pub struct RewardLedger {
    state: RewardState,
    rules: RewardRules,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    remote: Option<RemoteBinding>,
    /// True until the first mutation, and only if the store was empty at open
    seedable: bool,
}

impl RewardLedger {
    /// Open the ledger from whatever the store holds
    pub fn open(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_rules(store, clock, RewardRules::default())
    }

    pub fn with_rules(
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        rules: RewardRules,
    ) -> Self {
        let seedable = !store.has_record();
        let state = store.load();
        log::debug!(
            "Ledger opened: {} points, {} taps, {} referrals",
            state.points,
            state.tap_count,
            state.referral_count
        );

        Self {
            state,
            rules,
            store,
            clock,
            remote: None,
            seedable,
        }
    }

    pub fn state(&self) -> &RewardState {
        &self.state
    }

    pub fn rules(&self) -> &RewardRules {
        &self.rules
    }

    pub fn mining_power(&self) -> u64 {
        self.rules.mining_power(self.state.tap_count)
    }

    pub fn has_claimed_today(&self) -> bool {
        self.state.last_daily_claim == Some(self.clock.today())
    }

    /// Whether a remote seed would still be accepted
    pub fn is_fresh(&self) -> bool {
        self.seedable
    }

    pub fn user_id(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.user_id.as_str())
    }

    /// Attach an identity; later mutations are mirrored to `sync`
    pub fn sign_in(&mut self, user_id: impl Into<String>, sync: Arc<dyn SyncSink>) {
        let user_id = user_id.into();
        log::info!("👤 Signed in as {}", user_id);
        self.remote = Some(RemoteBinding { user_id, sync });
    }

    /// Drop the identity; the ledger continues locally
    pub fn sign_out(&mut self) {
        if let Some(remote) = self.remote.take() {
            log::info!("👤 Signed out {}", remote.user_id);
        }
    }

    /// Seed from a remote copy, only while the local slot is still empty.
    ///
    /// Returns whether the remote state was applied.
    pub fn seed_from_remote(&mut self, remote: RewardState) -> bool {
        if !self.seedable {
            log::debug!("Local record present, keeping local state over remote");
            return false;
        }

        self.seedable = false;
        self.state = remote;
        self.persist();
        log::info!("☁️  Seeded ledger from remote: {} points", remote.points);
        true
    }

    /// Count one tap. The reward uses the mining power in effect before the tap.
    pub fn tap(&mut self) -> RewardState {
        let power = self.mining_power();
        self.state.tap_count = self.state.tap_count.saturating_add(1);
        self.state.points = self.state.points.saturating_add(power);
        log::debug!("Tap #{} (+{} points)", self.state.tap_count, power);
        self.commit();
        self.state
    }

    /// Credit one referral. The caller vouches that it happened.
    pub fn refer(&mut self) -> RewardState {
        self.state.referral_count = self.state.referral_count.saturating_add(1);
        self.state.points = self.state.points.saturating_add(self.rules.referral_reward);
        log::debug!(
            "Referral #{} (+{} points)",
            self.state.referral_count,
            self.rules.referral_reward
        );
        self.commit();
        self.state
    }

    /// Claim the daily reward. Returns false if already claimed today.
    pub fn claim_daily(&mut self) -> bool {
        let today = self.clock.today();
        if self.state.last_daily_claim == Some(today) {
            log::debug!("Daily reward already claimed for {}", today);
            return false;
        }

        self.state.last_daily_claim = Some(today);
        self.state.points = self.state.points.saturating_add(self.rules.daily_reward);
        log::debug!("Daily reward claimed for {}", today);
        self.commit();
        true
    }

    /// Zero every counter and wipe the stored record
    pub fn reset(&mut self) {
        self.state = RewardState::default();
        self.seedable = false;

        if let Err(e) = self.store.clear() {
            log::warn!("⚠️  Failed to clear stored rewards: {}", e);
        }
        self.schedule_sync();
        log::info!("🔄 Rewards reset");
    }

    fn commit(&mut self) {
        self.seedable = false;
        self.persist();
        self.schedule_sync();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.state, self.mining_power()) {
            log::warn!("⚠️  Failed to persist rewards: {}", e);
        }
    }

    fn schedule_sync(&self) {
        if let Some(remote) = &self.remote {
            remote.sync.schedule(&remote.user_id, &self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::NaiveDate;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        slot: Mutex<Option<RewardState>>,
        saved_power: Mutex<Option<u64>>,
        fail_writes: bool,
    }

    impl StateStore for MemoryStore {
        fn load(&self) -> RewardState {
            self.slot.lock().unwrap_or_default()
        }

        fn has_record(&self) -> bool {
            self.slot.lock().is_some()
        }

        fn save(&self, state: &RewardState, mining_power: u64) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::BackendError("disk full".to_string()));
            }
            *self.slot.lock() = Some(*state);
            *self.saved_power.lock() = Some(mining_power);
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            *self.slot.lock() = None;
            *self.saved_power.lock() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        pushes: Mutex<Vec<(String, RewardState)>>,
    }

    impl SyncSink for RecordingSink {
        fn schedule(&self, user_id: &str, state: &RewardState) {
            self.pushes.lock().push((user_id.to_string(), *state));
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn setup() -> (RewardLedger, Arc<MemoryStore>, ManualClock) {
        let store = Arc::new(MemoryStore::default());
        let clock = ManualClock::new(day(1));
        let ledger = RewardLedger::open(store.clone(), Arc::new(clock.clone()));
        (ledger, store, clock)
    }

    #[test]
    fn test_mining_power_tracks_taps() {
        let (mut ledger, _, _) = setup();

        for _ in 0..350 {
            let state = ledger.tap();
            assert_eq!(ledger.mining_power(), 1 + state.tap_count / 100);
        }
        assert_eq!(ledger.mining_power(), 4);
    }

    #[test]
    fn test_hundred_taps_use_pre_increment_power() {
        let (mut ledger, _, _) = setup();

        for _ in 0..100 {
            ledger.tap();
        }

        assert_eq!(ledger.state().tap_count, 100);
        assert_eq!(ledger.mining_power(), 2);
        assert_eq!(ledger.state().points, 100);

        // 101st tap is the first one paid at power 2
        ledger.tap();
        assert_eq!(ledger.state().points, 102);
    }

    #[test]
    fn test_daily_claim_once_per_day() {
        let (mut ledger, _, clock) = setup();

        assert!(ledger.claim_daily());
        assert_eq!(ledger.state().points, 5);
        assert!(ledger.has_claimed_today());

        assert!(!ledger.claim_daily());
        assert_eq!(ledger.state().points, 5);

        clock.advance_days(1);
        assert!(!ledger.has_claimed_today());
        assert!(ledger.claim_daily());
        assert_eq!(ledger.state().points, 10);
        assert_eq!(ledger.state().last_daily_claim, Some(day(2)));
    }

    #[test]
    fn test_referrals_add_fixed_reward() {
        let (mut ledger, _, _) = setup();

        for _ in 0..7 {
            ledger.refer();
        }

        assert_eq!(ledger.state().referral_count, 7);
        assert_eq!(ledger.state().points, 70);
    }

    #[test]
    fn test_custom_rules() {
        let store = Arc::new(MemoryStore::default());
        let rules = RewardRules {
            referral_reward: 25,
            daily_reward: 1,
            taps_per_level: 2,
        };
        let mut ledger =
            RewardLedger::with_rules(store, Arc::new(ManualClock::new(day(1))), rules);

        ledger.tap();
        ledger.tap();
        ledger.tap();
        ledger.refer();
        ledger.claim_daily();

        // taps pay 1, 1, 2
        assert_eq!(ledger.state().points, 4 + 25 + 1);
        assert_eq!(ledger.mining_power(), 2);
    }

    #[test]
    fn test_store_receives_mining_power_from_ledger_rules() {
        let store = Arc::new(MemoryStore::default());
        let rules = RewardRules {
            taps_per_level: 2,
            ..RewardRules::default()
        };
        let mut ledger =
            RewardLedger::with_rules(store.clone(), Arc::new(ManualClock::new(day(1))), rules);

        for _ in 0..10 {
            ledger.tap();
        }

        assert_eq!(ledger.mining_power(), 6);
        assert_eq!(*store.saved_power.lock(), Some(6));
    }

    #[test]
    fn test_mutations_write_through_to_store() {
        let (mut ledger, store, _) = setup();

        ledger.tap();
        ledger.refer();

        assert_eq!(store.load(), *ledger.state());
    }

    #[test]
    fn test_reset_clears_store() {
        let (mut ledger, store, _) = setup();

        ledger.tap();
        ledger.claim_daily();
        ledger.reset();

        assert_eq!(*ledger.state(), RewardState::default());
        assert!(!store.has_record());
        assert_eq!(store.load(), RewardState::default());
        assert!(!ledger.has_claimed_today());
    }

    #[test]
    fn test_store_failures_are_swallowed() {
        let store = Arc::new(MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        });
        let mut ledger = RewardLedger::open(store, Arc::new(ManualClock::new(day(1))));

        let state = ledger.tap();
        assert_eq!(state.points, 1);
        assert!(ledger.claim_daily());
    }

    #[test]
    fn test_no_sync_without_identity() {
        let (mut ledger, _, _) = setup();
        let sink = Arc::new(RecordingSink::default());
        ledger.sign_in("user-1", sink.clone());
        ledger.sign_out();

        for _ in 0..50 {
            ledger.tap();
        }
        ledger.refer();
        ledger.claim_daily();
        ledger.reset();

        assert!(sink.pushes.lock().is_empty());
        assert_eq!(ledger.user_id(), None);
    }

    #[test]
    fn test_signed_in_mutations_are_scheduled() {
        let (mut ledger, _, _) = setup();
        let sink = Arc::new(RecordingSink::default());
        ledger.sign_in("user-1", sink.clone());

        ledger.tap();
        ledger.refer();
        ledger.reset();

        let pushes = sink.pushes.lock();
        assert_eq!(pushes.len(), 3);
        assert_eq!(pushes[1].0, "user-1");
        assert_eq!(pushes[1].1.points, 11);
        assert_eq!(pushes[2].1, RewardState::default());
        drop(pushes);

        ledger.sign_out();
        ledger.tap();
        assert_eq!(sink.pushes.lock().len(), 3);
    }

    #[test]
    fn test_seed_applies_only_to_empty_store() {
        let remote = RewardState {
            points: 500,
            tap_count: 300,
            referral_count: 2,
            last_daily_claim: None,
        };

        let (mut ledger, store, _) = setup();
        assert!(ledger.seed_from_remote(remote));
        assert_eq!(ledger.state().points, 500);
        assert_eq!(ledger.mining_power(), 4);
        assert_eq!(store.load(), remote);

        // Second seed is ignored
        assert!(!ledger.seed_from_remote(RewardState::default()));

        // A store that already holds data wins over remote
        let local = RewardState {
            points: 3,
            ..RewardState::default()
        };
        let store = Arc::new(MemoryStore::default());
        store.save(&local, 1).unwrap();
        let mut ledger = RewardLedger::open(store, Arc::new(ManualClock::new(day(1))));
        assert!(!ledger.seed_from_remote(remote));
        assert_eq!(ledger.state().points, 3);
    }

    #[test]
    fn test_seed_refused_after_local_mutation() {
        let (mut ledger, _, _) = setup();
        ledger.tap();

        assert!(!ledger.seed_from_remote(RewardState {
            points: 999,
            ..RewardState::default()
        }));
        assert_eq!(ledger.state().points, 1);
    }
}
