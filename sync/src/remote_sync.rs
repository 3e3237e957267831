//! Best-effort mirror of the ledger to the remote table
//!
//! Local state is authoritative. Pushes are debounced and fire-and-forget:
//! a failed push is logged and forgotten, and the next mutation carries
//! the newer state anyway. Pull is only used to seed an empty ledger.

use crate::debounce::{Debouncer, FlushPoll, FlushToken};
use crate::error::Result;
use crate::row::UserStatsRow;
use crate::table::RemoteTable;
use parking_lot::Mutex;
use praybit_core::{RewardState, SyncSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default debounce window for pushes
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

type PendingPush = (String, RewardState);

#[derive(Clone)]
pub struct RemoteSync {
    table: Arc<dyn RemoteTable>,
    debouncer: Arc<Mutex<Debouncer<PendingPush>>>,
}

impl RemoteSync {
    pub fn new(table: Arc<dyn RemoteTable>, window: Duration) -> Self {
        Self {
            table,
            debouncer: Arc::new(Mutex::new(Debouncer::new(window))),
        }
    }

    /// Queue `state` for upload; bursts collapse to the last one.
    ///
    /// Inside a tokio runtime one flush timer per burst sends the state at
    /// the end of the window. Outside one the push stays pending until
    /// `flush`. A pending push for a different user is sent right away
    /// rather than replaced.
    pub fn push(&self, user_id: &str, state: &RewardState) {
        let (displaced, token) = {
            let mut debouncer = self.debouncer.lock();
            let other_user = debouncer
                .pending()
                .is_some_and(|(pending, _)| pending != user_id);
            let displaced = if other_user { debouncer.take() } else { None };
            let token = debouncer.schedule((user_id.to_string(), *state), Instant::now());
            (displaced, token)
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                if let Some(token) = token {
                    self.debouncer.lock().disarm(token);
                }
                if let Some((previous, _)) = displaced {
                    log::warn!("⚠️  No runtime, dropped pending push for {}", previous);
                }
                log::debug!("No runtime, push for {} left pending", user_id);
                return;
            }
        };

        if let Some((previous, state)) = displaced {
            let sync = self.clone();
            handle.spawn(async move {
                sync.send(&previous, &state).await;
            });
        }

        // An armed timer picks up the new due time on its next poll
        let Some(token) = token else {
            return;
        };
        let sync = self.clone();
        handle.spawn(async move {
            sync.run_flush_timer(token).await;
        });
    }

    async fn run_flush_timer(&self, token: FlushToken) {
        loop {
            let poll = self.debouncer.lock().poll(token, Instant::now());
            match poll {
                FlushPoll::Wait(due) => tokio::time::sleep_until(due).await,
                FlushPoll::Ready((user_id, state)) => {
                    self.send(&user_id, &state).await;
                    return;
                }
                FlushPoll::Idle => return,
            }
        }
    }

    /// Upload any pending state now. Returns whether a push succeeded.
    pub async fn flush(&self) -> bool {
        let pending = self.debouncer.lock().take();
        match pending {
            Some((user_id, state)) => self.send(&user_id, &state).await,
            None => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.lock().is_pending()
    }

    /// Upsert immediately, reporting failure to the caller
    pub async fn push_now(&self, user_id: &str, state: &RewardState) -> Result<()> {
        let row = UserStatsRow::from_state(user_id, state);
        self.table.upsert(&row).await
    }

    /// Fetch the remote copy, reporting failure to the caller
    pub async fn try_pull(&self, user_id: &str) -> Result<Option<RewardState>> {
        let row = self.table.fetch(user_id).await?;
        Ok(row.map(|r| r.to_state()))
    }

    /// Fetch the remote copy; failures degrade to "nothing remote"
    pub async fn pull(&self, user_id: &str) -> Option<RewardState> {
        match self.try_pull(user_id).await {
            Ok(state) => state,
            Err(e) => {
                log::warn!("⚠️  Could not fetch remote rewards for {}: {}", user_id, e);
                None
            }
        }
    }

    async fn send(&self, user_id: &str, state: &RewardState) -> bool {
        match self.push_now(user_id, state).await {
            Ok(()) => {
                log::debug!("☁️  Synced {} points for {}", state.points, user_id);
                true
            }
            Err(e) => {
                log::warn!("⚠️  Remote sync failed for {}: {}", user_id, e);
                false
            }
        }
    }
}

impl SyncSink for RemoteSync {
    fn schedule(&self, user_id: &str, state: &RewardState) {
        self.push(user_id, state);
    }
}
