//! Access to the remote per-user stats table

use crate::error::{Result, SyncError};
use crate::row::UserStatsRow;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[async_trait::async_trait]
pub trait RemoteTable: Send + Sync {
    /// Insert or replace the row keyed by `row.user_id`
    async fn upsert(&self, row: &UserStatsRow) -> Result<()>;

    async fn fetch(&self, user_id: &str) -> Result<Option<UserStatsRow>>;

    /// Rows ordered by coins, highest first
    async fn list_by_coins(&self, limit: Option<usize>) -> Result<Vec<UserStatsRow>>;

    /// Server-side credit used by the admin console
    async fn increment_coins(&self, user_id: &str, amount: u64) -> Result<()>;
}

/// In-process table, used for offline runs and tests
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: Mutex<HashMap<String, UserStatsRow>>,
    upserts: AtomicUsize,
    offline: AtomicBool,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, row: UserStatsRow) {
        self.rows.lock().insert(row.user_id.clone(), row);
    }

    pub fn get(&self, user_id: &str) -> Option<UserStatsRow> {
        self.rows.lock().get(user_id).cloned()
    }

    /// Number of upserts received so far
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Make every call fail until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(SyncError::Unavailable("memory table offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteTable for MemoryTable {
    async fn upsert(&self, row: &UserStatsRow) -> Result<()> {
        self.check_online()?;
        self.upserts.fetch_add(1, Ordering::SeqCst);

        let mut rows = self.rows.lock();
        let created_at = rows.get(&row.user_id).and_then(|r| r.created_at.clone());
        let mut row = row.clone();
        row.created_at = created_at.or(row.created_at);
        rows.insert(row.user_id.clone(), row);
        Ok(())
    }

    async fn fetch(&self, user_id: &str) -> Result<Option<UserStatsRow>> {
        self.check_online()?;
        Ok(self.get(user_id))
    }

    async fn list_by_coins(&self, limit: Option<usize>) -> Result<Vec<UserStatsRow>> {
        self.check_online()?;
        let mut rows: Vec<UserStatsRow> = self.rows.lock().values().cloned().collect();
        rows.sort_by(|a, b| b.coins.cmp(&a.coins).then_with(|| a.user_id.cmp(&b.user_id)));
        if let Some(limit) = limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn increment_coins(&self, user_id: &str, amount: u64) -> Result<()> {
        self.check_online()?;
        let mut rows = self.rows.lock();
        let row = rows.entry(user_id.to_string()).or_insert_with(|| UserStatsRow {
            user_id: user_id.to_string(),
            coins: 0,
            taps_count: 0,
            referrals: 0,
            last_daily_reward: None,
            created_at: None,
        });
        row.coins = row.coins.saturating_add(amount);
        Ok(())
    }
}
