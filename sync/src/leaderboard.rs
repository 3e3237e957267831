//! Top users by coins

use crate::error::Result;
use crate::row::UserStatsRow;
use crate::table::RemoteTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Number of users shown on the board by default
pub const DEFAULT_LEADERBOARD_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub coins: u64,
    pub rank: usize,
}

/// Number rows 1.. in the order given
pub fn rank(rows: Vec<UserStatsRow>) -> Vec<LeaderboardEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| LeaderboardEntry {
            user_id: row.user_id,
            coins: row.coins,
            rank: i + 1,
        })
        .collect()
}

pub struct Leaderboard {
    table: Arc<dyn RemoteTable>,
}

impl Leaderboard {
    pub fn new(table: Arc<dyn RemoteTable>) -> Self {
        Self { table }
    }

    pub async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let rows = self.table.list_by_coins(Some(limit)).await?;
        Ok(rank(rows))
    }
}
