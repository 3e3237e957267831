//! Praybit Remote Sync
//!
//! Mirrors the local reward ledger to the hosted `user_stats` table and
//! serves the read paths built on that table: leaderboard and admin console.

pub mod admin;
pub mod debounce;
pub mod error;
pub mod leaderboard;
pub mod remote_sync;
pub mod rest;
pub mod row;
pub mod table;

pub use admin::{AdminConsole, AdminUser};
pub use debounce::{Debouncer, FlushPoll, FlushToken};
pub use error::{Result, SyncError};
pub use leaderboard::{Leaderboard, LeaderboardEntry, DEFAULT_LEADERBOARD_SIZE};
pub use remote_sync::{RemoteSync, DEFAULT_DEBOUNCE};
pub use rest::RestTable;
pub use row::UserStatsRow;
pub use table::{MemoryTable, RemoteTable};
