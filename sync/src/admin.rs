//! Admin console over the remote stats table
//!
//! Browsing, search, total supply and manual token grants. Access is
//! granted to accounts whose email contains "admin".

use crate::error::{Result, SyncError};
use crate::row::UserStatsRow;
use crate::table::RemoteTable;
use std::sync::Arc;

pub fn is_admin(email: &str) -> bool {
    email.contains("admin")
}

/// Placeholder address derived from the user id; the table carries no emails
pub fn display_email(user_id: &str) -> String {
    let prefix: String = user_id.chars().take(8).collect();
    format!("user-{}@example.com", prefix)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminUser {
    pub stats: UserStatsRow,
    pub email: String,
}

impl From<UserStatsRow> for AdminUser {
    fn from(stats: UserStatsRow) -> Self {
        let email = display_email(&stats.user_id);
        Self { stats, email }
    }
}

/// Case-insensitive match on email, exact-case substring match on user id
pub fn filter_users(users: Vec<AdminUser>, term: &str) -> Vec<AdminUser> {
    let needle = term.to_lowercase();
    users
        .into_iter()
        .filter(|u| u.email.to_lowercase().contains(&needle) || u.stats.user_id.contains(term))
        .collect()
}

pub struct AdminConsole {
    table: Arc<dyn RemoteTable>,
}

impl AdminConsole {
    pub fn new(email: &str, table: Arc<dyn RemoteTable>) -> Result<Self> {
        if !is_admin(email) {
            log::warn!("🚫 Admin access denied for {}", email);
            return Err(SyncError::AccessDenied(format!(
                "{} does not have admin permissions",
                email
            )));
        }
        Ok(Self { table })
    }

    /// All users, richest first, optionally filtered
    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<AdminUser>> {
        let users: Vec<AdminUser> = self
            .table
            .list_by_coins(None)
            .await?
            .into_iter()
            .map(AdminUser::from)
            .collect();

        Ok(match search {
            Some(term) if !term.is_empty() => filter_users(users, term),
            _ => users,
        })
    }

    /// Sum of coins across every user
    pub async fn total_tokens(&self) -> Result<u64> {
        let rows = self.table.list_by_coins(None).await?;
        Ok(rows.iter().fold(0u64, |sum, r| sum.saturating_add(r.coins)))
    }

    /// Credit `amount` coins to `user_id` on the server
    pub async fn send_tokens(&self, user_id: &str, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Err(SyncError::InvalidAmount(amount));
        }
        self.table.increment_coins(user_id, amount as u64).await?;
        log::info!("🎁 Sent {} PRAY to {}", amount, user_id);
        Ok(())
    }
}
