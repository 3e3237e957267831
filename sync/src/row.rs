//! Row layout of the remote `user_stats` table

use chrono::NaiveDate;
use praybit_core::RewardState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatsRow {
    pub user_id: String,
    pub coins: u64,
    pub taps_count: u64,
    pub referrals: u64,
    #[serde(default)]
    pub last_daily_reward: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserStatsRow {
    pub fn from_state(user_id: &str, state: &RewardState) -> Self {
        Self {
            user_id: user_id.to_string(),
            coins: state.points,
            taps_count: state.tap_count,
            referrals: state.referral_count,
            last_daily_reward: state.last_daily_claim,
            created_at: None,
        }
    }

    pub fn to_state(&self) -> RewardState {
        RewardState {
            points: self.coins,
            tap_count: self.taps_count,
            referral_count: self.referrals,
            last_daily_claim: self.last_daily_reward,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleared_claim_date_serializes_as_null() {
        let row = UserStatsRow::from_state("u1", &RewardState::default());
        let json = serde_json::to_value(&row).unwrap();

        assert!(json["last_daily_reward"].is_null());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_row_with_extra_columns_parses() {
        let row: UserStatsRow = serde_json::from_str(
            r#"{"id":"9b1d","user_id":"u1","coins":40,"taps_count":30,"referrals":1,
                "last_daily_reward":"2025-05-05","created_at":"2025-05-01T10:00:00Z"}"#,
        )
        .unwrap();

        let state = row.to_state();
        assert_eq!(state.points, 40);
        assert_eq!(state.last_daily_claim, NaiveDate::from_ymd_opt(2025, 5, 5));
    }
}
