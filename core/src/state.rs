//! Reward state and the rules that drive it

use crate::constants::{DAILY_REWARD, REFERRAL_REWARD, TAPS_PER_LEVEL};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user's reward counters.
///
/// Field names on the wire follow the stored record layout
/// (`coins`, `tapsCount`, `referrals`, `lastDailyReward`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardState {
    #[serde(rename = "coins")]
    pub points: u64,

    #[serde(rename = "tapsCount")]
    pub tap_count: u64,

    #[serde(rename = "referrals")]
    pub referral_count: u64,

    #[serde(
        rename = "lastDailyReward",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_daily_claim: Option<NaiveDate>,
}

/// Tunable reward amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardRules {
    pub referral_reward: u64,
    pub daily_reward: u64,
    pub taps_per_level: u64,
}

impl RewardRules {
    /// `floor(1 + taps / taps_per_level)`
    pub fn mining_power(&self, tap_count: u64) -> u64 {
        1 + tap_count / self.taps_per_level.max(1)
    }
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            referral_reward: REFERRAL_REWARD,
            daily_reward: DAILY_REWARD,
            taps_per_level: TAPS_PER_LEVEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mining_power_levels() {
        let rules = RewardRules::default();
        assert_eq!(rules.mining_power(0), 1);
        assert_eq!(rules.mining_power(99), 1);
        assert_eq!(rules.mining_power(100), 2);
        assert_eq!(rules.mining_power(250), 3);
    }

    #[test]
    fn test_zero_taps_per_level_does_not_divide_by_zero() {
        let rules = RewardRules {
            taps_per_level: 0,
            ..RewardRules::default()
        };
        assert_eq!(rules.mining_power(5), 6);
    }

    #[test]
    fn test_record_field_names() {
        let state = RewardState {
            points: 42,
            tap_count: 30,
            referral_count: 1,
            last_daily_claim: NaiveDate::from_ymd_opt(2025, 4, 2),
        };

        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["coins"], 42);
        assert_eq!(json["tapsCount"], 30);
        assert_eq!(json["referrals"], 1);
        assert_eq!(json["lastDailyReward"], "2025-04-02");
    }

    #[test]
    fn test_missing_claim_date_is_none() {
        let state: RewardState =
            serde_json::from_str(r#"{"coins":3,"tapsCount":3,"referrals":0,"miningPower":1}"#)
                .unwrap();
        assert_eq!(state.last_daily_claim, None);
        assert_eq!(state.points, 3);
    }
}
