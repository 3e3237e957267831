//! On-disk layout of the reward record
//!
//! `{coins, tapsCount, referrals, lastDailyReward?, miningPower?}`
//!
//! `miningPower` is written for display and ignored on read; the ledger
//! derives it from `tapsCount` under its own rules.

use praybit_core::{RewardState, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    #[serde(flatten)]
    state: RewardState,

    #[serde(rename = "miningPower", default, skip_serializing_if = "Option::is_none")]
    mining_power: Option<u64>,
}

pub fn encode(state: &RewardState, mining_power: u64) -> Result<Vec<u8>, StoreError> {
    let record = StoredRecord {
        state: *state,
        mining_power: Some(mining_power),
    };
    serde_json::to_vec(&record).map_err(|e| StoreError::SerializationError(e.to_string()))
}

/// Parse a stored record. Anything malformed yields `None`.
pub fn decode(bytes: &[u8]) -> Option<RewardState> {
    match serde_json::from_slice::<StoredRecord>(bytes) {
        Ok(record) => Some(record.state),
        Err(e) => {
            log::warn!("⚠️  Discarding unreadable reward record: {}", e);
            None
        }
    }
}
