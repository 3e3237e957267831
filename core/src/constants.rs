//! Reward constants

/// Points credited for each confirmed referral
pub const REFERRAL_REWARD: u64 = 10;

/// Points credited for the once-per-day claim
pub const DAILY_REWARD: u64 = 5;

/// Lifetime taps needed to raise mining power by one level
pub const TAPS_PER_LEVEL: u64 = 100;

/// Name of the durable slot holding the serialized reward record
pub const STORAGE_KEY: &str = "praybitData";
