//! Praybit Core Library
//!
//! Local reward ledger: tap, referral and daily-claim accounting with
//! write-through persistence and an optional remote mirror.

pub mod clock;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StoreError;
pub use ledger::{RewardLedger, StateStore, SyncSink};
pub use state::{RewardRules, RewardState};
