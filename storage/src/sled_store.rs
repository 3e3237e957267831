//! Sled-backed slot storage
use crate::record;
use praybit_core::constants::STORAGE_KEY;
use praybit_core::{RewardState, StateStore, StoreError};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(&path)
            .map_err(|e| StoreError::BackendError(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }

    fn read_record(&self) -> Option<RewardState> {
        match self.db.get(STORAGE_KEY.as_bytes()) {
            Ok(Some(data)) => record::decode(&data),
            Ok(None) => None,
            Err(e) => {
                log::warn!("⚠️  Failed to read reward record: {}", e);
                None
            }
        }
    }
}

impl StateStore for SledStore {
    fn load(&self) -> RewardState {
        self.read_record().unwrap_or_default()
    }

    fn has_record(&self) -> bool {
        self.read_record().is_some()
    }

    fn save(&self, state: &RewardState, mining_power: u64) -> Result<(), StoreError> {
        let value = record::encode(state, mining_power)?;

        self.db
            .insert(STORAGE_KEY.as_bytes(), value)
            .map_err(|e| StoreError::BackendError(format!("Failed to save record: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| StoreError::BackendError(format!("Failed to flush record: {}", e)))?;

        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.db
            .remove(STORAGE_KEY.as_bytes())
            .map_err(|e| StoreError::BackendError(format!("Failed to remove record: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| StoreError::BackendError(format!("Failed to flush removal: {}", e)))?;

        Ok(())
    }
}
