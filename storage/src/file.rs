//! File-based slot storage
//!
//! Each slot is one JSON file in the data directory, overwritten whole on
//! every save.

use crate::record;
use praybit_core::constants::STORAGE_KEY;
use praybit_core::{RewardState, StateStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of named JSON slots
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Open storage directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let data_dir = path.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }

        Ok(Self { data_dir })
    }

    fn slot_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", name))
    }

    /// Overwrite a slot
    pub fn write_slot(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        // Write then rename so a crash never leaves a half-written slot
        let tmp_path = self.data_dir.join(format!("{}.json.tmp", name));
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, self.slot_path(name))?;
        Ok(())
    }

    /// Read a slot, `None` if absent
    pub fn read_slot(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.slot_path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(path)?))
    }

    /// Delete a slot
    pub fn delete_slot(&self, name: &str) -> Result<(), StoreError> {
        let path = self.slot_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Get storage directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Reward record kept in `<data_dir>/praybitData.json`
pub struct FileStore {
    storage: Storage,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let storage = Storage::open(path)?;
        log::debug!("File store opened at {}", storage.data_dir().display());
        Ok(Self { storage })
    }

    fn read_record(&self) -> Option<RewardState> {
        match self.storage.read_slot(STORAGE_KEY) {
            Ok(Some(bytes)) => record::decode(&bytes),
            Ok(None) => None,
            Err(e) => {
                log::warn!("⚠️  Failed to read reward record: {}", e);
                None
            }
        }
    }
}

impl StateStore for FileStore {
    fn load(&self) -> RewardState {
        self.read_record().unwrap_or_default()
    }

    fn has_record(&self) -> bool {
        self.read_record().is_some()
    }

    fn save(&self, state: &RewardState, mining_power: u64) -> Result<(), StoreError> {
        let bytes = record::encode(state, mining_power)?;
        self.storage.write_slot(STORAGE_KEY, &bytes)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.storage.delete_slot(STORAGE_KEY)
    }
}
