//! Praybit Storage Layer
//!
//! Durable single-slot persistence for the reward record. The slot holds
//! the latest state only; there is no history.

pub mod file;
pub mod record;
pub mod sled_store;

pub use file::{FileStore, Storage};
pub use sled_store::SledStore;

use praybit_core::{StateStore, StoreError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Which backend holds the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Sled,
}

/// Open the configured backend under `data_dir`
pub fn open_store(
    backend: StoreBackend,
    data_dir: &Path,
) -> Result<Arc<dyn StateStore>, StoreError> {
    let store: Arc<dyn StateStore> = match backend {
        StoreBackend::File => Arc::new(FileStore::open(data_dir)?),
        StoreBackend::Sled => Arc::new(SledStore::open(data_dir.join("rewards.db"))?),
    };
    Ok(store)
}
