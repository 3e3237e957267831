//! Composition root: store, clock, ledger and optional remote sync

use crate::config::Config;
use anyhow::Context;
use praybit_core::{Clock, RewardLedger, SystemClock};
use praybit_storage::open_store;
use praybit_sync::{RemoteSync, RemoteTable, RestTable};
use std::sync::Arc;

pub struct App {
    pub ledger: RewardLedger,
    sync: Option<RemoteSync>,
    table: Option<Arc<dyn RemoteTable>>,
}

impl App {
    pub async fn start(config: &Config) -> anyhow::Result<Self> {
        Self::start_with(config, remote_table(config), Arc::new(SystemClock)).await
    }

    pub async fn start_with(
        config: &Config,
        table: Option<Arc<dyn RemoteTable>>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let data_dir = config.data_dir();
        let store = open_store(config.storage.backend, &data_dir)
            .with_context(|| format!("opening reward store in {}", data_dir.display()))?;
        let mut ledger = RewardLedger::with_rules(store, clock, config.rewards);

        let mut sync = None;
        if let (Some(table), Some(user_id)) = (&table, &config.identity.user_id) {
            let remote = RemoteSync::new(table.clone(), config.debounce());
            ledger.sign_in(user_id.clone(), Arc::new(remote.clone()));

            if ledger.is_fresh() {
                if let Some(state) = remote.pull(user_id).await {
                    ledger.seed_from_remote(state);
                }
            }
            sync = Some(remote);
        } else if config.identity.user_id.is_none() {
            log::debug!("No user id, running local-only");
        }

        Ok(Self {
            ledger,
            sync,
            table,
        })
    }

    pub fn table(&self) -> Option<Arc<dyn RemoteTable>> {
        self.table.clone()
    }

    /// Send any debounced push before the process exits
    pub async fn shutdown(self) {
        if let Some(sync) = self.sync {
            if sync.has_pending() {
                sync.flush().await;
            }
        }
    }
}

fn remote_table(config: &Config) -> Option<Arc<dyn RemoteTable>> {
    let Some(url) = config.remote_url() else {
        log::error!(
            "Remote URL is missing! Set [remote] url in praybit.toml or {}",
            crate::config::ENV_REMOTE_URL
        );
        return None;
    };

    let key = config.remote.anon_key.as_deref().unwrap_or_default();
    match RestTable::new(url, key) {
        Ok(table) => Some(Arc::new(table)),
        Err(e) => {
            log::error!("❌ Failed to create remote client: {}", e);
            None
        }
    }
}
