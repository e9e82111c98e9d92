//! Workbench - the operations an operator can trigger
//!
//! Bundles the backend client with the session store. Cheap to clone, so the
//! TUI can hand a copy to each spawned task; operations of different kinds
//! never wait on each other.

use crate::client::BackendClient;
use crate::session::{SessionState, SessionStore, SessionUpdate, StalePolicy};
use crate::{catalog, control, loader, poller};
use std::sync::Arc;
use tracing::debug;
use webtrdp_common::model::{ConfigCatalog, FieldValue, Snapshot};
use webtrdp_common::{ClientConfig, ClientError};

#[derive(Clone)]
pub struct Workbench {
    client: BackendClient,
    store: SessionStore,
}

impl Workbench {
    /// Build a workbench with a fresh session from config
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let policy = if config.monitor.discard_stale_snapshots {
            StalePolicy::DiscardStale
        } else {
            StalePolicy::LastArrivalWins
        };
        let state = SessionState::new(
            &config.backend.url,
            &config.session.host_name,
            &config.session.config_path,
        )
        .with_stale_policy(policy);

        Ok(Self::new(
            BackendClient::new(&config.backend)?,
            SessionStore::new(state),
        ))
    }

    pub fn new(client: BackendClient, store: SessionStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.store.get()
    }

    /// Initial catalog scan and telemetry poll, run concurrently
    ///
    /// Outcomes are already recorded in the session.
    pub async fn startup(&self) {
        let (catalog, telemetry) = tokio::join!(self.rescan_configs(), self.refresh_telemetry());
        if let Err(err) = catalog {
            debug!(kind = ?err.kind(), "Startup catalog scan failed");
        }
        if let Err(err) = telemetry {
            debug!(kind = ?err.kind(), "Startup telemetry poll failed");
        }
    }

    pub async fn refresh_telemetry(&self) -> Result<Arc<Snapshot>, ClientError> {
        poller::refresh(&self.client, &self.store).await
    }

    pub async fn rescan_configs(&self) -> Result<ConfigCatalog, ClientError> {
        catalog::rescan(&self.client, &self.store).await
    }

    /// Load the currently selected configuration path
    pub async fn load_config(&self) -> Result<String, ClientError> {
        loader::load(&self.client, &self.store).await
    }

    pub async fn set_pd_enabled(&self, com_id: u32, enable: bool) -> Result<bool, ClientError> {
        control::set_enabled(&self.client, &self.store, com_id, enable).await
    }

    pub async fn set_pd_values(
        &self,
        com_id: u32,
        fields: Vec<FieldValue>,
    ) -> Result<u64, ClientError> {
        control::set_values(&self.client, &self.store, com_id, fields).await
    }

    /// Operator override of the selected path
    pub fn select_path(&self, path: &str) {
        self.store
            .apply(SessionUpdate::SelectPath(path.trim().to_string()));
    }

    /// Dismiss the current status or error message
    pub fn clear_notice(&self) {
        self.store.apply(SessionUpdate::ClearNotice);
    }

    pub fn set_base_url(&self, url: &str) {
        self.store.apply(SessionUpdate::SetBaseUrl(url.trim().to_string()));
    }

    pub fn set_host_name(&self, host: &str) {
        self.store
            .apply(SessionUpdate::SetHostName(host.trim().to_string()));
    }
}
