//! Config entries and their runtime state.
//!
//! Setting up an entry logs in, fetches the device list once and builds one
//! remote and one select entity per projector. All entities of an entry share
//! the same API client and therefore the same session token.

use std::collections::HashMap;
use std::sync::Arc;

use optoproj_client::{ClientConfig, Credentials, DeviceRecord, ProjectorApi, ProjectorClient};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::constants::NAME;
use crate::entity::{DeviceInfo, RemoteEntity, SelectEntity};
use crate::error::{IntegrationError, IntegrationResult};

/// Data stored with a config entry.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryData {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for EntryData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryData")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl EntryData {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

/// A configured account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigEntry {
    pub entry_id: String,
    pub title: String,
    pub data: EntryData,
}

impl ConfigEntry {
    pub fn new(data: EntryData) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().to_string(),
            title: NAME.to_string(),
            data,
        }
    }

    /// Build the production client for this entry.
    pub fn client(&self, http_client: reqwest::Client, config: ClientConfig) -> ProjectorClient {
        ProjectorClient::with_config(http_client, config, self.data.credentials())
    }
}

/// One projector of an entry with its entities.
#[derive(Clone)]
pub struct ProjectorDevice {
    pub record: DeviceRecord,
    pub info: DeviceInfo,
    pub remote: Arc<RemoteEntity>,
    pub select: Arc<SelectEntity>,
}

impl ProjectorDevice {
    pub fn new(api: Arc<dyn ProjectorApi>, record: DeviceRecord) -> Self {
        let info = DeviceInfo::from_record(&record, Some(api.base_url().to_string()));
        let remote = Arc::new(RemoteEntity::new(api.clone(), &record, info.clone()));
        let select = Arc::new(SelectEntity::new(api, &record, info.clone()));
        Self {
            record,
            info,
            remote,
            select,
        }
    }

    pub fn id(&self) -> &str {
        self.record.id()
    }
}

/// Runtime data of a set-up entry.
#[derive(Clone)]
pub struct EntryRuntime {
    pub entry: ConfigEntry,
    pub api: Arc<dyn ProjectorApi>,
    pub devices: Vec<ProjectorDevice>,
}

impl EntryRuntime {
    pub fn device(&self, device_id: &str) -> Option<&ProjectorDevice> {
        self.devices.iter().find(|d| d.id() == device_id)
    }
}

/// Config entries and the runtimes of those that are set up, both keyed by
/// entry id.
///
/// An entry is recorded as soon as the config flow creates it; a runtime only
/// exists while the entry is set up.
#[derive(Default)]
pub struct EntryRegistry {
    configured: RwLock<HashMap<String, ConfigEntry>>,
    runtimes: RwLock<HashMap<String, EntryRuntime>>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a config entry.
    ///
    /// Fails with [`IntegrationError::AlreadyConfigured`] when another entry
    /// has the same username. The check and the insert happen under one lock.
    pub async fn add_entry(&self, entry: ConfigEntry) -> IntegrationResult<()> {
        let mut configured = self.configured.write().await;

        let taken = configured.values().any(|existing| {
            existing.entry_id != entry.entry_id && existing.data.username == entry.data.username
        });
        if taken {
            return Err(IntegrationError::AlreadyConfigured(entry.data.username));
        }

        debug!(entry_id = %entry.entry_id, username = %entry.data.username, "Recording config entry");
        configured.insert(entry.entry_id.clone(), entry);
        Ok(())
    }

    /// Remove a config entry, unloading it first if it is set up.
    pub async fn remove_entry(&self, entry_id: &str) -> IntegrationResult<ConfigEntry> {
        self.unload_entry(entry_id).await;

        let entry = self
            .configured
            .write()
            .await
            .remove(entry_id)
            .ok_or_else(|| IntegrationError::EntryNotFound(entry_id.to_string()))?;

        info!(entry_id = %entry_id, "Config entry removed");
        Ok(entry)
    }

    /// Set up an entry: log in, list devices and create their entities.
    ///
    /// Login failures are returned unchanged so the caller can tell
    /// rejected credentials from an unreachable cloud. A previous runtime for
    /// the same entry id is replaced. The entry is recorded on success.
    pub async fn setup_entry(
        &self,
        entry: ConfigEntry,
        api: Arc<dyn ProjectorApi>,
    ) -> IntegrationResult<EntryRuntime> {
        debug!(entry_id = %entry.entry_id, username = %entry.data.username, "Setting up config entry");

        api.login().await?;
        let records = api.list_devices().await?;

        let devices: Vec<ProjectorDevice> = records
            .into_iter()
            .map(|record| {
                debug!(device_id = %record.id(), model = %record.model(), "Adding projector");
                ProjectorDevice::new(api.clone(), record)
            })
            .collect();

        info!(
            entry_id = %entry.entry_id,
            devices = devices.len(),
            "Config entry set up"
        );

        self.configured
            .write()
            .await
            .insert(entry.entry_id.clone(), entry.clone());

        let runtime = EntryRuntime {
            entry,
            api,
            devices,
        };
        self.runtimes
            .write()
            .await
            .insert(runtime.entry.entry_id.clone(), runtime.clone());

        Ok(runtime)
    }

    /// Unload an entry. Returns false when it was not set up.
    ///
    /// The entry itself stays recorded.
    pub async fn unload_entry(&self, entry_id: &str) -> bool {
        let removed = self.runtimes.write().await.remove(entry_id).is_some();
        if removed {
            info!(entry_id = %entry_id, "Config entry unloaded");
        }
        removed
    }

    pub async fn get(&self, entry_id: &str) -> Option<EntryRuntime> {
        self.runtimes.read().await.get(entry_id).cloned()
    }

    /// Recorded config entries, set up or not.
    pub async fn entries(&self) -> Vec<ConfigEntry> {
        self.configured.read().await.values().cloned().collect()
    }

    /// Whether an entry for `username` has been recorded.
    pub async fn has_username(&self, username: &str) -> bool {
        self.configured
            .read()
            .await
            .values()
            .any(|entry| entry.data.username == username)
    }

    /// Number of set-up entries.
    pub async fn len(&self) -> usize {
        self.runtimes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.runtimes.read().await.is_empty()
    }
}
