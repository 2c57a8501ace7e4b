//! Projector entities: a remote for power and a select for the input source.
//!
//! Entities are thin adapters. Every action maps to exactly one call on the
//! shared [`ProjectorApi`] and errors are passed through to the caller.

use std::sync::Arc;

use optoproj_client::config::defaults;
use optoproj_client::{DeviceRecord, InputSource, ProjectorApi};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::constants::DOMAIN;
use crate::error::{IntegrationError, IntegrationResult};

/// Device registry information shared by all entities of one projector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceInfo {
    /// (domain, device id) pairs identifying the device
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub configuration_url: Option<String>,
}

impl DeviceInfo {
    pub fn from_record(record: &DeviceRecord, configuration_url: Option<String>) -> Self {
        Self {
            identifiers: vec![(DOMAIN.to_string(), record.id().to_string())],
            name: record.display_name(),
            manufacturer: defaults::MANUFACTURER.to_string(),
            model: record.model().to_string(),
            configuration_url,
        }
    }
}

/// Common entity attributes.
pub trait Entity: Send + Sync {
    fn unique_id(&self) -> &str;

    fn name(&self) -> &str;

    fn device_id(&self) -> &str;

    fn device_info(&self) -> &DeviceInfo;
}

/// Power remote for one projector.
pub struct RemoteEntity {
    api: Arc<dyn ProjectorApi>,
    device_id: String,
    unique_id: String,
    name: String,
    device_info: DeviceInfo,
}

impl RemoteEntity {
    pub fn new(api: Arc<dyn ProjectorApi>, record: &DeviceRecord, device_info: DeviceInfo) -> Self {
        let entity = Self {
            api,
            device_id: record.id().to_string(),
            unique_id: format!("{}_remote", record.id()),
            name: format!("{} Remote", record.id()),
            device_info,
        };
        debug!(unique_id = %entity.unique_id, device_id = %entity.device_id, "Created remote entity");
        entity
    }

    /// Turn the projector on.
    pub async fn turn_on(&self) -> IntegrationResult<()> {
        info!(device_id = %self.device_id, "Send turn on command");
        self.api.turn_on(&self.device_id).await?;
        Ok(())
    }

    /// Turn the projector off.
    pub async fn turn_off(&self) -> IntegrationResult<()> {
        info!(device_id = %self.device_id, "Send turn off command");
        self.api.turn_off(&self.device_id).await?;
        Ok(())
    }
}

impl Entity for RemoteEntity {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }
}

/// Input source selector for one projector.
///
/// The cloud does not report the active input, so `current_option` only
/// reflects the last selection made through this entity.
pub struct SelectEntity {
    api: Arc<dyn ProjectorApi>,
    device_id: String,
    unique_id: String,
    name: String,
    device_info: DeviceInfo,
    current: RwLock<Option<InputSource>>,
}

impl SelectEntity {
    pub fn new(api: Arc<dyn ProjectorApi>, record: &DeviceRecord, device_info: DeviceInfo) -> Self {
        let name = record
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("{} Input Select", record.id()));

        let entity = Self {
            api,
            device_id: record.id().to_string(),
            unique_id: format!("{}_input_select", record.id()),
            name,
            device_info,
            current: RwLock::new(None),
        };
        debug!(unique_id = %entity.unique_id, device_id = %entity.device_id, "Created select entity");
        entity
    }

    /// Options offered to the user.
    pub fn options(&self) -> Vec<&'static str> {
        InputSource::ALL.iter().map(InputSource::as_str).collect()
    }

    pub async fn current_option(&self) -> Option<InputSource> {
        *self.current.read().await
    }

    /// Switch the projector to `option`.
    ///
    /// Unknown options are rejected before anything is sent. The current
    /// option only changes once the command went through.
    pub async fn select_option(&self, option: &str) -> IntegrationResult<()> {
        let source: InputSource = option
            .parse()
            .map_err(|_| IntegrationError::UnknownOption(option.to_string()))?;

        info!(device_id = %self.device_id, option = %source, "Changing input source");
        self.api.select_input(&self.device_id, source).await?;

        *self.current.write().await = Some(source);
        Ok(())
    }
}

impl Entity for SelectEntity {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }
}
