//! Projector API interface used by entity adapters.

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::types::{CommandAck, DeviceRecord, InputSource};

/// Operations a projector cloud account offers.
///
/// `ProjectorClient` is the production implementation. Callers hold it as
/// `Arc<dyn ProjectorApi>` and sequence the calls themselves: `login` first,
/// then everything else.
#[async_trait]
pub trait ProjectorApi: Send + Sync {
    /// Account the API acts for.
    fn username(&self) -> &str;

    /// Base URL of the cloud, used as the device configuration URL.
    fn base_url(&self) -> &str;

    async fn login(&self) -> ClientResult<()>;

    async fn list_devices(&self) -> ClientResult<Vec<DeviceRecord>>;

    async fn turn_on(&self, device_id: &str) -> ClientResult<CommandAck>;

    async fn turn_off(&self, device_id: &str) -> ClientResult<CommandAck>;

    async fn select_input(&self, device_id: &str, source: InputSource)
        -> ClientResult<CommandAck>;
}
