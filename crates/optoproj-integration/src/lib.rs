//! Optoma projector integration.
//!
//! Glue between a smart-home host and the projector cloud client:
//!
//! - **ConfigFlow**: validates credentials and creates config entries
//! - **EntryRegistry**: sets up entries and keeps their runtime data
//! - **RemoteEntity**: power on/off for one projector
//! - **SelectEntity**: input source selection for one projector
//!
//! The host owns the HTTP client and hands a [`ProjectorApi`] to each entry.

pub mod config_flow;
pub mod constants;
pub mod entity;
pub mod entry;
pub mod error;

pub use config_flow::{validate_login, ApiFactory, ConfigFlow, FlowResult};
pub use constants::{DOMAIN, NAME};
pub use entity::{DeviceInfo, Entity, RemoteEntity, SelectEntity};
pub use entry::{ConfigEntry, EntryData, EntryRegistry, EntryRuntime, ProjectorDevice};
pub use error::{IntegrationError, IntegrationResult};

pub use optoproj_client::ProjectorApi;
