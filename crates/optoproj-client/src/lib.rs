//! Optoma projector cloud client.
//!
//! This crate talks to the Optoma management cloud (`omw.optoma.com`) to log
//! in, enumerate the projectors of an account and send power and input
//! commands to them.
//!
//! ## Example
//!
//! ```rust,no_run
//! use optoproj_client::{Credentials, InputSource, ProjectorClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ProjectorClient::new(
//!         reqwest::Client::new(),
//!         Credentials::new("user@example.com", "password"),
//!     );
//!
//!     client.login().await?;
//!
//!     for device in client.list_devices().await? {
//!         println!("{} ({})", device.id(), device.model());
//!         client.turn_on(device.id()).await?;
//!         client.select_input(device.id(), InputSource::Hdmi1).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use api::ProjectorApi;
pub use client::ProjectorClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use types::{
    AuthState, CommandAck, Credentials, DeviceRecord, InputSource, PowerCommand, RunTaskRequest,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
