//! Shared configuration defaults.
//!
//! Endpoint paths, environment variable names and default values live here so
//! the client, the integration layer and the CLI agree on them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cloud endpoints.
pub mod endpoints {
    /// Base URL of the Optoma management cloud.
    pub const OPTOMA_CLOUD: &str = "https://omw.optoma.com";
}

/// REST paths relative to the base URL.
pub mod paths {
    pub const LOGIN: &str = "/member/login";
    pub const DEVICES: &str = "/device";
    pub const RUN_TASK: &str = "/device/run_task";
}

/// Environment variable names.
pub mod env_vars {
    pub const USERNAME: &str = "OPTOMA_USERNAME";
    pub const PASSWORD: &str = "OPTOMA_PASSWORD";
    pub const BASE_URL: &str = "OPTOMA_BASE_URL";
    pub const TIMEOUT_SECS: &str = "OPTOMA_TIMEOUT_SECS";
    /// Switches CLI logging to JSON output.
    pub const LOG_JSON: &str = "OPTOPROJ_LOG_JSON";
}

/// Default values.
pub mod defaults {
    /// Request timeout in seconds.
    pub const TIMEOUT_SECS: u64 = 30;
    /// `result_code` the cloud reports for a successful call.
    pub const SUCCESS_RESULT_CODE: i64 = 200;
    /// Model shown when the cloud does not report one.
    pub const DEVICE_MODEL: &str = "Optoma Projector";
    pub const MANUFACTURER: &str = "Optoma";
    /// Config file read by the CLI when no path is given.
    pub const CONFIG_FILE: &str = "config.toml";
}

/// Client connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the cloud API (e.g., https://omw.optoma.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    endpoints::OPTOMA_CLOUD.to_string()
}

fn default_timeout_secs() -> u64 {
    defaults::TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Set a custom base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Get the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
