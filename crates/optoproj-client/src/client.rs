//! Optoma cloud REST API client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::ProjectorApi;
use crate::config::{paths, ClientConfig};
use crate::error::{ClientError, ClientResult};
use crate::types::{
    AuthState, CommandAck, Credentials, DeviceListResponse, DeviceRecord, InputSource,
    LoginRequest, LoginResponse, PowerCommand, RunTaskRequest,
};

/// Client for one Optoma cloud account.
///
/// The HTTP client is injected and shared with the caller; this type never
/// closes it. The session token lives in an [`AuthState`] owned by the
/// instance and is set by [`login`](Self::login).
pub struct ProjectorClient {
    http_client: reqwest::Client,
    config: ClientConfig,
    credentials: Credentials,
    auth: RwLock<AuthState>,
}

impl ProjectorClient {
    /// Create a client against the default cloud endpoint.
    pub fn new(http_client: reqwest::Client, credentials: Credentials) -> Self {
        Self::with_config(http_client, ClientConfig::default(), credentials)
    }

    pub fn with_config(
        http_client: reqwest::Client,
        config: ClientConfig,
        credentials: Credentials,
    ) -> Self {
        debug!(username = %credentials.username, base_url = %config.base_url, "Creating projector client");
        Self {
            http_client,
            config,
            credentials,
            auth: RwLock::new(AuthState::Unauthenticated),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.read().await.is_authenticated()
    }

    /// Current session token, if logged in.
    pub async fn token(&self) -> Option<String> {
        self.auth.read().await.token().map(String::from)
    }

    /// Log in with the stored credentials and keep the session token.
    ///
    /// The body decides the outcome whatever the HTTP status: a `result_code`
    /// other than the number 200 is [`ClientError::InvalidAuth`]. Transport
    /// failures and bodies that are not a login response are
    /// [`ClientError::CannotConnect`]. The auth state is only touched on
    /// success.
    pub async fn login(&self) -> ClientResult<()> {
        debug!(username = %self.credentials.username, "Starting login");

        let request = LoginRequest {
            login_name: &self.credentials.username,
            password: &self.credentials.password,
        };

        let response = self
            .http_client
            .post(self.config.url(paths::LOGIN))
            .timeout(self.config.timeout())
            .header(ACCEPT, "*/*")
            .json(&request)
            .send()
            .await
            .map_err(|e| ClientError::CannotConnect(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::CannotConnect(e.to_string()))?;

        let login: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            ClientError::CannotConnect(format!(
                "Status: {}, malformed login response: {}",
                status, e
            ))
        })?;

        if !login.is_success() {
            let code = login.code();
            warn!(username = %self.credentials.username, status = %status, result_code = %code, "Login rejected");
            return Err(ClientError::InvalidAuth(code));
        }

        let token = login
            .token()
            .ok_or_else(|| {
                ClientError::CannotConnect("Login response is missing result.token".to_string())
            })?
            .to_string();

        *self.auth.write().await = AuthState::Authenticated { token };

        info!(username = %self.credentials.username, "Logged in to Optoma cloud");
        Ok(())
    }

    /// List the projectors owned by the account, in server order.
    pub async fn list_devices(&self) -> ClientResult<Vec<DeviceRecord>> {
        let bearer = self.bearer().await?;

        let response = self
            .http_client
            .get(self.config.url(paths::DEVICES))
            .timeout(self.config.timeout())
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(AUTHORIZATION, bearer)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, body = %body, "Device list response");

        let parsed: DeviceListResponse = serde_json::from_str(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("Status: {}, cannot parse device list: {}", status, e))
        })?;

        match parsed.result {
            Some(devices) => {
                info!(count = devices.len(), "Fetched device list");
                Ok(devices)
            }
            None => Err(ClientError::InvalidResponse(format!(
                "Status: {}, result_code: {:?}, device list missing",
                status, parsed.result_code
            ))),
        }
    }

    pub async fn turn_on(&self, device_id: &str) -> ClientResult<CommandAck> {
        self.run_task(RunTaskRequest::power(device_id, PowerCommand::On))
            .await
    }

    pub async fn turn_off(&self, device_id: &str) -> ClientResult<CommandAck> {
        self.run_task(RunTaskRequest::power(device_id, PowerCommand::Off))
            .await
    }

    pub async fn select_input(
        &self,
        device_id: &str,
        source: InputSource,
    ) -> ClientResult<CommandAck> {
        self.run_task(RunTaskRequest::input(device_id, source)).await
    }

    /// Post a command to `run_task`.
    ///
    /// Commands are best-effort: the answer is logged and returned but
    /// neither the status nor the `result_code` is checked. Only transport
    /// errors fail the call.
    async fn run_task(&self, request: RunTaskRequest<'_>) -> ClientResult<CommandAck> {
        let bearer = self.bearer().await?;

        debug!(
            device_id = %request.device_id,
            com_id = request.com_id,
            com_value = request.com_value,
            "Sending command"
        );

        let response = self
            .http_client
            .post(self.config.url(paths::RUN_TASK))
            .timeout(self.config.timeout())
            .header(ACCEPT, "*/*")
            .header(AUTHORIZATION, bearer)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(device_id = %request.device_id, status = %status, "Command answered with error status");
        }
        debug!(device_id = %request.device_id, body = %text, "Command result");

        let body = serde_json::from_str(&text).unwrap_or(JsonValue::Null);

        Ok(CommandAck {
            status: status.as_u16(),
            body,
        })
    }

    async fn bearer(&self) -> ClientResult<String> {
        self.auth
            .read()
            .await
            .bearer()
            .ok_or(ClientError::NotAuthenticated)
    }
}

#[async_trait]
impl ProjectorApi for ProjectorClient {
    fn username(&self) -> &str {
        &self.credentials.username
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn login(&self) -> ClientResult<()> {
        ProjectorClient::login(self).await
    }

    async fn list_devices(&self) -> ClientResult<Vec<DeviceRecord>> {
        ProjectorClient::list_devices(self).await
    }

    async fn turn_on(&self, device_id: &str) -> ClientResult<CommandAck> {
        ProjectorClient::turn_on(self, device_id).await
    }

    async fn turn_off(&self, device_id: &str) -> ClientResult<CommandAck> {
        ProjectorClient::turn_off(self, device_id).await
    }

    async fn select_input(
        &self,
        device_id: &str,
        source: InputSource,
    ) -> ClientResult<CommandAck> {
        ProjectorClient::select_input(self, device_id, source).await
    }
}
