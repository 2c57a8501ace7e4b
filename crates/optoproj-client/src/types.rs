//! Projector cloud data model and wire types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::config::defaults;

/// Account credentials. Immutable after construction.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication state of a client instance.
///
/// A client starts `Unauthenticated` and moves to `Authenticated` on the first
/// successful login. It never moves back on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated { token: String },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Session token, if logged in.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Authenticated { token } => Some(token),
            Self::Unauthenticated => None,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {}", token))
    }
}

/// A projector registered to the account, as reported by the cloud.
///
/// The record keeps the server's object untouched, explicit nulls included,
/// and serializes back to it. `id`, `device_model` and `name` are extracted
/// once for typed access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, JsonValue>", into = "Map<String, JsonValue>")]
pub struct DeviceRecord {
    id: String,
    device_model: Option<String>,
    name: Option<String>,
    raw: Map<String, JsonValue>,
}

impl DeviceRecord {
    pub fn new(id: impl Into<String>, device_model: impl Into<String>) -> Self {
        let id = id.into();
        let device_model = device_model.into();

        let mut raw = Map::new();
        raw.insert("id".to_string(), JsonValue::String(id.clone()));
        raw.insert(
            "device_model".to_string(),
            JsonValue::String(device_model.clone()),
        );

        Self {
            id,
            device_model: Some(device_model),
            name: None,
            raw,
        }
    }

    /// Set the user-assigned name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.raw
            .insert("name".to_string(), JsonValue::String(name.clone()));
        self.name = Some(name);
        self
    }

    /// Stable device identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Model name as reported (e.g., UHZ99).
    pub fn device_model(&self) -> Option<&str> {
        self.device_model.as_deref()
    }

    /// User-assigned name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The object exactly as the cloud sent it.
    pub fn raw(&self) -> &Map<String, JsonValue> {
        &self.raw
    }

    /// Model name, falling back to a generic one.
    pub fn model(&self) -> &str {
        self.device_model().unwrap_or(defaults::DEVICE_MODEL)
    }

    /// Name shown for the device itself.
    pub fn display_name(&self) -> String {
        format!("Projector {}", self.id)
    }
}

impl TryFrom<Map<String, JsonValue>> for DeviceRecord {
    type Error = String;

    fn try_from(raw: Map<String, JsonValue>) -> Result<Self, Self::Error> {
        let id = match raw.get("id") {
            Some(JsonValue::String(id)) => id.clone(),
            Some(other) => return Err(format!("device id must be a string, got {}", other)),
            None => return Err("device record without id".to_string()),
        };
        let text = |key: &str| raw.get(key).and_then(JsonValue::as_str).map(String::from);

        Ok(Self {
            device_model: text("device_model"),
            name: text("name"),
            id,
            raw,
        })
    }
}

impl From<DeviceRecord> for Map<String, JsonValue> {
    fn from(record: DeviceRecord) -> Self {
        record.raw
    }
}

/// Power commands understood by `run_task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    On,
    Off,
}

impl PowerCommand {
    pub fn com_value(&self) -> &'static str {
        match self {
            Self::On => "1",
            Self::Off => "2",
        }
    }
}

/// Input sources offered for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    #[serde(rename = "HDMI1")]
    Hdmi1,
    #[serde(rename = "HDMI2")]
    Hdmi2,
    #[serde(rename = "HDMI3")]
    Hdmi3,
}

impl InputSource {
    pub const ALL: [InputSource; 3] = [Self::Hdmi1, Self::Hdmi2, Self::Hdmi3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hdmi1 => "HDMI1",
            Self::Hdmi2 => "HDMI2",
            Self::Hdmi3 => "HDMI3",
        }
    }

    /// Value sent as `com_value` when selecting this source.
    pub fn com_value(&self) -> &'static str {
        match self {
            Self::Hdmi1 => "1",
            Self::Hdmi2 => "2",
            Self::Hdmi3 => "3",
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown input source: {}", s))
    }
}

/// `run_task` command identifiers.
pub mod command_ids {
    pub const POWER: &str = "1";
    pub const INPUT_SOURCE: &str = "2";
}

/// `job_type` used for every interactive command.
pub const JOB_TYPE_COMMAND: &str = "1";

/// Body of `POST /member/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub login_name: &'a str,
    pub password: &'a str,
}

/// Body of `POST /member/login` responses.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    /// Kept raw: only the number 200 counts as success.
    pub result_code: JsonValue,
    #[serde(default)]
    pub result: Option<LoginPayload>,
}

/// `result` of a login response: a session on success, anything on failure.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoginPayload {
    Session(LoginSession),
    Other(JsonValue),
}

#[derive(Debug, Deserialize)]
pub struct LoginSession {
    pub token: String,
}

impl LoginResponse {
    pub fn is_success(&self) -> bool {
        self.result_code.as_i64() == Some(defaults::SUCCESS_RESULT_CODE)
    }

    /// `result_code` as reported, for error messages.
    pub fn code(&self) -> String {
        match &self.result_code {
            JsonValue::String(code) => code.clone(),
            other => other.to_string(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.result {
            Some(LoginPayload::Session(session)) => Some(&session.token),
            _ => None,
        }
    }
}

/// Body of `GET /device` responses.
#[derive(Debug, Deserialize)]
pub struct DeviceListResponse {
    #[serde(default)]
    pub result_code: Option<i64>,
    #[serde(default)]
    pub result: Option<Vec<DeviceRecord>>,
}

/// Body of `POST /device/run_task`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RunTaskRequest<'a> {
    pub com_value: &'a str,
    pub job_type: &'a str,
    pub device_id: &'a str,
    pub com_id: &'a str,
}

impl<'a> RunTaskRequest<'a> {
    pub fn power(device_id: &'a str, command: PowerCommand) -> Self {
        Self {
            com_value: command.com_value(),
            job_type: JOB_TYPE_COMMAND,
            device_id,
            com_id: command_ids::POWER,
        }
    }

    pub fn input(device_id: &'a str, source: InputSource) -> Self {
        Self {
            com_value: source.com_value(),
            job_type: JOB_TYPE_COMMAND,
            device_id,
            com_id: command_ids::INPUT_SOURCE,
        }
    }
}

/// Whatever the cloud answered to a command. Not validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandAck {
    pub status: u16,
    pub body: JsonValue,
}

impl CommandAck {
    /// `result_code` reported by the cloud, if any.
    pub fn result_code(&self) -> Option<i64> {
        self.body.get("result_code").and_then(JsonValue::as_i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("user@example.com", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("user@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_auth_state() {
        let state = AuthState::default();
        assert!(!state.is_authenticated());
        assert_eq!(state.bearer(), None);

        let state = AuthState::Authenticated {
            token: "abc".to_string(),
        };
        assert_eq!(state.token(), Some("abc"));
        assert_eq!(state.bearer().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn test_device_record_keeps_unknown_fields() {
        let raw = json!({
            "id": "12345",
            "sn_num": "Q7JL226KAAAAB0595",
            "alexa_alias": "my_room",
            "device_model": "UHZ99"
        });

        let device: DeviceRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(device.id(), "12345");
        assert_eq!(device.model(), "UHZ99");
        assert_eq!(device.name(), None);
        assert_eq!(device.raw().get("alexa_alias"), Some(&json!("my_room")));
        assert_eq!(serde_json::to_value(&device).unwrap(), raw);
    }

    #[test]
    fn test_device_record_keeps_explicit_nulls() {
        let raw = json!({"id": "12345", "name": null, "device_model": null, "sn_num": null});

        let device: DeviceRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(device.name(), None);
        assert_eq!(device.model(), "Optoma Projector");
        assert_eq!(serde_json::to_value(&device).unwrap(), raw);
    }

    #[test]
    fn test_device_record_requires_string_id() {
        assert!(serde_json::from_value::<DeviceRecord>(json!({"name": "x"})).is_err());
        assert!(serde_json::from_value::<DeviceRecord>(json!({"id": 12345})).is_err());
    }

    #[test]
    fn test_device_record_builders() {
        let device = DeviceRecord::new("1", "UHZ99").with_name("Cinema");
        assert_eq!(device.name(), Some("Cinema"));
        assert_eq!(
            serde_json::to_value(&device).unwrap(),
            json!({"id": "1", "device_model": "UHZ99", "name": "Cinema"})
        );
    }

    #[test]
    fn test_device_record_without_model() {
        let device: DeviceRecord = serde_json::from_value(json!({"id": "9"})).unwrap();
        assert_eq!(device.model(), "Optoma Projector");
        assert_eq!(device.display_name(), "Projector 9");
    }

    #[test]
    fn test_input_source_parse() {
        assert_eq!("HDMI2".parse::<InputSource>(), Ok(InputSource::Hdmi2));
        assert_eq!("hdmi3".parse::<InputSource>(), Ok(InputSource::Hdmi3));
        assert!("VGA".parse::<InputSource>().is_err());
        assert_eq!(InputSource::Hdmi1.to_string(), "HDMI1");
    }

    #[test]
    fn test_run_task_payloads() {
        let on = serde_json::to_value(RunTaskRequest::power("12345", PowerCommand::On)).unwrap();
        assert_eq!(
            on,
            json!({"com_value": "1", "job_type": "1", "device_id": "12345", "com_id": "1"})
        );

        let off = serde_json::to_value(RunTaskRequest::power("12345", PowerCommand::Off)).unwrap();
        assert_eq!(off["com_value"], "2");

        let input =
            serde_json::to_value(RunTaskRequest::input("12345", InputSource::Hdmi3)).unwrap();
        assert_eq!(
            input,
            json!({"com_value": "3", "job_type": "1", "device_id": "12345", "com_id": "2"})
        );
    }

    #[test]
    fn test_login_response_shapes() {
        let ok: LoginResponse =
            serde_json::from_value(json!({"result_code": 200, "result": {"token": "t0k"}}))
                .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.token(), Some("t0k"));

        let rejected: LoginResponse =
            serde_json::from_value(json!({"result_code": 401, "result": "wrong password"}))
                .unwrap();
        assert!(!rejected.is_success());
        assert_eq!(rejected.token(), None);

        let bare: LoginResponse = serde_json::from_value(json!({"result_code": 500})).unwrap();
        assert_eq!(bare.token(), None);
        assert_eq!(bare.code(), "500");

        let textual: LoginResponse =
            serde_json::from_value(json!({"result_code": "200", "result": {"token": "t0k"}}))
                .unwrap();
        assert!(!textual.is_success());
        assert_eq!(textual.code(), "200");
    }
}
