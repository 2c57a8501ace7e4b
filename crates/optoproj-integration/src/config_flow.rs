//! User configuration flow: collect credentials, validate them against the
//! cloud and create a config entry.

use std::collections::HashMap;
use std::sync::Arc;

use optoproj_client::{ClientError, ProjectorApi};
use tracing::{error, info, warn};

use crate::constants::{abort_reasons, form_errors};
use crate::entry::{ConfigEntry, EntryData, EntryRegistry};

/// Builds the API used to validate a set of credentials.
pub type ApiFactory = Arc<dyn Fn(&EntryData) -> Arc<dyn ProjectorApi> + Send + Sync>;

/// Outcome of a flow step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowResult {
    /// Show the credentials form, with errors from the previous attempt.
    ShowForm {
        step_id: &'static str,
        errors: HashMap<String, String>,
    },
    CreateEntry(ConfigEntry),
    Abort { reason: &'static str },
}

/// Log in once and map failures to form errors.
///
/// Returns an empty map when the credentials work.
pub async fn validate_login(api: &dyn ProjectorApi) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    let key = match api.login().await {
        Ok(()) => return errors,
        Err(ClientError::InvalidAuth(code)) => {
            error!(username = %api.username(), result_code = %code, "Login failed when connecting to Optoma");
            form_errors::LOGIN_FAILED
        }
        Err(ClientError::CannotConnect(e)) => {
            error!(username = %api.username(), "Could not connect: {}", e);
            form_errors::CANNOT_CONNECT
        }
        Err(e) => {
            error!(username = %api.username(), "Unexpected login error: {}", e);
            form_errors::UNKNOWN
        }
    };

    errors.insert(form_errors::BASE.to_string(), key.to_string());
    errors
}

/// Config flow for adding an account.
pub struct ConfigFlow {
    registry: Arc<EntryRegistry>,
    api_factory: ApiFactory,
}

impl ConfigFlow {
    pub const STEP_USER: &'static str = "user";

    pub fn new(registry: Arc<EntryRegistry>, api_factory: ApiFactory) -> Self {
        Self {
            registry,
            api_factory,
        }
    }

    /// Handle the user step.
    ///
    /// Without input the empty form is shown. An account that already has an
    /// entry aborts the flow before any request is made. The created entry is
    /// recorded in the registry right away, so a second flow for the same
    /// account aborts even before the first entry is set up.
    pub async fn step_user(&self, user_input: Option<EntryData>) -> FlowResult {
        let Some(data) = user_input else {
            return self.show_form(HashMap::new());
        };

        if self.registry.has_username(&data.username).await {
            return self.already_configured();
        }

        let api = (self.api_factory)(&data);
        let errors = validate_login(api.as_ref()).await;
        if !errors.is_empty() {
            return self.show_form(errors);
        }

        let entry = ConfigEntry::new(data);
        // add_entry only fails for an account configured while validating
        if let Err(e) = self.registry.add_entry(entry.clone()).await {
            warn!(username = %entry.data.username, "Not creating config entry: {}", e);
            return self.already_configured();
        }

        info!(entry_id = %entry.entry_id, username = %entry.data.username, "Creating config entry");
        FlowResult::CreateEntry(entry)
    }

    fn already_configured(&self) -> FlowResult {
        FlowResult::Abort {
            reason: abort_reasons::ALREADY_CONFIGURED,
        }
    }

    fn show_form(&self, errors: HashMap<String, String>) -> FlowResult {
        FlowResult::ShowForm {
            step_id: Self::STEP_USER,
            errors,
        }
    }
}
