//! Integration layer errors.

use optoproj_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The select entity was asked for an option it does not offer.
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("An entry for {0} is already configured")]
    AlreadyConfigured(String),

    #[error("Config entry not found: {0}")]
    EntryNotFound(String),
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;
