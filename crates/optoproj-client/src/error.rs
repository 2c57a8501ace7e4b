//! Errors returned by the projector cloud client.

use thiserror::Error;

/// Errors that can occur when talking to the projector cloud.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The cloud rejected the credentials.
    ///
    /// Carries `result_code` as the server sent it.
    #[error("Invalid authentication: server returned result code {0}")]
    InvalidAuth(String),

    /// The login endpoint could not be reached or answered with garbage.
    #[error("Cannot connect: {0}")]
    CannotConnect(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// An operation that needs a session token was called before `login`.
    #[error("Not authenticated, login first")]
    NotAuthenticated,
}

impl ClientError {
    /// Whether the server rejected the credentials.
    pub fn is_invalid_auth(&self) -> bool {
        matches!(self, Self::InvalidAuth(_))
    }

    /// Whether the cloud could not be reached during login.
    pub fn is_cannot_connect(&self) -> bool {
        matches!(self, Self::CannotConnect(_))
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClientError::InvalidAuth("401".into()).to_string(),
            "Invalid authentication: server returned result code 401"
        );
        assert!(ClientError::CannotConnect("connection refused".into())
            .to_string()
            .contains("connection refused"));
        assert!(ClientError::NotAuthenticated.to_string().contains("login"));
    }

    #[test]
    fn test_predicates() {
        assert!(ClientError::InvalidAuth("500".into()).is_invalid_auth());
        assert!(!ClientError::InvalidAuth("500".into()).is_cannot_connect());
        assert!(ClientError::CannotConnect("x".into()).is_cannot_connect());
        assert!(!ClientError::NotAuthenticated.is_invalid_auth());
    }
}
