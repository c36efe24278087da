//! Failure taxonomy for the Anki and Notion integrations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntegrationError {
    /// A required setting is absent; raised before any network attempt.
    #[error("{0}")]
    Config(String),

    /// The request never reached the service.
    #[error("{0}")]
    Transport(String),

    /// The service answered but reported a failure.
    #[error("{0}")]
    Service(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub type IntegrationResult<T> = Result<T, IntegrationError>;

impl IntegrationError {
    pub fn is_config(&self) -> bool {
        matches!(self, IntegrationError::Config(_))
    }
}
