//! Error type for the typed clients.

use action_framework::FrameworkError;
use thiserror::Error;

/// Errors returned by [`UserClient`](super::UserClient) and
/// [`AddressClient`](super::AddressClient).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// The action itself failed (validation, not found, conflict, ...).
    #[error(transparent)]
    Action(#[from] FrameworkError),

    /// The payload could not be turned into a parameter object.
    #[error("Invalid payload: {0}")]
    Payload(String),

    /// The action replied with a document that does not match the resource type.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Action(FrameworkError::NotFound { .. }))
    }
}
