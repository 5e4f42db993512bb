//! Errors surfaced in a form's error slot

use thiserror::Error;

/// Every failure a form can show. Display strings are the user-facing
/// messages; underlying causes of save failures are only logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter a URL")]
    MissingUrl,

    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    Network(String),

    #[error("Not all required fields are filled out")]
    Validation { missing: Vec<&'static str> },

    #[error("Failed to save data input configuration")]
    IndexSave,

    #[error("Failed to save data input to KV Store")]
    KvStoreSave,
}

impl FormError {
    /// Network failure carrying the underlying message
    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            FormError::Network("Unknown error".to_string())
        } else {
            FormError::Network(message)
        }
    }
}
