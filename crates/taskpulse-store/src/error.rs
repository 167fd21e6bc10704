use thiserror::Error;

/// Errors from the document store and list operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// List or todo was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error (e.g. empty title, empty list name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document shape is invalid or the schema version is unsupported.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Backend rejected the request.
    #[error("Document API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "That item no longer exists.",
            StoreError::Validation(_) => "Please enter some text.",
            StoreError::Schema(_) => "Your notes could not be read. Try updating the app.",
            StoreError::Api { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            StoreError::Api { .. } => "The request failed. Please try again.",
            StoreError::Network(_) => "Unable to connect. Check your internet connection.",
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
