use thiserror::Error;

/// Profile collaborator errors.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Profile API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProfileError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ProfileError::NotFound(_) => "No user data available.",
            ProfileError::Api { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            ProfileError::Api { .. } => "The request failed. Please try again.",
            ProfileError::Network(_) => "Unable to connect. Check your internet connection.",
        }
    }
}
