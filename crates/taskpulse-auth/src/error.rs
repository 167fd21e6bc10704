use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Local input validation failed (empty username, short password, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already in use")]
    EmailInUse,

    #[error("No account found for: {0}")]
    UserNotFound(String),

    /// Resolving a username to its registered email failed.
    #[error("Username lookup failed: {0}")]
    Lookup(String),

    #[error("Auth API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup(message.into())
    }

    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "Please check your input and try again.",
            AuthError::InvalidCredentials => "Invalid credentials. Please check and try again.",
            AuthError::EmailInUse => "An account with this email already exists.",
            AuthError::UserNotFound(_) => "No account found. Please sign up first.",
            AuthError::Lookup(_) => "Could not look up that username. Please try again.",
            AuthError::Api { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            AuthError::Api { .. } => "Sign-in failed. Please try again.",
            AuthError::Network(_) => "Unable to connect. Check your internet connection.",
            AuthError::Storage(_) => "Failed to save your session. Please try again.",
        }
    }
}
