use thiserror::Error;

/// Weather provider errors
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// One city in a batch failed, so the whole batch failed.
    #[error("Failed to fetch weather data")]
    Batch(#[source] Box<WeatherError>),
}

impl WeatherError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "Unable to connect. Check your internet connection.",
            WeatherError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherError::CityNotFound(_) => "City not found. Check and try again.",
            WeatherError::Api { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            WeatherError::Api { .. } => "Weather service error. Please try again.",
            WeatherError::Parse(_) => "Received an unexpected response. Please try again.",
            // The single categorical message the dashboard shows, whatever
            // the underlying cause.
            WeatherError::Batch(_) => "Failed to fetch weather data. Please try again later.",
        }
    }
}
