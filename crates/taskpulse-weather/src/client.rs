use std::time::Duration;

use futures::future::try_join_all;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{ApiResponse, CityWeather};

const OPENWEATHERMAP_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, OPENWEATHERMAP_URL)
    }

    /// Client pointed at an alternate endpoint (used by tests).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch current conditions for one city, in metric units.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_city(&self, city: &str) -> Result<CityWeather, WeatherError> {
        let url = format!(
            "{}/data/2.5/weather?q={}&units=metric&appid={}",
            self.base_url,
            urlencoding::encode(city),
            self.api_key
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(%status, city, "Weather request failed: {}", message);
            return Err(match status.as_u16() {
                401 => WeatherError::InvalidApiKey,
                404 => WeatherError::CityNotFound(city.to_string()),
                code => WeatherError::Api {
                    status: code,
                    message,
                },
            });
        }

        let raw: ApiResponse = response.json().await?;
        raw.into_city_weather()
    }

    /// Fetch the whole dashboard batch concurrently.
    ///
    /// All-or-nothing: if any city fails, the entire batch fails with the
    /// single categorical [`WeatherError::Batch`]. No partial results are
    /// exposed; retrying is the caller's manual action.
    #[instrument(skip(self, cities), fields(count = cities.len()), level = "info")]
    pub async fn fetch_cities(&self, cities: &[String]) -> Result<Vec<CityWeather>, WeatherError> {
        let requests = cities.iter().map(|city| self.fetch_city(city));

        match try_join_all(requests).await {
            Ok(results) => Ok(results),
            Err(e) => {
                tracing::warn!("Weather batch failed: {}", e);
                Err(WeatherError::Batch(Box::new(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = WeatherClient::with_base_url("key", "http://localhost:9/").unwrap();
        assert_eq!(client.base_url, "http://localhost:9");
    }
}
