use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Current conditions for one city, as shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityWeather {
    pub city: String,
    pub country: Option<String>,
    /// Metric units throughout
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    /// Short condition word, e.g. "Clouds"
    pub condition: String,
    /// Longer description, e.g. "scattered clouds"
    pub description: String,
    /// Provider icon code, e.g. "03d"
    pub icon: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Raw OpenWeatherMap `/data/2.5/weather` response, trimmed to the fields
/// the dashboard uses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub name: String,
    #[serde(default)]
    pub sys: ApiSys,
    pub main: ApiMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    #[serde(default)]
    pub wind: ApiWind,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiSys {
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    pub main: String,
    pub description: String,
    pub icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiWind {
    #[serde(default)]
    pub speed: f64,
}

impl ApiResponse {
    pub(crate) fn into_city_weather(mut self) -> Result<CityWeather, WeatherError> {
        if self.weather.is_empty() {
            return Err(WeatherError::Parse(format!(
                "no weather conditions for {}",
                self.name
            )));
        }
        let condition = self.weather.remove(0);

        Ok(CityWeather {
            city: self.name,
            country: self.sys.country,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            condition: condition.main,
            description: condition.description,
            icon: condition.icon,
            fetched_at: Utc::now(),
        })
    }
}
