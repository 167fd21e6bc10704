//! Weather dashboard data for TaskPulse
//!
//! Fetches current conditions per city from the OpenWeatherMap API, in
//! metric units. The dashboard batch is all-or-nothing by design: one
//! failed city fails the whole batch with a single categorical error, and
//! retry is a manual user action.

pub mod client;
pub mod error;
pub mod types;

pub use client::WeatherClient;
pub use error::WeatherError;
pub use types::CityWeather;
