use crate::{
    config::{Settings, WeatherCredentials},
    error::ConfigError,
    model::{Coordinates, CurrentConditions, ForecastEntry},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The three lookups a run needs from a weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> anyhow::Result<CurrentConditions>;

    async fn uv_index(&self, coord: Coordinates) -> anyhow::Result<f64>;

    /// Short-range forecast entries in chronological order.
    async fn forecast(&self, city: &str) -> anyhow::Result<Vec<ForecastEntry>>;
}

/// Construct the provider from settings and credentials.
pub fn provider_from_settings(
    settings: &Settings,
    credentials: &WeatherCredentials,
) -> Result<Box<dyn WeatherProvider>, ConfigError> {
    let provider = OpenWeatherProvider::builder(credentials.api_key.clone())
        .base_url(&settings.openweather_url)
        .lang(&settings.lang)
        .timeout(settings.timeout())
        .build()?;

    Ok(Box::new(provider))
}
