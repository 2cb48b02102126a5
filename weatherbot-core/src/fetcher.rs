use anyhow::Context;
use chrono::{DateTime, FixedOffset};

use crate::{
    config::{Settings, WeatherCredentials},
    error::ConfigError,
    message,
    model::{ForecastWindow, WeatherSnapshot},
    provider::{WeatherProvider, provider_from_settings},
};

/// Everything gathered for one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub snapshot: WeatherSnapshot,
    /// `None` when the forecast lookup failed.
    pub forecast: Option<ForecastWindow>,
}

/// Gathers weather for a fixed city and turns it into a notification.
#[derive(Debug)]
pub struct WeatherFetcher {
    provider: Box<dyn WeatherProvider>,
    city: String,
}

impl WeatherFetcher {
    pub fn new(provider: Box<dyn WeatherProvider>, city: impl Into<String>) -> Self {
        Self {
            provider,
            city: city.into(),
        }
    }

    pub fn from_settings(
        settings: &Settings,
        credentials: &WeatherCredentials,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            provider_from_settings(settings, credentials)?,
            settings.city.clone(),
        ))
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Current conditions are mandatory; UV and forecast degrade gracefully.
    pub async fn fetch(&self) -> anyhow::Result<WeatherReport> {
        tracing::info!(city = %self.city, "Fetching current conditions");
        let current = self
            .provider
            .current(&self.city)
            .await
            .with_context(|| format!("Current conditions for {} unavailable", self.city))?;

        let uv_index = match self.provider.uv_index(current.coord).await {
            Ok(uvi) => uvi,
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "UV index unavailable, using 0");
                0.0
            }
        };

        let forecast = match self.provider.forecast(&self.city).await {
            Ok(entries) => Some(ForecastWindow::new(entries)),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "Forecast unavailable, omitting precipitation outlook");
                None
            }
        };

        tracing::info!(
            temp = current.temperature_c,
            wind = current.wind_speed_mps,
            uv_index,
            "Weather fetched"
        );

        Ok(WeatherReport {
            snapshot: current.with_uv_index(uv_index),
            forecast,
        })
    }

    /// Fetch and compose the notification text.
    pub async fn notification(&self, now: DateTime<FixedOffset>) -> anyhow::Result<String> {
        let report = self.fetch().await?;
        Ok(message::compose(&report, now))
    }
}
