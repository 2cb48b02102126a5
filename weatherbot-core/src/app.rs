//! One notifier run: fetch, compose, deliver.

use chrono::{DateTime, FixedOffset};

use crate::{
    config::{Credentials, Settings, WeatherCredentials},
    error::RunError,
    fetcher::WeatherFetcher,
    notifier::{Notifier, SentMessage, notifier_from_settings},
};

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub message: String,
    pub delivery: SentMessage,
}

#[derive(Debug)]
pub struct Orchestrator {
    fetcher: WeatherFetcher,
    notifier: Box<dyn Notifier>,
}

impl Orchestrator {
    pub fn new(fetcher: WeatherFetcher, notifier: Box<dyn Notifier>) -> Self {
        Self { fetcher, notifier }
    }

    pub fn from_settings(settings: &Settings, credentials: Credentials) -> Result<Self, RunError> {
        let fetcher = WeatherFetcher::from_settings(settings, &credentials.weather)?;
        let notifier = notifier_from_settings(settings, credentials.telegram)?;
        Ok(Self::new(fetcher, notifier))
    }

    /// The notifier only runs once the fetcher has produced a message.
    pub async fn run(&self, now: DateTime<FixedOffset>) -> Result<RunReport, RunError> {
        let message = self
            .fetcher
            .notification(now)
            .await
            .map_err(RunError::Weather)?;

        tracing::info!(city = %self.fetcher.city(), "Sending notification");
        let delivery = self.notifier.send(&message).await?;
        tracing::info!(message_id = ?delivery.message_id, "Notification delivered");

        Ok(RunReport { message, delivery })
    }
}

/// Validate configuration, then fetch and deliver once.
///
/// Configuration problems are reported before any network call is made.
pub async fn send_once<F>(settings: &Settings, lookup: F) -> Result<RunReport, RunError>
where
    F: Fn(&str) -> Option<String>,
{
    settings.validate()?;
    let credentials = Credentials::from_lookup(lookup)?;
    let orchestrator = Orchestrator::from_settings(settings, credentials)?;
    orchestrator.run(settings.local_now()).await
}

/// Fetch and compose without sending. Only the weather key is required.
pub async fn preview_once<F>(settings: &Settings, lookup: F) -> Result<String, RunError>
where
    F: Fn(&str) -> Option<String>,
{
    settings.validate()?;
    let credentials = WeatherCredentials::from_lookup(lookup)?;
    let fetcher = WeatherFetcher::from_settings(settings, &credentials)?;
    fetcher
        .notification(settings.local_now())
        .await
        .map_err(RunError::Weather)
}
