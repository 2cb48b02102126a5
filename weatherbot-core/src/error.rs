//! Error taxonomy for a single notifier run.

use std::path::PathBuf;

use thiserror::Error;

/// Problems detected while assembling configuration, before any network call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required environment variable `{0}` is not set")]
    MissingVar(&'static str),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Failed to load settings from {}: {source:#}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failures of the messaging call.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Network error while sending message: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Telegram request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Telegram rejected the message: {description}")]
    Rejected { description: String },

    #[error("Unexpected Telegram response: {0}")]
    Malformed(String),
}

/// Everything that can end a run early.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather request failed: {0:#}")]
    Weather(#[source] anyhow::Error),

    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl RunError {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Short, user-facing summary for stdout.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(err) => format!("Configuration error: {err}"),
            Self::Weather(err) => format!("Could not fetch weather: {err:#}"),
            Self::Delivery(DeliveryError::Rejected { description }) => {
                format!("Telegram did not accept the message: {description}")
            }
            Self::Delivery(err) => format!("Could not deliver message: {err}"),
        }
    }
}

/// Shorten an upstream body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
