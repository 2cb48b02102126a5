//! Core library for the `weatherbot` notifier.
//!
//! This crate defines:
//! - Settings & credentials handling
//! - Abstraction over the weather provider and the messaging channel
//! - Advisory rules and message composition
//! - The orchestrator running one fetch-compose-deliver cycle
//!
//! It is used by `weatherbot-cli`, but can also be embedded in other schedulers.

pub mod app;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod message;
pub mod model;
pub mod notifier;
pub mod provider;
pub mod rules;

pub use app::{Orchestrator, RunReport, preview_once, send_once};
pub use config::{Credentials, Settings, TelegramCredentials, WeatherCredentials, env_lookup};
pub use error::{ConfigError, DeliveryError, RunError};
pub use fetcher::{WeatherFetcher, WeatherReport};
pub use model::{Advisory, ForecastEntry, ForecastWindow, WeatherSnapshot};
pub use notifier::{Notifier, SentMessage};
pub use provider::WeatherProvider;
