use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::{Settings, TelegramCredentials},
    error::{ConfigError, DeliveryError},
    notifier::telegram::TelegramNotifier,
};

pub mod telegram;

/// Acknowledgement of a delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: Option<i64>,
}

#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn send(&self, text: &str) -> Result<SentMessage, DeliveryError>;
}

pub fn notifier_from_settings(
    settings: &Settings,
    credentials: TelegramCredentials,
) -> Result<Box<dyn Notifier>, ConfigError> {
    let notifier = TelegramNotifier::new(credentials, &settings.telegram_url, settings.timeout())?;
    Ok(Box::new(notifier))
}
