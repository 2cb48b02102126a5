use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    config::TelegramCredentials,
    error::{ConfigError, DeliveryError, truncate_body},
};

use super::{Notifier, SentMessage};

#[derive(Clone)]
pub struct TelegramNotifier {
    credentials: TelegramCredentials,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    pub fn new(
        credentials: TelegramCredentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.credentials.token)
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct TgResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<TgMessage>,
}

/// Interpret the Bot API reply.
fn acknowledge(status: reqwest::StatusCode, body: &str) -> Result<SentMessage, DeliveryError> {
    let parsed: TgResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !status.is_success() => {
            return Err(DeliveryError::Status {
                status,
                body: truncate_body(body),
            });
        }
        Err(err) => return Err(DeliveryError::Malformed(err.to_string())),
    };

    if !parsed.ok {
        return Err(DeliveryError::Rejected {
            description: parsed
                .description
                .unwrap_or_else(|| format!("no description (status {status})")),
        });
    }

    if !status.is_success() {
        return Err(DeliveryError::Status {
            status,
            body: truncate_body(body),
        });
    }

    Ok(SentMessage {
        message_id: parsed.result.map(|message| message.message_id),
    })
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<SentMessage, DeliveryError> {
        let request = SendMessageRequest {
            chat_id: &self.credentials.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        tracing::debug!(chat_id = %self.credentials.chat_id, chars = text.chars().count(), "Sending Telegram message");

        // The bot token is part of the path; keep it out of error messages.
        let res = self
            .http
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = res.status();
        let body = res.text().await.map_err(reqwest::Error::without_url)?;

        acknowledge(status, &body)
    }
}
