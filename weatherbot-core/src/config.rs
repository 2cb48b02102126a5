use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::ConfigError;

pub const OWM_API_KEY_VAR: &str = "OWM_API_KEY";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

/// Non-secret settings stored on disk.
///
/// Example TOML:
/// ```toml
/// city = "Kyiv"
/// lang = "ru"
/// timeout_secs = 10
/// utc_offset_minutes = 180
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub city: String,
    pub lang: String,
    pub timeout_secs: u64,
    /// Offset used for the header time. Host local time when absent.
    pub utc_offset_minutes: Option<i32>,
    pub openweather_url: String,
    pub telegram_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            city: "Kyiv".to_string(),
            lang: "ru".to_string(),
            timeout_secs: 10,
            utc_offset_minutes: None,
            openweather_url: DEFAULT_OPENWEATHER_URL.to_string(),
            telegram_url: DEFAULT_TELEGRAM_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the platform config file, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let read = || -> anyhow::Result<Self> {
            let contents = fs::read_to_string(path).context("Failed to read settings file")?;
            toml::from_str(&contents).context("Failed to parse settings file")
        };

        let settings = read().map_err(|source| ConfigError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs =
            ProjectDirs::from("dev", "weatherbot", "weatherbot").ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.city.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "city",
                reason: "must not be empty".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        if self.utc_offset().is_none() && self.utc_offset_minutes.is_some() {
            return Err(ConfigError::Invalid {
                field: "utc_offset_minutes",
                reason: "must be within -1439..=1439".into(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn utc_offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes.checked_mul(60)?))
    }

    /// Current time in the configured zone.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        match self.utc_offset() {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// Weather provider credentials.
#[derive(Clone)]
pub struct WeatherCredentials {
    pub api_key: String,
}

/// Messaging destination credentials.
#[derive(Clone)]
pub struct TelegramCredentials {
    pub token: String,
    pub chat_id: String,
}

/// Everything a full run needs, validated up front.
#[derive(Clone)]
pub struct Credentials {
    pub weather: WeatherCredentials,
    pub telegram: TelegramCredentials,
}

// Secrets stay out of logs and panic messages.
impl std::fmt::Debug for WeatherCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherCredentials").field("api_key", &"***").finish()
    }
}

impl std::fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("token", &"***")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("weather", &self.weather)
            .field("telegram", &self.telegram)
            .finish()
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Process environment lookup.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl WeatherCredentials {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_key: required(&lookup, OWM_API_KEY_VAR)?,
        })
    }
}

impl TelegramCredentials {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            token: required(&lookup, TELEGRAM_TOKEN_VAR)?,
            chat_id: required(&lookup, TELEGRAM_CHAT_ID_VAR)?,
        })
    }
}

impl Credentials {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            weather: WeatherCredentials::from_lookup(&lookup)?,
            telegram: TelegramCredentials::from_lookup(&lookup)?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }
}
