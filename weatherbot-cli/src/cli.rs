use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use weatherbot_core::{RunError, Settings, env_lookup, preview_once, send_once};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherbot", version, about = "Morning weather notifier for Telegram")]
pub struct Cli {
    /// Settings file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured city for this run.
    #[arg(long, global = true)]
    pub city: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Fetch the weather and send the notification (default).
    Send,

    /// Fetch the weather and print the notification without sending it.
    Preview,

    /// Interactively edit the settings file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config.map_or_else(Settings::config_file_path, Ok) {
            Ok(path) => path,
            Err(err) => {
                report_failure(&RunError::from(err));
                return Ok(());
            }
        };

        match self.command.unwrap_or(Command::Send) {
            Command::Configure => configure(&path),
            Command::Send => {
                let Some(settings) = load_settings(&path, self.city) else {
                    return Ok(());
                };
                match send_once(&settings, env_lookup).await {
                    Ok(report) => {
                        tracing::info!(message_id = ?report.delivery.message_id, "Run finished");
                        println!("Message sent successfully!");
                    }
                    Err(err) => report_failure(&err),
                }
                Ok(())
            }
            Command::Preview => {
                let Some(settings) = load_settings(&path, self.city) else {
                    return Ok(());
                };
                match preview_once(&settings, env_lookup).await {
                    Ok(message) => println!("{message}"),
                    Err(err) => report_failure(&err),
                }
                Ok(())
            }
        }
    }
}

fn load_settings(path: &std::path::Path, city: Option<String>) -> Option<Settings> {
    let mut settings = match Settings::load_from(path) {
        Ok(settings) => settings,
        Err(err) => {
            report_failure(&RunError::from(err));
            return None;
        }
    };

    if let Some(city) = city {
        settings.city = city;
    }
    Some(settings)
}

fn report_failure(err: &RunError) {
    if err.is_config() {
        tracing::error!(error = %err, "Configuration error");
    } else {
        tracing::error!(error = %err, "Run failed");
    }
    println!("Error occurred: {}", err.user_message());
}

/// Settings to start the editor from; a missing file means defaults.
///
/// An existing file that fails to load is an error rather than a reset, so
/// saving never silently replaces the values it holds.
fn settings_for_editing(path: &std::path::Path) -> anyhow::Result<Settings> {
    Settings::load_from(path)
        .inspect_err(|err| tracing::warn!(error = %err, "Existing settings could not be loaded"))
        .with_context(|| {
            format!(
                "Refusing to overwrite {}; fix or remove it and run `weatherbot configure` again",
                path.display()
            )
        })
}

fn configure(path: &std::path::Path) -> anyhow::Result<()> {
    let current = settings_for_editing(path)?;

    let city = Text::new("City:")
        .with_default(&current.city)
        .prompt()
        .context("Failed to read city")?;

    let lang = Text::new("Language code for weather descriptions:")
        .with_default(&current.lang)
        .prompt()
        .context("Failed to read language")?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(current.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    let offset = Text::new("UTC offset in minutes for the header time (empty = system zone):")
        .with_default(
            &current
                .utc_offset_minutes
                .map(|minutes| minutes.to_string())
                .unwrap_or_default(),
        )
        .prompt()
        .context("Failed to read UTC offset")?;

    let utc_offset_minutes = match offset.trim() {
        "" => None,
        value => Some(
            value
                .parse::<i32>()
                .with_context(|| format!("Invalid UTC offset: {value}"))?,
        ),
    };

    let settings = Settings {
        city,
        lang,
        timeout_secs,
        utc_offset_minutes,
        ..current
    };
    settings.validate()?;
    settings.save_to(path)?;

    println!("Settings saved to {}", path.display());
    println!("Credentials are read from OWM_API_KEY, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID.");
    Ok(())
}
