//! Binary crate for the `weatherbot` notifier.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Logging setup and top-level failure reporting

use clap::Parser;

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();

    // Failures are reported, not turned into an exit code.
    if let Err(err) = cmd.run().await {
        tracing::error!(error = %format!("{err:#}"), "Command failed");
        println!("Error occurred: {err:#}");
    }

    Ok(())
}
