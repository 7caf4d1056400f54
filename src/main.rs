//! # Main Entry Point
//!
//! Wires the bot together:
//! - Domain: Configuration, Types and collaborator traits
//! - Infrastructure: Twitter transport, morphological analyzer, renderer
//! - Application: Trigger, Search, Frequency, Reply and the status handler
//!

mod application;
mod domain;
mod infrastructure;
mod strings;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::handler::StatusHandler;
use crate::application::logging;
use crate::domain::config::{AppConfig, Credentials};
use crate::domain::traits::FeedClient;
use crate::infrastructure::morph::MorphTokenizer;
use crate::infrastructure::twitter::{self, TwitterClient};
use crate::infrastructure::wordcloud::WordCloudRenderer;
use crate::strings::logs;

#[derive(Debug, Parser)]
#[command(name = "wordcloud-bot", version, about = "Replies to mentions with a word cloud of matching tweets")]
struct Cli {
    /// Authenticate and exit without listening.
    #[arg(long, visible_alias = "travis")]
    check: bool,

    /// Path to the YAML configuration file.
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&cli.config)?;

    // 2. Logging Setup
    let _guard = logging::init(&config.logging)?;
    tracing::info!("{}", logs::STARTING);
    tracing::info!("{}", logs::config_loaded(&cli.config.display().to_string()));

    // 3. Authenticate
    let credentials = Credentials::from_env()?;
    let client = Arc::new(TwitterClient::new(credentials, &config.twitter).context("Failed to build HTTP client")?);
    let own_handle = client.own_handle().await.context("Failed to verify credentials")?;
    tracing::info!("{}", logs::AUTH_SUCCESS);
    tracing::info!("{}", logs::greeting(&own_handle));

    if cli.check {
        tracing::info!("{}", logs::CHECK_SUCCESS);
        return Ok(());
    }

    // 4. Listen
    let handler = StatusHandler::new(
        &config,
        client.clone(),
        own_handle.clone(),
        Arc::new(MorphTokenizer::new()),
        Arc::new(WordCloudRenderer::new()),
    );

    tracing::info!("{}", logs::STREAM_START);
    let stream = twitter::listen(client, own_handle);
    futures::pin_mut!(stream);
    while let Some(event) = stream.next().await {
        handler.dispatch(event).await;
    }
    tracing::info!("{}", logs::STREAM_END);

    Ok(())
}
