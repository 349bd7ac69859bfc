use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use flick::api::FeedClient;
use flick::app::{App, AppEvent};
use flick::config::Config;
use flick::controller::visibility_channel;
use flick::ui;
use flick::viewport::FeedViewport;

/// Get the config file path (~/.config/flick/config.toml).
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("flick")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(name = "flick", about = "Terminal short-video feed browser")]
struct Args {
    /// API base URL (overrides config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Videos per feed page (overrides config file)
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,

    /// Path to config file (default: ~/.config/flick/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // CLI flags override the config file.
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }

    let token = config.api_token.take();
    let client = FeedClient::new(&config.api_url, token)
        .with_context(|| format!("Invalid API URL: {}", config.api_url))?;

    // First page before the terminal is taken over, so connection problems
    // surface as plain error output instead of a broken TUI.
    let first_page = client
        .fetch_page(None, config.page_size)
        .await
        .context("Failed to fetch the video feed")?;
    tracing::info!(
        videos = first_page.videos.len(),
        has_next_page = first_page.has_next_page,
        "Initial feed page loaded"
    );

    // Wire the visibility stream: the feed viewport publishes, the event
    // loop drains into the controller.
    let (publisher, visibility_rx) = visibility_channel();
    let mut app = App::new(config, FeedViewport::new(publisher));
    app.load_initial_page(first_page);

    // Event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, client, event_tx, event_rx, visibility_rx).await?;

    println!("Goodbye!");
    Ok(())
}
