//! Booking Worker - Backend service for resource import and reservation feeds
//!
//! This worker connects to NATS and handles messages from the web application.

mod cli;
mod config;
mod handlers;
mod services;
mod types;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{info, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::cli::{Cli, Command};
use crate::services::atom_feed::{render_atom_feed, FeedSettings};
use crate::services::resource_import::observer::IssueCollector;
use crate::services::resource_import::ResourceImporter;
use crate::types::{CustomAttribute, ReservationView, ResourceImportResponse};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ../logs (relative to worker)
    let logs_dir = std::env::var("LOGS_DIR")
        .unwrap_or_else(|_| "../logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &logs_dir,
        "worker.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - stderr (stdout carries command output) and file
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,booking_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    // Offline import needs no configuration
    match cli.command {
        None | Some(Command::Serve) => serve().await,
        Some(Command::Import { file, attributes }) => import_file(&file, attributes.as_deref()),
        Some(Command::Feed { reservations }) => print_feed(&reservations),
    }
}

async fn serve() -> Result<()> {
    info!("Starting Booking Worker...");

    // Load configuration
    let config = config::Config::from_env()?;
    info!("Configuration loaded");

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    // Start message handlers
    let handler_result = handlers::start_handlers(nats_client, &config).await;

    if let Err(e) = handler_result {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

fn import_file(file: &Path, attributes: Option<&Path>) -> Result<()> {
    let content = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let attributes: Vec<CustomAttribute> = match attributes {
        Some(path) => {
            let json = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_slice(&json)
                .with_context(|| format!("Invalid attribute definitions in {}", path.display()))?
        }
        None => Vec::new(),
    };

    let collector = IssueCollector::new();
    let result = ResourceImporter::new(&attributes, &collector).import(&content);
    if result.is_empty() {
        warn!("No resource rows found in {}", file.display());
    }

    let response = ResourceImportResponse {
        filename: file.display().to_string(),
        rows: result.rows,
        skipped_rows: result.skipped_rows,
        issues: collector.into_issues(),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

fn print_feed(reservations: &Path) -> Result<()> {
    let config = config::Config::from_env()?;

    let json = std::fs::read(reservations)
        .with_context(|| format!("Failed to read {}", reservations.display()))?;
    let reservations: Vec<ReservationView> = serde_json::from_slice(&json)
        .context("Invalid reservation list")?;

    let feed = render_atom_feed(&FeedSettings::from_config(&config), &reservations, Utc::now())?;
    println!("{}", feed);

    Ok(())
}
