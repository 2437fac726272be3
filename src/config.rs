//! Configuration management

use anyhow::{self, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Public URL of the booking web application, used as the feed link
    pub script_url: String,

    /// Title of reservation feeds
    pub feed_title: String,

    /// Author name written into reservation feeds
    pub feed_author: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let script_url = std::env::var("SCRIPT_URL")
            .unwrap_or_else(|_| "http://localhost/Web".to_string());

        if !(script_url.starts_with("http://") || script_url.starts_with("https://")) {
            anyhow::bail!(
                "SCRIPT_URL must be an http(s) URL (current: '{}')",
                script_url
            );
        }

        let feed_title = std::env::var("FEED_TITLE")
            .unwrap_or_else(|_| "Booked Scheduler Reservations".to_string());

        let feed_author = std::env::var("FEED_AUTHOR")
            .unwrap_or_else(|_| "Booked Scheduler".to_string());

        Ok(Self {
            nats_url,
            script_url: script_url.trim_end_matches('/').to_string(),
            feed_title,
            feed_author,
        })
    }
}
