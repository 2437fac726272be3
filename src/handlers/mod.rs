//! NATS message handlers

pub mod ping;
pub mod reservation_feed;
pub mod resource_import;

use std::sync::Arc;
use anyhow::Result;
use async_nats::Client;
use tracing::{info, error};
use tokio::select;

use crate::config::Config;
use crate::services::atom_feed::FeedSettings;

pub const PING_SUBJECT: &str = "booking.ping";
pub const RESOURCE_IMPORT_SUBJECT: &str = "booking.resource.import";
pub const RESERVATION_ATOM_SUBJECT: &str = "booking.reservation.atom";

/// Start all message handlers
pub async fn start_handlers(client: Client, config: &Config) -> Result<()> {
    info!("Starting message handlers...");

    let feed_settings = Arc::new(FeedSettings::from_config(config));
    info!("Reservation feeds link to {}", feed_settings.link);

    // Subscribe to all subjects
    let ping_sub = client.subscribe(PING_SUBJECT).await?;
    let resource_import_sub = client.subscribe(RESOURCE_IMPORT_SUBJECT).await?;
    let reservation_atom_sub = client.subscribe(RESERVATION_ATOM_SUBJECT).await?;

    info!("Subscribed to NATS subjects");

    // Clone for each handler
    let client_ping = client.clone();
    let client_resource_import = client.clone();
    let client_reservation_atom = client.clone();

    // Spawn handlers
    let ping_handle = tokio::spawn(async move {
        ping::handle_ping(client_ping, ping_sub).await
    });

    let resource_import_handle = tokio::spawn(async move {
        resource_import::handle_import(client_resource_import, resource_import_sub).await
    });

    let reservation_atom_handle = tokio::spawn(async move {
        reservation_feed::handle_atom_feed(client_reservation_atom, reservation_atom_sub, feed_settings).await
    });

    info!("All handlers started");

    // Wait for any handler to finish (which would indicate an error)
    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = resource_import_handle => {
            error!("Resource import handler finished: {:?}", result);
        }
        result = reservation_atom_handle => {
            error!("Reservation feed handler finished: {:?}", result);
        }
    }

    Ok(())
}
