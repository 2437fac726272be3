//! Reservation Atom feed handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use chrono::Utc;
use futures::StreamExt;
use tracing::{debug, error, warn};

use crate::services::atom_feed::{render_atom_feed, FeedSettings};
use crate::types::{AtomFeedRequest, AtomFeedResponse, ErrorResponse, Request, SuccessResponse};

pub async fn handle_atom_feed(
    client: Client,
    mut subscriber: Subscriber,
    settings: Arc<FeedSettings>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received reservation.atom message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<AtomFeedRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::invalid_request(e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match render_atom_feed(&settings, &request.payload.reservations, Utc::now()) {
            Ok(body) => {
                debug!("Rendered feed with {} reservations", request.payload.reservations.len());
                let success = SuccessResponse::new(request.id, AtomFeedResponse::atom(body));
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Err(e) => {
                error!("Failed to render reservation feed: {}", e);
                let error = ErrorResponse::new(request.id, "FEED_ERROR", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
