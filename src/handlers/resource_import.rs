//! Resource import handler
//!
//! Receives an uploaded CSV file from the admin UI and replies with the rows
//! that can be created plus the issues to show the operator. Persisting the
//! rows is up to the caller.

use anyhow::Result;
use async_nats::{Client, Subscriber};
use base64::Engine;
use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::services::resource_import::observer::IssueCollector;
use crate::services::resource_import::ResourceImporter;
use crate::types::{
    ErrorResponse, Request, ResourceImportRequest, ResourceImportResponse, SuccessResponse,
};

#[derive(Debug, Error)]
pub enum ResourceImportRequestError {
    #[error("File content is not valid base64: {0}")]
    InvalidContent(#[from] base64::DecodeError),
}

/// Decode the upload and run the import
pub fn process_import(
    request: &ResourceImportRequest,
) -> Result<ResourceImportResponse, ResourceImportRequestError> {
    let content = base64::engine::general_purpose::STANDARD.decode(&request.content_base64)?;

    let collector = IssueCollector::new();
    let result = ResourceImporter::new(&request.attributes, &collector).import(&content);

    Ok(ResourceImportResponse {
        filename: request.filename.clone(),
        rows: result.rows,
        skipped_rows: result.skipped_rows,
        issues: collector.into_issues(),
    })
}

pub async fn handle_import(client: Client, mut subscriber: Subscriber) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received resource.import message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                warn!("Message without reply subject");
                continue;
            }
        };

        let request: Request<ResourceImportRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                let error = ErrorResponse::invalid_request(e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
                continue;
            }
        };

        match process_import(&request.payload) {
            Ok(response) => {
                info!(
                    "Resource import of '{}': {} rows, {} skipped",
                    response.filename,
                    response.rows.len(),
                    response.skipped_rows.len()
                );
                let success = SuccessResponse::new(request.id, response);
                let _ = client.publish(reply, serde_json::to_vec(&success)?.into()).await;
            }
            Err(e) => {
                warn!("Resource import of '{}' rejected: {}", request.payload.filename, e);
                let error = ErrorResponse::new(request.id, "INVALID_CONTENT", e.to_string());
                let _ = client.publish(reply, serde_json::to_vec(&error)?.into()).await;
            }
        }
    }

    Ok(())
}
