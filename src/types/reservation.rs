//! Reservation feed types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type of a rendered Atom document
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

/// A reservation as shown to a subscriber.
///
/// Produced by the calendar subscription service after authorization and
/// privacy filtering; the worker only formats it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationView {
    pub summary: String,
    pub reservation_url: String,
    pub date_created: DateTime<Utc>,
    pub date_start: DateTime<Utc>,
    pub date_end: DateTime<Utc>,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub description: String,
}

/// Request to render reservations as an Atom feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomFeedRequest {
    #[serde(default)]
    pub reservations: Vec<ReservationView>,
}

/// Rendered feed document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomFeedResponse {
    pub content_type: String,
    pub body: String,
}

impl AtomFeedResponse {
    pub fn atom(body: String) -> Self {
        Self {
            content_type: ATOM_CONTENT_TYPE.to_string(),
            body,
        }
    }
}
