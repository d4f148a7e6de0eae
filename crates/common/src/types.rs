use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat identity eligible for task notifications.
///
/// `chat_id` is the opaque identifier assigned by Telegram and uniquely
/// identifies at most one recipient. Rows are never deleted — unsubscribing
/// flips `subscribed` to false so a later `/start` reactivates the same row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipient {
    pub id: Uuid,
    pub chat_id: String,
    /// Last first-name seen on an inbound message; non-authoritative.
    pub display_name: String,
    pub subscribed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An upstream task fetched for notification purposes. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

/// One queued delivery unit: a rendered payload bound for a single chat.
///
/// Created once per subscribed recipient per broadcast round and consumed
/// exactly once; a failed delivery is logged, never re-queued.
#[derive(Debug, Clone)]
pub struct NotificationJob {
    pub chat_id: String,
    pub text: String,
}

/// Outcome of one broadcast round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastSummary {
    /// Number of eligible work items found upstream (0 when the broadcast
    /// short-circuited because nobody is subscribed).
    pub tasks_found: usize,
    /// Number of deliveries the platform accepted.
    pub recipients_notified: usize,
}
