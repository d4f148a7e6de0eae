//! Recipient store — durable subscription state keyed by Telegram chat id.
//!
//! All mutations are single SQL statements, so concurrent subscribe/unsubscribe
//! for the same chat resolve to exactly one of the two final states and no lock
//! is ever held across a network call.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskherald_common::error::AppError;
use taskherald_common::types::Recipient;

/// Service layer for recipient subscription state.
pub struct RecipientService;

/// Upsert result row: the recipient plus whether the row was freshly inserted.
/// `xmax = 0` holds only for rows created by the current statement.
#[derive(sqlx::FromRow)]
struct UpsertedRecipient {
    id: Uuid,
    chat_id: String,
    display_name: String,
    subscribed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    was_created: bool,
}

impl RecipientService {
    /// Subscribe a chat, creating the recipient on first contact.
    ///
    /// An existing recipient gets its `display_name` refreshed and
    /// `subscribed` set back to true — never a duplicate row. The returned
    /// flag is `true` when a new row was created (drives the "welcome" vs
    /// "welcome back" reply).
    pub async fn upsert_subscribed(
        pool: &PgPool,
        chat_id: &str,
        display_name: &str,
    ) -> Result<(Recipient, bool), AppError> {
        let row: UpsertedRecipient = sqlx::query_as(
            r#"
            INSERT INTO recipients (id, chat_id, display_name, subscribed)
            VALUES ($1, $2, $3, true)
            ON CONFLICT (chat_id)
            DO UPDATE SET display_name = EXCLUDED.display_name,
                          subscribed = true,
                          updated_at = now()
            RETURNING id, chat_id, display_name, subscribed, created_at, updated_at,
                      (xmax = 0) AS was_created
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(chat_id)
        .bind(display_name)
        .fetch_one(pool)
        .await?;

        tracing::info!(
            chat_id = %row.chat_id,
            was_created = row.was_created,
            "Recipient subscribed"
        );

        let was_created = row.was_created;
        let recipient = Recipient {
            id: row.id,
            chat_id: row.chat_id,
            display_name: row.display_name,
            subscribed: row.subscribed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        Ok((recipient, was_created))
    }

    /// Unsubscribe a known chat. Returns `None` when no recipient exists for
    /// `chat_id` — callers must not create one in that case.
    pub async fn unsubscribe(pool: &PgPool, chat_id: &str) -> Result<Option<Recipient>, AppError> {
        let recipient: Option<Recipient> = sqlx::query_as(
            r#"
            UPDATE recipients
            SET subscribed = false, updated_at = now()
            WHERE chat_id = $1
            RETURNING *
            "#,
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await?;

        if recipient.is_some() {
            tracing::info!(chat_id, "Recipient unsubscribed");
        }

        Ok(recipient)
    }

    /// All currently subscribed recipients, in stable insertion order.
    pub async fn list_subscribed(pool: &PgPool) -> Result<Vec<Recipient>, AppError> {
        let recipients: Vec<Recipient> = sqlx::query_as(
            "SELECT * FROM recipients WHERE subscribed = true ORDER BY created_at, id",
        )
        .fetch_all(pool)
        .await?;

        Ok(recipients)
    }
}
