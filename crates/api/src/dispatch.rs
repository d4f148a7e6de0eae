//! Command dispatcher — parses inbound Telegram updates and routes the four
//! recognized commands.
//!
//! The dispatcher is a pure per-message router with no recipient-scoped
//! state. Updates that are not well-formed chat messages (other update
//! kinds, probe traffic, missing fields) are acknowledged and ignored so the
//! platform's redelivery never sees an error response.

use serde::Deserialize;
use serde_json::Value;

use taskherald_common::error::AppError;
use taskherald_engine::format::render_tasks;
use taskherald_engine::recipients::RecipientService;

use crate::state::AppState;

/// Fixed reply for unrecognized input.
pub const HELP_TEXT: &str = "Available commands:\n/start - Subscribe to notifications\n/stop - Unsubscribe from notifications\n/tasks - Get current incomplete tasks";

/// Raw update shape. Every field is optional: a missing field is a typed
/// absence, not a runtime lookup failure.
#[derive(Debug, Deserialize)]
struct Update {
    message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    chat: Option<Chat>,
    text: Option<String>,
    from: Option<Sender>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Sender {
    first_name: Option<String>,
}

/// A fully-validated inbound chat message.
#[derive(Debug, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: String,
    pub text: String,
    pub first_name: String,
}

/// Extract a chat message from a raw update, or `None` for any shape that
/// is not one (non-message update kinds, missing chat id or text).
pub fn parse_update(update: Value) -> Option<InboundMessage> {
    let update: Update = serde_json::from_value(update).ok()?;
    let message = update.message?;
    let chat_id = normalize_chat_id(message.chat?.id?)?;
    let text = message.text?;
    let first_name = message
        .from
        .and_then(|sender| sender.first_name)
        .unwrap_or_else(|| "User".to_string());

    Some(InboundMessage {
        chat_id,
        text: text.trim().to_string(),
        first_name,
    })
}

/// Chat ids are numeric today but documented as opaque; accept any scalar
/// and normalize it to a string key.
fn normalize_chat_id(id: Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The four recognized inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Subscribe,
    Unsubscribe,
    ListTasks,
    Unknown,
}

impl Command {
    pub fn parse(text: &str) -> Self {
        match text {
            "/start" => Command::Subscribe,
            "/stop" => Command::Unsubscribe,
            "/tasks" => Command::ListTasks,
            _ => Command::Unknown,
        }
    }
}

/// Route one inbound update. Every dispatched command ends in exactly one
/// reply send (zero for ignored shapes). A failed send is logged, not
/// surfaced — the platform's retry semantics for webhook responses are
/// outside this system's control. Only storage errors propagate.
pub async fn handle_update(state: &AppState, update: Value) -> Result<(), AppError> {
    let Some(inbound) = parse_update(update) else {
        tracing::debug!("Ignoring non-message or malformed update");
        return Ok(());
    };

    tracing::info!(
        chat_id = %inbound.chat_id,
        text = %inbound.text,
        "Processing chat message"
    );

    let reply = match Command::parse(&inbound.text) {
        Command::Subscribe => {
            let (recipient, was_created) = RecipientService::upsert_subscribed(
                &state.pool,
                &inbound.chat_id,
                &inbound.first_name,
            )
            .await?;

            if was_created {
                format!(
                    "Welcome, {}! You've been subscribed to task notifications. ✅",
                    recipient.display_name
                )
            } else {
                format!(
                    "Welcome back, {}! Your subscription has been reactivated. 🔔",
                    recipient.display_name
                )
            }
        }
        Command::Unsubscribe => {
            match RecipientService::unsubscribe(&state.pool, &inbound.chat_id).await? {
                Some(_) => {
                    "You've been unsubscribed from notifications. Use /start to resubscribe. 🔕"
                        .to_string()
                }
                None => "User not found. Use /start to register first. ❌".to_string(),
            }
        }
        Command::ListTasks => {
            let items = state.tasks.fetch_incomplete().await;
            render_tasks(&items)
        }
        Command::Unknown => HELP_TEXT.to_string(),
    };

    if !state.telegram.send_message(&inbound.chat_id, &reply).await {
        tracing::error!(chat_id = %inbound.chat_id, "Failed to deliver reply");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_chat_message() {
        let inbound = parse_update(json!({
            "message": {
                "chat": { "id": 555 },
                "text": "/start",
                "from": { "first_name": "John" }
            }
        }))
        .unwrap();

        assert_eq!(inbound.chat_id, "555");
        assert_eq!(inbound.text, "/start");
        assert_eq!(inbound.first_name, "John");
    }

    #[test]
    fn test_parse_normalizes_string_chat_id() {
        let inbound = parse_update(json!({
            "message": { "chat": { "id": "abc-123" }, "text": "/tasks" }
        }))
        .unwrap();
        assert_eq!(inbound.chat_id, "abc-123");
    }

    #[test]
    fn test_parse_defaults_missing_first_name() {
        let inbound = parse_update(json!({
            "message": { "chat": { "id": 1 }, "text": "/stop" }
        }))
        .unwrap();
        assert_eq!(inbound.first_name, "User");
    }

    #[test]
    fn test_parse_trims_text() {
        let inbound = parse_update(json!({
            "message": { "chat": { "id": 1 }, "text": "  /start \n" }
        }))
        .unwrap();
        assert_eq!(inbound.text, "/start");
    }

    #[test]
    fn test_parse_ignores_non_message_updates() {
        assert!(parse_update(json!({ "callback_query": { "data": "x" } })).is_none());
        assert!(parse_update(json!([1, 2, 3])).is_none());
        assert!(parse_update(json!("probe")).is_none());
    }

    #[test]
    fn test_parse_ignores_incomplete_messages() {
        // No chat
        assert!(parse_update(json!({ "message": { "text": "/start" } })).is_none());
        // No text
        assert!(parse_update(json!({ "message": { "chat": { "id": 1 } } })).is_none());
        // Chat id of a non-scalar shape
        assert!(
            parse_update(json!({
                "message": { "chat": { "id": { "nested": true } }, "text": "/start" }
            }))
            .is_none()
        );
        // Empty message object
        assert!(parse_update(json!({ "message": {} })).is_none());
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/start"), Command::Subscribe);
        assert_eq!(Command::parse("/stop"), Command::Unsubscribe);
        assert_eq!(Command::parse("/tasks"), Command::ListTasks);
        assert_eq!(Command::parse("/unknown"), Command::Unknown);
        assert_eq!(Command::parse("hello"), Command::Unknown);
        assert_eq!(Command::parse(""), Command::Unknown);
    }
}
