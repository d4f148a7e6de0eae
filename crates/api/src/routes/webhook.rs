//! Inbound Telegram webhook route.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use taskherald_common::error::AppError;

use crate::dispatch;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/telegram/webhook", post(telegram_webhook))
}

/// POST /api/telegram/webhook — one Telegram update per request.
///
/// Accepts any JSON shape and always acknowledges with `{"status":"ok"}`;
/// only a storage failure (local fatal) produces a non-2xx response.
async fn telegram_webhook(
    State(state): State<AppState>,
    Json(update): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    dispatch::handle_update(&state, update).await?;
    Ok(Json(json!({ "status": "ok" })))
}
