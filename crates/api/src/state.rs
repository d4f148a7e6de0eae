//! Shared application state for the Axum webhook server.

use sqlx::PgPool;

use taskherald_common::config::AppConfig;
use taskherald_engine::tasks::TaskClient;
use taskherald_notifier::telegram::TelegramClient;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub telegram: TelegramClient,
    pub tasks: TaskClient,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: PgPool, telegram: TelegramClient, tasks: TaskClient, config: AppConfig) -> Self {
        Self {
            pool,
            telegram,
            tasks,
            config,
        }
    }
}
