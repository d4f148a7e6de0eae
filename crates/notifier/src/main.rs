//! Scheduled broadcast entry point — run manually or from cron.
//!
//! Exits 0 once the round completes, regardless of per-recipient delivery
//! outcomes; non-zero only on a local fatal error (config, storage).

use taskherald_common::config::AppConfig;
use taskherald_common::db;
use taskherald_engine::tasks::TaskClient;
use taskherald_notifier::broadcast;
use taskherald_notifier::telegram::{TelegramClient, TelegramConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskherald_notifier=info,taskherald_engine=info".into()),
        )
        .init();

    tracing::info!("TaskHerald broadcast starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config).await?;

    let telegram = TelegramClient::new(&TelegramConfig::from(&config))?;
    let tasks = TaskClient::new(&config.task_api_url);

    let summary =
        broadcast::broadcast_incomplete_tasks(&pool, &tasks, &telegram, config.delivery_workers)
            .await?;

    tracing::info!(
        tasks_found = summary.tasks_found,
        recipients_notified = summary.recipients_notified,
        "Broadcast complete"
    );

    Ok(())
}
