//! TaskHerald webhook server binary entrypoint.

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use taskherald_common::config::AppConfig;
use taskherald_common::db::create_pool;
use taskherald_engine::tasks::TaskClient;
use taskherald_notifier::telegram::{TelegramClient, TelegramConfig};

use taskherald_api::routes::create_router;
use taskherald_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("taskherald_api=debug,taskherald_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting TaskHerald webhook server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Create database connection pool
    let pool = create_pool(&config).await?;
    tracing::info!("Database pool created");

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let telegram = TelegramClient::new(&TelegramConfig::from(&config))?;
    let tasks = TaskClient::new(&config.task_api_url);

    // One-time webhook registration; re-registering the same URL is a no-op
    // on the platform side, so a restart is safe.
    if let Some(url) = &config.webhook_url {
        if !telegram.set_webhook(url).await {
            tracing::warn!(
                "Webhook registration failed; inbound updates will not arrive until it succeeds"
            );
        }
    }

    // Build application state and router
    let state = AppState::new(pool, telegram, tasks, config);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Webhook server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
