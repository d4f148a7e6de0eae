//! PostgreSQL pool construction for the recipient store.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;

/// Pool options derived from configuration. `DB_MAX_CONNECTIONS` bounds the
/// pool and `DB_ACQUIRE_TIMEOUT_SECS` bounds how long a webhook request or
/// broadcast round may wait for a free connection.
pub fn pool_options(config: &AppConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
}

/// Connect to the recipient store.
pub async fn create_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = pool_options(config)
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_connections,
        acquire_timeout_secs = config.db_acquire_timeout_secs,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/taskherald".to_string(),
            telegram_bot_token: "123:abc".to_string(),
            telegram_api_url: "https://api.telegram.org".to_string(),
            telegram_send_timeout_secs: 30,
            telegram_accept_invalid_certs: false,
            webhook_url: None,
            task_api_url: "https://jsonplaceholder.typicode.com/todos".to_string(),
            delivery_workers: 4,
            db_max_connections: 7,
            db_acquire_timeout_secs: 3,
        }
    }

    #[test]
    fn test_pool_options_follow_configuration() {
        let options = pool_options(&test_config());
        assert_eq!(options.get_max_connections(), 7);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
    }
}
