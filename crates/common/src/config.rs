use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Telegram bot token (required — the bot cannot deliver anything without it)
    pub telegram_bot_token: String,

    /// Telegram Bot API base URL (override for testing against a local stub)
    pub telegram_api_url: String,

    /// Per-call timeout for outbound Telegram requests, in seconds (default: 30)
    pub telegram_send_timeout_secs: u64,

    /// Skip TLS certificate verification on outbound Telegram calls.
    /// For constrained deployments behind intercepting proxies; default false.
    pub telegram_accept_invalid_certs: bool,

    /// Public callback URL to register with Telegram at API startup.
    /// When unset, webhook registration is skipped.
    pub webhook_url: Option<String>,

    /// Upstream task source URL
    pub task_api_url: String,

    /// Number of concurrent delivery workers for broadcast runs (default: 4)
    pub delivery_workers: usize,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Seconds to wait for a free pool connection before giving up (default: 5)
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let telegram_bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable is required"))?;
        if telegram_bot_token.is_empty() {
            anyhow::bail!("TELEGRAM_BOT_TOKEN must not be empty");
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            telegram_bot_token,
            telegram_api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            telegram_send_timeout_secs: std::env::var("TELEGRAM_SEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("TELEGRAM_SEND_TIMEOUT_SECS must be a valid u64"))?,
            telegram_accept_invalid_certs: std::env::var("TELEGRAM_ACCEPT_INVALID_CERTS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            webhook_url: std::env::var("WEBHOOK_URL").ok(),
            task_api_url: std::env::var("TASK_API_URL")
                .unwrap_or_else(|_| "https://jsonplaceholder.typicode.com/todos".to_string()),
            delivery_workers: std::env::var("DELIVERY_WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DELIVERY_WORKERS must be a valid usize"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            db_acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64"))?,
        })
    }
}
