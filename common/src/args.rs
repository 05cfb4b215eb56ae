use clap::Parser;

#[derive(Parser, Debug, Clone)]
pub struct PostgresArgs {
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub postgres_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub postgres_port: u16,

    #[arg(long, env = "DB_NAME", default_value = "kite")]
    pub postgres_database: String,

    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub postgres_username: String,

    #[arg(long, env = "DB_PASSWORD")]
    pub postgres_password: Option<String>,

    #[arg(long, env = "DB_CA_CERT")]
    pub postgres_ca_cert: Option<String>,

    #[arg(long, env = "DB_SSL_MODE", default_value = "prefer")]
    pub postgres_ssl_mode: String,

    /// Max attempts to establish the initial pool connection before giving up.
    #[arg(long, env = "DB_MAX_RETRIES", default_value_t = 5)]
    pub max_retries: u32,

    /// Delay in milliseconds between initial connection retry attempts.
    #[arg(long, env = "DB_RETRY_DELAY_MS", default_value_t = 1000)]
    pub retry_delay_ms: u64,

    #[arg(long, env = "DB_MAX_OPEN_CONNS", default_value_t = 100)]
    pub max_open_conns: usize,

    #[arg(long, env = "DB_MAX_IDLE_CONNS", default_value_t = 10)]
    pub max_idle_conns: usize,

    /// Per-connection maximum lifetime, in seconds, before it is recycled.
    #[arg(long, env = "DB_CONN_MAX_LIFETIME_SECS", default_value_t = 3600)]
    pub conn_max_lifetime_secs: u64,
}
