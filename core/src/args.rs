use clap::Parser;
use kite_common::args::PostgresArgs;

#[derive(Parser, Debug, Clone)]
#[command(name = "kite-core")]
#[command(about = "Namespace-scoped issue-tracking backend for CI/CD infrastructure")]
pub struct ServerArgs {
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "SERVER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Deadline for an individual request before the connection is reset.
    #[arg(long, env = "SERVER_READ_TIMEOUT_SECS", default_value_t = 15)]
    pub read_timeout_secs: u64,

    #[arg(long, env = "SERVER_WRITE_TIMEOUT_SECS", default_value_t = 15)]
    pub write_timeout_secs: u64,

    /// Idle-connection timeout on the listener's keep-alive connections.
    #[arg(long, env = "SERVER_IDLE_TIMEOUT_SECS", default_value_t = 60)]
    pub idle_timeout_secs: u64,

    /// How long graceful shutdown waits for in-flight requests to drain.
    #[arg(long, env = "SERVER_SHUTDOWN_TIMEOUT_SECS", default_value_t = 10)]
    pub shutdown_timeout_secs: u64,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// `json` or `text`.
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    pub environment: String,

    #[arg(long, env = "CORS_ENABLED", default_value_t = true)]
    pub cors_enabled: bool,

    /// Comma-separated list of allowed origins. Ignored (mirrors the
    /// request origin) when empty in a non-production environment.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", default_value = "")]
    pub cors_allowed_origins: String,

    /// Whether the API layer enforces the Authorizer's namespace check.
    /// Disabling this is a development convenience, never a production
    /// default.
    #[arg(long, env = "NAMESPACE_CHECK_ENABLED", default_value_t = true)]
    pub namespace_check_enabled: bool,

    #[arg(long, env = "WEBHOOKS_ENABLED", default_value_t = true)]
    pub webhooks_enabled: bool,

    /// Base URL prepended to the default pipeline-run logs link when a
    /// failure webhook omits `logsUrl`.
    #[arg(long, env = "LOGS_BASE_URL", default_value = "")]
    pub logs_base_url: String,

    #[arg(long, env = "LOGS_ENDPOINT_PREFIX", default_value = "/logs")]
    pub logs_endpoint_prefix: String,

    /// Default severity applied to pipeline-failure webhooks that omit one.
    #[arg(long, env = "PIPELINE_FAILURE_DEFAULT_SEVERITY", default_value = "major")]
    pub pipeline_failure_default_severity: String,

    #[clap(flatten)]
    pub postgres: PostgresArgs,
}
