use clap::Parser;

use kite_core::args::ServerArgs;
use kite_core::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(&args.log_level, &args.log_format);

    if let Err(e) = server::run_server(args).await {
        tracing::error!(error = %e, "kite-core exited with an error");
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
