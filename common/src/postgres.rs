use crate::args::PostgresArgs;
use anyhow::{Result, bail};
use deadpool_postgres::{Config as PgConfig, ManagerConfig, Pool, PoolConfig, RecyclingMethod};
use postgres::NoTls;
use rustls::pki_types::CertificateDer;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::time::sleep;

/// Builds a connection pool, retrying the initial handshake per the
/// configured retry policy (`DB_MAX_RETRIES` / `DB_RETRY_DELAY_MS`).
pub async fn create_pool(pg_args: PostgresArgs) -> Result<Pool> {
    let max_retries = pg_args.max_retries;
    let retry_delay = Duration::from_millis(pg_args.retry_delay_ms);
    let pool = build_pool(&pg_args)?;

    let mut attempt = 0;
    loop {
        match pool.get().await {
            Ok(_) => return Ok(pool),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    error = %e,
                    "database not reachable yet, retrying"
                );
                sleep(retry_delay).await;
            }
            Err(e) => bail!("failed to connect to database after {attempt} attempts: {e}"),
        }
    }
}

fn build_pool(pg_args: &PostgresArgs) -> Result<Pool> {
    let mut _ca_tempfile = None;
    let mut tls_connector = None;
    if let Some(ref ca_cert) = pg_args.postgres_ca_cert {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        use std::io::Write;
        file.write_all(ca_cert.as_bytes())
            .expect("Failed to write CA certificate");
        let cert_bytes = std::fs::read(file.path()).expect("Failed to read CA certificate");
        let extra_roots = parse_ca_certs(&cert_bytes)?;
        tls_connector = Some(crate::make_rustls(extra_roots)?);
        _ca_tempfile = Some(file); // Keep tempfile alive
    }

    let mut pg_pool_cfg = PgConfig::new();
    pg_pool_cfg.dbname = Some(pg_args.postgres_database.clone());
    pg_pool_cfg.host = Some(pg_args.postgres_host.clone());
    pg_pool_cfg.port = Some(pg_args.postgres_port);
    pg_pool_cfg.user = Some(pg_args.postgres_username.clone());
    pg_pool_cfg.password = pg_args.postgres_password.clone();
    pg_pool_cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    pg_pool_cfg.pool = Some(PoolConfig {
        max_size: pg_args.max_open_conns,
        ..PoolConfig::default()
    });

    let pool = if let Some(tls) = tls_connector {
        pg_pool_cfg.create_pool(Some(deadpool_postgres::Runtime::Tokio1), tls)?
    } else {
        pg_pool_cfg.create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)?
    };
    Ok(pool)
}

fn parse_ca_certs(bytes: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    // If it's PEM, decode all the certs; otherwise treat as raw DER
    if bytes.starts_with(b"-----BEGIN") {
        let mut rd: &[u8] = bytes;
        let mut out = Vec::new();
        for item in rustls_pemfile::read_all(&mut rd) {
            let item = item.map_err(|e| anyhow::anyhow!("failed to parse PEM bundle: {}", e))?;
            if let rustls_pemfile::Item::X509Certificate(der) = item {
                out.push(der);
            }
        }
        if out.is_empty() {
            bail!("no X509 certificates found in provided PEM");
        }
        Ok(out)
    } else {
        Ok(vec![CertificateDer::from(bytes.to_vec())])
    }
}
