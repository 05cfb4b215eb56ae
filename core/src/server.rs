use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use deadpool_postgres::Pool;
use kite_common::shutdown::shutdown_signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::args::ServerArgs;
use crate::authz::Authorizer;
use crate::error::ServiceError;
use crate::service::IssueLifecycleService;
use crate::store::Store;
use crate::{api, ingress};

/// Shared application state: database pool, Authorizer client, and
/// configuration are process-wide with explicit startup/shutdown. No other
/// globals; handlers receive everything they need by construction.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IssueLifecycleService>,
    pub authorizer: Arc<Authorizer>,
    pub pool: Pool,
    pub args: Arc<ServerArgs>,
}

impl AppState {
    /// Confirms the caller may operate in `namespace`, consulting the
    /// Authorizer unless namespace checking has been disabled for local
    /// development.
    pub async fn authorize(&self, namespace: &str) -> Result<(), ServiceError> {
        if !self.args.namespace_check_enabled {
            return Ok(());
        }
        if self.authorizer.may_access(namespace).await? {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized)
        }
    }
}

pub async fn run_server(args: ServerArgs) -> Result<()> {
    let pool = kite_common::postgres::create_pool(args.postgres.clone())
        .await
        .context("failed to create database pool")?;

    let store = Store::new(pool.clone());
    store
        .init_schema()
        .await
        .context("failed to initialize database schema")?;

    let authorizer = Authorizer::from_env().await;
    let service = IssueLifecycleService::new(store);

    let state = AppState {
        service: Arc::new(service),
        authorizer: Arc::new(authorizer),
        pool,
        args: Arc::new(args.clone()),
    };

    let app = build_router(state, &args);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "starting kite server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped gracefully");
    Ok(())
}

/// Builds the full route tree and middleware stack over `state`. Split out
/// from `run_server` so tests can drive the app in-process without binding a
/// listener.
pub fn build_router(state: AppState, args: &ServerArgs) -> Router {
    let cors = build_cors(args);

    let mut router = Router::new()
        .route("/health", get(api::health))
        .route("/version", get(api::version))
        .route(
            "/api/v1/issues",
            get(api::list_issues).post(api::create_issue),
        )
        .route(
            "/api/v1/issues/{id}",
            get(api::get_issue).put(api::update_issue).delete(api::delete_issue),
        )
        .route("/api/v1/issues/{id}/resolve", post(api::resolve_issue))
        .route(
            "/api/v1/issues/{id}/related",
            post(api::add_relationship),
        )
        .route(
            "/api/v1/issues/{id}/related/{related_id}",
            axum::routing::delete(api::remove_relationship),
        );

    if args.webhooks_enabled {
        router = router
            .route(
                "/webhooks/pipeline-failure",
                post(ingress::pipeline_failure),
            )
            .route(
                "/webhooks/pipeline-success",
                post(ingress::pipeline_success),
            );
    }

    router
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(args.read_timeout_secs.max(args.write_timeout_secs)),
        ))
        .layer(cors)
        .layer(axum::middleware::from_fn(kite_common::access_log::request))
        .layer(axum::middleware::from_fn(
            kite_common::middleware::create_context,
        ))
        .with_state(state)
}

fn build_cors(args: &ServerArgs) -> CorsLayer {
    if !args.cors_enabled {
        return CorsLayer::new();
    }
    let origins: Vec<&str> = args
        .cors_allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if origins.is_empty() || args.environment != "production" {
        kite_common::cors::dev()
    } else {
        kite_common::cors::prod(&origins)
    }
}
