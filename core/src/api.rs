//! Thin HTTP surface over the Issue Lifecycle Service. See the external
//! interfaces table for the endpoint enumeration; namespace resolution
//! order is path parameter, then query parameter, then request body field.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiResult, ServiceError};
use crate::models::{
    CreateIssueRequest, HealthResponse, Issue, ListIssuesQuery, ListIssuesResponse, RelateRequest,
    UpdateIssueRequest, VersionResponse,
};
use crate::server::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct NamespaceQuery {
    pub namespace: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let start = Instant::now();
    let database = match state.pool.get().await {
        Ok(client) => match client.simple_query("SELECT 1").await {
            Ok(_) => "ok",
            Err(_) => "error",
        },
        Err(_) => "unavailable",
    };

    Json(HealthResponse {
        status: if database == "ok" { "ok" } else { "degraded" },
        database,
        response_time_ms: start.elapsed().as_millis(),
        authz_mode: state.authorizer.mode(),
    })
}

pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        name: "kite-core",
        commit: option_env!("GIT_COMMIT"),
    })
}

pub async fn list_issues(
    State(state): State<AppState>,
    Query(query): Query<ListIssuesQuery>,
) -> ApiResult<Json<ListIssuesResponse>> {
    let namespace = query
        .namespace
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    let (data, total) = state.service.list(query).await?;
    Ok(Json(ListIssuesResponse { data, total }))
}

pub async fn create_issue(
    State(state): State<AppState>,
    Json(request): Json<CreateIssueRequest>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let namespace = request
        .namespace
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    let issue = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn get_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(ns): Query<NamespaceQuery>,
) -> ApiResult<Json<Issue>> {
    let namespace = ns.namespace.filter(|s| !s.is_empty()).ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    let issue = state.service.get(id, &namespace).await?;
    Ok(Json(issue))
}

pub async fn update_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(ns): Query<NamespaceQuery>,
    Json(request): Json<UpdateIssueRequest>,
) -> ApiResult<Json<Issue>> {
    let namespace = ns
        .namespace
        .or_else(|| request.namespace.clone())
        .filter(|s| !s.is_empty())
        .ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    let issue = state.service.update(id, &namespace, request).await?;
    Ok(Json(issue))
}

pub async fn delete_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(ns): Query<NamespaceQuery>,
) -> ApiResult<StatusCode> {
    let namespace = ns.namespace.filter(|s| !s.is_empty()).ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    state.service.delete(id, &namespace).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn resolve_issue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(ns): Query<NamespaceQuery>,
) -> ApiResult<Json<Issue>> {
    let namespace = ns.namespace.filter(|s| !s.is_empty()).ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    let issue = state.service.resolve_one(id, &namespace).await?;
    Ok(Json(issue))
}

pub async fn add_relationship(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(ns): Query<NamespaceQuery>,
    Json(request): Json<RelateRequest>,
) -> ApiResult<StatusCode> {
    let namespace = ns.namespace.filter(|s| !s.is_empty()).ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    state.service.relate(id, &namespace, request.related_id).await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_relationship(
    State(state): State<AppState>,
    Path((id, related_id)): Path<(Uuid, Uuid)>,
    Query(ns): Query<NamespaceQuery>,
) -> ApiResult<StatusCode> {
    let namespace = ns.namespace.filter(|s| !s.is_empty()).ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    state.service.unrelate(id, &namespace, related_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
