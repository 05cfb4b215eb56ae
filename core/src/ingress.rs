//! Event Ingress: webhook endpoints that translate external CI/CD events
//! into Issue Lifecycle Service operations. The pipeline webhooks below are
//! the template; additional event sources would follow the same shape.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult, ServiceError};
use crate::models::{
    CreateIssueRequest, CreateScopeRequest, Issue, Link, PipelineFailureRequest,
    PipelineSuccessRequest, ResolveByScopeResponse,
};
use crate::server::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct NamespaceQuery {
    pub namespace: Option<String>,
}

pub async fn pipeline_failure(
    State(state): State<AppState>,
    Query(ns_query): Query<NamespaceQuery>,
    Json(req): Json<PipelineFailureRequest>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let namespace = ns_query
        .namespace
        .or_else(|| req.namespace.clone())
        .filter(|s| !s.is_empty())
        .ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    if req.pipeline_name.is_empty() {
        return Err(ApiError(ServiceError::InvalidInput(
            "pipelineName is required".into(),
        )));
    }
    if req.failure_reason.is_empty() {
        return Err(ApiError(ServiceError::InvalidInput(
            "failureReason is required".into(),
        )));
    }

    let severity = req
        .severity
        .unwrap_or_else(|| state.args.pipeline_failure_default_severity.clone());

    let logs_url = req.logs_url.unwrap_or_else(|| {
        format!(
            "{}{}/{}",
            state.args.logs_base_url,
            state.args.logs_endpoint_prefix,
            req.run_id.as_deref().unwrap_or(&req.pipeline_name)
        )
    });

    let request = CreateIssueRequest {
        title: format!("Pipeline run failed: {}", req.pipeline_name),
        description: format!(
            "The pipeline run {} failed with reason: {}",
            req.pipeline_name, req.failure_reason
        ),
        severity,
        issue_type: "pipeline".to_string(),
        state: None,
        namespace: Some(namespace),
        scope: CreateScopeRequest {
            resource_type: "pipelinerun".to_string(),
            resource_name: req.pipeline_name,
            resource_namespace: None,
        },
        links: Some(vec![Link {
            title: "Pipeline Run Logs".to_string(),
            url: logs_url,
        }]),
    };

    let issue = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn pipeline_success(
    State(state): State<AppState>,
    Query(ns_query): Query<NamespaceQuery>,
    Json(req): Json<PipelineSuccessRequest>,
) -> ApiResult<(StatusCode, Json<ResolveByScopeResponse>)> {
    let namespace = ns_query
        .namespace
        .or_else(|| req.namespace.clone())
        .filter(|s| !s.is_empty())
        .ok_or(ServiceError::MissingNamespace)?;
    state.authorize(&namespace).await?;

    if req.pipeline_name.is_empty() {
        return Err(ApiError(ServiceError::InvalidInput(
            "pipelineName is required".into(),
        )));
    }

    let count = state
        .service
        .resolve_by_scope("pipelinerun", &req.pipeline_name, &namespace)
        .await?;

    Ok((
        StatusCode::OK,
        Json(ResolveByScopeResponse {
            status: "success",
            message: format!("Resolved {count} issue(s) for pipeline {}", req.pipeline_name),
        }),
    ))
}
