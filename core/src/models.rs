use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the four severity levels an Issue can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Severity::Info),
            "minor" => Some(Severity::Minor),
            "major" => Some(Severity::Major),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// The kind of failure an Issue tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Build,
    Test,
    Release,
    Dependency,
    Pipeline,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Build => "build",
            IssueType::Test => "test",
            IssueType::Release => "release",
            IssueType::Dependency => "dependency",
            IssueType::Pipeline => "pipeline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "build" => Some(IssueType::Build),
            "test" => Some(IssueType::Test),
            "release" => Some(IssueType::Release),
            "dependency" => Some(IssueType::Dependency),
            "pipeline" => Some(IssueType::Pipeline),
            _ => None,
        }
    }
}

/// Lifecycle state of an Issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Active,
    Resolved,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Active => "active",
            IssueState::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(IssueState::Active),
            "resolved" => Some(IssueState::Resolved),
            _ => None,
        }
    }
}

/// The (resource type, resource name, resource namespace) triple an Issue concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(rename = "resourceName")]
    pub resource_name: String,
    #[serde(rename = "resourceNamespace")]
    pub resource_namespace: String,
}

/// Auxiliary URL attached to an Issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
}

/// A related Issue, as seen from one side of a Relationship edge.
/// Carries its Scope preloaded so list/get responses avoid N+1 lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedIssue {
    pub id: Uuid,
    pub title: String,
    pub severity: Severity,
    #[serde(rename = "issueType")]
    pub issue_type: IssueType,
    pub state: IssueState,
    pub namespace: String,
    pub scope: Scope,
}

/// The central entity: a single tracked failure or condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(rename = "issueType")]
    pub issue_type: IssueType,
    pub state: IssueState,
    #[serde(rename = "detectedAt")]
    pub detected_at: DateTime<Utc>,
    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub namespace: String,
    pub scope: Scope,
    pub links: Vec<Link>,
    #[serde(rename = "relatedFrom")]
    pub related_from: Vec<RelatedIssue>,
    #[serde(rename = "relatedTo")]
    pub related_to: Vec<RelatedIssue>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// A candidate Issue definition, as assembled by the API layer or a webhook,
/// before it has been validated and persisted.
#[derive(Debug, Clone)]
pub struct IssueCandidate {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub issue_type: IssueType,
    pub state: IssueState,
    pub namespace: String,
    pub scope: Scope,
    pub links: Vec<Link>,
}

/// Body of `POST /api/v1/issues`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    pub description: String,
    pub severity: String,
    #[serde(rename = "issueType")]
    pub issue_type: String,
    pub state: Option<String>,
    pub namespace: Option<String>,
    pub scope: CreateScopeRequest,
    #[serde(default)]
    pub links: Option<Vec<Link>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScopeRequest {
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(rename = "resourceName")]
    pub resource_name: String,
    #[serde(rename = "resourceNamespace", default)]
    pub resource_namespace: Option<String>,
}

/// Body of `PUT /api/v1/issues/{id}`. Every field optional; only provided
/// fields mutate.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<String>,
    #[serde(rename = "issueType")]
    pub issue_type: Option<String>,
    pub state: Option<String>,
    pub namespace: Option<String>,
    #[serde(default)]
    pub links: Option<Vec<Link>>,
}

/// Filters accepted by `GET /api/v1/issues`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListIssuesQuery {
    pub namespace: Option<String>,
    pub severity: Option<String>,
    #[serde(rename = "issueType")]
    pub issue_type: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "resourceType")]
    pub resource_type: Option<String>,
    #[serde(rename = "resourceName")]
    pub resource_name: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Filters passed to `Store::find_all`, post-validation.
#[derive(Debug, Clone, Default)]
pub struct IssueFilters {
    pub namespace: Option<String>,
    pub severity: Option<Severity>,
    pub issue_type: Option<IssueType>,
    pub state: Option<IssueState>,
    pub resource_type: Option<String>,
    pub resource_name: Option<String>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListIssuesResponse {
    pub data: Vec<Issue>,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelateRequest {
    #[serde(rename = "relatedId")]
    pub related_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineFailureRequest {
    #[serde(rename = "pipelineName")]
    pub pipeline_name: String,
    pub namespace: Option<String>,
    #[serde(rename = "failureReason")]
    pub failure_reason: String,
    pub severity: Option<String>,
    #[serde(rename = "runId")]
    pub run_id: Option<String>,
    #[serde(rename = "logsUrl")]
    pub logs_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSuccessRequest {
    #[serde(rename = "pipelineName")]
    pub pipeline_name: String,
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveByScopeResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(rename = "responseTimeMs")]
    pub response_time_ms: u128,
    #[serde(rename = "authzMode")]
    pub authz_mode: &'static str,
}
