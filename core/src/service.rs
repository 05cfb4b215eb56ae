//! The behavioral core: deduplication, create-or-update, bulk resolution
//! by scope, relationship validation. Sits between the API/Ingress layer
//! and the Store.

use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{
    CreateIssueRequest, Issue, IssueCandidate, IssueFilters, IssueState, IssueType, ListIssuesQuery,
    Scope, Severity, UpdateIssueRequest,
};
use crate::store::{IssuePatch, Store};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 1000;

pub struct IssueLifecycleService {
    store: Store,
}

impl IssueLifecycleService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: ListIssuesQuery) -> Result<(Vec<Issue>, i64), ServiceError> {
        let filters = build_filters(query)?;
        Ok(self.store.find_all(&filters).await?)
    }

    /// Fetches an Issue, rejecting it with `Unauthorized` if its namespace
    /// does not match `expected_namespace` — defense in depth beyond the
    /// Authorizer, which only checks the namespace the caller requested.
    pub async fn get(&self, id: Uuid, expected_namespace: &str) -> Result<Issue, ServiceError> {
        let issue = self.store.find_by_id(id).await?.ok_or(ServiceError::NotFound)?;
        self.check_namespace(&issue, expected_namespace)?;
        Ok(issue)
    }

    pub async fn create(&self, request: CreateIssueRequest) -> Result<Issue, ServiceError> {
        let candidate = validate_create(request)?;
        Ok(self.store.create_or_update(candidate).await?)
    }

    pub async fn update(
        &self,
        id: Uuid,
        expected_namespace: &str,
        request: UpdateIssueRequest,
    ) -> Result<Issue, ServiceError> {
        self.get(id, expected_namespace).await?;
        let patch = validate_update(request)?;
        Ok(self.store.update(id, patch).await?)
    }

    pub async fn delete(&self, id: Uuid, expected_namespace: &str) -> Result<(), ServiceError> {
        self.get(id, expected_namespace).await?;
        Ok(self.store.delete(id).await?)
    }

    pub async fn resolve_one(&self, id: Uuid, expected_namespace: &str) -> Result<Issue, ServiceError> {
        self.get(id, expected_namespace).await?;
        let patch = IssuePatch {
            state: Some(IssueState::Resolved),
            ..Default::default()
        };
        Ok(self.store.update(id, patch).await?)
    }

    pub async fn resolve_by_scope(
        &self,
        resource_type: &str,
        resource_name: &str,
        namespace: &str,
    ) -> Result<i64, ServiceError> {
        Ok(self
            .store
            .resolve_by_scope(resource_type, resource_name, namespace)
            .await?)
    }

    pub async fn relate(
        &self,
        source: Uuid,
        expected_namespace: &str,
        target: Uuid,
    ) -> Result<(), ServiceError> {
        if source == target {
            return Err(ServiceError::InvalidInput(
                "an issue cannot be related to itself".into(),
            ));
        }
        self.get(source, expected_namespace).await?;
        Ok(self.store.add_relationship(source, target).await?)
    }

    pub async fn unrelate(
        &self,
        source: Uuid,
        expected_namespace: &str,
        target: Uuid,
    ) -> Result<(), ServiceError> {
        self.get(source, expected_namespace).await?;
        Ok(self.store.remove_relationship(source, target).await?)
    }

    fn check_namespace(&self, issue: &Issue, expected_namespace: &str) -> Result<(), ServiceError> {
        if issue.namespace != expected_namespace {
            return Err(ServiceError::Unauthorized);
        }
        Ok(())
    }
}

fn build_filters(query: ListIssuesQuery) -> Result<IssueFilters, ServiceError> {
    let severity = query
        .severity
        .map(|s| parse_severity(&s))
        .transpose()?;
    let issue_type = query
        .issue_type
        .map(|s| parse_issue_type(&s))
        .transpose()?;
    let state = query.state.map(|s| parse_state(&s)).transpose()?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    Ok(IssueFilters {
        namespace: query.namespace,
        severity,
        issue_type,
        state,
        resource_type: query.resource_type,
        resource_name: query.resource_name,
        search: query.search,
        limit,
        offset,
    })
}

fn validate_create(request: CreateIssueRequest) -> Result<IssueCandidate, ServiceError> {
    let namespace = request
        .namespace
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::InvalidInput("namespace is required".into()))?;

    if request.title.is_empty() {
        return Err(ServiceError::InvalidInput("title is required".into()));
    }
    if request.description.is_empty() {
        return Err(ServiceError::InvalidInput("description is required".into()));
    }
    if request.scope.resource_type.is_empty() {
        return Err(ServiceError::InvalidInput(
            "scope.resourceType is required".into(),
        ));
    }
    if request.scope.resource_name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "scope.resourceName is required".into(),
        ));
    }

    let severity = parse_severity(&request.severity)?;
    let issue_type = parse_issue_type(&request.issue_type)?;
    let state = request
        .state
        .map(|s| parse_state(&s))
        .transpose()?
        .unwrap_or(IssueState::Active);

    let links = validate_links(request.links)?.unwrap_or_default();

    let resource_namespace = request
        .scope
        .resource_namespace
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| namespace.clone());

    Ok(IssueCandidate {
        title: request.title,
        description: request.description,
        severity,
        issue_type,
        state,
        namespace,
        scope: Scope {
            resource_type: request.scope.resource_type,
            resource_name: request.scope.resource_name,
            resource_namespace,
        },
        links,
    })
}

fn validate_update(request: UpdateIssueRequest) -> Result<IssuePatch, ServiceError> {
    if let Some(ref t) = request.title
        && t.is_empty()
    {
        return Err(ServiceError::InvalidInput("title cannot be empty".into()));
    }

    let severity = request.severity.map(|s| parse_severity(&s)).transpose()?;
    let issue_type = request.issue_type.map(|s| parse_issue_type(&s)).transpose()?;
    let state = request.state.map(|s| parse_state(&s)).transpose()?;
    let links = validate_links(request.links)?;

    Ok(IssuePatch {
        title: request.title,
        description: request.description,
        severity,
        issue_type,
        state,
        links,
    })
}

fn validate_links(
    links: Option<Vec<crate::models::Link>>,
) -> Result<Option<Vec<crate::models::Link>>, ServiceError> {
    let Some(links) = links else {
        return Ok(None);
    };
    for link in &links {
        if link.title.is_empty() || link.url.is_empty() {
            return Err(ServiceError::InvalidInput(
                "each link requires a non-empty title and url".into(),
            ));
        }
    }
    Ok(Some(links))
}

fn parse_severity(s: &str) -> Result<Severity, ServiceError> {
    Severity::parse(s).ok_or_else(|| ServiceError::InvalidInput(format!("invalid severity: {s}")))
}

fn parse_issue_type(s: &str) -> Result<IssueType, ServiceError> {
    IssueType::parse(s).ok_or_else(|| ServiceError::InvalidInput(format!("invalid issueType: {s}")))
}

fn parse_state(s: &str) -> Result<IssueState, ServiceError> {
    IssueState::parse(s).ok_or_else(|| ServiceError::InvalidInput(format!("invalid state: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Link;

    fn base_request() -> CreateIssueRequest {
        CreateIssueRequest {
            title: "build failed".into(),
            description: "compile step exited 1".into(),
            severity: "major".into(),
            issue_type: "build".into(),
            state: None,
            namespace: Some("team-a".into()),
            scope: crate::models::CreateScopeRequest {
                resource_type: "pipelinerun".into(),
                resource_name: "build-123".into(),
                resource_namespace: None,
            },
            links: None,
        }
    }

    #[test]
    fn validate_create_rejects_missing_namespace() {
        let mut req = base_request();
        req.namespace = None;
        let err = validate_create(req).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn validate_create_rejects_empty_title() {
        let mut req = base_request();
        req.title = String::new();
        assert!(validate_create(req).is_err());
    }

    #[test]
    fn validate_create_defaults_state_to_active() {
        let candidate = validate_create(base_request()).unwrap();
        assert_eq!(candidate.state, IssueState::Active);
    }

    #[test]
    fn validate_create_defaults_resource_namespace_to_namespace() {
        let candidate = validate_create(base_request()).unwrap();
        assert_eq!(candidate.scope.resource_namespace, "team-a");
    }

    #[test]
    fn validate_create_honors_explicit_resource_namespace() {
        let mut req = base_request();
        req.scope.resource_namespace = Some("other-ns".into());
        let candidate = validate_create(req).unwrap();
        assert_eq!(candidate.scope.resource_namespace, "other-ns");
    }

    #[test]
    fn validate_create_rejects_invalid_severity() {
        let mut req = base_request();
        req.severity = "catastrophic".into();
        assert!(validate_create(req).is_err());
    }

    #[test]
    fn validate_update_rejects_empty_title() {
        let req = UpdateIssueRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_update(req).is_err());
    }

    #[test]
    fn validate_update_with_no_fields_is_a_no_op_patch() {
        let patch = validate_update(UpdateIssueRequest::default()).unwrap();
        assert!(patch.title.is_none());
        assert!(patch.severity.is_none());
        assert!(patch.links.is_none());
    }

    #[test]
    fn validate_links_rejects_empty_url() {
        let links = vec![Link {
            title: "logs".into(),
            url: String::new(),
        }];
        assert!(validate_links(Some(links)).is_err());
    }

    #[test]
    fn validate_links_none_preserves_existing() {
        assert_eq!(validate_links(None).unwrap(), None);
    }

    #[test]
    fn build_filters_clamps_limit_to_max() {
        let query = ListIssuesQuery {
            limit: Some(100_000),
            ..Default::default()
        };
        let filters = build_filters(query).unwrap();
        assert_eq!(filters.limit, MAX_LIMIT);
    }

    #[test]
    fn build_filters_rejects_zero_limit_by_clamping_to_one() {
        let query = ListIssuesQuery {
            limit: Some(0),
            ..Default::default()
        };
        let filters = build_filters(query).unwrap();
        assert_eq!(filters.limit, 1);
    }

    #[test]
    fn build_filters_defaults_limit_when_absent() {
        let filters = build_filters(ListIssuesQuery::default()).unwrap();
        assert_eq!(filters.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn build_filters_rejects_invalid_severity_filter() {
        let query = ListIssuesQuery {
            severity: Some("unknown".into()),
            ..Default::default()
        };
        assert!(build_filters(query).is_err());
    }
}
