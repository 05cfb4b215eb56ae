//! Confirms the caller may operate in a given namespace by consulting a
//! Kubernetes `SelfSubjectAccessReview`. `get pods` in the namespace is used
//! as a representative verb/resource standing in for namespace visibility;
//! do not change it without confirming the intent behind that policy.

use std::time::Duration;

use k8s_openapi::api::authorization::v1::{
    ResourceAttributes, SelfSubjectAccessReview, SelfSubjectAccessReviewSpec,
};
use kube::Api;
use kube::api::PostParams;

use crate::error::AuthzError;

const ACCESS_REVIEW_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Authorizer {
    client: Option<kube::Client>,
}

impl Authorizer {
    /// Attempts to build a Kubernetes client from the ambient configuration
    /// (in-cluster service account, `KUBECONFIG`, or the default user
    /// kubeconfig). If none is discoverable, enters the pass-through
    /// degraded mode: every `may_access` call allows. This is a deliberate,
    /// logged development convenience; production deployments must supply
    /// credentials.
    pub async fn from_env() -> Self {
        match kube::Client::try_default().await {
            Ok(client) => {
                tracing::info!("authorizer: kubernetes client configured");
                Self {
                    client: Some(client),
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "authorizer: no kubernetes configuration discoverable, entering pass-through mode"
                );
                Self { client: None }
            }
        }
    }

    pub fn mode(&self) -> &'static str {
        if self.client.is_some() { "enforcing" } else { "pass-through" }
    }

    pub async fn may_access(&self, namespace: &str) -> Result<bool, AuthzError> {
        let Some(client) = &self.client else {
            tracing::debug!(namespace, "authorizer: pass-through mode, allowing");
            return Ok(true);
        };

        let review = SelfSubjectAccessReview {
            spec: SelfSubjectAccessReviewSpec {
                resource_attributes: Some(ResourceAttributes {
                    namespace: Some(namespace.to_string()),
                    verb: Some("get".to_string()),
                    resource: Some("pods".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let api: Api<SelfSubjectAccessReview> = Api::all(client.clone());
        let result = tokio::time::timeout(
            ACCESS_REVIEW_TIMEOUT,
            api.create(&PostParams::default(), &review),
        )
        .await
        .map_err(|_| AuthzError::Unavailable("access review timed out".into()))?
        .map_err(|e| AuthzError::Unavailable(e.to_string()))?;

        Ok(result.status.map(|s| s.allowed).unwrap_or(false))
    }
}
