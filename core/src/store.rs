//! Durable persistence of issues, scopes, links and relationships.
//!
//! Every multi-statement mutation runs inside a single transaction. The
//! uniqueness invariant "at most one active Issue per (namespace, issue
//! type, scope)" is enforced by running `create_or_update`'s duplicate
//! lookup and insert inside one `SERIALIZABLE` transaction rather than
//! backing it with a unique partial index, so the check survives engines
//! where a partial index isn't practical to evolve alongside the scope
//! schema.

use std::collections::HashMap;

use chrono::Utc;
use deadpool_postgres::{GenericClient, Pool, Transaction};
use tokio_postgres::IsolationLevel;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    Issue, IssueCandidate, IssueFilters, IssueState, IssueType, Link, RelatedIssue, Scope,
    Severity,
};

#[derive(Debug, Clone, Default)]
pub struct IssuePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub issue_type: Option<IssueType>,
    pub state: Option<IssueState>,
    /// `None` preserves the existing link set; `Some(vec)` replaces it
    /// wholesale, even with an empty vec.
    pub links: Option<Vec<Link>>,
}

pub struct Store {
    pool: Pool,
}

impl Store {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.pool.get().await?;

        client
            .batch_execute(
                r#"
                CREATE TABLE IF NOT EXISTS issue_scopes (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    resource_type TEXT NOT NULL,
                    resource_name TEXT NOT NULL,
                    resource_namespace TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_issue_scopes_lookup
                ON issue_scopes (resource_type, resource_name, resource_namespace);

                CREATE TABLE IF NOT EXISTS issues (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    scope_id UUID NOT NULL REFERENCES issue_scopes(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    severity TEXT NOT NULL,
                    issue_type TEXT NOT NULL,
                    state TEXT NOT NULL,
                    detected_at TIMESTAMPTZ NOT NULL,
                    resolved_at TIMESTAMPTZ,
                    namespace TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX IF NOT EXISTS idx_issues_ns_type_state
                ON issues (namespace, issue_type, state);

                CREATE INDEX IF NOT EXISTS idx_issues_scope_id
                ON issues (scope_id);

                CREATE TABLE IF NOT EXISTS links (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    issue_id UUID NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    url TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_links_issue_id
                ON links (issue_id);

                CREATE TABLE IF NOT EXISTS related_issues (
                    source_id UUID NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
                    target_id UUID NOT NULL REFERENCES issues(id) ON DELETE CASCADE,
                    PRIMARY KEY (source_id, target_id)
                );

                CREATE INDEX IF NOT EXISTS idx_related_issues_source
                ON related_issues (source_id);

                CREATE INDEX IF NOT EXISTS idx_related_issues_target
                ON related_issues (target_id);
                "#,
            )
            .await
            .map_err(anyhow::Error::from)?;

        tracing::info!("issue tracker schema initialized");
        Ok(())
    }

    pub async fn find_all(
        &self,
        filters: &IssueFilters,
    ) -> Result<(Vec<Issue>, i64), StoreError> {
        let client = self.pool.get().await?;

        let mut where_clauses = Vec::new();
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = Vec::new();
        let mut idx = 1;

        let severity_str = filters.severity.map(|s| s.as_str());
        let issue_type_str = filters.issue_type.map(|s| s.as_str());
        let state_str = filters.state.map(|s| s.as_str());

        if let Some(ref ns) = filters.namespace {
            where_clauses.push(format!("i.namespace = ${idx}"));
            params.push(ns);
            idx += 1;
        }
        if let Some(ref sev) = severity_str {
            where_clauses.push(format!("i.severity = ${idx}"));
            params.push(sev);
            idx += 1;
        }
        if let Some(ref it) = issue_type_str {
            where_clauses.push(format!("i.issue_type = ${idx}"));
            params.push(it);
            idx += 1;
        }
        if let Some(ref st) = state_str {
            where_clauses.push(format!("i.state = ${idx}"));
            params.push(st);
            idx += 1;
        }
        if let Some(ref rt) = filters.resource_type {
            where_clauses.push(format!("s.resource_type = ${idx}"));
            params.push(rt);
            idx += 1;
        }
        if let Some(ref rn) = filters.resource_name {
            where_clauses.push(format!("s.resource_name = ${idx}"));
            params.push(rn);
            idx += 1;
        }
        if let Some(ref search) = filters.search {
            where_clauses.push(format!(
                "(i.title ILIKE ${idx} OR i.description ILIKE ${idx})"
            ));
            params.push(search);
            idx += 1;
        }

        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", where_clauses.join(" AND "))
        };

        let limit_idx = idx;
        let offset_idx = idx + 1;
        params.push(&filters.limit);
        params.push(&filters.offset);

        let sql = format!(
            r#"
            SELECT i.id, i.title, i.description, i.severity, i.issue_type, i.state,
                   i.detected_at, i.resolved_at, i.namespace, i.created_at, i.updated_at,
                   s.resource_type, s.resource_name, s.resource_namespace,
                   COUNT(*) OVER() AS full_count
            FROM issues i
            JOIN issue_scopes s ON s.id = i.scope_id
            {where_sql}
            ORDER BY i.detected_at DESC
            LIMIT ${limit_idx}
            OFFSET ${offset_idx}
            "#
        );

        let rows = client.query(&sql, &params).await.map_err(anyhow::Error::from)?;
        let total: i64 = rows.first().map(|r| r.get("full_count")).unwrap_or(0);

        let ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();
        let mut links = fetch_links(&client, &ids).await?;
        let (mut related_to, mut related_from) = fetch_relationships(&client, &ids).await?;

        let issues = rows
            .iter()
            .map(|r| {
                let id: Uuid = r.get("id");
                row_to_issue(
                    r,
                    links.remove(&id).unwrap_or_default(),
                    related_to.remove(&id).unwrap_or_default(),
                    related_from.remove(&id).unwrap_or_default(),
                )
            })
            .collect();

        Ok((issues, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Issue>, StoreError> {
        let client = self.pool.get().await?;
        self.find_by_id_with(&client, id).await
    }

    async fn find_by_id_with<C: GenericClient>(
        &self,
        client: &C,
        id: Uuid,
    ) -> Result<Option<Issue>, StoreError> {
        let row = client
            .query_opt(ISSUE_BY_ID_SQL, &[&id])
            .await
            .map_err(anyhow::Error::from)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let ids = vec![id];
        let mut links = fetch_links(client, &ids).await?;
        let (mut related_to, mut related_from) = fetch_relationships(client, &ids).await?;

        Ok(Some(row_to_issue(
            &row,
            links.remove(&id).unwrap_or_default(),
            related_to.remove(&id).unwrap_or_default(),
            related_from.remove(&id).unwrap_or_default(),
        )))
    }

    async fn find_duplicate_with<C: GenericClient>(
        &self,
        client: &C,
        candidate: &IssueCandidate,
    ) -> Result<Option<Uuid>, StoreError> {
        let resource_namespace = resolved_scope_namespace(candidate);
        let row = client
            .query_opt(
                r#"
                SELECT i.id
                FROM issues i
                JOIN issue_scopes s ON s.id = i.scope_id
                WHERE i.namespace = $1
                  AND i.issue_type = $2
                  AND i.state = 'active'
                  AND s.resource_type = $3
                  AND s.resource_name = $4
                  AND s.resource_namespace = $5
                "#,
                &[
                    &candidate.namespace,
                    &candidate.issue_type.as_str(),
                    &candidate.scope.resource_type,
                    &candidate.scope.resource_name,
                    &resource_namespace,
                ],
            )
            .await
            .map_err(anyhow::Error::from)?;

        Ok(row.map(|r| r.get("id")))
    }

    async fn insert_issue(
        &self,
        tx: &Transaction<'_>,
        candidate: &IssueCandidate,
    ) -> Result<Uuid, StoreError> {
        let resource_namespace = resolved_scope_namespace(candidate);
        let scope_row = tx
            .query_one(
                r#"
                INSERT INTO issue_scopes (resource_type, resource_name, resource_namespace)
                VALUES ($1, $2, $3)
                RETURNING id
                "#,
                &[
                    &candidate.scope.resource_type,
                    &candidate.scope.resource_name,
                    &resource_namespace,
                ],
            )
            .await
            .map_err(anyhow::Error::from)?;
        let scope_id: Uuid = scope_row.get("id");

        let now = Utc::now();
        let issue_row = tx
            .query_one(
                r#"
                INSERT INTO issues
                    (scope_id, title, description, severity, issue_type, state, detected_at, namespace, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
                RETURNING id
                "#,
                &[
                    &scope_id,
                    &candidate.title,
                    &candidate.description,
                    &candidate.severity.as_str(),
                    &candidate.issue_type.as_str(),
                    &candidate.state.as_str(),
                    &now,
                    &candidate.namespace,
                    &now,
                ],
            )
            .await
            .map_err(anyhow::Error::from)?;
        let issue_id: Uuid = issue_row.get("id");

        for link in &candidate.links {
            tx.execute(
                "INSERT INTO links (issue_id, title, url) VALUES ($1, $2, $3)",
                &[&issue_id, &link.title, &link.url],
            )
            .await
            .map_err(anyhow::Error::from)?;
        }

        Ok(issue_id)
    }

    pub async fn update(&self, id: Uuid, patch: IssuePatch) -> Result<Issue, StoreError> {
        let mut client = self.pool.get().await?;
        let tx = client
            .transaction()
            .await
            .map_err(anyhow::Error::from)?;

        let current = tx
            .query_opt("SELECT state FROM issues WHERE id = $1", &[&id])
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(StoreError::NotFound)?;
        let current_state =
            IssueState::parse(current.get::<_, &str>("state")).expect("state always valid");

        let mut set_clauses = vec!["updated_at = $1".to_string()];
        let now = Utc::now();
        let mut params: Vec<&(dyn tokio_postgres::types::ToSql + Sync)> = vec![&now];
        let mut idx = 2;

        let severity_str = patch.severity.map(|s| s.as_str());
        let issue_type_str = patch.issue_type.map(|s| s.as_str());
        let state_str = patch.state.map(|s| s.as_str());

        if let Some(ref t) = patch.title {
            set_clauses.push(format!("title = ${idx}"));
            params.push(t);
            idx += 1;
        }
        if let Some(ref d) = patch.description {
            set_clauses.push(format!("description = ${idx}"));
            params.push(d);
            idx += 1;
        }
        if let Some(ref sev) = severity_str {
            set_clauses.push(format!("severity = ${idx}"));
            params.push(sev);
            idx += 1;
        }
        if let Some(ref it) = issue_type_str {
            set_clauses.push(format!("issue_type = ${idx}"));
            params.push(it);
            idx += 1;
        }

        let resolved_at_value: Option<chrono::DateTime<Utc>>;
        if let Some(ref new_state_str) = state_str {
            set_clauses.push(format!("state = ${idx}"));
            params.push(new_state_str);
            idx += 1;

            let new_state = patch.state.expect("state_str is Some only when patch.state is Some");

            resolved_at_value = match (current_state, new_state) {
                (IssueState::Active, IssueState::Resolved) => Some(now),
                (IssueState::Resolved, IssueState::Active) => None,
                _ => None,
            };
            if !matches!((current_state, new_state), (IssueState::Active, IssueState::Active) | (IssueState::Resolved, IssueState::Resolved))
            {
                set_clauses.push(format!("resolved_at = ${idx}"));
                params.push(&resolved_at_value);
                idx += 1;
            }
        }

        params.push(&id);
        let sql = format!(
            "UPDATE issues SET {} WHERE id = ${idx}",
            set_clauses.join(", ")
        );
        tx.execute(&sql, &params).await.map_err(anyhow::Error::from)?;

        if let Some(links) = patch.links {
            tx.execute("DELETE FROM links WHERE issue_id = $1", &[&id])
                .await
                .map_err(anyhow::Error::from)?;
            for link in &links {
                tx.execute(
                    "INSERT INTO links (issue_id, title, url) VALUES ($1, $2, $3)",
                    &[&id, &link.title, &link.url],
                )
                .await
                .map_err(anyhow::Error::from)?;
            }
        }

        let issue = self
            .find_by_id_with(&tx, id)
            .await?
            .expect("issue updated above must exist");

        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(issue)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await.map_err(anyhow::Error::from)?;

        let scope_row = tx
            .query_opt("SELECT scope_id FROM issues WHERE id = $1", &[&id])
            .await
            .map_err(anyhow::Error::from)?
            .ok_or(StoreError::NotFound)?;
        let scope_id: Uuid = scope_row.get("scope_id");

        tx.execute(
            "DELETE FROM related_issues WHERE source_id = $1 OR target_id = $1",
            &[&id],
        )
        .await
        .map_err(anyhow::Error::from)?;

        tx.execute("DELETE FROM links WHERE issue_id = $1", &[&id])
            .await
            .map_err(anyhow::Error::from)?;

        tx.execute("DELETE FROM issues WHERE id = $1", &[&id])
            .await
            .map_err(anyhow::Error::from)?;

        tx.execute("DELETE FROM issue_scopes WHERE id = $1", &[&scope_id])
            .await
            .map_err(anyhow::Error::from)?;

        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(())
    }

    pub async fn resolve_by_scope(
        &self,
        resource_type: &str,
        resource_name: &str,
        namespace: &str,
    ) -> Result<i64, StoreError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await.map_err(anyhow::Error::from)?;

        let now = Utc::now();
        let rows = tx
            .query(
                r#"
                UPDATE issues
                SET state = 'resolved', resolved_at = $1, updated_at = $1
                FROM issue_scopes s
                WHERE issues.scope_id = s.id
                  AND issues.state = 'active'
                  AND issues.namespace = $2
                  AND s.resource_type = $3
                  AND s.resource_name = $4
                RETURNING issues.id
                "#,
                &[&now, &namespace, &resource_type, &resource_name],
            )
            .await
            .map_err(anyhow::Error::from)?;

        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(rows.len() as i64)
    }

    pub async fn add_relationship(&self, source: Uuid, target: Uuid) -> Result<(), StoreError> {
        let mut client = self.pool.get().await?;
        let tx = client.transaction().await.map_err(anyhow::Error::from)?;

        for id in [source, target] {
            let exists = tx
                .query_opt("SELECT 1 FROM issues WHERE id = $1", &[&id])
                .await
                .map_err(anyhow::Error::from)?;
            if exists.is_none() {
                return Err(StoreError::NotFound);
            }
        }

        let existing = tx
            .query_opt(
                r#"
                SELECT 1 FROM related_issues
                WHERE (source_id = $1 AND target_id = $2)
                   OR (source_id = $2 AND target_id = $1)
                "#,
                &[&source, &target],
            )
            .await
            .map_err(anyhow::Error::from)?;
        if existing.is_some() {
            return Err(StoreError::Conflict);
        }

        tx.execute(
            "INSERT INTO related_issues (source_id, target_id) VALUES ($1, $2)",
            &[&source, &target],
        )
        .await
        .map_err(anyhow::Error::from)?;

        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(())
    }

    pub async fn remove_relationship(&self, source: Uuid, target: Uuid) -> Result<(), StoreError> {
        let client = self.pool.get().await?;
        let rows_affected = client
            .execute(
                r#"
                DELETE FROM related_issues
                WHERE (source_id = $1 AND target_id = $2)
                   OR (source_id = $2 AND target_id = $1)
                "#,
                &[&source, &target],
            )
            .await
            .map_err(anyhow::Error::from)?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// If a duplicate (as defined by `find_duplicate`) exists, applies the
    /// candidate's mutable fields to it; otherwise creates a new Issue.
    /// Runs entirely inside one serializable transaction so two concurrent
    /// failure events for the same scope cannot both create an Issue.
    pub async fn create_or_update(&self, candidate: IssueCandidate) -> Result<Issue, StoreError> {
        let mut client = self.pool.get().await?;
        let tx = client
            .build_transaction()
            .isolation_level(IsolationLevel::Serializable)
            .start()
            .await
            .map_err(anyhow::Error::from)?;

        let existing_id = self.find_duplicate_with(&tx, &candidate).await?;

        let id = if let Some(existing_id) = existing_id {
            self.apply_update(&tx, existing_id, &candidate).await?;
            existing_id
        } else {
            self.insert_issue(&tx, &candidate).await?
        };

        let issue = self
            .find_by_id_with(&tx, id)
            .await?
            .expect("issue created or updated above must exist");

        tx.commit().await.map_err(anyhow::Error::from)?;
        Ok(issue)
    }

    async fn apply_update(
        &self,
        tx: &Transaction<'_>,
        id: Uuid,
        candidate: &IssueCandidate,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        tx.execute(
            r#"
            UPDATE issues
            SET title = $1, description = $2, severity = $3, issue_type = $4, updated_at = $5
            WHERE id = $6
            "#,
            &[
                &candidate.title,
                &candidate.description,
                &candidate.severity.as_str(),
                &candidate.issue_type.as_str(),
                &now,
                &id,
            ],
        )
        .await
        .map_err(anyhow::Error::from)?;

        tx.execute("DELETE FROM links WHERE issue_id = $1", &[&id])
            .await
            .map_err(anyhow::Error::from)?;
        for link in &candidate.links {
            tx.execute(
                "INSERT INTO links (issue_id, title, url) VALUES ($1, $2, $3)",
                &[&id, &link.title, &link.url],
            )
            .await
            .map_err(anyhow::Error::from)?;
        }

        Ok(())
    }
}

fn resolved_scope_namespace(candidate: &IssueCandidate) -> String {
    if candidate.scope.resource_namespace.is_empty() {
        candidate.namespace.clone()
    } else {
        candidate.scope.resource_namespace.clone()
    }
}

const ISSUE_BY_ID_SQL: &str = r#"
    SELECT i.id, i.title, i.description, i.severity, i.issue_type, i.state,
           i.detected_at, i.resolved_at, i.namespace, i.created_at, i.updated_at,
           s.resource_type, s.resource_name, s.resource_namespace
    FROM issues i
    JOIN issue_scopes s ON s.id = i.scope_id
    WHERE i.id = $1
"#;

fn row_to_issue(
    row: &tokio_postgres::Row,
    links: Vec<Link>,
    related_to: Vec<RelatedIssue>,
    related_from: Vec<RelatedIssue>,
) -> Issue {
    Issue {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        severity: Severity::parse(row.get("severity")).expect("severity always valid"),
        issue_type: IssueType::parse(row.get("issue_type")).expect("issue_type always valid"),
        state: IssueState::parse(row.get("state")).expect("state always valid"),
        detected_at: row.get("detected_at"),
        resolved_at: row.get("resolved_at"),
        namespace: row.get("namespace"),
        scope: Scope {
            resource_type: row.get("resource_type"),
            resource_name: row.get("resource_name"),
            resource_namespace: row.get("resource_namespace"),
        },
        links,
        related_from,
        related_to,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

async fn fetch_links<C: GenericClient>(
    client: &C,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Link>>, StoreError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = client
        .query(
            "SELECT issue_id, title, url FROM links WHERE issue_id = ANY($1) ORDER BY issue_id, id",
            &[&ids],
        )
        .await
        .map_err(anyhow::Error::from)?;

    let mut map: HashMap<Uuid, Vec<Link>> = HashMap::new();
    for row in rows {
        let issue_id: Uuid = row.get("issue_id");
        map.entry(issue_id).or_default().push(Link {
            title: row.get("title"),
            url: row.get("url"),
        });
    }
    Ok(map)
}

#[allow(clippy::type_complexity)]
async fn fetch_relationships<C: GenericClient>(
    client: &C,
    ids: &[Uuid],
) -> Result<
    (
        HashMap<Uuid, Vec<RelatedIssue>>,
        HashMap<Uuid, Vec<RelatedIssue>>,
    ),
    StoreError,
> {
    if ids.is_empty() {
        return Ok((HashMap::new(), HashMap::new()));
    }

    let to_rows = client
        .query(
            r#"
            SELECT r.source_id AS anchor_id, ri.id, ri.title, ri.severity, ri.issue_type,
                   ri.state, ri.namespace, s.resource_type, s.resource_name, s.resource_namespace
            FROM related_issues r
            JOIN issues ri ON ri.id = r.target_id
            JOIN issue_scopes s ON s.id = ri.scope_id
            WHERE r.source_id = ANY($1)
            "#,
            &[&ids],
        )
        .await
        .map_err(anyhow::Error::from)?;

    let from_rows = client
        .query(
            r#"
            SELECT r.target_id AS anchor_id, ri.id, ri.title, ri.severity, ri.issue_type,
                   ri.state, ri.namespace, s.resource_type, s.resource_name, s.resource_namespace
            FROM related_issues r
            JOIN issues ri ON ri.id = r.source_id
            JOIN issue_scopes s ON s.id = ri.scope_id
            WHERE r.target_id = ANY($1)
            "#,
            &[&ids],
        )
        .await
        .map_err(anyhow::Error::from)?;

    let mut related_to: HashMap<Uuid, Vec<RelatedIssue>> = HashMap::new();
    for row in &to_rows {
        let anchor: Uuid = row.get("anchor_id");
        related_to.entry(anchor).or_default().push(row_to_related(row));
    }

    let mut related_from: HashMap<Uuid, Vec<RelatedIssue>> = HashMap::new();
    for row in &from_rows {
        let anchor: Uuid = row.get("anchor_id");
        related_from
            .entry(anchor)
            .or_default()
            .push(row_to_related(row));
    }

    Ok((related_to, related_from))
}

fn row_to_related(row: &tokio_postgres::Row) -> RelatedIssue {
    RelatedIssue {
        id: row.get("id"),
        title: row.get("title"),
        severity: Severity::parse(row.get("severity")).expect("severity always valid"),
        issue_type: IssueType::parse(row.get("issue_type")).expect("issue_type always valid"),
        state: IssueState::parse(row.get("state")).expect("state always valid"),
        namespace: row.get("namespace"),
        scope: Scope {
            resource_type: row.get("resource_type"),
            resource_name: row.get("resource_name"),
            resource_namespace: row.get("resource_namespace"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(namespace: &str, resource_namespace: &str) -> IssueCandidate {
        IssueCandidate {
            title: "t".into(),
            description: "d".into(),
            severity: Severity::Major,
            issue_type: IssueType::Build,
            state: IssueState::Active,
            namespace: namespace.into(),
            scope: Scope {
                resource_type: "pipelinerun".into(),
                resource_name: "r".into(),
                resource_namespace: resource_namespace.into(),
            },
            links: Vec::new(),
        }
    }

    #[test]
    fn resolved_scope_namespace_falls_back_to_issue_namespace() {
        let c = candidate("team-a", "");
        assert_eq!(resolved_scope_namespace(&c), "team-a");
    }

    #[test]
    fn resolved_scope_namespace_honors_explicit_value() {
        let c = candidate("team-a", "team-b");
        assert_eq!(resolved_scope_namespace(&c), "team-b");
    }
}
