//! Workflow record queries

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::types::{ExecutionRequest, WorkflowRecord};

/// A stored workflow plus the columns the engine needs to compute its state
#[derive(Debug, Clone)]
pub struct WorkflowRow {
    pub record: WorkflowRecord,
    pub created_at: DateTime<Utc>,
    /// Target completion time from the pathway definition, if one exists
    pub completion_hours: Option<i32>,
}

/// Find workflows matching a request
///
/// Empty pathway or NHS id and an unversioned request do not filter.
pub async fn find_workflows<'e, E>(
    executor: E,
    request: &ExecutionRequest,
) -> Result<Vec<WorkflowRow>>
where
    E: sqlx::Executor<'e, Database = sqlx::Postgres>,
{
    let rows = sqlx::query(
        r#"
        SELECT w.pathway, w.nhs_id, w.version, w.xdw_doc, w.created_at, d.completion_hours
        FROM workflows w
        LEFT JOIN workflow_definitions d ON d.pathway = w.pathway
        WHERE ($1 = '' OR w.pathway = $1)
          AND ($2 = '' OR w.nhs_id = $2)
          AND ($3 OR w.version = $4)
        ORDER BY w.pathway, w.nhs_id, w.version, w.id
        "#,
    )
    .bind(&request.pathway)
    .bind(&request.nhs_id)
    .bind(request.is_unversioned())
    .bind(request.version)
    .fetch_all(executor)
    .await
    .context("Failed to query workflows")?;

    let mut workflows = Vec::with_capacity(rows.len());
    for row in rows {
        workflows.push(WorkflowRow {
            record: WorkflowRecord {
                pathway: row.get("pathway"),
                nhs_id: row.get("nhs_id"),
                version: row.get("version"),
                xdw_doc: row.get("xdw_doc"),
            },
            created_at: row.get("created_at"),
            completion_hours: row.get("completion_hours"),
        });
    }

    Ok(workflows)
}
