use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::db;
use crate::resolver::WorkflowExecutor;
use crate::state;
use crate::types::{ExecutionRequest, Resolution};

/// Workflow engine backed by the Postgres workflow store
#[derive(Clone)]
pub struct WorkflowService {
    pool: PgPool,
}

impl WorkflowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a request, computing states relative to `now`
    pub async fn resolve_at(
        &self,
        request: &ExecutionRequest,
        now: DateTime<Utc>,
    ) -> Result<Resolution> {
        let rows = db::workflows::find_workflows(&self.pool, request).await?;
        debug!(
            "Found {} workflows for Pathway={} NHS={} Vers={}",
            rows.len(),
            request.pathway,
            request.nhs_id,
            request.version
        );
        Ok(state::resolution_from_rows(rows, now))
    }
}

#[async_trait]
impl WorkflowExecutor for WorkflowService {
    async fn execute(&self, request: &ExecutionRequest) -> Result<Resolution> {
        self.resolve_at(request, Utc::now()).await
    }
}
