//! Execution resolution
//!
//! The workflow engine sits behind [`WorkflowExecutor`]. Callers hand it an
//! [`ExecutionRequest`] and branch on the cardinality of what comes back.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::error::{ProxyError, ProxyResult};
use crate::types::{ExecutionRequest, Resolution};

/// Turns a lookup request into matching workflow records and their computed state
#[async_trait]
pub trait WorkflowExecutor: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<Resolution>;
}

#[async_trait]
impl<T: WorkflowExecutor + ?Sized> WorkflowExecutor for Arc<T> {
    async fn execute(&self, request: &ExecutionRequest) -> Result<Resolution> {
        (**self).execute(request).await
    }
}

/// Run one request through the engine. Failures are not retried.
pub async fn resolve(
    executor: &dyn WorkflowExecutor,
    request: &ExecutionRequest,
) -> ProxyResult<Resolution> {
    let resolution = executor
        .execute(request)
        .await
        .map_err(|err| ProxyError::execution(&err))?;

    debug!(
        actor = request.actor.as_str(),
        pathway = %request.pathway,
        nhs = %request.nhs_id,
        version = request.version,
        count = resolution.workflows.count(),
        "Resolved workflows"
    );

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{record, StubExecutor};
    use crate::types::Cardinality;

    #[tokio::test]
    async fn test_resolve_classifies_cardinality() {
        let executor = StubExecutor::new()
            .with_records(vec![record("cardiology", "111", 0)])
            .with_records(vec![
                record("oncology", "222", 0),
                record("oncology", "222", 1),
            ]);

        let none = resolve(&executor, &ExecutionRequest::new("dermatology", "333", -1))
            .await
            .unwrap();
        assert_eq!(none.cardinality(), Cardinality::None);

        let single = resolve(&executor, &ExecutionRequest::new("cardiology", "111", -1))
            .await
            .unwrap();
        assert_eq!(single.cardinality(), Cardinality::Single);

        let many = resolve(&executor, &ExecutionRequest::new("oncology", "222", -1))
            .await
            .unwrap();
        assert_eq!(many.cardinality(), Cardinality::Many);
        assert_eq!(many.workflows.count(), 2);
    }

    #[tokio::test]
    async fn test_resolve_surfaces_engine_message() {
        let executor = StubExecutor::new().failing("database is locked");

        let err = resolve(&executor, &ExecutionRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Execution(_)));
        assert_eq!(err.to_string(), "database is locked");
    }
}
