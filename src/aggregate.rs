//! Per-workflow state aggregation for the `states` operation
//!
//! Every record of the initial match is resolved again on its own key.
//! A key that resolves to one workflow contributes an entry. A key that
//! resolves to several is a duplicate: it is logged and skipped. An engine
//! failure on any key abandons the whole report.

use tracing::{error, warn};

use crate::error::ProxyResult;
use crate::resolver::{resolve, WorkflowExecutor};
use crate::types::{
    AggregateStateReport, Cardinality, Dashboard, ExecutionRequest, WorkflowCollection,
    WorkflowStateEntry,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateOutcome {
    Report(AggregateStateReport),
    /// A re-resolution failed; carries the engine's message
    Aborted(String),
}

impl AggregateOutcome {
    /// Body returned to the caller. An aborted aggregation is reported with
    /// status 200 and the engine message as the body.
    pub fn into_body(self) -> ProxyResult<String> {
        match self {
            AggregateOutcome::Report(report) => Ok(serde_json::to_string_pretty(&report)?),
            AggregateOutcome::Aborted(message) => Ok(message),
        }
    }
}

pub async fn workflow_states(
    executor: &dyn WorkflowExecutor,
    dashboard: &Dashboard,
    workflows: &WorkflowCollection,
) -> AggregateOutcome {
    let mut report = AggregateStateReport {
        dashboard: dashboard.clone(),
        workflow_states: Vec::with_capacity(workflows.count()),
    };

    for record in workflows.records() {
        let request = ExecutionRequest::for_record(record);
        let resolution = match resolve(executor, &request).await {
            Ok(resolution) => resolution,
            Err(err) => {
                error!("{}", err);
                return AggregateOutcome::Aborted(err.to_string());
            }
        };

        match resolution.cardinality() {
            Cardinality::Single => report.workflow_states.push(WorkflowStateEntry {
                workflow: record.pathway.clone(),
                state: resolution.state,
            }),
            Cardinality::Many => warn!(
                "Duplicate workflows found for Workflow={} NHS={} Vers={}, skipping",
                request.pathway, request.nhs_id, request.version
            ),
            Cardinality::None => warn!(
                "No workflow found for Workflow={} NHS={} Vers={}, skipping",
                request.pathway, request.nhs_id, request.version
            ),
        }
    }

    AggregateOutcome::Report(report)
}
