//! Workflow state computed from stored XDW documents

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::db::workflows::WorkflowRow;
use crate::document::XdwWorkflowDocument;
use crate::types::{Dashboard, Resolution, WorkflowCollection, WorkflowState};

pub fn compute_state(
    doc: &XdwWorkflowDocument,
    created_at: DateTime<Utc>,
    completion_hours: Option<i32>,
    now: DateTime<Utc>,
) -> WorkflowState {
    let created = doc.created().unwrap_or(created_at);
    let latest = doc
        .latest_event_time()
        .map_or(created, |event| event.max(created));
    let deadline = completion_hours.map(|hours| created + Duration::hours(i64::from(hours)));
    let complete = doc.is_complete();
    let end = if complete { latest } else { now };

    WorkflowState {
        status: doc.workflow_status.clone(),
        pretty_duration: pretty_duration(end - created),
        is_overdue: deadline.is_some_and(|deadline| !complete && now > deadline),
        created: if doc.effective_time.value.is_empty() {
            created.to_rfc3339()
        } else {
            doc.effective_time.value.clone()
        },
        complete_by: deadline.map(|d| d.to_rfc3339()).unwrap_or_default(),
        latest_event_time: latest,
    }
}

/// "3 days 7 hrs 30 mins", dropping leading zero units
pub fn pretty_duration(duration: Duration) -> String {
    let total_mins = duration.num_minutes().max(0);
    let days = total_mins / (24 * 60);
    let hrs = (total_mins % (24 * 60)) / 60;
    let mins = total_mins % 60;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{} days", days));
    }
    if days > 0 || hrs > 0 {
        parts.push(format!("{} hrs", hrs));
    }
    parts.push(format!("{} mins", mins));
    parts.join(" ")
}

pub fn dashboard(states: &[WorkflowState]) -> Dashboard {
    let complete = states
        .iter()
        .filter(|s| s.status.eq_ignore_ascii_case(crate::document::STATUS_COMPLETE))
        .count();

    Dashboard {
        total: states.len(),
        in_progress: states.len() - complete,
        complete,
        overdue: states.iter().filter(|s| s.is_overdue).count(),
    }
}

/// Build the engine's answer for a set of matched rows. The representative
/// state is that of the last row in collection order.
pub fn resolution_from_rows(rows: Vec<WorkflowRow>, now: DateTime<Utc>) -> Resolution {
    let states: Vec<WorkflowState> = rows
        .iter()
        .map(|row| {
            let doc = XdwWorkflowDocument::parse(&row.record.xdw_doc).unwrap_or_else(|err| {
                warn!(
                    "Unreadable XDW document for Workflow={} NHS={} Vers={}: {}",
                    row.record.pathway, row.record.nhs_id, row.record.version, err
                );
                XdwWorkflowDocument::default()
            });
            compute_state(&doc, row.created_at, row.completion_hours, now)
        })
        .collect();

    Resolution {
        dashboard: dashboard(&states),
        state: states.last().cloned().unwrap_or_default(),
        workflows: WorkflowCollection::new(rows.into_iter().map(|row| row.record).collect()),
    }
}
