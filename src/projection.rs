//! Scalar projections over a resolved workflow
//!
//! Each recognised operation keyword maps to a pure extractor over the
//! [`Resolution`]. `states` is not a scalar and is handed back to the caller
//! so it can run the state aggregation; any other keyword falls through to
//! the full aggregate response.

use crate::types::Resolution;

pub const OP_STATES: &str = "states";

type Extractor = fn(&Resolution) -> String;

const SCALAR_PROJECTIONS: &[(&str, Extractor)] = &[
    ("status", status),
    ("duration", duration),
    ("isoverdue", is_overdue),
    ("created", created),
    ("completeby", complete_by),
    ("updated", updated),
    ("count", count),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Scalar(String),
    States,
    Fallthrough,
}

pub fn select(op: &str, resolution: &Resolution) -> Projection {
    if op == OP_STATES {
        return Projection::States;
    }
    SCALAR_PROJECTIONS
        .iter()
        .find(|(keyword, _)| *keyword == op)
        .map(|(_, extract)| Projection::Scalar(extract(resolution)))
        .unwrap_or(Projection::Fallthrough)
}

fn status(resolution: &Resolution) -> String {
    resolution.state.status.clone()
}

fn duration(resolution: &Resolution) -> String {
    resolution.state.pretty_duration.clone()
}

fn is_overdue(resolution: &Resolution) -> String {
    resolution.state.is_overdue.to_string()
}

fn created(resolution: &Resolution) -> String {
    resolution.state.created.clone()
}

fn complete_by(resolution: &Resolution) -> String {
    resolution.state.complete_by.clone()
}

fn updated(resolution: &Resolution) -> String {
    resolution.state.latest_event_time.to_string()
}

fn count(resolution: &Resolution) -> String {
    resolution.workflows.count().to_string()
}
