use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version sentinel meaning "no version filter"
pub const LATEST_VERSION: i32 = -1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Actor {
    #[serde(rename = "XDW_Content_Consumer")]
    ContentConsumer,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::ContentConsumer => "XDW_Content_Consumer",
        }
    }
}

/// A single lookup against the workflow engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub actor: Actor,
    pub pathway: String,
    pub nhs_id: String,
    pub version: i32,
}

impl ExecutionRequest {
    pub fn new(pathway: impl Into<String>, nhs_id: impl Into<String>, version: i32) -> Self {
        Self {
            actor: Actor::ContentConsumer,
            pathway: pathway.into(),
            nhs_id: nhs_id.into(),
            version,
        }
    }

    /// Request that re-resolves exactly the key of a stored record
    pub fn for_record(record: &WorkflowRecord) -> Self {
        Self::new(record.pathway.clone(), record.nhs_id.clone(), record.version)
    }

    /// True when the request carries no version constraint
    pub fn is_unversioned(&self) -> bool {
        self.version == LATEST_VERSION
    }
}

impl Default for ExecutionRequest {
    fn default() -> Self {
        Self::new("", "", LATEST_VERSION)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub pathway: String,
    pub nhs_id: String,
    pub version: i32,
    pub xdw_doc: String,
}

/// How many records a lookup matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    None,
    Single,
    Many,
}

/// Ordered records returned by one lookup. `count` always equals the number of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowCollection {
    count: usize,
    workflows: Vec<WorkflowRecord>,
}

impl WorkflowCollection {
    pub fn new(workflows: Vec<WorkflowRecord>) -> Self {
        Self {
            count: workflows.len(),
            workflows,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn records(&self) -> &[WorkflowRecord] {
        &self.workflows
    }

    pub fn first(&self) -> Option<&WorkflowRecord> {
        self.workflows.first()
    }

    pub fn cardinality(&self) -> Cardinality {
        match self.count {
            0 => Cardinality::None,
            1 => Cardinality::Single,
            _ => Cardinality::Many,
        }
    }
}

impl From<Vec<WorkflowRecord>> for WorkflowCollection {
    fn from(workflows: Vec<WorkflowRecord>) -> Self {
        Self::new(workflows)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub status: String,
    pub pretty_duration: String,
    pub is_overdue: bool,
    pub created: String,
    pub complete_by: String,
    pub latest_event_time: DateTime<Utc>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            status: String::new(),
            pretty_duration: String::new(),
            is_overdue: false,
            created: String::new(),
            complete_by: String::new(),
            latest_event_time: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// Summary counters over the records a lookup matched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total: usize,
    pub in_progress: usize,
    pub complete: usize,
    pub overdue: usize,
}

/// Everything the workflow engine returns for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub workflows: WorkflowCollection,
    pub state: WorkflowState,
    pub dashboard: Dashboard,
}

impl Resolution {
    pub fn cardinality(&self) -> Cardinality {
        self.workflows.cardinality()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStateEntry {
    pub workflow: String,
    pub state: WorkflowState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStateReport {
    pub dashboard: Dashboard,
    pub workflow_states: Vec<WorkflowStateEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: i32) -> WorkflowRecord {
        WorkflowRecord {
            pathway: "ophthalmology".to_string(),
            nhs_id: "9999999468".to_string(),
            version,
            xdw_doc: String::new(),
        }
    }

    #[test]
    fn test_collection_count_tracks_records() {
        let empty = WorkflowCollection::default();
        assert_eq!(empty.count(), 0);
        assert_eq!(empty.cardinality(), Cardinality::None);

        let single = WorkflowCollection::new(vec![record(0)]);
        assert_eq!(single.count(), 1);
        assert_eq!(single.cardinality(), Cardinality::Single);

        let many: WorkflowCollection = vec![record(0), record(1), record(2)].into();
        assert_eq!(many.count(), 3);
        assert_eq!(many.records().len(), 3);
        assert_eq!(many.cardinality(), Cardinality::Many);
    }

    #[test]
    fn test_request_for_record_uses_consumer_actor() {
        let request = ExecutionRequest::for_record(&record(4));
        assert_eq!(request.actor, Actor::ContentConsumer);
        assert_eq!(request.actor.as_str(), "XDW_Content_Consumer");
        assert_eq!(request.pathway, "ophthalmology");
        assert_eq!(request.nhs_id, "9999999468");
        assert_eq!(request.version, 4);
    }

    #[test]
    fn test_default_request_is_unversioned() {
        assert_eq!(ExecutionRequest::default().version, LATEST_VERSION);
        assert!(ExecutionRequest::default().is_unversioned());
        assert!(!ExecutionRequest::new("", "", 0).is_unversioned());
    }
}
