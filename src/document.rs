//! XDW workflow document decoding
//!
//! Stored workflows are IHE XDW documents. Only the parts this service
//! reports on are modelled; anything else in the markup is skipped.
//! Field names follow the markup when decoding and Rust naming when the
//! document is re-encoded as JSON.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProxyResult;
use crate::types::WorkflowRecord;

pub const STATUS_COMPLETE: &str = "COMPLETE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XdwWorkflowDocument {
    #[serde(rename(deserialize = "id"))]
    pub id: InstanceId,
    #[serde(rename(deserialize = "effectiveTime"))]
    pub effective_time: TimeValue,
    pub patient: Patient,
    #[serde(rename(deserialize = "workflowInstanceId"))]
    pub workflow_instance_id: String,
    #[serde(rename(deserialize = "workflowDocumentSequenceNumber"))]
    pub workflow_document_sequence_number: String,
    #[serde(rename(deserialize = "workflowStatus"))]
    pub workflow_status: String,
    #[serde(rename(deserialize = "workflowDefinitionReference"))]
    pub workflow_definition_reference: String,
    #[serde(rename(deserialize = "TaskList"))]
    pub task_list: TaskList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceId {
    #[serde(rename(deserialize = "@root"))]
    pub root: String,
    #[serde(rename(deserialize = "@extension"))]
    pub extension: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeValue {
    #[serde(rename(deserialize = "@value"))]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patient {
    pub id: InstanceId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskList {
    #[serde(rename(deserialize = "XDWTask"))]
    pub tasks: Vec<XdwTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XdwTask {
    #[serde(rename(deserialize = "taskData"))]
    pub task_data: TaskData,
    #[serde(rename(deserialize = "taskEventHistory"))]
    pub task_event_history: TaskEventHistory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskData {
    #[serde(rename(deserialize = "taskDetails"))]
    pub task_details: TaskDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDetails {
    pub id: String,
    #[serde(rename(deserialize = "taskType"))]
    pub task_type: String,
    pub name: String,
    pub status: String,
    #[serde(rename(deserialize = "actualOwner"))]
    pub actual_owner: String,
    #[serde(rename(deserialize = "createdTime"))]
    pub created_time: String,
    #[serde(rename(deserialize = "lastModifiedTime"))]
    pub last_modified_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskEventHistory {
    #[serde(rename(deserialize = "taskEvent"))]
    pub task_events: Vec<TaskEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskEvent {
    pub id: String,
    #[serde(rename(deserialize = "eventTime"))]
    pub event_time: String,
    pub identifier: String,
    #[serde(rename(deserialize = "eventType"))]
    pub event_type: String,
    pub status: String,
}

impl XdwWorkflowDocument {
    pub fn parse(xml: &str) -> ProxyResult<Self> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    pub fn is_complete(&self) -> bool {
        self.workflow_status.eq_ignore_ascii_case(STATUS_COMPLETE)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.effective_time.value)
    }

    /// Most recent task event or task modification recorded in the document
    pub fn latest_event_time(&self) -> Option<DateTime<Utc>> {
        self.task_list
            .tasks
            .iter()
            .flat_map(|task| {
                task.task_event_history
                    .task_events
                    .iter()
                    .map(|event| event.event_time.as_str())
                    .chain(std::iter::once(
                        task.task_data.task_details.last_modified_time.as_str(),
                    ))
            })
            .filter_map(parse_timestamp)
            .max()
    }
}

/// Single-match response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub workflow: XdwWorkflowDocument,
}

/// Decode the stored document of a single matched record
pub fn transcode(record: &WorkflowRecord) -> ProxyResult<WorkflowResponse> {
    Ok(WorkflowResponse {
        workflow: XdwWorkflowDocument::parse(&record.xdw_doc)?,
    })
}

/// Accepts RFC 3339 and the HL7 `YYYYMMDDHHMMSS` form (read as UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
