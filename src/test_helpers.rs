//! Test helpers: an in-memory workflow engine and XDW document fixtures

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::client::ExecutorProvider;
use crate::error::{ProxyError, ProxyResult};
use crate::resolver::WorkflowExecutor;
use crate::types::{
    Dashboard, ExecutionRequest, Resolution, WorkflowCollection, WorkflowRecord, WorkflowState,
};

type Key = (String, String, i32);

/// In-memory engine that matches records the same way the Postgres engine does
#[derive(Default)]
pub struct StubExecutor {
    records: Vec<WorkflowRecord>,
    states: HashMap<Key, WorkflowState>,
    failures: HashMap<Key, String>,
    failure: Option<String>,
    calls: Mutex<Vec<ExecutionRequest>>,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, records: Vec<WorkflowRecord>) -> Self {
        self.records.extend(records);
        self
    }

    /// State reported when the given record is the representative match
    pub fn with_state(
        mut self,
        pathway: &str,
        nhs: &str,
        version: i32,
        state: WorkflowState,
    ) -> Self {
        self.states.insert(key(pathway, nhs, version), state);
        self
    }

    /// Fail every request
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Fail requests for exactly this key
    pub fn failing_for(mut self, pathway: &str, nhs: &str, version: i32, message: &str) -> Self {
        self.failures
            .insert(key(pathway, nhs, version), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ExecutionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn matches(request: &ExecutionRequest, record: &WorkflowRecord) -> bool {
        (request.pathway.is_empty() || request.pathway == record.pathway)
            && (request.nhs_id.is_empty() || request.nhs_id == record.nhs_id)
            && (request.is_unversioned() || request.version == record.version)
    }
}

#[async_trait]
impl WorkflowExecutor for StubExecutor {
    async fn execute(&self, request: &ExecutionRequest) -> Result<Resolution> {
        self.calls.lock().unwrap().push(request.clone());

        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }
        let request_key = key(&request.pathway, &request.nhs_id, request.version);
        if let Some(message) = self.failures.get(&request_key) {
            return Err(anyhow!(message.clone()));
        }

        let matched: Vec<WorkflowRecord> = self
            .records
            .iter()
            .filter(|record| Self::matches(request, record))
            .cloned()
            .collect();

        let state = matched
            .last()
            .and_then(|record| {
                self.states
                    .get(&key(&record.pathway, &record.nhs_id, record.version))
                    .cloned()
            })
            .unwrap_or_default();

        let dashboard = Dashboard {
            total: matched.len(),
            in_progress: matched.len(),
            ..Default::default()
        };

        Ok(Resolution {
            workflows: WorkflowCollection::new(matched),
            state,
            dashboard,
        })
    }
}

/// Provider whose engine can never be built
pub struct UnavailableProvider(pub String);

#[async_trait]
impl ExecutorProvider for UnavailableProvider {
    async fn executor(&self) -> ProxyResult<Arc<dyn WorkflowExecutor>> {
        Err(ProxyError::ConnectionInit(self.0.clone()))
    }
}

fn key(pathway: &str, nhs: &str, version: i32) -> Key {
    (pathway.to_string(), nhs.to_string(), version)
}

pub fn record(pathway: &str, nhs: &str, version: i32) -> WorkflowRecord {
    WorkflowRecord {
        pathway: pathway.to_string(),
        nhs_id: nhs.to_string(),
        version,
        xdw_doc: xdw_document(pathway, nhs, "OPEN"),
    }
}

pub fn state(status: &str) -> WorkflowState {
    WorkflowState {
        status: status.to_string(),
        pretty_duration: "3 days 7 hrs 30 mins".to_string(),
        is_overdue: true,
        created: "2024-03-01T09:00:00Z".to_string(),
        complete_by: "2024-03-03T09:00:00+00:00".to_string(),
        latest_event_time: Utc.with_ymd_and_hms(2024, 3, 4, 16, 30, 0).unwrap(),
    }
}

/// Two-task XDW document; the newest event is 2024-03-04 16:30 UTC
pub fn xdw_document(pathway: &str, nhs: &str, status: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<XDW.WorkflowDocument xmlns="urn:ihe:iti:xdw:2011">
  <id root="1.2.3.4.{pathway}"/>
  <effectiveTime value="2024-03-01T09:00:00Z"/>
  <confidentialityCode code="N"/>
  <patient>
    <id root="2.16.840.1.113883.2.1.4.1" extension="{nhs}"/>
  </patient>
  <workflowInstanceId>{pathway}^^^^urn:ihe:iti:xdw:2013:workflowInstanceId</workflowInstanceId>
  <workflowDocumentSequenceNumber>3</workflowDocumentSequenceNumber>
  <workflowStatus>{status}</workflowStatus>
  <workflowDefinitionReference>urn:oid:{pathway}</workflowDefinitionReference>
  <TaskList>
    <XDWTask>
      <taskData>
        <taskDetails>
          <id>1</id>
          <taskType>Referral</taskType>
          <name>Referral</name>
          <status>COMPLETED</status>
          <actualOwner>Dr Gray</actualOwner>
          <createdTime>2024-03-01T09:00:00Z</createdTime>
          <lastModifiedTime>2024-03-02T10:00:00Z</lastModifiedTime>
        </taskDetails>
      </taskData>
      <taskEventHistory>
        <taskEvent>
          <id>1</id>
          <eventTime>2024-03-01T09:00:00Z</eventTime>
          <identifier>ev-1</identifier>
          <eventType>CREATE</eventType>
          <status>CREATED</status>
        </taskEvent>
        <taskEvent>
          <id>2</id>
          <eventTime>2024-03-02T10:00:00Z</eventTime>
          <identifier>ev-2</identifier>
          <eventType>COMPLETE</eventType>
          <status>COMPLETED</status>
        </taskEvent>
      </taskEventHistory>
    </XDWTask>
    <XDWTask>
      <taskData>
        <taskDetails>
          <id>2</id>
          <taskType>Triage</taskType>
          <name>Triage</name>
          <status>IN_PROGRESS</status>
          <actualOwner>Nurse Pike</actualOwner>
          <createdTime>2024-03-02T10:00:00Z</createdTime>
          <lastModifiedTime>2024-03-03T12:00:00Z</lastModifiedTime>
        </taskDetails>
      </taskData>
      <taskEventHistory>
        <taskEvent>
          <id>3</id>
          <eventTime>20240304163000</eventTime>
          <identifier>ev-3</identifier>
          <eventType>START</eventType>
          <status>IN_PROGRESS</status>
        </taskEvent>
      </taskEventHistory>
    </XDWTask>
  </TaskList>
</XDW.WorkflowDocument>
"#
    )
}
