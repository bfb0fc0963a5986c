//! Query parameter interpretation
//!
//! Turns the raw query-string map into an [`ExecutionRequest`] plus the
//! operation selector and the content type used for scalar responses.
//! Nothing here fails: unknown keys are ignored and a version that is not a
//! number is read as zero.

use std::collections::HashMap;

use tracing::debug;

use crate::response::TEXT_PLAIN;
use crate::types::ExecutionRequest;

pub const PARAM_VERSION: &str = "version";
pub const PARAM_PATHWAY: &str = "pathway";
pub const PARAM_NHS: &str = "nhs";
pub const PARAM_OP: &str = "op";
pub const PARAM_FORMAT: &str = "format";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub request: ExecutionRequest,
    /// Empty when no scalar operation was asked for
    pub op: String,
    pub content_type: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            request: ExecutionRequest::default(),
            op: String::new(),
            content_type: TEXT_PLAIN.to_string(),
        }
    }
}

impl QueryParams {
    pub fn interpret(params: &HashMap<String, String>) -> Self {
        let mut query = QueryParams::default();

        for (key, value) in params {
            debug!("    {}: {}", key, value);
            match key.as_str() {
                PARAM_VERSION => {
                    if !value.is_empty() {
                        query.request.version = parse_version(value);
                    }
                }
                PARAM_PATHWAY => query.request.pathway = value.clone(),
                PARAM_NHS => query.request.nhs_id = value.clone(),
                PARAM_OP => query.op = value.clone(),
                PARAM_FORMAT => query.content_type = value.clone(),
                _ => {}
            }
        }

        query
    }

    pub fn has_op(&self) -> bool {
        !self.op.is_empty()
    }
}

fn parse_version(value: &str) -> i32 {
    value.parse().unwrap_or(0)
}
