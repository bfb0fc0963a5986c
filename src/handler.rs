//! Request dispatch
//!
//! Interpret parameters, resolve, then answer with one of:
//! - `"0"` when nothing matched
//! - a scalar projection when `op` names one
//! - the state aggregation when `op` is `states`
//! - the decoded document for a single match, or the full collection otherwise

use tracing::info;

use crate::aggregate;
use crate::client::ExecutorProvider;
use crate::document;
use crate::error::ProxyResult;
use crate::params::QueryParams;
use crate::projection::{self, Projection};
use crate::resolver::{resolve, WorkflowExecutor};
use crate::response::{
    query_response, ProxyRequest, ProxyResponse, APPLICATION_JSON, STATUS_INTERNAL_SERVER_ERROR,
    STATUS_OK, TEXT_PLAIN,
};
use crate::types::{Cardinality, Resolution};

/// Obtain the engine, then dispatch. An engine that cannot be built is a
/// plain-text 500.
pub async fn serve_request(
    provider: &dyn ExecutorProvider,
    request: &ProxyRequest,
) -> ProxyResponse {
    match provider.executor().await {
        Ok(executor) => handle_request(executor.as_ref(), request).await,
        Err(err) => query_response(STATUS_INTERNAL_SERVER_ERROR, err.to_string(), TEXT_PLAIN),
    }
}

pub async fn handle_request(
    executor: &dyn WorkflowExecutor,
    request: &ProxyRequest,
) -> ProxyResponse {
    info!(
        "Processing {} request path {}",
        request.http_method, request.path
    );

    let params = QueryParams::interpret(&request.query_string_parameters);

    let resolution = match resolve(executor, &params.request).await {
        Ok(resolution) => resolution,
        Err(err) => {
            return query_response(
                STATUS_INTERNAL_SERVER_ERROR,
                err.to_string(),
                &params.content_type,
            );
        }
    };

    if resolution.cardinality() == Cardinality::None {
        return query_response(STATUS_OK, "0", TEXT_PLAIN);
    }

    if params.has_op() {
        match projection::select(&params.op, &resolution) {
            Projection::Scalar(value) => {
                return query_response(STATUS_OK, value, &params.content_type);
            }
            Projection::States => {
                let outcome = aggregate::workflow_states(
                    executor,
                    &resolution.dashboard,
                    &resolution.workflows,
                )
                .await;
                return json_response(outcome.into_body());
            }
            Projection::Fallthrough => {}
        }
    }

    json_response(aggregate_body(&resolution))
}

/// Full response for a match: the decoded document when there is exactly
/// one workflow, the whole resolution otherwise
fn aggregate_body(resolution: &Resolution) -> ProxyResult<String> {
    match resolution.workflows.first() {
        Some(record) if resolution.cardinality() == Cardinality::Single => {
            let rsp = document::transcode(record)?;
            Ok(serde_json::to_string_pretty(&rsp)?)
        }
        _ => Ok(serde_json::to_string_pretty(resolution)?),
    }
}

fn json_response(body: ProxyResult<String>) -> ProxyResponse {
    match body {
        Ok(body) => query_response(STATUS_OK, body, APPLICATION_JSON),
        Err(err) => query_response(
            STATUS_INTERNAL_SERVER_ERROR,
            err.to_string(),
            APPLICATION_JSON,
        ),
    }
}
