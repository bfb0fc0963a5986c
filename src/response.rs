//! Outbound response assembly
//!
//! Every response, success or failure, carries the same server and CORS
//! headers plus a content type chosen by the branch that produced it.

use std::collections::{BTreeMap, HashMap};

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

pub const SERVER_NAME: &str = "XDW_Consumer_Proxy";
pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_HEADERS: &str = "accept, Content-Type";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, OPTIONS";

pub const STATUS_OK: u16 = 200;
pub const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;

/// Inbound request in API-gateway shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyRequest {
    pub http_method: String,
    pub path: String,
    pub query_string_parameters: HashMap<String, String>,
}

/// Outbound response in API-gateway shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type").map(String::as_str)
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

pub fn response_headers(content_type: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Server".to_string(), SERVER_NAME.to_string());
    headers.insert(
        "Access-Control-Allow-Origin".to_string(),
        CORS_ALLOW_ORIGIN.to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        CORS_ALLOW_HEADERS.to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        CORS_ALLOW_METHODS.to_string(),
    );
    headers.insert("Content-Type".to_string(), content_type.to_string());
    headers
}

pub fn query_response(
    status_code: u16,
    body: impl Into<String>,
    content_type: &str,
) -> ProxyResponse {
    let body = body.into();
    info!("{}", body);
    ProxyResponse {
        status_code,
        headers: response_headers(content_type),
        body,
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Dropping invalid response header {}: {}", name, value),
            }
        }

        response
    }
}
