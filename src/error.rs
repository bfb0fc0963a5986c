//! Error types for the query proxy
//!
//! Every variant is fatal to the request it occurs in and is reported as a
//! 500 whose body is the rendered message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    /// The store connection could not be built
    #[error("{0}")]
    ConnectionInit(String),

    /// The workflow engine failed for the top-level request. Rendered verbatim.
    #[error("{0}")]
    Execution(String),

    /// A stored workflow document is not well-formed
    #[error("Failed to decode workflow document: {0}")]
    Document(#[from] quick_xml::DeError),

    /// A response body could not be encoded
    #[error("Failed to encode response: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProxyError {
    pub fn execution(err: &anyhow::Error) -> Self {
        ProxyError::Execution(err.to_string())
    }

    pub fn connection_init(err: &anyhow::Error) -> Self {
        ProxyError::ConnectionInit(format!("{:#}", err))
    }
}

impl From<config::ConfigError> for ProxyError {
    fn from(err: config::ConfigError) -> Self {
        ProxyError::Config(err.to_string())
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
