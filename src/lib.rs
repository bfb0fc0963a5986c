pub mod aggregate;
pub mod application;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod document;
pub mod error;
pub mod handler;
pub mod params;
pub mod projection;
pub mod resolver;
pub mod response;
pub mod server;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_helpers;

// Re-export main types
pub use types::*;

// Re-export the request entry points for convenience
pub use client::{Client, ExecutorProvider};
pub use error::{ProxyError, ProxyResult};
pub use handler::{handle_request, serve_request};
pub use resolver::WorkflowExecutor;
pub use response::{ProxyRequest, ProxyResponse};
