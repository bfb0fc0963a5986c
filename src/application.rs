//! Stateless initialization for the query proxy
//!
//! Builds an Application with its store connection and workflow engine. The
//! client module is responsible for storing the singleton.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::services::WorkflowService;

/// The proxy application instance with all services
pub struct Application {
    pub config: Config,
    pub pool: PgPool,
    pub workflow_service: Arc<WorkflowService>,
}

impl Application {
    /// Create a new Application instance (pure instantiation, no I/O)
    pub fn new(config: Config, pool: PgPool) -> Self {
        Self {
            config,
            pool: pool.clone(),
            workflow_service: Arc::new(WorkflowService::new(pool)),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Options for initializing the proxy
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Database URL (overrides config file and env vars)
    pub database_url: Option<String>,

    /// Config file path (overrides default search)
    pub config_path: Option<PathBuf>,
}

/// Load configuration, connect, and return an Application instance
///
/// Thin wrapper for direct usage (without the Client singleton).
pub async fn initialize(options: InitOptions) -> Result<Application> {
    let config = Config::builder()
        .database_url(options.database_url)
        .config_path(options.config_path)
        .build()
        .context("Failed to load configuration")?;

    let pool = db::create_pool(&config.database).await?;
    info!("Connected to workflow store");

    Ok(Application::new(config, pool))
}
