//! Client - lazily initialized service handle
//!
//! This is the ONLY stateful module in the crate. It holds the global
//! Application singleton, built on first use and reused afterwards.

use std::sync::{Arc, OnceLock};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::application::{self, Application, InitOptions};
use crate::error::{ProxyError, ProxyResult};
use crate::resolver::WorkflowExecutor;

/// Global application instance (ONLY place with static state)
static APP: OnceLock<Application> = OnceLock::new();

/// Lock to prevent concurrent initialization
static INIT_LOCK: Mutex<()> = Mutex::const_new(());

/// Source of the workflow engine a request runs against
#[async_trait]
pub trait ExecutorProvider: Send + Sync {
    async fn executor(&self) -> ProxyResult<Arc<dyn WorkflowExecutor>>;
}

/// A ready engine needs no initialization
#[async_trait]
impl<T: WorkflowExecutor + 'static> ExecutorProvider for Arc<T> {
    async fn executor(&self) -> ProxyResult<Arc<dyn WorkflowExecutor>> {
        Ok(self.clone())
    }
}

pub struct Client;

impl Client {
    /// Initialize the services (idempotent)
    ///
    /// Thread-safe: concurrent callers wait on the lock and the first one
    /// builds the Application. A failure stores nothing, so a later call
    /// tries again.
    pub async fn initialize(options: InitOptions) -> Result<()> {
        let _guard = INIT_LOCK.lock().await;

        if APP.get().is_some() {
            return Ok(());
        }

        let app = application::initialize(options).await?;

        APP.set(app)
            .map_err(|_| anyhow!("Application already initialized"))?;
        info!("Services initialized");

        Ok(())
    }

    pub fn is_initialized() -> bool {
        APP.get().is_some()
    }

    /// The Application, initialized from the environment on first use
    pub async fn app() -> ProxyResult<&'static Application> {
        if let Some(app) = APP.get() {
            return Ok(app);
        }

        if let Err(err) = Self::initialize(InitOptions::default()).await {
            error!("Failed to initialize services: {:#}", err);
            return Err(ProxyError::connection_init(&err));
        }

        Self::get_app().map_err(|err| ProxyError::connection_init(&err))
    }

    fn get_app() -> Result<&'static Application> {
        APP.get()
            .ok_or_else(|| anyhow!("Client not initialized. Call Client::initialize() first."))
    }
}

#[async_trait]
impl ExecutorProvider for Client {
    async fn executor(&self) -> ProxyResult<Arc<dyn WorkflowExecutor>> {
        let app = Self::app().await?;
        Ok(app.workflow_service.clone())
    }
}
