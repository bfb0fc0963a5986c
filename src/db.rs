//! Store access
//!
//! The service only reads. Expected schema:
//!
//! ```sql
//! CREATE TABLE workflows (
//!     id          BIGSERIAL PRIMARY KEY,
//!     pathway     TEXT NOT NULL,
//!     nhs_id      TEXT NOT NULL,
//!     version     INTEGER NOT NULL DEFAULT 0,
//!     xdw_doc     TEXT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE workflow_definitions (
//!     pathway           TEXT PRIMARY KEY,
//!     completion_hours  INTEGER
//! );
//! ```

pub mod workflows;

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

/// Create a new connection pool from configuration
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}
