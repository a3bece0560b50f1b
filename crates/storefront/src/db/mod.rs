//! Database operations for storefront `PostgreSQL`.
//!
//! Stores local data only (the commerce backend is source of truth for
//! products and carts):
//!
//! ## Tables
//!
//! - `contact_submissions` - Inbound contact form messages
//! - `newsletter_subscribers` - Newsletter emails (unique)
//! - `rate_limit_attempts` - Append-only per-IP attempt log
//! - `sessions` - Tower-sessions storage (cart key + persisted cart snapshot)
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run at startup.

pub mod forms;
pub mod rate_limit;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use forms::{FormsRepository, SubscribeOutcome};
pub use rate_limit::RateLimitRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
