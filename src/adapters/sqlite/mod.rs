//! SQLite adapters for the two record collections.

pub mod connection;
pub mod deployment_repository;
pub mod migrations;
pub mod scorecard_repository;

pub use connection::{create_pool, ConnectionError};
pub use deployment_repository::SqliteDeploymentRepository;
pub use migrations::{Migrator, MigrationError};
pub use scorecard_repository::SqliteScorecardRepository;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{EngineError, EngineResult};

/// Rows fetched per page in `list_all` queries.
pub(crate) const PAGE_SIZE: i64 = 500;

pub(crate) fn parse_uuid(s: &str) -> EngineResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| EngineError::Store(format!("invalid uuid '{}': {}", s, e)))
}

pub(crate) fn parse_datetime(s: &str) -> EngineResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EngineError::Store(format!("invalid timestamp '{}': {}", s, e)))
}

pub(crate) fn parse_optional_datetime(s: Option<String>) -> EngineResult<Option<DateTime<Utc>>> {
    s.map(|s| parse_datetime(&s)).transpose()
}

/// Open the database and bring the schema up to date.
pub async fn initialize_database(
    path: &str,
    max_connections: u32,
) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = create_pool(path, max_connections).await?;
    Migrator::new(pool.clone()).run().await?;
    Ok(pool)
}
