//! Repository port for deployment record persistence.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::models::deployment::DeploymentRecord;

/// Read/write access to the deployment record collection.
///
/// `list_all` must return the entire collection; adapters page through the
/// backing store internally. The engine never deletes records.
#[async_trait]
pub trait DeploymentRepository: Send + Sync {
    /// List every deployment record.
    async fn list_all(&self) -> EngineResult<Vec<DeploymentRecord>>;

    /// Replace an existing record by id.
    async fn replace(&self, record: &DeploymentRecord) -> EngineResult<()>;

    /// Insert a new record. Used by the deployment system and test fixtures.
    async fn insert(&self, record: &DeploymentRecord) -> EngineResult<()>;
}
