//! Repository port for scorecard record persistence.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::models::scorecard::ScorecardRecord;

/// Access to the scorecard record collection. Append-only from the engine's
/// perspective; the publisher appends, the eligibility selector reads.
#[async_trait]
pub trait ScorecardRepository: Send + Sync {
    /// List every scorecard record.
    async fn list_all(&self) -> EngineResult<Vec<ScorecardRecord>>;

    /// Append a new scorecard record.
    async fn append(&self, record: &ScorecardRecord) -> EngineResult<()>;
}
