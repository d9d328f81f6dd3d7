//! Port for scorecard publication.

use async_trait::async_trait;

use crate::domain::errors::EngineResult;
use crate::domain::models::scorecard::Scorecard;

/// Persists and announces a batch of scorecards.
///
/// Fire-and-forget from the engine's standpoint: errors propagate, success is
/// not re-verified.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish the batch. With `skip_review` set the reviewable-change step
    /// (e.g. opening a pull request) is skipped.
    async fn publish(
        &self,
        scorecards: Vec<Scorecard>,
        publish_token: &str,
        skip_review: bool,
    ) -> EngineResult<()>;
}
