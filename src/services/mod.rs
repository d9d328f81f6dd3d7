//! The scoring engine: eligibility, normalization, grouping, driving, and
//! the cycle orchestrator.

pub mod cycle;
pub mod eligibility;
pub mod grouping;
pub mod normalizer;
pub mod scoring_driver;

pub use cycle::{CycleDecision, CycleReport, ScoringCycle};
pub use grouping::{group_by_service, RolloutGroup};
pub use normalizer::{CompletionNormalizer, Decision};
pub use scoring_driver::{scored_batch, GroupOutcome, ScoringDriver};
