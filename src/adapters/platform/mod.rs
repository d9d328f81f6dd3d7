//! Deployment platform adapters: telemetry-backed scoring and publication.

pub mod publisher;
pub mod scorer;

pub use publisher::{render_summary, ScorecardUploader};
pub use scorer::{compute_points, PlatformScorer, RolloutTelemetry};
