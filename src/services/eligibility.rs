//! Eligibility selection for scoring.
//!
//! A deployment is a scoring candidate once its effective end time is
//! strictly later than the most recent scorecard date plus the buffer
//! period. Pure logic, no side effects.

use chrono::{DateTime, Duration, Utc};

use crate::domain::models::deployment::DeploymentRecord;
use crate::domain::models::scorecard::ScorecardRecord;

/// Most recent scorecard date, if any scorecards exist.
pub fn latest_scorecard_date(scorecards: &[ScorecardRecord]) -> Option<DateTime<Utc>> {
    scorecards.iter().map(|s| s.date).max()
}

/// Select the deployments eligible for scoring this cycle, ordered ascending
/// by effective end time (open records last).
///
/// With no prior scorecard the cutoff is undefined and every deployment is
/// returned; operators are expected to seed a baseline scorecard.
pub fn select_eligible(
    deployments: &[DeploymentRecord],
    scorecards: &[ScorecardRecord],
    buffer: Duration,
) -> Vec<DeploymentRecord> {
    let cutoff = latest_scorecard_date(scorecards).map(|date| date + buffer);

    let mut eligible: Vec<DeploymentRecord> = deployments
        .iter()
        .filter(|d| match cutoff {
            Some(cutoff) => d.effective_end() > cutoff,
            None => true,
        })
        .cloned()
        .collect();

    eligible.sort_by_key(DeploymentRecord::effective_end);
    eligible
}
