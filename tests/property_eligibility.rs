//! Property tests for the eligibility selector and grouping.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use rollcall::domain::models::{DeploymentRecord, ScorecardRecord};
use rollcall::services::eligibility::{latest_scorecard_date, select_eligible};
use rollcall::services::grouping::group_by_service;

const SERVICES: [&str; 4] = ["arcade", "osob", "helix", "runtime"];
const BUFFER_DAYS: i64 = 2;

fn date(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(offset)
}

fn deployment_strategy() -> impl Strategy<Value = DeploymentRecord> {
    (
        0..SERVICES.len(),
        proptest::option::of(0..40i64),
        proptest::option::of(0..40i64),
    )
        .prop_map(|(service, started, ended)| {
            let mut record = DeploymentRecord::new(SERVICES[service]);
            if let Some(offset) = started {
                record = record.with_started(date(offset));
            }
            if let Some(offset) = ended {
                record = record.with_ended(date(offset));
            }
            record
        })
}

fn scorecard_strategy() -> impl Strategy<Value = ScorecardRecord> {
    (0..SERVICES.len(), 0..40i64)
        .prop_map(|(service, offset)| ScorecardRecord::new(SERVICES[service], date(offset), 10.0))
}

proptest! {
    /// Every record covered by the last scorecard (effective end at or
    /// before the cutoff) is excluded, and every record past the cutoff is
    /// kept.
    #[test]
    fn selection_partitions_on_the_cutoff(
        deployments in proptest::collection::vec(deployment_strategy(), 0..30),
        scorecards in proptest::collection::vec(scorecard_strategy(), 1..10),
    ) {
        let buffer = Duration::days(BUFFER_DAYS);
        let cutoff = latest_scorecard_date(&scorecards).unwrap() + buffer;

        let eligible = select_eligible(&deployments, &scorecards, buffer);
        let selected: std::collections::HashSet<_> = eligible.iter().map(|d| d.id).collect();

        for deployment in &deployments {
            if deployment.effective_end() > cutoff {
                prop_assert!(selected.contains(&deployment.id));
            } else {
                prop_assert!(!selected.contains(&deployment.id));
            }
        }
    }

    /// The selection is ordered ascending by effective end.
    #[test]
    fn selection_is_ordered_by_effective_end(
        deployments in proptest::collection::vec(deployment_strategy(), 0..30),
        scorecards in proptest::collection::vec(scorecard_strategy(), 1..10),
    ) {
        let eligible = select_eligible(&deployments, &scorecards, Duration::days(BUFFER_DAYS));
        for pair in eligible.windows(2) {
            prop_assert!(pair[0].effective_end() <= pair[1].effective_end());
        }
    }

    /// With no scorecards, everything is selected.
    #[test]
    fn empty_scorecards_select_everything(
        deployments in proptest::collection::vec(deployment_strategy(), 0..30),
    ) {
        let eligible = select_eligible(&deployments, &[], Duration::days(BUFFER_DAYS));
        prop_assert_eq!(eligible.len(), deployments.len());
    }

    /// Grouping preserves every record exactly once, and each group is
    /// homogeneous in service.
    #[test]
    fn grouping_is_an_exact_partition(
        deployments in proptest::collection::vec(deployment_strategy(), 0..30),
    ) {
        let groups = group_by_service(deployments.clone());

        let mut grouped_ids: Vec<_> = groups
            .iter()
            .flat_map(|g| g.deployments.iter().map(|d| d.id))
            .collect();
        grouped_ids.sort();
        let mut expected: Vec<_> = deployments.iter().map(|d| d.id).collect();
        expected.sort();
        prop_assert_eq!(grouped_ids, expected);

        for group in &groups {
            prop_assert!(group.deployments.iter().all(|d| d.service == group.service));
        }
    }
}
