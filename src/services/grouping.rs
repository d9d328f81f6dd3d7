//! Grouping of eligible deployments by service.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::models::deployment::DeploymentRecord;

/// All eligible deployments of one service, in eligibility-scan order.
#[derive(Debug, Clone)]
pub struct RolloutGroup {
    pub service: String,
    pub deployments: Vec<DeploymentRecord>,
}

impl RolloutGroup {
    /// Start marker for the group's rollout: the `started` value of the
    /// first member in scan order. Deliberately not the chronological
    /// minimum; downstream scoring is keyed to this value.
    pub fn rollout_start(&self) -> Option<DateTime<Utc>> {
        self.deployments.first().and_then(|d| d.started)
    }
}

/// Partition the eligible set by service. Groups appear in first-seen order;
/// members keep their scan order. Every input record lands in exactly one
/// group.
pub fn group_by_service(eligible: Vec<DeploymentRecord>) -> Vec<RolloutGroup> {
    let mut groups: Vec<RolloutGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for deployment in eligible {
        match index.get(&deployment.service) {
            Some(&i) => groups[i].deployments.push(deployment),
            None => {
                index.insert(deployment.service.clone(), groups.len());
                groups.push(RolloutGroup {
                    service: deployment.service.clone(),
                    deployments: vec![deployment],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, n, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_partitions_without_drops_or_duplicates() {
        let eligible = vec![
            DeploymentRecord::new("arcade").with_ended(day(1)),
            DeploymentRecord::new("osob").with_ended(day(2)),
            DeploymentRecord::new("arcade").with_ended(day(3)),
        ];
        let ids: Vec<_> = eligible.iter().map(|d| d.id).collect();

        let groups = group_by_service(eligible);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].service, "arcade");
        assert_eq!(groups[1].service, "osob");

        let mut grouped_ids: Vec<_> = groups
            .iter()
            .flat_map(|g| g.deployments.iter().map(|d| d.id))
            .collect();
        grouped_ids.sort();
        let mut expected = ids;
        expected.sort();
        assert_eq!(grouped_ids, expected);
    }

    #[test]
    fn test_rollout_start_is_first_member_in_scan_order() {
        // The second member started earlier, but the marker comes from the
        // first member encountered during the eligibility scan.
        let eligible = vec![
            DeploymentRecord::new("arcade")
                .with_started(day(10))
                .with_ended(day(11)),
            DeploymentRecord::new("arcade")
                .with_started(day(2))
                .with_ended(day(12)),
        ];

        let groups = group_by_service(eligible);
        assert_eq!(groups[0].rollout_start(), Some(day(10)));
    }

    #[test]
    fn test_rollout_start_absent_when_first_member_never_started() {
        let eligible = vec![
            DeploymentRecord::new("arcade").with_ended(day(11)),
            DeploymentRecord::new("arcade")
                .with_started(day(2))
                .with_ended(day(12)),
        ];

        let groups = group_by_service(eligible);
        assert_eq!(groups[0].rollout_start(), None);
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(group_by_service(vec![]).is_empty());
    }
}
