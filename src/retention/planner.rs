//! Deletion planning: grouping, ranking, cutoff and minor patch exceptions

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::retention::group::group_by_version;
use crate::retention::minor::{latest_minor, minor_patch_exceptions};
use crate::retention::select::{rank_groups, select_for_deletion};
use crate::retention::types::{OrderBy, PackageRecord, RetentionPolicy, VersionGroup};

/// Inconsistency in a retention policy that does not prevent planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyWarning {
    /// Minor patch exceptions requested with time ordering; upload time does
    /// not follow minor release lines
    MinorPatchesWithTimeOrder,
}

impl std::fmt::Display for PolicyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyWarning::MinorPatchesWithTimeOrder => write!(
                f,
                "keep_last_minor_patches should only be used with order_by: version"
            ),
        }
    }
}

/// Result of applying a retention policy to a package inventory
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeletionPlan {
    /// Every detected version, lowest-ranked first
    pub all_versions: Vec<VersionGroup>,
    /// Versions selected by the keep-last-N cutoff
    pub to_delete: BTreeSet<String>,
    /// Members of `to_delete` that are kept as the newest patch of their minor line
    pub exceptions: BTreeSet<String>,
    /// Versions that survive: not in `to_delete`, or in `exceptions`
    pub to_keep: BTreeSet<String>,
    pub warnings: Vec<PolicyWarning>,
}

impl DeletionPlan {
    /// Returns true if packages of this version must be deleted
    pub fn should_delete(&self, version: &str) -> bool {
        self.to_delete.contains(version) && !self.exceptions.contains(version)
    }

    /// Returns true if this version is only kept as a minor patch exception
    pub fn is_exception(&self, version: &str) -> bool {
        self.exceptions.contains(version)
    }

    /// Versions whose packages are actually deleted, lowest-ranked first
    pub fn effective_deletions(&self) -> impl Iterator<Item = &VersionGroup> {
        self.all_versions
            .iter()
            .filter(|group| self.should_delete(&group.version))
    }

    /// Selects the packages of `records` that must be deleted
    pub fn records_to_delete<'a>(
        &'a self,
        records: &'a [PackageRecord],
    ) -> impl Iterator<Item = &'a PackageRecord> {
        records
            .iter()
            .filter(|record| self.should_delete(&record.version))
    }
}

/// Compute the deletion plan for a package inventory
///
/// Never fails: any version string can be ranked. The records are expected
/// to have passed user filters already.
pub fn plan_deletion(records: &[PackageRecord], policy: &RetentionPolicy) -> DeletionPlan {
    let groups = group_by_version(records);
    let all_versions = rank_groups(groups.values(), policy.order_by);

    let to_delete: BTreeSet<String> =
        select_for_deletion(&all_versions, policy.keep_last_n, policy.order_by)
            .into_iter()
            .collect();

    let mut warnings = Vec::new();
    let exceptions = if policy.keep_last_minor_patches {
        if policy.order_by == OrderBy::Time {
            let warning = PolicyWarning::MinorPatchesWithTimeOrder;
            warn!("{}", warning);
            warnings.push(warning);
        }

        match latest_minor(all_versions.iter().map(|group| group.version.as_str())) {
            Some(minor) => {
                debug!("Latest minor line is {}", minor);
                minor_patch_exceptions(minor, to_delete.iter().map(String::as_str))
            }
            None => BTreeSet::new(),
        }
    } else {
        BTreeSet::new()
    };

    let to_keep = all_versions
        .iter()
        .map(|group| &group.version)
        .filter(|version| !to_delete.contains(*version) || exceptions.contains(*version))
        .cloned()
        .collect();

    debug!(
        "Planned {} version(s): {} to delete, {} exception(s)",
        all_versions.len(),
        to_delete.len(),
        exceptions.len()
    );

    DeletionPlan {
        all_versions,
        to_delete,
        exceptions,
        to_keep,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: &str, created_at: &str) -> PackageRecord {
        PackageRecord {
            filename: format!("erlang-{}.x86_64.rpm", version),
            version: version.to_string(),
            created_at: created_at.parse().unwrap(),
            delete_handle: format!("/api/v1/repos/rabbitmq/erlang/erlang-{}.rpm", version),
        }
    }

    fn records(versions: &[&str]) -> Vec<PackageRecord> {
        versions
            .iter()
            .map(|v| record(v, "2022-01-01T00:00:00Z"))
            .collect()
    }

    fn set(versions: &[&str]) -> BTreeSet<String> {
        versions.iter().map(|v| v.to_string()).collect()
    }

    fn policy(order_by: OrderBy, keep_last_n: usize, keep_last_minor_patches: bool) -> RetentionPolicy {
        RetentionPolicy {
            order_by,
            keep_last_n,
            keep_last_minor_patches,
        }
    }

    #[test]
    fn plan_deletion_of_empty_inventory_is_empty() {
        let plan = plan_deletion(&[], &policy(OrderBy::Version, 0, true));

        assert_eq!(plan, DeletionPlan::default());
    }

    #[test]
    fn plan_deletion_without_exceptions_keeps_last_n() {
        let records = records(&["1.0", "1.1", "1.2", "2.0"]);

        let plan = plan_deletion(&records, &policy(OrderBy::Version, 2, false));

        assert_eq!(plan.to_delete, set(&["1.0", "1.1"]));
        assert_eq!(plan.to_keep, set(&["1.2", "2.0"]));
        assert!(plan.exceptions.is_empty());
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn plan_deletion_spares_newest_patch_of_older_minors() {
        let records = records(&[
            "1:24.0.5-1",
            "1:24.0.6-1",
            "1:24.1.6-1",
            "1:24.1.7-1",
            "1:24.2.1-1",
            "1:24.2.2-1",
            "1:24.3-1",
            "1:24.3.1-1",
            "1:24.3.2-1",
        ]);

        let plan = plan_deletion(&records, &policy(OrderBy::Version, 1, true));

        assert_eq!(plan.to_delete.len(), 8);
        assert_eq!(
            plan.exceptions,
            set(&["1:24.0.6-1", "1:24.1.7-1", "1:24.2.2-1"])
        );
        assert_eq!(
            plan.to_keep,
            set(&["1:24.0.6-1", "1:24.1.7-1", "1:24.2.2-1", "1:24.3.2-1"])
        );
        assert!(plan.should_delete("1:24.3.1-1"));
        assert!(!plan.should_delete("1:24.2.2-1"));
        assert!(plan.is_exception("1:24.2.2-1"));
    }

    #[test]
    fn plan_deletion_warns_when_minor_patches_used_with_time_order() {
        let records = vec![
            record("1.1.0", "2021-04-01T00:00:00Z"),
            record("1.1.1", "2021-04-02T00:00:00Z"),
            record("1.2.0", "2021-04-03T00:00:00Z"),
        ];

        let plan = plan_deletion(&records, &policy(OrderBy::Time, 1, true));

        assert_eq!(plan.warnings, vec![PolicyWarning::MinorPatchesWithTimeOrder]);
        assert_eq!(plan.to_delete, set(&["1.1.0", "1.1.1"]));
        assert_eq!(plan.exceptions, set(&["1.1.1"]));
    }

    #[test]
    fn all_versions_are_listed_in_rank_order() {
        let records = vec![
            record("1.10", "2021-04-01T00:00:00Z"),
            record("1.9", "2021-04-03T00:00:00Z"),
            record("1.9", "2021-04-04T00:00:00Z"),
        ];

        let plan = plan_deletion(&records, &policy(OrderBy::Version, 1, false));

        let versions: Vec<&str> = plan
            .all_versions
            .iter()
            .map(|g| g.version.as_str())
            .collect();
        assert_eq!(versions, vec!["1.9", "1.10"]);
        assert_eq!(
            plan.all_versions[0].latest_created_at,
            "2021-04-04T00:00:00Z".parse::<chrono::DateTime<chrono::Utc>>().unwrap()
        );
    }

    #[test]
    fn records_to_delete_skips_kept_and_exception_versions() {
        let records = records(&["1.0.0", "1.0.1", "1.1.0", "1.1.0"]);

        let plan = plan_deletion(&records, &policy(OrderBy::Version, 1, true));

        let deleted: Vec<&str> = plan
            .records_to_delete(&records)
            .map(|r| r.version.as_str())
            .collect();
        assert_eq!(deleted, vec!["1.0.0"]);
        let effective: Vec<&str> = plan
            .effective_deletions()
            .map(|g| g.version.as_str())
            .collect();
        assert_eq!(effective, vec!["1.0.0"]);
    }
}
