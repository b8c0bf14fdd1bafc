//! Grouping of package records by version

use std::collections::HashMap;

use crate::retention::types::{PackageRecord, VersionGroup};

/// Fold package records into one [`VersionGroup`] per distinct version
///
/// The map carries no ordering; rank it with
/// [`rank_groups`](crate::retention::select::rank_groups) before presenting it.
pub fn group_by_version(records: &[PackageRecord]) -> HashMap<String, VersionGroup> {
    records.iter().fold(HashMap::new(), |mut groups, record| {
        let group = match groups.remove(&record.version) {
            Some(group) => group.consider(record.created_at),
            None => VersionGroup::new(&record.version, record.created_at),
        };
        groups.insert(record.version.clone(), group);
        groups
    })
}
