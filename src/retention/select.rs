//! Ranking of version groups and the keep-last-N cutoff

use std::cmp::Ordering;

use crate::retention::order::rank_cmp;
use crate::retention::types::{OrderBy, VersionGroup};

fn compare_groups(a: &VersionGroup, b: &VersionGroup, order_by: OrderBy) -> Ordering {
    match order_by {
        OrderBy::Version => rank_cmp(&a.version, &b.version),
        OrderBy::Time => a
            .latest_created_at
            .cmp(&b.latest_created_at)
            .then_with(|| rank_cmp(&a.version, &b.version)),
    }
}

/// Sort version groups by rank, lowest first
///
/// `OrderBy::Version` ranks by version precedence, `OrderBy::Time` by the
/// latest upload time. Ties fall back to version precedence and then to the
/// raw version string, so the result never depends on input order.
pub fn rank_groups<'a, I>(groups: I, order_by: OrderBy) -> Vec<VersionGroup>
where
    I: IntoIterator<Item = &'a VersionGroup>,
{
    let mut ranked: Vec<VersionGroup> = groups.into_iter().cloned().collect();
    ranked.sort_by(|a, b| compare_groups(a, b, order_by));
    ranked
}

/// Select the versions to delete so that only the `keep_last_n`
/// highest-ranked versions remain
///
/// Returns versions lowest-ranked first:
/// - no groups: nothing to delete
/// - `keep_last_n == 0`: every version
/// - `keep_last_n >= groups`: nothing to delete
/// - otherwise: the `groups - keep_last_n` lowest-ranked versions
pub fn select_for_deletion<'a, I>(groups: I, keep_last_n: usize, order_by: OrderBy) -> Vec<String>
where
    I: IntoIterator<Item = &'a VersionGroup>,
{
    let ranked = rank_groups(groups, order_by);

    let delete_count = match keep_last_n {
        0 => ranked.len(),
        n => ranked.len().saturating_sub(n),
    };

    ranked
        .into_iter()
        .take(delete_count)
        .map(|group| group.version)
        .collect()
}
