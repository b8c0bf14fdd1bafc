//! Minor release lines and the newest patch of each
//!
//! A strict keep-last-N cutoff by version can delete every build of an older
//! minor line that is still supported (e.g. all of 24.2.x once 24.3.x ships).
//! The functions here find, among the deletion candidates, the newest build
//! of every minor line except the latest one so it can be spared.

use std::collections::{BTreeMap, BTreeSet};

use crate::retention::order::{max_version, rank_cmp, strip_epoch};

/// Extract the minor line (`major.minor`) of a version
///
/// The epoch and the release suffix after the last `-` are removed first.
/// Versions with a single component are returned without suffix.
///
/// Examples:
/// - "1:22.3.4.16-1" -> "22.3"
/// - "25.1-1.el8" -> "25.1"
/// - "26" -> "26"
pub fn minor_of(version: &str) -> &str {
    let version = strip_epoch(version);
    let version = match version.rfind('-') {
        Some(index) => &version[..index],
        None => version,
    };

    // major.minor is the prefix up to the second '.'
    match version.match_indices('.').nth(1) {
        Some((index, _)) => &version[..index],
        None => version,
    }
}

/// Return the highest minor line among the versions
///
/// Returns None when there are no versions.
pub fn latest_minor<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    max_version(versions.into_iter().map(minor_of))
}

/// Pick the newest version of every minor line present in `candidates`,
/// skipping `minor_to_ignore`
///
/// The result holds one version per distinct minor line other than the
/// ignored one.
pub fn minor_patch_exceptions<'a, I>(minor_to_ignore: &str, candidates: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let newest_by_minor = candidates
        .into_iter()
        .filter(|version| minor_of(version) != minor_to_ignore)
        .fold(BTreeMap::<&str, &str>::new(), |mut newest, version| {
            newest
                .entry(minor_of(version))
                .and_modify(|current| {
                    if rank_cmp(version, current).is_gt() {
                        *current = version;
                    }
                })
                .or_insert(version);
            newest
        });

    newest_by_minor
        .into_values()
        .map(str::to_string)
        .collect()
}
