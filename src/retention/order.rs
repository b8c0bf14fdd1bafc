//! Version precedence used to rank package versions
//!
//! Versions are compared component by component once the epoch prefix
//! (`1:` in `1:22.3.4.1-1`) has been removed:
//! - `.` and `-` both separate components
//! - numeric components compare as integers (`10` > `9`, `007` == `7`)
//! - text components compare case-insensitively
//! - a numeric component outranks a text component (`1.0.1` > `1.0.rc1`)
//! - missing trailing components count as `0` (`22.3` == `22.3.0`)
//!
//! Any string is accepted, so comparison never fails. Strings that are not
//! version-like still get a deterministic, if not meaningful, order.

use std::cmp::Ordering;

/// Remove a leading `<digits>:` epoch from a version string
///
/// Examples:
/// - "1:22.3.4.1-1" -> "22.3.4.1-1"
/// - "12:1.0" -> "1.0"
/// - "22.3.4.1-1" -> "22.3.4.1-1"
/// - "a:1.0" -> "a:1.0" (not an epoch)
pub fn strip_epoch(version: &str) -> &str {
    match version.split_once(':') {
        Some((epoch, rest)) if !epoch.is_empty() && epoch.bytes().all(|b| b.is_ascii_digit()) => {
            rest
        }
        _ => version,
    }
}

#[derive(Debug, Clone, Copy)]
enum Component<'a> {
    /// Decimal digits with leading zeros removed ("" is zero)
    Number(&'a str),
    Text(&'a str),
}

const ZERO: Component<'static> = Component::Number("");

impl<'a> Component<'a> {
    fn parse(token: &'a str) -> Self {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            Component::Number(token.trim_start_matches('0'))
        } else {
            Component::Text(token)
        }
    }

    fn compare(self, other: Component<'_>) -> Ordering {
        match (self, other) {
            // No leading zeros, so a longer digit string is a larger number.
            (Component::Number(a), Component::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Component::Text(a), Component::Text(b)) => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase)),
            (Component::Number(_), Component::Text(_)) => Ordering::Greater,
            (Component::Text(_), Component::Number(_)) => Ordering::Less,
        }
    }
}

fn components(version: &str) -> impl Iterator<Item = Component<'_>> {
    strip_epoch(version).split(['.', '-']).map(Component::parse)
}

/// Compare two version strings by precedence
///
/// This is a total preorder: distinct strings may compare equal
/// (`22.3` and `22.3.0`, `RC1` and `rc1`). Use [`rank_cmp`] when a strict
/// order over distinct strings is needed.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = components(a);
    let mut right = components(b);

    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (Some(l), None) => l.compare(ZERO),
            (None, Some(r)) => ZERO.compare(r),
            (Some(l), Some(r)) => l.compare(r),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

/// [`compare_versions`], falling back to byte order of the raw strings
///
/// Two strings compare equal only when they are identical, which keeps
/// sorting independent of input order.
pub fn rank_cmp(a: &str, b: &str) -> Ordering {
    compare_versions(a, b).then_with(|| a.cmp(b))
}

/// Return the highest version of the iterator by [`rank_cmp`]
pub fn max_version<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions.into_iter().max_by(|a, b| rank_cmp(a, b))
}
