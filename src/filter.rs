//! Pre-filtering of listed packages by file name globs and version pattern

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::retention::types::PackageRecord;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid version filter '{pattern}': {source}")]
    InvalidVersionFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid glob '{glob}': {source}")]
    InvalidGlob {
        glob: String,
        #[source]
        source: regex::Error,
    },
}

/// Selects the packages a cleanup pass applies to
///
/// A package passes when its file name matches any of the globs and its
/// version matches the version filter. Missing criteria accept everything.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    globs: Vec<Regex>,
    version: Option<Regex>,
}

impl PackageFilter {
    /// Build a filter from a comma-separated glob list and a version regex
    ///
    /// The version regex is case-insensitive and unanchored.
    pub fn new(globs: Option<&str>, version: Option<&str>) -> Result<Self, FilterError> {
        let globs = match globs {
            Some(globs) => parse_globs(globs)?,
            None => Vec::new(),
        };

        let version = version
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| FilterError::InvalidVersionFilter {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .transpose()?;

        Ok(Self { globs, version })
    }

    /// Returns true if the package passes every filter
    pub fn matches(&self, record: &PackageRecord) -> bool {
        self.matches_filename(&record.filename) && self.matches_version(&record.version)
    }

    fn matches_filename(&self, filename: &str) -> bool {
        if self.globs.is_empty() {
            return true;
        }
        let name = filename.rsplit('/').next().unwrap_or(filename);
        self.globs.iter().any(|glob| glob.is_match(name))
    }

    fn matches_version(&self, version: &str) -> bool {
        self.version
            .as_ref()
            .is_none_or(|pattern| pattern.is_match(version))
    }

    /// Keep only the packages passing every filter
    pub fn apply(&self, records: Vec<PackageRecord>) -> Vec<PackageRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect()
    }
}

/// Parse a comma-separated glob list; a blank list means `*`
fn parse_globs(globs: &str) -> Result<Vec<Regex>, FilterError> {
    let globs = if globs.trim().is_empty() { "*" } else { globs };

    globs
        .split(',')
        .map(str::trim)
        .map(|glob| {
            Regex::new(&glob_to_regex(glob)).map_err(|source| FilterError::InvalidGlob {
                glob: glob.to_string(),
                source,
            })
        })
        .collect()
}

/// Translate a file name glob into an anchored regex
///
/// - `*`: any run of characters except `/`
/// - `?`: any single character except `/`
/// - `[...]`: character class, `[!...]` negated, `a-z` ranges
/// - `\x`: the literal character `x`
///
/// Everything else, including `^`, `&`, `~` and a doubled `-` inside a
/// class, matches literally.
fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::from("^");
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            '\\' => {
                let literal = chars.next().unwrap_or('\\');
                regex.push_str(&regex::escape(&literal.to_string()));
            }
            '[' => {
                regex.push('[');
                if chars.next_if_eq(&'!').is_some() {
                    regex.push('^');
                }
                let mut previous: Option<char> = None;
                while let Some(c) = chars.next() {
                    match c {
                        ']' => break,
                        '-' if previous.is_some_and(|p| p != '-')
                            && chars.peek().is_some_and(|n| *n != ']' && *n != '-') =>
                        {
                            regex.push('-')
                        }
                        '\\' => push_class_literal(&mut regex, chars.next().unwrap_or('\\')),
                        c => push_class_literal(&mut regex, c),
                    }
                    previous = Some(c);
                }
                regex.push(']');
            }
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
    }

    regex.push('$');
    regex
}

/// Punctuation is escaped so it never acts as a class operator (`^`, `&&`, `--`, `~~`)
fn push_class_literal(regex: &mut String, c: char) {
    if c.is_ascii_punctuation() {
        regex.push('\\');
    }
    regex.push(c);
}
