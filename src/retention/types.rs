//! Common types for the retention engine

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One published artifact of a package repository
///
/// Only the fields the retention engine and the repository client need are
/// kept; anything else in the listing response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageRecord {
    /// File name of the artifact (e.g., "erlang-25.0.1-1.el8.x86_64.rpm")
    pub filename: String,
    /// Repository-assigned version, possibly with an epoch (e.g., "1:25.0.1-1")
    pub version: String,
    /// Upload time of the artifact
    pub created_at: DateTime<Utc>,
    /// Reference used by the repository client to delete this exact artifact
    #[serde(rename = "destroy_url")]
    pub delete_handle: String,
}

/// All packages sharing one version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionGroup {
    pub version: String,
    /// Most recent `created_at` over the group's packages
    pub latest_created_at: DateTime<Utc>,
}

impl VersionGroup {
    pub fn new(version: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            latest_created_at: created_at,
        }
    }

    /// Returns the group with `created_at` folded into its latest timestamp
    pub fn consider(self, created_at: DateTime<Utc>) -> Self {
        Self {
            latest_created_at: self.latest_created_at.max(created_at),
            ..self
        }
    }
}

/// Key used to rank version groups before the keep-last-N cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Version precedence, lowest first
    #[default]
    Version,
    /// Latest upload time, oldest first
    Time,
}

impl OrderBy {
    /// Returns the string representation of the ordering key
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Version => "version",
            OrderBy::Time => "time",
        }
    }
}

impl std::str::FromStr for OrderBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "version" => Ok(OrderBy::Version),
            "time" => Ok(OrderBy::Time),
            _ => Err(()),
        }
    }
}

/// How many and which versions survive a cleanup pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetentionPolicy {
    pub order_by: OrderBy,
    /// Number of highest-ranked versions to keep (0 deletes everything)
    pub keep_last_n: usize,
    /// Spare the newest patch of every minor line but the latest one
    pub keep_last_minor_patches: bool,
}
