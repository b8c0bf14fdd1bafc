use thiserror::Error;
use tracing::warn;

use crate::filter::{FilterError, PackageFilter};
use crate::retention::types::{OrderBy, RetentionPolicy};

// =============================================================================
// HTTP-related constants
// =============================================================================

/// Base URL of the Packagecloud repositories API
pub const PACKAGECLOUD_API_URL: &str = "https://packagecloud.io/api/v1/repos";

/// Connect timeout for repository and probe requests (60 seconds)
pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 60;

/// Delay between starting each delete request to avoid rate limiting (10ms)
pub const DELETE_STAGGER_DELAY_MS: u64 = 10;

/// URL reached by the `test` connectivity check
pub const DEFAULT_PROBE_URL: &str = "https://www.wikipedia.org/";

pub const USER_AGENT: &str = concat!("pkg-retention/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Action inputs
// =============================================================================

pub const ENV_USERNAME: &str = "INPUT_USERNAME";
pub const ENV_REPOSITORY: &str = "INPUT_REPOSITORY";
pub const ENV_TOKEN: &str = "INPUT_TOKEN";
pub const ENV_TYPE: &str = "INPUT_TYPE";
pub const ENV_GLOBS: &str = "INPUT_GLOBS";
pub const ENV_VERSION_FILTER: &str = "INPUT_VERSION_FILTER";
pub const ENV_ORDER_BY: &str = "INPUT_ORDER_BY";
pub const ENV_KEEP_LAST_N: &str = "INPUT_KEEP_LAST_N";
pub const ENV_KEEP_LAST_MINOR_PATCHES: &str = "INPUT_KEEP_LAST_MINOR_PATCHES";
pub const ENV_DO_DELETE: &str = "INPUT_DO_DELETE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parameter {0} must be set")]
    MissingParameter(&'static str),

    #[error(transparent)]
    InvalidFilter(#[from] FilterError),
}

/// Configuration of one cleanup run
#[derive(Clone, PartialEq, Eq)]
pub struct ActionConfig {
    pub username: String,
    pub repository: String,
    pub token: String,
    /// Server-side package type filter (e.g., "deb", "rpm")
    pub package_type: Option<String>,
    /// Comma-separated file name globs
    pub globs: Option<String>,
    /// Case-insensitive version regex
    pub version_filter: Option<String>,
    pub policy: RetentionPolicy,
    /// Actually delete; otherwise only report what would be deleted
    pub do_delete: bool,
}

impl std::fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConfig")
            .field("username", &self.username)
            .field("repository", &self.repository)
            .field("token", &"***")
            .field("package_type", &self.package_type)
            .field("globs", &self.globs)
            .field("version_filter", &self.version_filter)
            .field("policy", &self.policy)
            .field("do_delete", &self.do_delete)
            .finish()
    }
}

impl ActionConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value
    ///
    /// Blank values count as unset. Invalid optional values fall back to
    /// their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str, parameter: &'static str| {
            get(name).ok_or(ConfigError::MissingParameter(parameter))
        };

        let username = required(ENV_USERNAME, "username")?;
        let repository = required(ENV_REPOSITORY, "repository")?;
        let token = required(ENV_TOKEN, "token")?;

        let policy = RetentionPolicy {
            order_by: parse_order_by(get(ENV_ORDER_BY).as_deref()),
            keep_last_n: parse_keep_last_n(get(ENV_KEEP_LAST_N).as_deref()),
            keep_last_minor_patches: parse_bool(get(ENV_KEEP_LAST_MINOR_PATCHES).as_deref()),
        };

        Ok(Self {
            username,
            repository,
            token,
            package_type: get(ENV_TYPE),
            globs: get(ENV_GLOBS),
            version_filter: get(ENV_VERSION_FILTER),
            policy,
            do_delete: parse_bool(get(ENV_DO_DELETE).as_deref()),
        })
    }

    /// Builds the package filter from the glob and version inputs
    pub fn package_filter(&self) -> Result<PackageFilter, ConfigError> {
        Ok(PackageFilter::new(
            self.globs.as_deref(),
            self.version_filter.as_deref(),
        )?)
    }
}

/// Parse `keep_last_n`, clamping unparseable or negative values to 0
pub fn parse_keep_last_n(value: Option<&str>) -> usize {
    let Some(value) = value else {
        return 0;
    };

    match value.trim().parse::<i64>() {
        Ok(n) if n >= 0 => usize::try_from(n).unwrap_or(usize::MAX),
        _ => {
            warn!("Incorrect value for keep_last_n: {}", value);
            warn!("Using default value instead (0).");
            0
        }
    }
}

fn parse_order_by(value: Option<&str>) -> OrderBy {
    let Some(value) = value else {
        return OrderBy::default();
    };

    value.trim().parse().unwrap_or_else(|_| {
        warn!(
            "Unknown value for order_by: {}, using {}",
            value,
            OrderBy::default().as_str()
        );
        OrderBy::default()
    })
}

/// "true" in any case is true, anything else is false
fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
