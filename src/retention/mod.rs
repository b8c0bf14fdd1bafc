//! Retention decision engine
//!
//! Decides which versions of a package inventory are deleted and which are
//! kept. Everything here is pure and synchronous; the resulting
//! [`DeletionPlan`] is immutable and can be shared with any number of
//! deletion workers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Group    │────▶│   Select    │────▶│   Planner   │
//! │ (by version)│     │(keep last N)│     │(DeletionPlan│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Order    │◀────│    Minor    │
//!                     │(version cmp)│     │ (exceptions)│
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`order`]: Version precedence comparator
//! - [`types`]: Package records, version groups and the retention policy
//! - [`group`]: Folding of package records into version groups
//! - [`select`]: Ranking and the keep-last-N cutoff
//! - [`minor`]: Newest patch of each older minor line
//! - [`planner`]: Orchestration into a [`DeletionPlan`]

pub mod group;
pub mod minor;
pub mod order;
pub mod planner;
pub mod select;
pub mod types;

pub use planner::{DeletionPlan, PolicyWarning, plan_deletion};
pub use types::{OrderBy, PackageRecord, RetentionPolicy, VersionGroup};
