//! Execution of a deletion plan against a package repository

use std::time::Duration;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::DELETE_STAGGER_DELAY_MS;
use crate::repository::PackageRepository;
use crate::retention::planner::DeletionPlan;
use crate::retention::types::PackageRecord;

/// What happened to one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageAction {
    Deleted,
    /// Deletion was attempted and failed with the given reason
    DeleteFailed(String),
    /// Marked for deletion, but deletion is disabled
    Skipped,
    Kept,
    /// Kept as the newest patch of an older minor line
    KeptAsException,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    pub filename: String,
    pub version: String,
    pub action: PackageAction,
}

/// Per-package outcomes of one execution, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub outcomes: Vec<PackageOutcome>,
}

impl ExecutionReport {
    fn count(&self, predicate: impl Fn(&PackageAction) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.action)).count()
    }

    /// Packages marked for deletion by the plan
    pub fn planned(&self) -> usize {
        self.count(|a| {
            matches!(
                a,
                PackageAction::Deleted | PackageAction::DeleteFailed(_) | PackageAction::Skipped
            )
        })
    }

    pub fn deleted(&self) -> usize {
        self.count(|a| matches!(a, PackageAction::Deleted))
    }

    pub fn failed(&self) -> usize {
        self.count(|a| matches!(a, PackageAction::DeleteFailed(_)))
    }

    /// Returns true if some attempted deletions did not succeed
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

async fn delete_package(
    repository: &dyn PackageRepository,
    record: &PackageRecord,
    delay: Duration,
) -> PackageAction {
    sleep(delay).await;

    match repository.delete_package(record).await {
        Ok(()) => {
            info!("Deleted {}", record.filename);
            PackageAction::Deleted
        }
        Err(e) => {
            error!(
                "Error while trying to delete {} ({}): {}",
                record.filename, record.delete_handle, e
            );
            PackageAction::DeleteFailed(e.to_string())
        }
    }
}

/// Apply a deletion plan to the listed packages
///
/// Packages whose version the plan deletes are removed through `repository`
/// when `do_delete` is set, and reported as skipped otherwise.
/// Deletions run in parallel with staggered start times to avoid rate limiting.
/// Each failure is logged and recorded but does not stop other deletions.
pub async fn execute_plan(
    repository: &dyn PackageRepository,
    plan: &DeletionPlan,
    records: &[PackageRecord],
    do_delete: bool,
) -> ExecutionReport {
    let mut scheduled: u64 = 0;

    let futures: Vec<_> = records
        .iter()
        .map(|record| {
            let planned = plan.should_delete(&record.version);
            let delay = (planned && do_delete).then(|| {
                let delay = Duration::from_millis(DELETE_STAGGER_DELAY_MS * scheduled);
                scheduled += 1;
                delay
            });

            async move {
                let action = match delay {
                    Some(delay) => delete_package(repository, record, delay).await,
                    None if planned => PackageAction::Skipped,
                    None if plan.is_exception(&record.version) => PackageAction::KeptAsException,
                    None => PackageAction::Kept,
                };
                PackageOutcome {
                    filename: record.filename.clone(),
                    version: record.version.clone(),
                    action,
                }
            }
        })
        .collect();

    let report = ExecutionReport {
        outcomes: join_all(futures).await,
    };

    if report.has_failures() {
        warn!(
            "Deleted {} of {} planned package(s), {} failed",
            report.deleted(),
            report.planned(),
            report.failed()
        );
    }

    report
}
