//! One cleanup run: list, filter, plan, report and delete

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::ActionConfig;
use crate::executor::{ExecutionReport, execute_plan};
use crate::report::{render_execution, render_plan};
use crate::repository::PackageRepository;
use crate::retention::planner::{DeletionPlan, plan_deletion};

/// Outcome of a complete run
#[derive(Debug)]
pub struct RunSummary {
    pub plan: DeletionPlan,
    pub execution: ExecutionReport,
}

fn write_lines(out: &mut dyn Write, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(out, "{}", line).context("Failed to write report")?;
    }
    Ok(())
}

/// Run the retention policy of `config` against `repository`
///
/// A listing failure aborts the run before anything is planned. Deletion
/// failures do not; they are recorded in the returned summary.
pub async fn run(
    config: &ActionConfig,
    repository: &dyn PackageRepository,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    let filter = config.package_filter()?;

    info!(
        "Listing packages of {}/{}",
        config.username, config.repository
    );
    let packages = repository
        .list_packages()
        .await
        .context("Failed to list packages")?;

    let total = packages.len();
    let packages = filter.apply(packages);
    info!("{} of {} package(s) match the filters", packages.len(), total);

    let plan = plan_deletion(&packages, &config.policy);
    write_lines(out, &render_plan(&plan))?;
    info!(
        "{} package(s) of {} version(s) marked for deletion",
        plan.records_to_delete(&packages).count(),
        plan.effective_deletions().count()
    );

    if !config.do_delete {
        info!("Deletion disabled, set do_delete to true to delete packages");
    }

    let execution = execute_plan(repository, &plan, &packages, config.do_delete).await;
    write_lines(out, &render_execution(&execution))?;

    Ok(RunSummary { plan, execution })
}
