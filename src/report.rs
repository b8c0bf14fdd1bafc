//! Console rendering of deletion plans and execution results

use std::collections::BTreeSet;

use crate::executor::{ExecutionReport, PackageAction};
use crate::retention::planner::DeletionPlan;
use crate::retention::types::VersionGroup;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%MZ";
const INDENT: &str = "    ";

/// "version [latest upload]", e.g. "1:25.0-1 [2022-05-01T10:00Z]"
pub fn format_version(group: &VersionGroup) -> String {
    format!(
        "{} [{}]",
        group.version,
        group.latest_created_at.format(DATE_FORMAT)
    )
}

/// Formats the groups of `plan` whose version is in `versions`, in rank order
fn join(plan: &DeletionPlan, versions: Option<&BTreeSet<String>>) -> String {
    plan.all_versions
        .iter()
        .filter(|group| versions.is_none_or(|set| set.contains(&group.version)))
        .map(format_version)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Summary lines of a plan, versions listed lowest-ranked first
pub fn render_plan(plan: &DeletionPlan) -> Vec<String> {
    let mut lines = vec![
        format!("Version(s) detected: {}", join(plan, None)),
        format!("Version(s) to delete: {}", join(plan, Some(&plan.to_delete))),
    ];

    if !plan.exceptions.is_empty() {
        lines.push(format!(
            "Deletion exception(s) (last minor patches): {}",
            join(plan, Some(&plan.exceptions))
        ));
    }

    if !plan.to_keep.is_empty() {
        lines.push(format!(
            "Version(s) to keep: {}",
            join(plan, Some(&plan.to_keep))
        ));
    }

    lines
}

/// One line per package followed by the deletion count
pub fn render_execution(report: &ExecutionReport) -> Vec<String> {
    let mut lines = vec!["Packages:".to_string()];

    lines.extend(report.outcomes.iter().map(|outcome| {
        let line = match &outcome.action {
            PackageAction::Deleted => format!("deleting {}", outcome.filename),
            PackageAction::Skipped => format!("deleting {} (skipped)", outcome.filename),
            PackageAction::DeleteFailed(reason) => {
                format!("failed to delete {}: {}", outcome.filename, reason)
            }
            PackageAction::Kept => format!("keeping {}", outcome.filename),
            PackageAction::KeptAsException => {
                format!("keeping {} (latest minor patch)", outcome.filename)
            }
        };
        format!("{}{}", INDENT, line)
    }));

    lines.push(String::new());
    lines.push(format!("Deleted {} file(s)", report.deleted()));

    let skipped = report.planned() - report.deleted() - report.failed();
    if skipped > 0 {
        lines.push(format!(
            "{} file(s) marked for deletion, deletion disabled",
            skipped
        ));
    }
    if report.has_failures() {
        lines.push(format!("Failed to delete {} file(s)", report.failed()));
    }

    lines
}
