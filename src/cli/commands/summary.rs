use savings_core::SummaryService;

use crate::cli::context::ShellContext;
use crate::cli::error::CommandResult;
use crate::cli::format::{format_percentage, progress_bar};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Totals across every goal",
        "summary",
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let overview = SummaryService::overview(context.manager.ledger());
    output::section("Summary");
    output::line(format!(
        "  Goals     : {} ({} completed)",
        overview.goal_count, overview.completed_goals
    ));
    output::line(format!(
        "  Saved     : {} of {}",
        context.format_amount(overview.total_saved),
        context.format_amount(overview.total_target)
    ));
    output::line(format!(
        "  Progress  : {} {}",
        progress_bar(overview.overall_percentage, 20),
        format_percentage(overview.overall_percentage)
    ));
    if context.manager.is_out_of_sync() {
        output::warning("Recent changes have not been saved yet.");
    }
    Ok(())
}
