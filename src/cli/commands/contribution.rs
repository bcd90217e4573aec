use savings_core::ViewState;
use uuid::Uuid;

use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::format::{format_date, short_id};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "contribution add <goal> <amount> [YYYY-MM-DD] | contribution edit <goal> <contribution> <amount> [YYYY-MM-DD] | contribution delete <goal> <contribution>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "contribution",
        "Record, correct or remove contributions",
        USAGE,
        cmd_contribution,
    )
    .with_subcommands(&["add", "edit", "delete"])]
}

fn cmd_contribution(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
    };
    match subcommand.to_lowercase().as_str() {
        "add" => add(context, rest),
        "edit" => edit(context, rest),
        "delete" | "remove" => delete(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown contribution subcommand `{other}`; usage: {USAGE}"
        ))),
    }
}

fn add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !(2..=3).contains(&args.len()) {
        return Err(CommandError::InvalidArguments(
            "usage: contribution add <goal> <amount> [YYYY-MM-DD]".into(),
        ));
    }
    let goal_id = context.resolve_goal(args[0])?;
    let amount = context.parse_amount(args[1])?;
    let date = match args.get(2) {
        Some(raw) => context.parse_date(raw)?,
        None => context.manager.today(),
    };
    let was_marked = context.goal(goal_id)?.has_completion_marker();

    context.view = ViewState::AddingContribution(goal_id);
    let outcome = context.manager.add_contribution(goal_id, amount, date);
    context.view = context.view.back();
    let contribution_id = outcome?;

    output::success(format!(
        "Contribution {} of {} recorded on {}.",
        short_id(contribution_id),
        context.format_amount(amount),
        format_date(date)
    ));
    announce_completion(context, goal_id, was_marked)
}

fn edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !(3..=4).contains(&args.len()) {
        return Err(CommandError::InvalidArguments(
            "usage: contribution edit <goal> <contribution> <amount> [YYYY-MM-DD]".into(),
        ));
    }
    let goal_id = context.resolve_goal(args[0])?;
    let (contribution_id, current_date) = {
        let entry = context.resolve_contribution(goal_id, args[1])?;
        if entry.is_initial {
            return Err(CommandError::Message(
                "the initial amount cannot be edited; add a correcting contribution instead"
                    .into(),
            ));
        }
        (entry.id, entry.date)
    };
    let amount = context.parse_amount(args[2])?;
    let date = match args.get(3) {
        Some(raw) => context.parse_date(raw)?,
        None => current_date,
    };

    context.view = ViewState::EditingContribution {
        goal: goal_id,
        contribution: contribution_id,
    };
    let outcome = context
        .manager
        .edit_contribution(goal_id, contribution_id, amount, date);
    context.view = context.view.back();
    outcome?;

    output::success(format!(
        "Contribution {} updated to {} on {}.",
        short_id(contribution_id),
        context.format_amount(amount),
        format_date(date)
    ));
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [goal_token, contribution_token] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: contribution delete <goal> <contribution>".into(),
        ));
    };
    let goal_id = context.resolve_goal(goal_token)?;
    let (contribution_id, amount) = {
        let entry = context.resolve_contribution(goal_id, contribution_token)?;
        if entry.is_initial {
            return Err(CommandError::Message(
                "the initial amount cannot be deleted".into(),
            ));
        }
        (entry.id, entry.amount)
    };

    context.view = ViewState::ConfirmingContributionDelete {
        goal: goal_id,
        contribution: contribution_id,
    };
    let confirmed = context.confirm(&format!(
        "Delete the contribution of {}?",
        context.format_amount(amount)
    ));
    context.view = context.view.back();
    if !confirmed? {
        output::info("Operation cancelled.");
        return Ok(());
    }

    context
        .manager
        .delete_contribution(goal_id, contribution_id)?;
    output::success(format!("Contribution {} deleted.", short_id(contribution_id)));
    Ok(())
}

fn announce_completion(context: &ShellContext, goal_id: Uuid, was_marked: bool) -> CommandResult {
    let goal = context.goal(goal_id)?;
    if !was_marked && goal.has_completion_marker() {
        output::success(format!("Goal reached! {}", goal.name));
    }
    Ok(())
}
