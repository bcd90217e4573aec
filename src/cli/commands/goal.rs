use std::str::FromStr;

use savings_core::{NewGoal, SummaryService, ViewState};
use savings_domain::{Goal, GoalColor};
use uuid::Uuid;

use super::split_flags;
use crate::cli::context::{CliMode, ShellContext};
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::format::{
    format_date, format_percentage, paint_goal_name, progress_bar, short_id,
};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const GOAL_USAGE: &str = "goal new <name> <target> [--initial <amount>] [--deadline YYYY-MM-DD] [--color <name|hex>] | goal show [goal] | goal rename <goal> <new name> | goal delete <goal>";
const BAR_WIDTH: usize = 20;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "Show the goal dashboard", "list", cmd_list),
        CommandEntry::new("goal", "Create, inspect, rename or delete goals", GOAL_USAGE, cmd_goal)
            .with_subcommands(&["new", "show", "rename", "delete"]),
        CommandEntry::new("back", "Leave the focused goal", "back", cmd_back),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view = ViewState::Dashboard;
    let goals = &context.manager.ledger().goals;
    output::section(format!("Goals ({}/{})", goals.len(), context.manager.max_goals()));
    if goals.is_empty() {
        output::info("No goals yet. Create one with `goal new <name> <target>`.");
        return Ok(());
    }

    for (index, goal) in goals.iter().enumerate() {
        let percentage = SummaryService::progress_percentage(goal);
        let deadline = goal
            .active_deadline()
            .map(|date| format!("  due {}", format_date(date)))
            .unwrap_or_default();
        output::line(format!(
            "{:>2}. {}  {} {:>6}  {} / {}{}",
            index + 1,
            paint_goal_name(goal),
            progress_bar(percentage, BAR_WIDTH),
            format_percentage(percentage),
            context.format_amount(goal.current_amount),
            context.format_amount(goal.target_amount),
            deadline
        ));
    }
    Ok(())
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(subcommand) = args.first() else {
        return match context.view.focused_goal() {
            Some(goal_id) => show_goal(context, goal_id),
            None => Err(CommandError::InvalidArguments(format!("usage: {GOAL_USAGE}"))),
        };
    };

    let rest = &args[1..];
    match subcommand.to_lowercase().as_str() {
        "new" | "create" => create_goal(context, rest),
        "show" => {
            let goal_id = match rest.first() {
                Some(token) => context.resolve_goal(token)?,
                None => context.view.focused_goal().ok_or_else(|| {
                    CommandError::InvalidArguments("usage: goal show <goal>".into())
                })?,
            };
            show_goal(context, goal_id)
        }
        "rename" => rename_goal(context, rest),
        "delete" | "remove" => delete_goal(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown goal subcommand `{other}`; usage: {GOAL_USAGE}"
        ))),
    }
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view = context.view.back();
    match context.focused_goal() {
        Some(goal) => output::info(format!("Back to {}.", goal.base_name())),
        None => output::info("Back to the dashboard."),
    }
    Ok(())
}

fn create_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let new_goal = if args.is_empty() {
        if context.mode() == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "usage: goal new <name> <target> [--initial <amount>] [--deadline YYYY-MM-DD] [--color <name|hex>]".into(),
            ));
        }
        context.view = ViewState::CreatingGoal;
        match goal_wizard(context) {
            Ok(new_goal) => new_goal,
            Err(err) => {
                context.view = context.view.back();
                return Err(err);
            }
        }
    } else {
        goal_from_args(context, args)?
    };

    let goal = match context.manager.create_goal(new_goal) {
        Ok(goal) => goal,
        Err(err) => {
            if context.view == ViewState::CreatingGoal {
                context.view = context.view.back();
            }
            return Err(err.into());
        }
    };
    context.view = ViewState::open_goal(goal.id);
    output::success(format!(
        "Goal created: {} (target {}).",
        goal.name,
        context.format_amount(goal.target_amount)
    ));
    Ok(())
}

fn goal_from_args(context: &ShellContext, args: &[&str]) -> Result<NewGoal, CommandError> {
    let (positional, flags) = split_flags(args, &["initial", "deadline", "color"])?;
    let [name, target] = positional.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: goal new <name> <target> [--initial <amount>] [--deadline YYYY-MM-DD] [--color <name|hex>]".into(),
        ));
    };

    let mut new_goal = NewGoal::new(*name, context.parse_amount(target)?)
        .with_color(default_color(context));
    for (flag, value) in flags {
        new_goal = match flag {
            "initial" => new_goal.with_initial_amount(context.parse_amount(value)?),
            "deadline" => new_goal.with_deadline(context.parse_date(value)?),
            _ => new_goal.with_color(parse_color(value)?),
        };
    }
    Ok(new_goal)
}

fn goal_wizard(context: &ShellContext) -> Result<NewGoal, CommandError> {
    output::section("New goal");
    let name = io::prompt_text(&context.theme, "Name")?;
    let target = io::prompt_text(&context.theme, "Target amount")?;
    let mut new_goal = NewGoal::new(name, context.parse_amount(&target)?);

    if let Some(initial) = io::prompt_optional(&context.theme, "Already saved (blank for none)")? {
        new_goal = new_goal.with_initial_amount(context.parse_amount(&initial)?);
    }
    if let Some(deadline) =
        io::prompt_optional(&context.theme, "Deadline YYYY-MM-DD (blank for none)")?
    {
        new_goal = new_goal.with_deadline(context.parse_date(&deadline)?);
    }

    let suggested = default_color(context);
    let labels: Vec<String> = GoalColor::PALETTE
        .iter()
        .map(|color| color.label().to_string())
        .collect();
    let default_index = GoalColor::PALETTE
        .iter()
        .position(|color| *color == suggested)
        .unwrap_or(0);
    let choice = io::select_index(&context.theme, "Color", &labels, default_index)?;
    Ok(new_goal.with_color(GoalColor::PALETTE[choice]))
}

fn default_color(context: &ShellContext) -> GoalColor {
    context
        .config
        .default_color
        .unwrap_or_else(|| GoalColor::cycle(context.manager.ledger().len()))
}

fn parse_color(raw: &str) -> Result<GoalColor, CommandError> {
    GoalColor::from_str(raw).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

fn show_goal(context: &mut ShellContext, goal_id: Uuid) -> CommandResult {
    context.view = ViewState::open_goal(goal_id);
    let goal = context.goal(goal_id)?;
    render_goal(context, goal);
    Ok(())
}

fn render_goal(context: &ShellContext, goal: &Goal) {
    let today = context.manager.today();
    let percentage = SummaryService::progress_percentage(goal);

    output::section(paint_goal_name(goal));
    output::line(format!(
        "  {} {}",
        progress_bar(percentage, BAR_WIDTH),
        format_percentage(percentage)
    ));
    output::line(format!(
        "  Saved     : {} of {}",
        context.format_amount(goal.current_amount),
        context.format_amount(goal.target_amount)
    ));
    output::line(format!(
        "  Remaining : {}",
        context.format_amount(SummaryService::remaining(goal))
    ));
    if let Some(deadline) = goal.active_deadline() {
        let days = SummaryService::days_remaining(goal, today).unwrap_or_default();
        let status = if days < 0 {
            format!("{} days overdue", -days)
        } else {
            format!("{days} days left")
        };
        output::line(format!("  Deadline  : {} ({status})", format_date(deadline)));
        if let Some(monthly) = SummaryService::monthly_target(goal, today) {
            output::line(format!(
                "  Per month : {} to finish on time",
                context.format_amount(monthly)
            ));
        }
    }
    output::line(format!("  Created   : {}", goal.created_at.format("%Y-%m-%d")));
    if SummaryService::is_complete(goal) {
        output::success("Target reached.");
    }

    output::section("History");
    let history = SummaryService::history(goal);
    if history.is_empty() {
        output::info("No contributions yet.");
    }
    for (index, entry) in history.iter().enumerate() {
        let marker = if entry.is_initial { "  (initial)" } else { "" };
        output::line(format!(
            "{:>3}. {}  {:>14}  {}{}",
            index + 1,
            format_date(entry.date),
            context.format_amount(entry.amount),
            short_id(entry.id),
            marker
        ));
    }

    let months = SummaryService::monthly_summary(goal);
    if !months.is_empty() {
        output::section("By month");
        for month in months {
            output::line(format!(
                "  {}  {:>14}  ({} contribution{})",
                month.label(),
                context.format_amount(month.total),
                month.count,
                if month.count == 1 { "" } else { "s" }
            ));
        }
    }
}

fn rename_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (token, name_parts) = args.split_first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: goal rename <goal> <new name>".into())
    })?;
    let goal_id = context.resolve_goal(token)?;

    let new_name = if name_parts.is_empty() {
        if context.mode() == CliMode::Script {
            return Err(CommandError::InvalidArguments(
                "usage: goal rename <goal> <new name>".into(),
            ));
        }
        context.view = ViewState::RenamingGoal(goal_id);
        let answer = io::prompt_text(&context.theme, "New name");
        context.view = context.view.back();
        answer?
    } else {
        name_parts.join(" ")
    };

    context.manager.rename_goal(goal_id, &new_name)?;
    output::success(format!("Goal renamed to {}.", new_name.trim()));
    Ok(())
}

fn delete_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: goal delete <goal>".into()))?;
    let goal_id = context.resolve_goal(token)?;
    let name = context.goal(goal_id)?.base_name().to_string();

    let previous = context.view;
    context.view = ViewState::ConfirmingGoalDelete(goal_id);
    let confirmed = context.confirm(&format!(
        "Delete `{name}` and all of its contributions?"
    ));
    let confirmed = match confirmed {
        Ok(answer) => answer,
        Err(err) => {
            context.view = previous;
            return Err(err);
        }
    };
    if !confirmed {
        context.view = previous;
        output::info("Operation cancelled.");
        return Ok(());
    }

    context.manager.delete_goal(goal_id)?;
    context.view = previous.forget_goal(goal_id);
    output::success(format!("Goal deleted: {name}."));
    Ok(())
}
