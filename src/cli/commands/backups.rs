use savings_core::{ViewState, GOALS_STORAGE_KEY};
use savings_storage_json::BackupInfo;

use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "backups [list] | backups restore <backup> | backups delete <backup>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "backups",
        "List, restore or delete snapshots of the goal document",
        USAGE,
        cmd_backups,
    )
    .with_subcommands(&["list", "restore", "delete"])]
}

fn cmd_backups(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None | Some("list") => list(context),
        Some("restore") => restore(context, &args[1..]),
        Some("delete") | Some("remove") => delete(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown backups subcommand `{other}`; usage: {USAGE}"
        ))),
    }
}

fn list(context: &ShellContext) -> CommandResult {
    let backups = context.store.list_backups(GOALS_STORAGE_KEY)?;
    output::section(format!(
        "Backups (keeping {})",
        context.store.retention()
    ));
    if backups.is_empty() {
        output::info("No backups yet. One is taken before every save.");
        return Ok(());
    }
    for (index, backup) in backups.iter().enumerate() {
        let created = backup
            .created_at
            .map(|stamp| stamp.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown time".into());
        output::line(format!(
            "{:>3}. {}  {}  {} bytes",
            index + 1,
            backup.id,
            created,
            backup.size_bytes
        ));
    }
    Ok(())
}

/// Accepts a 1-based list position or the backup file name.
fn resolve_backup(context: &ShellContext, token: &str) -> Result<BackupInfo, CommandError> {
    let mut backups = context.store.list_backups(GOALS_STORAGE_KEY)?;
    if let Ok(position) = token.parse::<usize>() {
        if position == 0 || position > backups.len() {
            return Err(CommandError::InvalidArguments(format!(
                "no backup at position {position} (there are {})",
                backups.len()
            )));
        }
        return Ok(backups.swap_remove(position - 1));
    }
    backups
        .into_iter()
        .find(|backup| backup.id == token || backup.id.trim_end_matches(".json") == token)
        .ok_or_else(|| CommandError::InvalidArguments(format!("no backup named `{token}`")))
}

fn restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: backups restore <backup>".into()))?;
    let backup = resolve_backup(context, token)?;
    if !context.confirm(&format!(
        "Replace the current goals with backup {}?",
        backup.id
    ))? {
        output::info("Operation cancelled.");
        return Ok(());
    }

    context.store.restore_backup(GOALS_STORAGE_KEY, &backup.id)?;
    let report = context.manager.load()?;
    context.view = ViewState::Dashboard;
    output::success(format!(
        "Restored {} ({} goal{}).",
        backup.id,
        report.goal_count,
        if report.goal_count == 1 { "" } else { "s" }
    ));
    for warning in report.warnings {
        output::warning(format!("Restored goals look inconsistent: {warning}"));
    }
    Ok(())
}

fn delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let token = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: backups delete <backup>".into()))?;
    let backup = resolve_backup(context, token)?;
    if !context.confirm(&format!("Delete backup {}?", backup.id))? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    context.store.delete_backup(GOALS_STORAGE_KEY, &backup.id)?;
    output::success(format!("Backup {} deleted.", backup.id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::CliMode;
    use tempfile::TempDir;

    #[test]
    fn restore_brings_back_the_previous_document() {
        let dir = TempDir::new().expect("tempdir");
        let mut context = ShellContext::open(CliMode::Script, dir.path()).expect("open shell");
        context.process_line("goal new Bike 300").unwrap();
        context.process_line("goal new Tent 200").unwrap();
        assert_eq!(context.manager.ledger().len(), 2);

        // Newest backup holds the document as it was before the second save.
        context.process_line("backups restore 1").unwrap();
        assert_eq!(context.manager.ledger().len(), 1);
        assert_eq!(context.manager.ledger().goals[0].name, "Bike");
        assert_eq!(context.view, ViewState::Dashboard);

        assert!(context.process_line("backups restore 99").is_err());
        assert!(context.process_line("backups restore nope").is_err());
    }

    #[test]
    fn delete_removes_a_backup() {
        let dir = TempDir::new().expect("tempdir");
        let mut context = ShellContext::open(CliMode::Script, dir.path()).expect("open shell");
        context.process_line("goal new Bike 300").unwrap();
        context.process_line("goal new Tent 200").unwrap();
        let before = context.store.list_backups(GOALS_STORAGE_KEY).unwrap().len();

        context.process_line("backups delete 1").unwrap();
        let after = context.store.list_backups(GOALS_STORAGE_KEY).unwrap().len();
        assert_eq!(after, before - 1);
    }
}
