//! Shell state, dispatch, and the argument resolution shared by every command.

use std::path::Path;

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use savings_config::{Config, ConfigManager};
use savings_core::{parse_amount, AmountPolicy, SummaryService, ViewState};
use savings_domain::{Contribution, Goal};
use savings_storage_json::JsonFileStore;
use strsim::levenshtein;
use uuid::Uuid;

use super::commands;
use super::error::{CliError, CommandError, CommandResult};
use super::format;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
use crate::ledger::GoalManager;
use crate::utils::paths;

/// Longer all-digit tokens are treated as id prefixes, not list positions.
const POSITION_MAX_DIGITS: usize = 4;

fn parse_position(token: &str) -> Option<usize> {
    if token.len() > POSITION_MAX_DIGITS {
        return None;
    }
    token.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) manager: GoalManager,
    pub(crate) store: JsonFileStore,
    pub(crate) config: Config,
    pub(crate) config_manager: ConfigManager,
    pub(crate) view: ViewState,
    pub(crate) theme: ColorfulTheme,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Opens the shell against the application data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::open(mode, &paths::app_data_dir())
    }

    /// Opens the shell with configuration and goals stored under `base`.
    pub fn open(mode: CliMode, base: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.to_path_buf())?;
        let config = config_manager.load()?;
        let store = JsonFileStore::with_retention(
            config.resolve_data_root(base),
            config.resolve_backup_root(base),
            config.backup_retention,
        )?;
        let mut manager = GoalManager::new(Box::new(store.clone()));
        let report = manager.load()?;

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut context = ShellContext {
            mode,
            registry,
            manager,
            store,
            config,
            config_manager,
            view: ViewState::Dashboard,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.apply_config();
        for warning in &report.warnings {
            output::warning(format!("Stored goals look inconsistent: {warning}"));
        }
        Ok(context)
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn prompt(&self) -> String {
        match self.focused_goal() {
            Some(goal) => format!("savings [{}]> ", goal.base_name()),
            None => "savings> ".to_string(),
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some(first) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(|err| match err {
            CommandError::Dialoguer(err) => CliError::Input(err),
            other => CliError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                other.to_string(),
            )),
        })
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other.to_string()),
        }
    }

    /// Asks before a destructive action. Script mode never blocks on input.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        match self.mode {
            CliMode::Script => Ok(true),
            CliMode::Interactive => cli_io::confirm_action(&self.theme, prompt, false),
        }
    }

    pub(crate) fn focused_goal(&self) -> Option<&Goal> {
        self.view
            .focused_goal()
            .and_then(|id| self.manager.goal(id))
    }

    pub(crate) fn goal(&self, id: Uuid) -> Result<&Goal, CommandError> {
        self.manager
            .goal(id)
            .ok_or_else(|| CommandError::Message(format!("goal {id} no longer exists")))
    }

    /// Resolves a goal by 1-based dashboard position, name, full id or id prefix.
    pub(crate) fn resolve_goal(&self, token: &str) -> Result<Uuid, CommandError> {
        let token = token.trim();
        let goals = &self.manager.ledger().goals;
        if token.is_empty() {
            return Err(CommandError::InvalidArguments("a goal is required".into()));
        }

        if let Some(position) = parse_position(token) {
            return position
                .checked_sub(1)
                .and_then(|index| goals.get(index))
                .map(|goal| goal.id)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "no goal at position {position} (there are {})",
                        goals.len()
                    ))
                });
        }

        let by_name: Vec<&Goal> = goals
            .iter()
            .filter(|goal| {
                goal.base_name().eq_ignore_ascii_case(token) || goal.name.eq_ignore_ascii_case(token)
            })
            .collect();
        if let [goal] = by_name.as_slice() {
            return Ok(goal.id);
        }

        let prefix = token.to_ascii_lowercase();
        let by_id: Vec<&Goal> = goals
            .iter()
            .filter(|goal| goal.id.to_string().starts_with(&prefix))
            .collect();
        match by_id.as_slice() {
            [goal] => Ok(goal.id),
            [] if by_name.is_empty() => Err(CommandError::InvalidArguments(format!(
                "no goal matches `{token}`"
            ))),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{token}` matches several goals; use its position or id"
            ))),
        }
    }

    /// Resolves a contribution by 1-based history position or id prefix.
    pub(crate) fn resolve_contribution(
        &self,
        goal_id: Uuid,
        token: &str,
    ) -> Result<&Contribution, CommandError> {
        let goal = self.goal(goal_id)?;
        let history = SummaryService::history(goal);
        let token = token.trim();

        if let Some(position) = parse_position(token) {
            return position
                .checked_sub(1)
                .and_then(|index| history.get(index).copied())
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "`{}` has no contribution at position {position}",
                        goal.base_name()
                    ))
                });
        }

        let prefix = token.to_ascii_lowercase().replace('-', "");
        let matches: Vec<&Contribution> = history
            .into_iter()
            .filter(|entry| !prefix.is_empty() && entry.id.simple().to_string().starts_with(&prefix))
            .collect();
        match matches.as_slice() {
            [entry] => Ok(entry),
            [] => Err(CommandError::InvalidArguments(format!(
                "no contribution matches `{token}`"
            ))),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{token}` matches several contributions"
            ))),
        }
    }

    pub(crate) fn parse_amount(&self, raw: &str) -> Result<Decimal, CommandError> {
        Ok(parse_amount(raw)?)
    }

    pub(crate) fn parse_date(&self, raw: &str) -> Result<NaiveDate, CommandError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a date (expected YYYY-MM-DD)"))
        })
    }

    pub(crate) fn format_amount(&self, amount: Decimal) -> String {
        format::format_amount(amount, &self.config.currency)
    }

    /// Pushes preferences into the manager and the output layer.
    pub(crate) fn apply_config(&mut self) {
        self.manager
            .set_policy(AmountPolicy::from_allow_withdrawals(self.config.allow_withdrawals));
        self.manager.set_max_goals(self.config.max_goals);
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled,
        });
    }

    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set_value(key, value)?;
        self.config_manager.save(&updated)?;
        self.config = updated;
        self.apply_config();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use savings_core::NewGoal;
    use tempfile::TempDir;

    fn context() -> (ShellContext, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let context = ShellContext::open(CliMode::Script, dir.path()).expect("open shell");
        (context, dir)
    }

    #[test]
    fn resolve_goal_accepts_position_name_and_prefix() {
        let (mut context, _dir) = context();
        let phone = context
            .manager
            .create_goal(NewGoal::new("Phone", dec!(500)))
            .unwrap();
        let bike = context
            .manager
            .create_goal(NewGoal::new("Bike", dec!(300)))
            .unwrap();

        assert_eq!(context.resolve_goal("2").unwrap(), bike.id);
        assert_eq!(context.resolve_goal("phone").unwrap(), phone.id);
        assert_eq!(context.resolve_goal(&bike.id.to_string()).unwrap(), bike.id);
        assert_eq!(context.resolve_goal(&phone.id.to_string()[..8]).unwrap(), phone.id);
        assert!(context.resolve_goal("3").is_err());
        assert!(context.resolve_goal("0").is_err());
        assert!(context.resolve_goal("laptop").is_err());
    }

    #[test]
    fn resolve_contribution_uses_history_order() {
        let (mut context, _dir) = context();
        let goal = context
            .manager
            .create_goal(NewGoal::new("Trip", dec!(900)).with_initial_amount(dec!(100)))
            .unwrap();
        let later = NaiveDate::from_ymd_opt(2999, 1, 1).unwrap();
        let newest = context
            .manager
            .add_contribution(goal.id, dec!(50), later)
            .unwrap();

        assert_eq!(context.resolve_contribution(goal.id, "1").unwrap().id, newest);
        assert!(context.resolve_contribution(goal.id, "2").unwrap().is_initial);
        let prefix = format::short_id(newest);
        assert_eq!(context.resolve_contribution(goal.id, &prefix).unwrap().id, newest);
        assert!(context.resolve_contribution(goal.id, "9").is_err());
    }

    #[test]
    fn unknown_command_does_not_stop_the_shell() {
        let (mut context, _dir) = context();
        let control = context.process_line("lsit").unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn config_changes_reach_the_manager() {
        let (mut context, _dir) = context();
        context.set_config_value("allow-withdrawals", "true").unwrap();
        context.set_config_value("max-goals", "1").unwrap();
        assert!(context.manager.policy().allows_withdrawals());
        assert_eq!(context.manager.max_goals(), 1);

        let reloaded = context.config_manager.load().unwrap();
        assert!(reloaded.allow_withdrawals);
        assert!(context.set_config_value("max-goals", "none").is_err());
        assert_eq!(context.config.max_goals, 1);
    }
}
