use savings_config::CONFIG_KEYS;

use crate::cli::context::ShellContext;
use crate::cli::error::{CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )
    .with_subcommands(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context.set_config_value(&key, value.trim())?;
            output::success(format!("Preference `{key}` updated."));
            if key == "backup-retention" {
                output::hint("The new retention applies from the next start.");
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`; usage: config [show|set <key> <value>]"
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output::section("Configuration");
    output::line(format!("  currency          : {}", config.currency));
    output::line(format!("  locale            : {}", config.locale));
    output::line(format!("  max-goals         : {}", config.max_goals));
    output::line(format!("  allow-withdrawals : {}", config.allow_withdrawals));
    output::line(format!(
        "  color             : {}",
        config
            .default_color
            .map(|color| color.to_string())
            .unwrap_or_else(|| "auto".into())
    ));
    output::line(format!("  ui-color          : {}", config.ui_color_enabled));
    output::line(format!("  backup-retention  : {}", config.backup_retention));
    output::line(format!(
        "  config file       : {}",
        context.config_manager.config_path().display()
    ));
    output::line(format!(
        "  goal document     : {}",
        context
            .store
            .document_path(savings_core::GOALS_STORAGE_KEY)
            .display()
    ));
}
