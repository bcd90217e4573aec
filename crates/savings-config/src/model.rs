use std::path::{Path, PathBuf};

use savings_domain::GoalColor;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Keys accepted by [`Config::set_value`].
pub const CONFIG_KEYS: &[&str] = &[
    "currency",
    "locale",
    "max-goals",
    "allow-withdrawals",
    "color",
    "ui-color",
    "backup-retention",
];

/// Stores user-configurable preferences for the tracker and its shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Upper bound on the number of goals the host will create.
    #[serde(default = "Config::default_max_goals")]
    pub max_goals: usize,
    /// Accept negative contributions (withdrawals).
    #[serde(default)]
    pub allow_withdrawals: bool,
    /// Color for new goals; unset cycles through the palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_color: Option<GoalColor>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the goal document. Defaults to `<home>/data`.
    pub data_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            max_goals: Self::default_max_goals(),
            allow_withdrawals: false,
            default_color: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            data_root: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "en-US".into()
    }

    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_max_goals() -> usize {
        5
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_data_root(&self, base: &Path) -> PathBuf {
        match &self.data_root {
            Some(path) => path.clone(),
            None => base.join("data"),
        }
    }

    pub fn resolve_backup_root(&self, base: &Path) -> PathBuf {
        self.resolve_data_root(base).join("backups")
    }

    /// Updates one preference from its textual form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "currency" => {
                if value.is_empty() {
                    return Err(ConfigError::invalid(key, "currency code must not be empty"));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "locale" => {
                if value.is_empty() {
                    return Err(ConfigError::invalid(key, "locale must not be empty"));
                }
                self.locale = value.to_string();
            }
            "max-goals" => {
                self.max_goals = parse_positive(key, value)?;
            }
            "backup-retention" => {
                self.backup_retention = parse_positive(key, value)?;
            }
            "allow-withdrawals" => {
                self.allow_withdrawals = parse_flag(key, value)?;
            }
            "ui-color" => {
                self.ui_color_enabled = parse_flag(key, value)?;
            }
            "color" => {
                self.default_color = match value.to_ascii_lowercase().as_str() {
                    "" | "auto" | "none" => None,
                    _ => Some(
                        value
                            .parse::<GoalColor>()
                            .map_err(|err| ConfigError::invalid(key, err.to_string()))?,
                    ),
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(ConfigError::invalid(
            key,
            format!("expected a positive whole number, got `{value}`"),
        )),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::invalid(
            key,
            format!("expected true or false, got `{value}`"),
        )),
    }
}
