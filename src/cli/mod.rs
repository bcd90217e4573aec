pub mod commands;
pub mod context;
pub mod error;
pub mod format;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub(crate) mod shell;

pub use context::{CliMode, ShellContext};
pub use error::{CliError, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
