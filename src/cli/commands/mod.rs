pub mod backups;
pub mod config;
pub mod contribution;
pub mod goal;
pub mod summary;
pub mod system;

use crate::cli::error::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let definitions = goal::definitions()
        .into_iter()
        .chain(contribution::definitions())
        .chain(summary::definitions())
        .chain(config::definitions())
        .chain(backups::definitions())
        .chain(system::definitions());
    for entry in definitions {
        registry.register(entry);
    }
}

/// Splits `--flag value` pairs from positional arguments.
pub(crate) fn split_flags<'a>(
    args: &[&'a str],
    known: &[&str],
) -> Result<(Vec<&'a str>, Vec<(&'a str, &'a str)>), CommandError> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            if !known.contains(&flag) {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{flag}`"
                )));
            }
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("`--{flag}` needs a value"))
            })?;
            flags.push((flag, value));
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, flags))
}
