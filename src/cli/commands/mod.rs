pub mod calculation;
pub mod config;
pub mod rows;
pub mod sync;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};

const ROOT_COMMAND_ORDER: &[&str] = &[
    "income", "add", "edit", "remove", "rows", "calc", "save", "load", "saved", "new", "delete",
    "sync", "config", "help", "version", "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(rows::definitions());
    commands.extend(calculation::definitions());
    commands.extend(sync::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {}", usage))
}

/// Joins the remaining arguments into a calculation name.
pub(crate) fn name_argument(args: &[&str], usage: &str) -> Result<String, CommandError> {
    let name = args.join(" ");
    if name.trim().is_empty() {
        Err(usage_error(usage))
    } else {
        Ok(name)
    }
}
