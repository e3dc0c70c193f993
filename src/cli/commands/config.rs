use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::Config;

use super::usage_error;

const CONFIG_USAGE: &str = "config [key value]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change settings",
        CONFIG_USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            show_config(context);
            Ok(())
        }
        [key, value] => {
            let mut candidate = context.config.clone();
            candidate.set_value(key, value)?;
            context.replace_config(candidate)?;
            cli_io::print_success("Configuration updated.");
            Ok(())
        }
        _ => Err(usage_error(CONFIG_USAGE)),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    let base = context.config_manager.base_dir();
    output::section("Configuration");
    output::line(format!(
        "  sync_enabled:            {}",
        if config.sync_enabled { "on" } else { "off" }
    ));
    output::line(format!(
        "  calculations_dir:        {}",
        config.resolve_calculations_dir(base).display()
    ));
    output::line(format!(
        "  remote_dir:              {}",
        config.resolve_remote_dir(base).display()
    ));
    output::line(format!(
        "  last_opened_calculation: {}",
        config.last_opened_calculation.as_deref().unwrap_or("(none)")
    ));
    cli_io::print_hint(format!("Keys: {}", Config::KEYS.join(", ")));
}
