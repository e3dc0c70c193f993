use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::storage::CALCULATION_FILE_EXTENSION;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("version", "Show version information", "version", cmd_version),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first() {
        match context.command(&command.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(command),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Savings Calc {}", env!("CARGO_PKG_VERSION")));
    output::line(format!("  Data dir:   {}", context.config_manager.base_dir().display()));
    output::line(format!("  Saved in:   {}", context.store.dir().display()));
    output::line(format!("  File type:  *{}", CALCULATION_FILE_EXTENSION));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
