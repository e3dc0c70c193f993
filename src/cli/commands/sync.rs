use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::storage::CalculationStore;

use super::usage_error;

const SYNC_USAGE: &str = "sync [push]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "sync",
        "List remote calculations, or push the loaded one",
        SYNC_USAGE,
        cmd_sync,
    )]
}

fn cmd_sync(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let push = match args {
        [] => false,
        [flag] if flag.eq_ignore_ascii_case("push") => true,
        _ => return Err(usage_error(SYNC_USAGE)),
    };
    let loaded = context.session.loaded_name().map(str::to_string);
    let Some(sync) = context.sync.as_mut() else {
        cli_io::print_warning("Remote sync is disabled.");
        cli_io::print_hint("Enable it with `config sync_enabled on`.");
        return Ok(());
    };

    if push {
        let name = loaded.ok_or_else(|| {
            CommandError::InvalidArguments("Save the calculation before pushing it.".into())
        })?;
        let json = context.store.load_raw(&name)?;
        let file = sync.upload_or_update(&name, json.as_bytes())?;
        cli_io::print_success(format!("Pushed `{}` ({}).", file.name, file.id));
        return Ok(());
    }

    let files = sync.refresh()?.to_vec();
    output::section("Remote calculations");
    if files.is_empty() {
        output::line("  (none)");
    }
    for file in files {
        output::line(format!(
            "  {:<24} {}",
            crate::storage::calculation_name_from(&file.name),
            file.modified_at.format("%Y-%m-%d %H:%M")
        ));
    }
    Ok(())
}
