use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::errors::CalcError;
use crate::storage::{validate_name, CalculationStore};

use super::name_argument;

const SAVE_USAGE: &str = "save <name>";
const LOAD_USAGE: &str = "load <name>";
const LOSE_CURRENT: &str = "The current calculation will be lost. Continue?";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "save",
            "Save the calculation under a name (replaces an existing one)",
            SAVE_USAGE,
            cmd_save,
        ),
        CommandEntry::new("load", "Load a saved calculation", LOAD_USAGE, cmd_load),
        CommandEntry::new("saved", "List saved calculations", "saved", cmd_saved),
        CommandEntry::new("new", "Start a new, empty calculation", "new", cmd_new),
        CommandEntry::new(
            "delete",
            "Delete the loaded calculation",
            "delete",
            cmd_delete,
        ),
    ]
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = name_argument(args, SAVE_USAGE)?;
    context.session.save(&context.store, &name)?;
    let saved_as = context
        .session
        .loaded_name()
        .unwrap_or(name.as_str())
        .to_string();
    cli_io::print_success(format!("Saved calculation `{}`.", saved_as));
    context.remember_last_opened(Some(&saved_as))?;

    if let Some(sync) = context.sync.as_mut() {
        let uploaded = context
            .store
            .load_raw(&saved_as)
            .and_then(|json| sync.upload_or_update(&saved_as, json.as_bytes()));
        match uploaded {
            Ok(file) => cli_io::print_info(format!("Uploaded to remote as `{}`.", file.name)),
            Err(err) => cli_io::print_warning(format!("Saved locally; remote sync failed: {}", err)),
        }
    }
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = name_argument(args, LOAD_USAGE)?;
    let name = validate_name(&name)?.to_string();
    if !context.confirm(LOSE_CURRENT)? {
        cli_io::print_info("Load cancelled.");
        return Ok(());
    }

    let loaded = if context.store.exists(&name) {
        context.session.load(&context.store, &name)
    } else if let Some(sync) = context.sync.as_mut() {
        let (file, contents) = sync.fetch(&name)?;
        let result = context.session.load_json(&file.name, &contents);
        // The remote file becomes the loaded one only after `select` below.
        if result.is_ok() {
            let local_name = context.session.loaded_name().unwrap_or(name.as_str()).to_string();
            context.store.save(&local_name, &context.session.to_record())?;
        }
        result
    } else {
        return Err(CalcError::CalculationNotFound(name).into());
    };

    match loaded {
        Ok(_) => {
            let loaded_name = context.session.loaded_name().map(str::to_string);
            context.remember_last_opened(loaded_name.as_deref())?;
            if let (Some(sync), Some(loaded_name)) = (context.sync.as_mut(), loaded_name) {
                if let Err(err) = sync.select(&loaded_name) {
                    cli_io::print_warning(format!("Remote listing unavailable: {}", err));
                }
            }
            Ok(())
        }
        Err(_) => {
            cli_io::print_hint("The current calculation was kept.");
            Ok(())
        }
    }
}

fn cmd_saved(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let local = context.store.list()?;
    let mut remote_only = Vec::new();
    if let Some(sync) = context.sync.as_mut() {
        match sync.refresh().map(|_| ()) {
            Ok(()) => {
                remote_only = sync
                    .calculation_names()
                    .into_iter()
                    .filter(|name| !local.contains(name))
                    .collect();
            }
            Err(err) => cli_io::print_warning(format!("Remote listing unavailable: {}", err)),
        }
    }

    output::section("Saved calculations");
    if local.is_empty() && remote_only.is_empty() {
        output::line("  (none)");
        return Ok(());
    }
    let current = context.session.loaded_name();
    for name in &local {
        let marker = if Some(name.as_str()) == current { " *" } else { "" };
        output::line(format!("  {}{}", name, marker));
    }
    for name in &remote_only {
        output::line(format!("  {} (remote)", name));
    }
    Ok(())
}

fn cmd_new(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm(LOSE_CURRENT)? {
        cli_io::print_info("Kept the current calculation.");
        return Ok(());
    }
    context.session.new_calculation();
    if let Some(sync) = context.sync.as_mut() {
        sync.clear_loaded();
    }
    context.remember_last_opened(None)
}

fn cmd_delete(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(name) = context.session.loaded_name().map(str::to_string) else {
        return Err(CommandError::InvalidArguments(
            "No saved calculation is loaded; nothing to delete.".into(),
        ));
    };
    if !context.confirm(&format!("Really delete calculation `{}`?", name))? {
        cli_io::print_info("Nothing deleted.");
        return Ok(());
    }

    if let Some(sync) = context.sync.as_mut() {
        let removed = sync.select(&name).and_then(|_| sync.delete_loaded());
        match removed {
            Ok(Some(file)) => cli_io::print_info(format!("Removed remote copy `{}`.", file.name)),
            Ok(None) => {}
            Err(err) => cli_io::print_warning(format!("Remote copy not removed: {}", err)),
        }
    }

    if context.store.exists(&name) {
        context.session.delete_loaded(&context.store)?;
    } else {
        context.session.new_calculation();
    }
    cli_io::print_success(format!("Deleted calculation `{}`.", name));
    context.remember_last_opened(None)
}
