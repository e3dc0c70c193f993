//! Shell context, dispatch, and error reporting.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    calculation::{FixedCostRow, RowHandle},
    config::{Config, ConfigManager},
    errors::CalcError,
    session::{CalculationSession, CalculationView},
    storage::{CalculationStore, JsonCalculationStore},
    sync::{DirectoryRemote, SyncHandler},
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

pub(crate) const NEW_UNSAVED: &str = "new, unsaved";

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

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CalcError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Errors that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CalcError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Prints session notifications to the terminal.
#[derive(Debug, Default)]
pub struct ShellView;

impl CalculationView for ShellView {
    fn on_rows_cleared(&mut self) {
        tracing::debug!("form rows cleared");
    }

    fn display_result(&mut self, value: i64) {
        cli_io::print_success(format!("Savable money: {}", value));
    }

    fn display_error(&mut self, error: &CalcError) {
        cli_io::print_error(error);
    }

    fn display_loaded_name(&mut self, name: Option<&str>) {
        cli_io::print_info(format!("Loaded: {}", name.unwrap_or(NEW_UNSAVED)));
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: CalculationSession<ShellView>,
    pub store: JsonCalculationStore,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub sync: Option<SyncHandler<DirectoryRemote>>,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    /// Builds a shell whose data lives under `base` instead of the default home.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::with_base_dir(base)?)
    }

    fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        if mode == CliMode::Script {
            output::disable_colors();
        }

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let store =
            JsonCalculationStore::new(config.resolve_calculations_dir(config_manager.base_dir()))?;
        let sync = build_sync(&config, &config_manager)?;

        let mut context = ShellContext {
            mode,
            registry,
            session: CalculationSession::with_view(ShellView),
            store,
            config_manager,
            config,
            sync,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.auto_load_last();
        Ok(context)
    }

    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(name) = self.config.last_opened_calculation.clone() else {
            return;
        };
        if !self.store.exists(&name) {
            return;
        }
        if self.session.load(&self.store, &name).is_ok() {
            cli_io::print_success(format!("Automatically loaded last calculation `{}`.", name));
        }
    }

    /// Switches to `candidate`. The store and sync handler are rebuilt first;
    /// when either fails, nothing is saved and the current settings stay.
    pub(crate) fn replace_config(&mut self, candidate: Config) -> CommandResult {
        let base = self.config_manager.base_dir();
        let store = JsonCalculationStore::new(candidate.resolve_calculations_dir(base))?;
        let sync = build_sync(&candidate, &self.config_manager)?;
        self.config_manager.save(&candidate)?;
        self.store = store;
        self.sync = sync;
        self.config = candidate;
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn remember_last_opened(&mut self, name: Option<&str>) -> CommandResult {
        self.config.last_opened_calculation = name.map(str::to_string);
        self.persist_config()
    }

    pub(crate) fn prompt(&self) -> String {
        format!(
            "savings[{}]> ",
            self.session.loaded_name().unwrap_or("unsaved")
        )
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Local names plus any names only known to the remote drive.
    pub(crate) fn calculation_names(&self) -> Vec<String> {
        let mut names = self.store.list().unwrap_or_default();
        if let Some(sync) = &self.sync {
            names.extend(sync.calculation_names());
        }
        names.sort();
        names.dedup();
        names
    }

    /// Asks before discarding work; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    /// Resolves a 1-based row number as shown by `rows`.
    pub(crate) fn row_handle(&self, arg: &str) -> Result<RowHandle, CommandError> {
        let rows = self.session.rows();
        let invalid = || {
            CommandError::InvalidArguments(format!(
                "row `{}` does not exist; choose 1-{}",
                arg,
                rows.len()
            ))
        };
        let number: usize = arg.parse().map_err(|_| invalid())?;
        number
            .checked_sub(1)
            .and_then(|index| rows.handle_at(index))
            .ok_or_else(invalid)
    }

    pub(crate) fn row(&self, handle: RowHandle) -> Option<&FixedCostRow> {
        self.session.rows().get(handle)
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

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
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
            if distance <= 2 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        Ok(self.confirm("Exit shell?")?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CalcError::RowNotFound(handle)) => {
                tracing::error!(%handle, "command referenced an untracked row");
                cli_io::print_error("That row is no longer on the form.");
            }
            other => cli_io::print_error(other),
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }
}

fn build_sync(
    config: &Config,
    manager: &ConfigManager,
) -> Result<Option<SyncHandler<DirectoryRemote>>, CalcError> {
    if !config.sync_enabled {
        return Ok(None);
    }
    let remote = DirectoryRemote::new(config.resolve_remote_dir(manager.base_dir()))?;
    tracing::info!(remote = %remote.root().display(), "remote sync enabled");
    Ok(Some(SyncHandler::new(remote)))
}
