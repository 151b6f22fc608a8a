//! Shell context construction, dispatch, and error reporting.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::ConfigManager,
    core::{ClosePrompt, CloseOutcome, EditSession},
    domain::LaunchParams,
    errors::{EditorError, StoreError},
    storage::{JsonArticleCatalog, JsonNomenclatureStore},
};

use super::commands;
use super::output;
use super::shell_context::{CliMode, ShellContext};
use super::test_mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single shell command. Reported, then the loop continues.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failure that stops the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<CommandError> for EditorError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Editor(err) => err,
            CommandError::Io(err) => EditorError::Io(err),
            CommandError::Dialoguer(dialoguer::Error::IO(err)) => EditorError::Io(err),
            other => EditorError::Io(io::Error::new(io::ErrorKind::Other, other.to_string())),
        }
    }
}

/// Answers the save-on-close question from the terminal, or from scripted
/// answers when running unattended.
pub struct ShellPrompt<'a> {
    mode: CliMode,
    theme: &'a ColorfulTheme,
    default: bool,
}

impl<'a> ShellPrompt<'a> {
    pub fn new(mode: CliMode, theme: &'a ColorfulTheme, default: bool) -> Self {
        Self {
            mode,
            theme,
            default,
        }
    }
}

impl ClosePrompt for ShellPrompt<'_> {
    fn confirm_save(&mut self, message: &str) -> Result<bool, EditorError> {
        let question = message.replace('\n', " ");
        let scripted = test_mode::next_confirmation(&question).or(match self.mode {
            CliMode::Script => Some(self.default),
            CliMode::Interactive => None,
        });
        if let Some(answer) = scripted {
            output::info(format!("{} {}", question, if answer { "oui" } else { "non" }));
            return Ok(answer);
        }
        let answer = Confirm::with_theme(self.theme)
            .with_prompt(question)
            .default(self.default)
            .interact()
            .map_err(CommandError::from)?;
        Ok(answer)
    }
}

impl ShellContext {
    /// Loads configuration, opens the catalog and store, and opens the session.
    pub fn new(mode: CliMode, params: LaunchParams) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, params, config_manager)
    }

    pub fn with_config_manager(
        mode: CliMode,
        params: LaunchParams,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let base = config_manager.base_dir().to_path_buf();
        let catalog = JsonArticleCatalog::load_or_empty(&config.catalog_path(&base))?;
        let store = JsonNomenclatureStore::new(config.store_path(&base));
        let session = EditSession::open(params, catalog, store)?;

        Ok(Self {
            mode,
            registry: commands::registry(),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            session,
            last_command: None,
            running: true,
        })
    }

    pub fn prompt(&self) -> String {
        let marker = if self.session.is_dirty() { "*" } else { "" };
        format!("nomenclature {}{}> ", self.session.key(), marker)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, raw: &str) {
        let needle = raw.to_ascii_lowercase();
        let suggestion = self
            .registry
            .names()
            .into_iter()
            .map(|name| (levenshtein(&needle, name), name))
            .filter(|(distance, _)| *distance <= 2)
            .min();
        match suggestion {
            Some((_, name)) => output::warning(format!(
                "Unknown command `{}`. Did you mean `{}`?",
                raw, name
            )),
            None => output::warning(format!(
                "Unknown command `{}`. Type `help` for the list of commands.",
                raw
            )),
        }
    }

    /// Prints a command failure, with the field to correct when the session
    /// asked for focus.
    pub(crate) fn report_error(&mut self, err: CommandError) -> Result<(), CliError> {
        match &err {
            CommandError::Editor(
                EditorError::Validation(_)
                | EditorError::ArticleNotFound(_)
                | EditorError::InvalidValue { .. }
                | EditorError::ReadOnlyField(_),
            )
            | CommandError::InvalidArguments(_) => output::warning(&err),
            _ => output::error(&err),
        }
        if let Some(field) = self.session.take_focus() {
            output::info(format!("Corrigez le champ {}.", field));
        }
        Ok(())
    }

    /// Resolves a close through the save-on-close gate. A failed save keeps
    /// the session, and the shell, running.
    pub(crate) fn close_session(&mut self) -> CommandResult {
        if self.session.is_closed() {
            self.running = false;
            return Ok(());
        }
        let mut prompt = ShellPrompt::new(self.mode, &self.theme, self.config.confirm_default);
        let outcome = self.session.request_close(&mut prompt)?;
        report_close(outcome);
        self.running = false;
        Ok(())
    }

    /// Called when input ends or the user interrupts the shell.
    pub(crate) fn close_on_exit(&mut self) -> Result<(), CliError> {
        if let Err(err) = self.close_session() {
            self.report_error(err)?;
            output::warning("Modifications non enregistrées abandonnées.");
        }
        self.running = false;
        Ok(())
    }
}

pub(crate) fn report_close(outcome: CloseOutcome) {
    match outcome {
        CloseOutcome::Closed => output::info("Fenêtre fermée."),
        CloseOutcome::Saved => output::success("Nomenclature enregistrée. Fenêtre fermée."),
        CloseOutcome::Discarded => output::warning("Modifications abandonnées."),
    }
}
