use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{ConfigManager, EditorConfig},
    core::EditSession,
    storage::{JsonArticleCatalog, JsonNomenclatureStore},
};

use super::registry::CommandRegistry;

/// Session type driven by the shell.
pub type ShellSession = EditSession<JsonArticleCatalog, JsonNomenclatureStore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: EditorConfig,
    pub session: ShellSession,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, dirty: {} }}",
            self.running,
            self.last_command,
            self.session.is_dirty()
        )
    }
}
