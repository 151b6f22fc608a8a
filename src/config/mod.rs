use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::EditorError,
    utils::persistence::{read_json, write_json_atomic},
};

/// Screen name used for the help topic of the nomenclature editor.
pub const SCREEN_NAME: &str = "pentnom";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub locale: String,
    /// Article catalog file; relative paths resolve against the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,
    /// Nomenclature store file; relative paths resolve against the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_file: Option<PathBuf>,
    /// Answer used for the save-on-close question when none can be asked.
    pub confirm_default: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub help_topics: BTreeMap<String, String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            locale: "fr-FR".into(),
            catalog_file: None,
            store_file: None,
            confirm_default: true,
            help_topics: BTreeMap::new(),
        }
    }
}

impl EditorConfig {
    /// Help text configured for `screen`, empty when there is none.
    pub fn help_topic(&self, screen: &str) -> &str {
        self.help_topics
            .get(screen)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn catalog_path(&self, base: &Path) -> PathBuf {
        resolve(base, self.catalog_file.as_deref())
            .unwrap_or_else(|| PathResolver::catalog_file_in(base))
    }

    pub fn store_path(&self, base: &Path) -> PathBuf {
        resolve(base, self.store_file.as_deref())
            .unwrap_or_else(|| PathResolver::store_file_in(base))
    }
}

fn resolve(base: &Path, configured: Option<&Path>) -> Option<PathBuf> {
    configured.map(|path| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        }
    })
}

/// Loads and saves [`EditorConfig`] inside the application data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, EditorError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, EditorError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Missing configuration files yield the defaults.
    pub fn load(&self) -> Result<EditorConfig, EditorError> {
        read_json(&self.path)
            .map(Option::unwrap_or_default)
            .map_err(|err| EditorError::Config(err.to_string()))
    }

    pub fn save(&self, config: &EditorConfig) -> Result<(), EditorError> {
        write_json_atomic(config, &self.path).map_err(|err| EditorError::Config(err.to_string()))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
