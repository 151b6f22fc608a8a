use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".nomenclature_editor";
const CONFIG_FILE: &str = "config.json";
const CATALOG_FILE: &str = "articles.json";
const STORE_FILE: &str = "nomenclatures.json";

/// Environment variable overriding the application data directory.
pub const HOME_ENV: &str = "NOMENCLATURE_EDITOR_HOME";

/// Resolves the files the editor reads and writes.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, defaulting to `~/.nomenclature_editor`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn catalog_file_in(base: &Path) -> PathBuf {
        base.join(CATALOG_FILE)
    }

    pub fn store_file_in(base: &Path) -> PathBuf {
        base.join(STORE_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
