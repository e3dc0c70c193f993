use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".savings_calc";
const HOME_ENV: &str = "SAVINGS_CALC_HOME";
const CALCULATIONS_DIR: &str = "calculations";
const REMOTE_DIR: &str = "remote";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Resolves the on-disk layout under the application home directory.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.savings_calc`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn calculations_dir_in(base: &Path) -> PathBuf {
        base.join(CALCULATIONS_DIR)
    }

    /// Folder standing in for the remote drive when no other is configured.
    pub fn remote_dir_in(base: &Path) -> PathBuf {
        base.join(REMOTE_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.exists() {
        Ok(())
    } else {
        fs::create_dir_all(path)
    }
}
