use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{CalcError, Result},
    storage::json_backend::{tmp_path, write_atomic},
    utils::paths::{ensure_dir, PathResolver},
};

/// User preferences persisted next to the calculations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Overrides `<home>/calculations`.
    pub calculations_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Overrides `<home>/remote`, the folder used as the remote drive.
    pub remote_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_calculation: Option<String>,
}

impl Config {
    pub const KEYS: &'static [&'static str] = &[
        "sync_enabled",
        "calculations_dir",
        "remote_dir",
        "last_opened_calculation",
    ];

    pub fn resolve_calculations_dir(&self, base: &Path) -> PathBuf {
        self.calculations_dir
            .clone()
            .unwrap_or_else(|| PathResolver::calculations_dir_in(base))
    }

    pub fn resolve_remote_dir(&self, base: &Path) -> PathBuf {
        self.remote_dir
            .clone()
            .unwrap_or_else(|| PathResolver::remote_dir_in(base))
    }

    /// Updates one setting from its textual form. `none` or an empty value
    /// clears optional settings.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let cleared = value.is_empty() || value.eq_ignore_ascii_case("none");
        match key.to_lowercase().as_str() {
            "sync_enabled" => {
                self.sync_enabled = match value.to_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => {
                        return Err(CalcError::Config(format!(
                            "sync_enabled expects on/off, got `{}`",
                            value
                        )))
                    }
                };
            }
            "calculations_dir" => {
                self.calculations_dir = (!cleared).then(|| PathBuf::from(value));
            }
            "remote_dir" => {
                self.remote_dir = (!cleared).then(|| PathBuf::from(value));
            }
            "last_opened_calculation" => {
                self.last_opened_calculation = (!cleared).then(|| value.to_string());
            }
            other => {
                return Err(CalcError::Config(format!(
                    "unknown config key `{}`",
                    other
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| CalcError::Config(err.to_string()))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| CalcError::Config(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        assert_eq!(manager.load().expect("load"), Config::default());
    }

    #[test]
    fn saved_config_is_loaded_back() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

        let mut config = Config::default();
        config.set_value("sync_enabled", "on").unwrap();
        config.set_value("remote_dir", "/tmp/drive").unwrap();
        manager.save(&config).expect("save");

        let loaded = manager.load().expect("load");
        assert!(loaded.sync_enabled);
        assert_eq!(loaded.remote_dir, Some(PathBuf::from("/tmp/drive")));
    }

    #[test]
    fn set_value_rejects_unknown_keys_and_bad_flags() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("colour", "red"),
            Err(CalcError::Config(_))
        ));
        assert!(config.set_value("sync_enabled", "maybe").is_err());
        config.set_value("remote_dir", "x").unwrap();
        config.set_value("remote_dir", "none").unwrap();
        assert_eq!(config.remote_dir, None);
    }

    #[test]
    fn corrupt_config_is_a_config_error() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
        fs::write(manager.path(), "{oops").unwrap();
        assert!(matches!(manager.load(), Err(CalcError::Config(_))));
    }
}
