pub mod json_backend;

use std::path::PathBuf;

use crate::{
    calculation::CalculationRecord,
    errors::{CalcError, Result},
};

/// Extension shared by every saved calculation file.
pub const CALCULATION_FILE_EXTENSION: &str = ".json";

/// Abstraction over places that can hold named calculations.
pub trait CalculationStore {
    /// Writes `record` under `name`, replacing any previous file of that name.
    fn save(&self, name: &str, record: &CalculationRecord) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<CalculationRecord>;
    fn load_raw(&self, name: &str) -> Result<String>;
    fn list(&self) -> Result<Vec<String>>;
    fn delete(&self, name: &str) -> Result<()>;
    fn exists(&self, name: &str) -> bool;
    fn path_for(&self, name: &str) -> Result<PathBuf>;
}

/// Maps a calculation name to its file name.
pub fn file_name_for(name: &str) -> Result<String> {
    let name = validate_name(name)?;
    Ok(format!("{}{}", name, CALCULATION_FILE_EXTENSION))
}

/// Recovers the display name from a file name by stripping the extension.
pub fn calculation_name_from(file_name: &str) -> &str {
    file_name
        .strip_suffix(CALCULATION_FILE_EXTENSION)
        .unwrap_or(file_name)
}

/// Checks that `name` can be used as a file name. Returns the trimmed name.
///
/// Names already ending in the calculation extension are rejected so that a
/// name and its file always map one to one.
pub fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed.starts_with('.')
        || trimmed.ends_with(CALCULATION_FILE_EXTENSION)
        || trimmed
            .chars()
            .any(|ch| matches!(ch, '/' | '\\' | '\0') || ch.is_control());
    if invalid {
        Err(CalcError::InvalidName(name.to_string()))
    } else {
        Ok(trimmed)
    }
}

pub use json_backend::JsonCalculationStore;
