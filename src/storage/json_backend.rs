use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{
    calculation::CalculationRecord,
    errors::{CalcError, Result},
    utils::paths::ensure_dir,
};

use super::{calculation_name_from, file_name_for, CalculationStore, CALCULATION_FILE_EXTENSION};

const TMP_SUFFIX: &str = "tmp";

/// Stores each calculation as `<name>.json` inside one directory.
#[derive(Debug, Clone)]
pub struct JsonCalculationStore {
    dir: PathBuf,
}

impl JsonCalculationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CalculationStore for JsonCalculationStore {
    fn save(&self, name: &str, record: &CalculationRecord) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        let json = record.to_json()?;
        let replacing = path.exists();
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        tracing::info!(
            calculation = name,
            path = %path.display(),
            replaced = replacing,
            "calculation saved"
        );
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<CalculationRecord> {
        let data = self.load_raw(name)?;
        CalculationRecord::from_json(&data).inspect_err(|err| {
            tracing::warn!(calculation = name, error = %err, "calculation file rejected");
        })
    }

    fn load_raw(&self, name: &str) -> Result<String> {
        let path = self.path_for(name)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(CalcError::CalculationNotFound(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if !file_name.ends_with(CALCULATION_FILE_EXTENSION) {
                continue;
            }
            names.push(calculation_name_from(&file_name).to_string());
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(calculation = name, "calculation deleted");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(CalcError::CalculationNotFound(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|path| path.exists()).unwrap_or(false)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        Ok(self.dir.join(file_name_for(name)?))
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
