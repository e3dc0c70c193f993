//! Remote copies of saved calculations.
//!
//! Authentication and transport belong to the [`RemoteStorage`]
//! implementation; this module only decides which file to create, update,
//! fetch, or delete.

pub mod directory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{CalcError, Result},
    storage::{calculation_name_from, file_name_for},
};

pub use directory::DirectoryRemote;

/// Metadata of one file held by the remote drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub id: Uuid,
    pub name: String,
    pub modified_at: DateTime<Utc>,
}

/// Operations the sync layer needs from a remote drive.
pub trait RemoteStorage {
    fn upload(&mut self, name: &str, bytes: &[u8]) -> Result<RemoteFile>;
    fn update(&mut self, id: Uuid, bytes: &[u8]) -> Result<RemoteFile>;
    fn list(&self) -> Result<Vec<RemoteFile>>;
    fn download(&self, id: Uuid) -> Result<(RemoteFile, String)>;
    fn delete(&mut self, id: Uuid) -> Result<()>;
}

/// Tracks the remote listing and which remote file is currently loaded.
pub struct SyncHandler<R: RemoteStorage> {
    remote: R,
    files: Vec<RemoteFile>,
    loaded: Option<RemoteFile>,
}

impl<R: RemoteStorage> SyncHandler<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            files: Vec::new(),
            loaded: None,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn loaded(&self) -> Option<&RemoteFile> {
        self.loaded.as_ref()
    }

    pub fn files(&self) -> &[RemoteFile] {
        &self.files
    }

    /// Re-reads the remote listing.
    pub fn refresh(&mut self) -> Result<&[RemoteFile]> {
        let mut files = self.remote.list()?;
        files.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(count = files.len(), "remote listing refreshed");
        self.files = files;
        Ok(&self.files)
    }

    /// Calculation names from the last listing, extension removed.
    pub fn calculation_names(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|file| calculation_name_from(&file.name).to_string())
            .collect()
    }

    /// Uploads `bytes` as calculation `name`.
    ///
    /// The remote file with the same name is updated in place, so saving
    /// twice never leaves two remote copies.
    pub fn upload_or_update(&mut self, name: &str, bytes: &[u8]) -> Result<RemoteFile> {
        let file_name = file_name_for(name)?;
        let existing = self
            .loaded
            .as_ref()
            .filter(|file| file.name == file_name)
            .or_else(|| self.files.iter().find(|file| file.name == file_name))
            .map(|file| file.id);

        let stored = match existing {
            Some(id) => {
                tracing::info!(calculation = name, %id, "updating remote calculation");
                self.remote.update(id, bytes)?
            }
            None => {
                tracing::info!(calculation = name, "uploading new remote calculation");
                self.remote.upload(&file_name, bytes)?
            }
        };
        self.remember(stored.clone());
        self.loaded = Some(stored.clone());
        Ok(stored)
    }

    /// Downloads calculation `name`.
    ///
    /// The loaded file is not changed; call [`SyncHandler::select`] once the
    /// contents have been accepted.
    pub fn fetch(&mut self, name: &str) -> Result<(RemoteFile, String)> {
        let file_name = file_name_for(name)?;
        if !self.files.iter().any(|file| file.name == file_name) {
            self.refresh()?;
        }
        let id = self
            .files
            .iter()
            .find(|file| file.name == file_name)
            .map(|file| file.id)
            .ok_or_else(|| CalcError::CalculationNotFound(name.to_string()))?;
        self.remote.download(id)
    }

    /// Marks the remote file called `name` as loaded without downloading it.
    /// Returns whether such a file exists.
    pub fn select(&mut self, name: &str) -> Result<bool> {
        let file_name = file_name_for(name)?;
        self.refresh()?;
        self.loaded = self
            .files
            .iter()
            .find(|file| file.name == file_name)
            .cloned();
        Ok(self.loaded.is_some())
    }

    pub fn clear_loaded(&mut self) {
        self.loaded = None;
    }

    /// Deletes the loaded remote file. Returns `None` when nothing is loaded.
    pub fn delete_loaded(&mut self) -> Result<Option<RemoteFile>> {
        let Some(file) = self.loaded.take() else {
            return Ok(None);
        };
        self.remote.delete(file.id)?;
        self.files.retain(|candidate| candidate.id != file.id);
        tracing::info!(name = %file.name, id = %file.id, "remote calculation deleted");
        Ok(Some(file))
    }

    fn remember(&mut self, file: RemoteFile) {
        match self.files.iter_mut().find(|candidate| candidate.id == file.id) {
            Some(slot) => *slot = file,
            None => {
                self.files.push(file);
                self.files.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Default)]
    struct MemoryRemote {
        files: BTreeMap<Uuid, (RemoteFile, String)>,
        uploads: usize,
        updates: usize,
    }

    impl RemoteStorage for MemoryRemote {
        fn upload(&mut self, name: &str, bytes: &[u8]) -> Result<RemoteFile> {
            self.uploads += 1;
            let file = RemoteFile {
                id: Uuid::new_v4(),
                name: name.to_string(),
                modified_at: Utc::now(),
            };
            let body = String::from_utf8_lossy(bytes).into_owned();
            self.files.insert(file.id, (file.clone(), body));
            Ok(file)
        }

        fn update(&mut self, id: Uuid, bytes: &[u8]) -> Result<RemoteFile> {
            self.updates += 1;
            let (file, body) = self
                .files
                .get_mut(&id)
                .ok_or_else(|| CalcError::Remote(format!("no file {id}")))?;
            *body = String::from_utf8_lossy(bytes).into_owned();
            file.modified_at = Utc::now();
            Ok(file.clone())
        }

        fn list(&self) -> Result<Vec<RemoteFile>> {
            Ok(self.files.values().map(|(file, _)| file.clone()).collect())
        }

        fn download(&self, id: Uuid) -> Result<(RemoteFile, String)> {
            self.files
                .get(&id)
                .cloned()
                .ok_or_else(|| CalcError::Remote(format!("no file {id}")))
        }

        fn delete(&mut self, id: Uuid) -> Result<()> {
            self.files
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| CalcError::Remote(format!("no file {id}")))
        }
    }

    #[test]
    fn saving_same_name_twice_updates_remote_copy() {
        let mut sync = SyncHandler::new(MemoryRemote::default());
        sync.upload_or_update("March", b"one").unwrap();
        sync.clear_loaded();
        sync.upload_or_update("March", b"two").unwrap();

        assert_eq!(sync.remote().uploads, 1);
        assert_eq!(sync.remote().updates, 1);
        assert_eq!(sync.refresh().unwrap().len(), 1);
        assert_eq!(sync.calculation_names(), vec!["March".to_string()]);
    }

    #[test]
    fn different_name_creates_new_file() {
        let mut sync = SyncHandler::new(MemoryRemote::default());
        sync.upload_or_update("a", b"{}").unwrap();
        sync.upload_or_update("b", b"{}").unwrap();

        assert_eq!(sync.remote().uploads, 2);
        assert_eq!(sync.calculation_names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn fetch_leaves_loaded_file_until_selected() {
        let mut sync = SyncHandler::new(MemoryRemote::default());
        let current = sync.upload_or_update("current", b"{}").unwrap();
        sync.upload_or_update("plan", b"body").unwrap();
        sync.select("current").unwrap();

        let (file, contents) = sync.fetch("plan").unwrap();
        assert_eq!(file.name, "plan.json");
        assert_eq!(contents, "body");
        assert_eq!(sync.loaded().map(|f| f.id), Some(current.id));

        assert!(sync.select("plan").unwrap());
        assert_eq!(sync.loaded().map(|f| f.id), Some(file.id));

        let deleted = sync.delete_loaded().unwrap();
        assert_eq!(deleted.map(|f| f.id), Some(file.id));
        assert_eq!(sync.calculation_names(), vec!["current".to_string()]);
        assert!(sync.delete_loaded().unwrap().is_none());
    }

    #[test]
    fn fetch_unknown_name_is_not_found() {
        let mut sync = SyncHandler::new(MemoryRemote::default());
        assert!(matches!(
            sync.fetch("nope"),
            Err(CalcError::CalculationNotFound(_))
        ));
    }
}
