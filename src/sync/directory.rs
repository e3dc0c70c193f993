use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{CalcError, Result},
    storage::json_backend::{tmp_path, write_atomic},
    utils::paths::ensure_dir,
};

use super::{RemoteFile, RemoteStorage};

const INDEX_FILE: &str = "index.json";
const CONTENT_EXTENSION: &str = "body";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RemoteIndex {
    files: Vec<RemoteFile>,
}

/// Remote drive kept in a local folder, e.g. a mounted or synced directory.
///
/// File ids are assigned on upload and contents are stored per id, so two
/// files may share a name just as they can on a real drive.
#[derive(Debug, Clone)]
pub struct DirectoryRemote {
    root: PathBuf,
}

impl DirectoryRemote {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root).map_err(|err| remote_error(&root, err))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn content_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{}.{}", id, CONTENT_EXTENSION))
    }

    fn read_index(&self) -> Result<RemoteIndex> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(RemoteIndex::default());
        }
        let data = fs::read_to_string(&path).map_err(|err| remote_error(&path, err))?;
        serde_json::from_str(&data).map_err(|err| remote_error(&path, err))
    }

    fn write_index(&self, index: &RemoteIndex) -> Result<()> {
        let path = self.index_path();
        let json = serde_json::to_string_pretty(index).map_err(|err| remote_error(&path, err))?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path).map_err(|err| remote_error(&path, err))
    }

    fn write_content(&self, id: Uuid, bytes: &[u8]) -> Result<()> {
        let path = self.content_path(id);
        fs::write(&path, bytes).map_err(|err| remote_error(&path, err))
    }
}

impl RemoteStorage for DirectoryRemote {
    fn upload(&mut self, name: &str, bytes: &[u8]) -> Result<RemoteFile> {
        let mut index = self.read_index()?;
        let file = RemoteFile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            modified_at: Utc::now(),
        };
        self.write_content(file.id, bytes)?;
        index.files.push(file.clone());
        self.write_index(&index)?;
        Ok(file)
    }

    fn update(&mut self, id: Uuid, bytes: &[u8]) -> Result<RemoteFile> {
        let mut index = self.read_index()?;
        let file = index
            .files
            .iter_mut()
            .find(|file| file.id == id)
            .ok_or_else(|| CalcError::Remote(format!("remote file {} not found", id)))?;
        file.modified_at = Utc::now();
        let updated = file.clone();
        self.write_content(id, bytes)?;
        self.write_index(&index)?;
        Ok(updated)
    }

    fn list(&self) -> Result<Vec<RemoteFile>> {
        Ok(self.read_index()?.files)
    }

    fn download(&self, id: Uuid) -> Result<(RemoteFile, String)> {
        let file = self
            .read_index()?
            .files
            .into_iter()
            .find(|file| file.id == id)
            .ok_or_else(|| CalcError::Remote(format!("remote file {} not found", id)))?;
        let path = self.content_path(id);
        let contents = fs::read_to_string(&path).map_err(|err| remote_error(&path, err))?;
        Ok((file, contents))
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        let mut index = self.read_index()?;
        let before = index.files.len();
        index.files.retain(|file| file.id != id);
        if index.files.len() == before {
            return Err(CalcError::Remote(format!("remote file {} not found", id)));
        }
        self.write_index(&index)?;
        let path = self.content_path(id);
        if path.exists() {
            fs::remove_file(&path).map_err(|err| remote_error(&path, err))?;
        }
        Ok(())
    }
}

fn remote_error(path: &Path, err: impl std::fmt::Display) -> CalcError {
    CalcError::Remote(format!("{}: {}", path.display(), err))
}
