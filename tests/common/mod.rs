#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use savings_calc::{storage::JsonCalculationStore, sync::DirectoryRemote};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that is cleaned up when the test binary exits.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Local store and remote folder backed by isolated directories.
pub fn setup_test_env() -> (JsonCalculationStore, DirectoryRemote) {
    let base = temp_base();
    let store = JsonCalculationStore::new(base.join("calculations")).expect("create store");
    let remote = DirectoryRemote::new(base.join("remote")).expect("create remote");
    (store, remote)
}
