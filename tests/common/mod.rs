#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use savings_storage_json::JsonFileStore;
use savings_tracker::GoalManager;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// File store laid out the way the shell lays it out under `base`.
pub fn file_store(base: &std::path::Path, retention: usize) -> JsonFileStore {
    JsonFileStore::with_retention(base.join("data"), base.join("data").join("backups"), retention)
        .expect("create json file store")
}

/// Manager backed by a file store in an isolated directory.
pub fn setup_manager() -> (GoalManager, PathBuf) {
    let base = test_dir();
    let manager = GoalManager::new(Box::new(file_store(&base, 3)));
    (manager, base)
}
