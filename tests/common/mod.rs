use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use cravt::storage::{SledPersistence, DEFAULT_STORAGE_KEY};

#[allow(dead_code)]
pub fn create_temp_persistence() -> (SledPersistence, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let persistence = SledPersistence::open(tmp.path().join("chats.sled"), DEFAULT_STORAGE_KEY)
        .expect("failed to open sled persistence");
    (persistence, tmp)
}

#[allow(dead_code)]
pub fn reopen(tmp: &TempDir) -> SledPersistence {
    SledPersistence::open(tmp.path().join("chats.sled"), DEFAULT_STORAGE_KEY)
        .expect("failed to reopen sled persistence")
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
