//! Single-slot persistence for the last entered form values.
//!
//! A store holds at most one [`InputRecord`] under [`STORAGE_KEY`]. Saving
//! overwrites it, clearing removes it. Loading is best-effort: a missing or
//! unreadable record is reported as `None` and never as an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::InputRecord;

pub const STORAGE_KEY: &str = "aposentadoria-sim";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode input record: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait InputStore {
    fn save(&mut self, record: &InputRecord) -> Result<(), StoreError>;
    fn load(&self) -> Option<InputRecord>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<T: InputStore + ?Sized> InputStore for Box<T> {
    fn save(&mut self, record: &InputRecord) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn load(&self) -> Option<InputRecord> {
        (**self).load()
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputStore for MemoryStore {
    fn save(&mut self, record: &InputRecord) -> Result<(), StoreError> {
        self.slot = Some(serde_json::to_string(record)?);
        Ok(())
    }

    fn load(&self) -> Option<InputRecord> {
        decode(self.slot.as_deref()?)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.slot = None;
        Ok(())
    }
}

/// JSON file named after [`STORAGE_KEY`] inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl InputStore for FileStore {
    fn save(&mut self, record: &InputRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        log::debug!("saved input record to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Option<InputRecord> {
        match fs::read_to_string(&self.path) {
            Ok(json) => decode(&json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("ignoring unreadable record at {}: {e}", self.path.display());
                None
            }
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("removed input record at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

fn decode(json: &str) -> Option<InputRecord> {
    // A stored `null` reads as an empty slot.
    match serde_json::from_str::<Option<InputRecord>>(json) {
        Ok(record) => record,
        Err(e) => {
            log::warn!("ignoring corrupt input record: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> InputRecord {
        InputRecord {
            age_now: "30".to_string(),
            age_retire: "60".to_string(),
            pv: "R$ 100.000,00".to_string(),
            pmt: "R$ 1.000,00".to_string(),
            income_goal: "R$ 5.000,00".to_string(),
        }
    }

    #[test]
    fn memory_store_round_trips_record() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load(), None);

        store.save(&sample_record()).expect("save");
        assert_eq!(store.load(), Some(sample_record()));

        store.clear().expect("clear");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn memory_store_save_overwrites_previous_record() {
        let mut store = MemoryStore::new();
        store.save(&sample_record()).expect("save");

        let mut newer = sample_record();
        newer.age_retire = "65".to_string();
        store.save(&newer).expect("save");

        assert_eq!(store.load(), Some(newer));
    }

    #[test]
    fn file_store_round_trips_record_on_fresh_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = FileStore::in_dir(dir.path().join("nested"));
        store.save(&sample_record()).expect("save");

        let reopened = FileStore::in_dir(dir.path().join("nested"));
        assert_eq!(reopened.load(), Some(sample_record()));
        assert!(reopened.path().ends_with("aposentadoria-sim.json"));
    }

    #[test]
    fn file_store_missing_or_corrupt_record_loads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.load(), None);

        fs::write(store.path(), "{not json").expect("write");
        assert_eq!(store.load(), None);

        fs::write(store.path(), "null").expect("write");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = FileStore::in_dir(dir.path());
        store.clear().expect("clearing an empty store is fine");

        store.save(&sample_record()).expect("save");
        store.clear().expect("clear");
        assert_eq!(store.load(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn persisted_json_uses_form_field_keys() {
        let mut store = MemoryStore::new();
        store.save(&sample_record()).expect("save");
        let json = store.slot.as_deref().expect("slot filled");

        for key in ["age_now", "age_retire", "pv", "pmt", "income_goal"] {
            assert!(json.contains(&format!("\"{key}\"")), "missing {key} in {json}");
        }
    }
}
