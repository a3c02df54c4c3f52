// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flat key-value store mirrored to a JSON file.
//!
//! Values are JSON text, like browser local storage. Every write goes to a
//! temporary file that is renamed over the store file before the in-memory
//! map changes, so a failed write leaves both untouched.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Local key-value store.
#[derive(Clone)]
pub struct LocalStore {
    inner: Arc<Inner>,
}

struct Inner {
    /// None for the in-memory (offline) store
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Open the store at `path`, creating it on first write.
    ///
    /// A store file that cannot be parsed is logged and treated as empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Store file is corrupt, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::info!(path = %path.display(), keys = entries.len(), "Opened local store");

        Ok(Self {
            inner: Arc::new(Inner {
                path: Some(path),
                entries: Mutex::new(entries),
            }),
        })
    }

    /// Create a store that lives only in memory (for testing).
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                path: None,
                entries: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Raw value for a key.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().ok()?.get(key).cloned()
    }

    /// Store a raw value.
    pub fn set(&self, key: &str, value: String) -> Result<(), AppError> {
        self.set_many(vec![(key.to_string(), value)])
    }

    /// Store several values in one write: either all land or none do.
    pub fn set_many(&self, values: Vec<(String, String)>) -> Result<(), AppError> {
        let mut entries = self.lock()?;
        let mut updated = entries.clone();
        updated.extend(values);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    /// Remove a key. Removing a missing key is a no-op.
    pub fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    /// Decode a JSON value, treating corrupt records as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => AppError::PersistenceCorruption {
                key: key.to_string(),
                reason: e.to_string(),
            }
            .recover(None, "Ignoring corrupt stored record"),
        }
    }

    /// Encode a value as JSON text for `set`/`set_many`.
    pub fn encode<T: Serialize>(value: &T) -> Result<String, AppError> {
        serde_json::to_string(value)
            .map_err(|e| AppError::Persistence(format!("Failed to encode value: {}", e)))
    }

    /// Encode and store a single JSON value.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        self.set(key, Self::encode(value)?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, AppError> {
        self.inner
            .entries
            .lock()
            .map_err(|_| AppError::Persistence("Store lock poisoned".to_string()))
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(entries)?;
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, json)?;
            fs::rename(&tmp, path)
        };

        write().map_err(|e| {
            AppError::Persistence(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ironpulse-store-{}", uuid::Uuid::new_v4().simple()))
            .join(name)
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("store.json");

        let store = LocalStore::open(&path).unwrap();
        store.set_json("ironpulse_users", &vec!["ana"]).unwrap();
        drop(store);

        let reopened = LocalStore::open(&path).unwrap();
        let users: Vec<String> = reopened.get_json("ironpulse_users").unwrap();
        assert_eq!(users, vec!["ana".to_string()]);
    }

    #[test]
    fn test_corrupt_record_reads_as_absent() {
        let store = LocalStore::in_memory();
        store.set("ironpulse_ana_stats", "{not json".to_string()).unwrap();

        let value: Option<Vec<String>> = store.get_json("ironpulse_ana_stats");
        assert!(value.is_none());
        assert!(store.get("ironpulse_ana_stats").is_some());
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let path = temp_path("store.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "garbage").unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn test_failed_write_changes_nothing() {
        let dir = temp_path("data");
        fs::create_dir_all(&dir).unwrap();
        let store = LocalStore::open(dir.join("store.json")).unwrap();

        // Parent directory replaced by a regular file, so every write fails.
        fs::remove_dir_all(&dir).unwrap();
        fs::write(&dir, "").unwrap();

        let result = store.set_many(vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);

        assert!(matches!(result, Err(AppError::Persistence(_))));
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_none());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let store = LocalStore::in_memory();
        store.remove("missing").unwrap();
        store.set("present", "1".to_string()).unwrap();
        store.remove("present").unwrap();
        assert!(store.get("present").is_none());
    }
}
