//! Store Module
//!
//! The user-facing key-value store.
//!
//! ## Responsibilities
//! - Validate and encode every key before touching state
//! - Keep entries in insertion order
//! - CRUD and listing operations (this file)
//! - Append / accumulate / sequence operations (`mutation.rs`)
//! - Auto-save after each successful mutation when enabled

mod mutation;

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{expand_home, Config};
use crate::error::Result;
use crate::key::{decode, encode, Key};
use crate::persistence::{PersistenceManager, SaveState};

pub use mutation::Accumulated;

/// An embedded key-value store backed by a single JSON file
///
/// ## Concurrency Model
///
/// - **Reads** (get/exists/listing): shared read lock on the map
/// - **Mutations**: one write lock per operation, so a read-modify-write
///   (append, accumulate, ...) is never interleaved with another writer
/// - **Saves**: serialized by the persistence manager; the write lock is
///   always released before a save starts
///
/// Share between threads with `Arc<Store>`.
pub struct Store {
    /// Store configuration (location already home-expanded)
    config: Config,

    /// Encoded key → value, insertion ordered
    data: RwLock<Map<String, Value>>,

    /// Backing file owner
    persistence: PersistenceManager,
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Expand `~` in the location
    /// 2. Load the backing file if it exists (missing or empty → empty store)
    /// 3. Fail with `CorruptStore` if a non-empty file does not parse
    pub fn open(mut config: Config) -> Result<Self> {
        config.location = expand_home(&config.location)?;

        let (persistence, entries) = PersistenceManager::load(&config.location, config.pretty)?;

        Ok(Self {
            config,
            data: RwLock::new(entries),
            persistence,
        })
    }

    /// Open with a path (convenience method)
    pub fn open_path(path: impl Into<PathBuf>, auto_save: bool) -> Result<Self> {
        let config = Config::builder()
            .location(path)
            .auto_save(auto_save)
            .build()?;
        Self::open(config)
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Insert or overwrite a value
    pub fn set<K, V>(&self, key: K, value: V) -> Result<()>
    where
        K: Into<Key>,
        V: Serialize,
    {
        let encoded = encode(&key.into())?;
        let value = serde_json::to_value(value)?;

        self.data.write().insert(encoded.into_string(), value);

        self.save_if_enabled()
    }

    /// Get a value by key; `None` means the key is absent
    pub fn get<K: Into<Key>>(&self, key: K) -> Result<Option<Value>> {
        let encoded = encode(&key.into())?;
        Ok(self.data.read().get(encoded.as_str()).cloned())
    }

    /// Get a value and deserialize it into `T`
    pub fn get_as<K, T>(&self, key: K) -> Result<Option<T>>
    where
        K: Into<Key>,
        T: DeserializeOwned,
    {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Check whether a key is present
    pub fn exists<K: Into<Key>>(&self, key: K) -> Result<bool> {
        let encoded = encode(&key.into())?;
        Ok(self.data.read().contains_key(encoded.as_str()))
    }

    /// Remove a key, returning it with its value; `None` if it was absent
    pub fn remove<K: Into<Key>>(&self, key: K) -> Result<Option<(Key, Value)>> {
        let key = key.into();
        let encoded = encode(&key)?;

        let removed = self.data.write().shift_remove(encoded.as_str());

        match removed {
            Some(value) => {
                self.save_if_enabled()?;
                Ok(Some((key, value)))
            }
            None => Ok(None),
        }
    }

    /// Remove every entry
    pub fn clear(&self) -> Result<()> {
        self.data.write().clear();
        self.save_if_enabled()
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// Number of stored keys
    pub fn count(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// All keys, decoded, in store order
    pub fn all_keys(&self) -> Vec<Key> {
        self.data.read().keys().map(|k| decode(k)).collect()
    }

    /// All values in store order (parallel to `all_keys`)
    pub fn all_values(&self) -> Vec<Value> {
        self.data.read().values().cloned().collect()
    }

    /// All decoded key/value pairs in store order
    pub fn entries(&self) -> Vec<(Key, Value)> {
        self.data
            .read()
            .iter()
            .map(|(k, v)| (decode(k), v.clone()))
            .collect()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the whole store to the backing file
    ///
    /// Returns once the temp file has been renamed into place (or the save
    /// failed and the old file is untouched).
    pub fn save(&self) -> Result<()> {
        self.persistence.save(&self.data)
    }

    /// Replace the in-memory entries with the backing file's contents
    pub fn reload(&self) -> Result<()> {
        self.persistence.wait_for_pending_save();
        let entries = PersistenceManager::read_snapshot(self.persistence.path())?;
        *self.data.write() = entries;
        Ok(())
    }

    /// Block until any in-flight save has completed
    ///
    /// Call this from the application's shutdown path (for example a
    /// termination signal handler) before letting the process exit.
    pub fn wait_for_pending_save(&self) {
        self.persistence.wait_for_pending_save();
    }

    /// Whether a save is running right now
    pub fn is_saving(&self) -> bool {
        self.persistence.state() == SaveState::Saving
    }

    /// Close the store, waiting for any in-flight save
    pub fn close(self) -> Result<()> {
        self.persistence.wait_for_pending_save();
        tracing::debug!(path = %self.path().display(), "store closed");
        Ok(())
    }

    /// Save when auto-save is on; called after every successful mutation
    fn save_if_enabled(&self) -> Result<()> {
        if self.config.auto_save {
            self.save()
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Backing file path
    pub fn path(&self) -> &Path {
        self.persistence.path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
