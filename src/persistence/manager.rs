//! Persistence Manager
//!
//! Loads the backing file at startup and saves snapshots on demand.
//!
//! ## Responsibilities
//! - Treat a missing or zero-length file as an empty store
//! - Refuse to start over a non-empty file that does not parse
//! - Serialize saves so snapshots reach disk in the order they were taken
//! - Run the file write on a worker and join it before returning

use std::any::Any;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use crate::error::{EmberError, Result};

use super::atomic::{write_atomic, AtomicWrite};

/// Whether a save is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveState {
    /// Loaded; no save in flight
    Idle,

    /// A snapshot is being written
    Saving,
}

/// Owns the backing file
///
/// ## Concurrency:
/// - `save_lock`: one save at a time; the snapshot is taken while holding it
/// - `saving`: lock-free view of the state for callers that must not block
pub struct PersistenceManager {
    /// Backing file path (already home-expanded)
    path: PathBuf,

    /// Pretty-print snapshots
    pretty: bool,

    /// Serializes saves
    save_lock: Mutex<()>,

    /// Set while a save holds `save_lock`
    saving: AtomicBool,
}

/// Clears the saving flag however the save exits
struct SavingFlag<'a>(&'a AtomicBool);

impl<'a> SavingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SavingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl PersistenceManager {
    /// Load the store at `path`
    ///
    /// Returns the manager together with the loaded entries, in file order.
    pub fn load(path: &Path, pretty: bool) -> Result<(Self, Map<String, Value>)> {
        let entries = Self::read_snapshot(path)?;

        tracing::info!(
            path = %path.display(),
            keys = entries.len(),
            "store loaded"
        );

        let manager = Self {
            path: path.to_path_buf(),
            pretty,
            save_lock: Mutex::new(()),
            saving: AtomicBool::new(false),
        };

        Ok((manager, entries))
    }

    /// Read and parse the backing file without touching any in-memory state
    pub fn read_snapshot(path: &Path) -> Result<Map<String, Value>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(EmberError::CorruptStore {
                path: path.to_path_buf(),
                reason: "top-level value is not an object".to_string(),
            }),
            Err(e) => Err(EmberError::CorruptStore {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Save a snapshot of `data` to the backing file
    ///
    /// Steps:
    /// 1. Acquire the save lock (orders concurrent saves)
    /// 2. Serialize under a read lock on the map
    /// 3. Write + rename on a worker thread, joined before returning
    pub fn save(&self, data: &RwLock<Map<String, Value>>) -> Result<()> {
        let _save_guard = self.save_lock.lock();
        let _flag = SavingFlag::raise(&self.saving);

        // Step 1: Snapshot; the map lock is released before any I/O
        let (bytes, keys) = {
            let entries = data.read();
            (self.serialize(&entries)?, entries.len())
        };

        // Step 2: Hand the bytes to the worker and wait for it
        let path = self.path.as_path();
        let joined = crossbeam::thread::scope(|scope| {
            scope.spawn(|_| write_atomic(path, &bytes)).join()
        });

        let outcome = match joined {
            Ok(Ok(result)) => result?,
            Ok(Err(panic)) | Err(panic) => {
                return Err(EmberError::SaveWorker(panic_message(panic.as_ref())));
            }
        };

        if let AtomicWrite::Written { bytes } = outcome {
            tracing::debug!(path = %self.path.display(), bytes, keys, "store saved");
        }

        Ok(())
    }

    /// Block until any in-flight save has finished
    pub fn wait_for_pending_save(&self) {
        drop(self.save_lock.lock());
    }

    /// Current save state
    pub fn state(&self) -> SaveState {
        if self.saving.load(Ordering::SeqCst) {
            SaveState::Saving
        } else {
            SaveState::Idle
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn serialize(&self, entries: &Map<String, Value>) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(entries)?
        } else {
            serde_json::to_vec(entries)?
        };
        Ok(bytes)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
