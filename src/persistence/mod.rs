//! Persistence Module
//!
//! Single-file JSON persistence with crash-safe saves.
//!
//! ## Responsibilities
//! - Load the backing file into an ordered map
//! - Save snapshots with write-to-temp-then-rename
//! - Expose a hook for awaiting an in-flight save before shutdown
//!
//! ## File Format
//! ```text
//! {
//!   "name": "ember",          ← text key
//!   "~num~42": [1, 2, 3],     ← integer key
//!   "~num~2.5": {"a": true},  ← float key
//!   "(1, 2)": null            ← composite key
//! }
//! ```
//! No header, no version field, no compression.
//!
//! ## State Machine
//! ```text
//!   load ──► Idle ──save()──► Saving ──(renamed | failed)──► Idle
//! ```

mod atomic;
mod manager;

pub use atomic::{write_atomic, AtomicWrite};
pub use manager::{PersistenceManager, SaveState};
