//! # EmberKV
//!
//! An embedded, single-file key-value store with:
//! - Typed keys (integer, float, string, sequence, composite) in one namespace
//! - JSON values, kept in insertion order
//! - Append / accumulate / sequence helpers
//! - Crash-safe saves (write to temp file, then rename)
//! - Optional auto-save after every mutation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store                                 │
//! │           (CRUD, append, accumulate, sequences)              │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐           ┌───────────────────┐
//!   │    Key Codec    │           │   Persistence     │
//!   │ (Key ⇄ String)  │           │ (load, atomic     │
//!   └─────────────────┘           │  save, worker)    │
//!                                 └─────────┬─────────┘
//!                                           │
//!                                           ▼
//!                                 ┌───────────────────┐
//!                                 │  store.json file  │
//!                                 └───────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use emberkv::{Config, Store};
//!
//! fn main() -> emberkv::Result<()> {
//!     let config = Config::builder()
//!         .location("~/.local/share/app/store.json")
//!         .auto_save(true)
//!         .build()?;
//!     let store = Store::open(config)?;
//!
//!     store.set("user", "ember")?;
//!     store.set(42, vec![1, 2, 3])?;
//!     store.set((1, "a"), true)?;
//!     store.accumulate(42, 1)?; // not numeric: NotApplicable
//!
//!     store.close()
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod key;
pub mod persistence;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{EmberError, Result};
pub use config::Config;
pub use key::{EncodedKey, Key, KeyElement};
pub use store::{Accumulated, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of EmberKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
