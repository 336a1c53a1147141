//! Configuration for EmberKV
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{EmberError, Result};

/// Main configuration for an EmberKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Backing file holding the last saved snapshot.
    /// Temporary files for atomic saves are created next to it:
    ///   {parent}/
    ///     ├── store.json               (backing file)
    ///     └── .store.json.XXXXXX.tmp   (in-flight save, renamed over store.json)
    pub location: PathBuf,

    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// Save after every successful mutation
    pub auto_save: bool,

    /// Pretty-print the backing file (compact when false)
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: PathBuf::from("./emberkv.json"),
            auto_save: false,
            pretty: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backing file location (a leading `~` is expanded on build)
    pub fn location(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.location = path.into();
        self
    }

    /// Enable or disable auto-save
    pub fn auto_save(mut self, enabled: bool) -> Self {
        self.config.auto_save = enabled;
        self
    }

    /// Enable or disable pretty-printed output
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Validate the location and expand the home directory
    pub fn build(mut self) -> Result<Config> {
        if self.config.location.as_os_str().is_empty() {
            return Err(EmberError::Config("location must not be empty".to_string()));
        }
        self.config.location = expand_home(&self.config.location)?;
        Ok(self.config)
    }
}

/// Expand a leading `~` component to the current user's home directory.
///
/// `~user` forms are left alone; only the bare `~` component is recognised.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(first) if first.as_os_str() == "~" => {
            let home = dirs::home_dir().ok_or_else(|| {
                EmberError::Config(format!(
                    "cannot expand {}: home directory is unknown",
                    path.display()
                ))
            })?;
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                Ok(home)
            } else {
                Ok(home.join(rest))
            }
        }
        _ => Ok(path.to_path_buf()),
    }
}
