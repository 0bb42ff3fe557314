//! Flat preference store persisted as one JSON document.
//!
//! The whole record lives under a single fixed file; every save rewrites
//! it wholesale. A missing or corrupt file yields default (empty)
//! preferences rather than an error — the store degrades, it does not
//! block startup.
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::model::Preferences;

/// Fixed storage file name inside the config directory.
pub const STORAGE_FILE: &str = "preferences.json";

/// File-backed preference store.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Create a store rooted at the given config directory.
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            path: config_dir.join(STORAGE_FILE),
        }
    }

    /// Load preferences, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(&self) -> Preferences {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No preference file, using defaults");
                return Preferences::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read preferences, using defaults");
                return Preferences::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(preferences) => preferences,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt preference file, using defaults");
                Preferences::default()
            }
        }
    }

    /// Overwrite the stored record wholesale.
    pub fn save(&self, preferences: &Preferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(preferences)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Delete the stored record, resetting to defaults on the next load.
    pub fn reset(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.path.display())),
        }
    }
}
