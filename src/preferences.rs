//! Persisted user preferences.
//!
//! Only the theme flag is stored. It lives outside the sorting core and is
//! kept as a small JSON document.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PreferencesError, SortVizResult};

/// User preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Dark theme enabled. Light is the default.
    #[serde(default)]
    pub dark_theme: bool,
}

impl Preferences {
    /// Flip the theme and return the new value.
    pub fn toggle_theme(&mut self) -> bool {
        self.dark_theme = !self.dark_theme;
        self.dark_theme
    }
}

/// JSON file holding [`Preferences`].
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences. A missing file yields the defaults.
    pub fn load(&self) -> SortVizResult<Preferences> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no preferences file, using defaults");
                return Ok(Preferences::default());
            }
            Err(source) => {
                return Err(PreferencesError::Io {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };

        serde_json::from_str(&raw).map_err(|source| {
            PreferencesError::Malformed {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }

    /// Write preferences, creating parent directories as needed.
    pub fn save(&self, prefs: &Preferences) -> SortVizResult<()> {
        let io_err = |source| PreferencesError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let json = serde_json::to_string_pretty(prefs).map_err(|source| PreferencesError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)?;
        debug!(path = %self.path.display(), dark_theme = prefs.dark_theme, "saved preferences");
        Ok(())
    }
}
