//! Error types for sortviz.
//!
//! All errors are strongly typed using thiserror so the UI layer can match on
//! specific conditions. Cancelling a run is not an error and never shows up
//! here; see [`crate::drivers::Cancelled`].

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors raised by the controller's input surface.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown algorithm '{name}'")]
    UnknownAlgorithm {
        name: String,
    },

    #[error("Cannot change {field} while a run is active")]
    LockedWhileRunning {
        field: &'static str,
    },

    #[error("Value {value} at index {index} is outside {min}..={max}")]
    ValueOutOfRange {
        index: usize,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Array size {size} is outside {min}..={max}")]
    ArraySizeOutOfRange {
        size: usize,
        min: usize,
        max: usize,
    },
}

/// Errors raised while executing or observing a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to spawn run worker: {message}")]
    SpawnFailed {
        message: String,
    },

    #[error("Run worker panicked")]
    WorkerPanicked,

    #[error("State stream disconnected")]
    Disconnected,

    #[error("Timed out after {duration_ms}ms waiting for state")]
    Timeout {
        duration_ms: u64,
    },
}

/// Errors raised while loading or saving user preferences.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Preferences I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Preferences file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error type for sortviz.
#[derive(Debug, Error)]
pub enum SortVizError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Run error: {0}")]
    Run(#[from] RunError),

    #[error("Preferences error: {0}")]
    Preferences(#[from] PreferencesError),
}

impl SortVizError {
    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this is a run error.
    #[must_use]
    pub const fn is_run(&self) -> bool {
        matches!(self, Self::Run(_))
    }

    /// Returns true if this is a preferences error.
    #[must_use]
    pub const fn is_preferences(&self) -> bool {
        matches!(self, Self::Preferences(_))
    }

    /// Returns true if the failed call can be repeated as-is later.
    ///
    /// Changes locked by an active run succeed once the run finishes; a
    /// receive timeout may succeed on the next attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Config(e) => matches!(e, ConfigError::LockedWhileRunning { .. }),
            Self::Run(e) => matches!(e, RunError::Timeout { .. }),
            Self::Preferences(_) => false,
        }
    }
}

/// Result type alias for sortviz operations.
pub type SortVizResult<T> = Result<T, SortVizError>;
