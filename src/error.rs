//! Centralized error handling for tocrail
//!
//! The TOC engine itself never fails: missing roots, unresolved headings and
//! empty documents all degrade to empty state. Errors only come from the
//! shell around it: reading notes from disk, watching them, and loading or
//! saving the user configuration.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // The open note
    // ─────────────────────────────────────────────────────────────────────────
    /// The note could not be read
    DocumentRead { path: PathBuf, source: io::Error },

    /// The watcher could not be created or attached
    Watch { path: PathBuf, source: notify::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // User configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// No platform config directory (e.g. `HOME` unset)
    NoConfigDir,

    ConfigRead { path: PathBuf, source: io::Error },

    /// Creating the directory, writing the backup or renaming it failed
    ConfigWrite { path: PathBuf, source: io::Error },

    /// The file exists but is not valid settings JSON
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    ConfigEncode(serde_json::Error),
}

impl Error {
    /// File the error is about, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Error::DocumentRead { path, .. }
            | Error::Watch { path, .. }
            | Error::ConfigRead { path, .. }
            | Error::ConfigWrite { path, .. }
            | Error::ConfigParse { path, .. } => Some(path),
            Error::Io(_) | Error::NoConfigDir | Error::ConfigEncode(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::DocumentRead { path, source } => {
                write!(f, "cannot read note '{}': {}", path.display(), source)
            }
            Error::Watch { path, source } => {
                write!(f, "cannot watch '{}' for changes: {}", path.display(), source)
            }
            Error::NoConfigDir => f.write_str("no configuration directory on this platform"),
            Error::ConfigRead { path, source } => {
                write!(f, "cannot read settings '{}': {}", path.display(), source)
            }
            Error::ConfigWrite { path, source } => {
                write!(f, "cannot write settings '{}': {}", path.display(), source)
            }
            Error::ConfigParse { path, source } => {
                write!(f, "invalid settings in '{}': {}", path.display(), source)
            }
            Error::ConfigEncode(err) => write!(f, "cannot encode settings: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(source)
            | Error::DocumentRead { source, .. }
            | Error::ConfigRead { source, .. }
            | Error::ConfigWrite { source, .. } => Some(source),
            Error::Watch { source, .. } => Some(source),
            Error::ConfigParse { source, .. } | Error::ConfigEncode(source) => Some(source),
            Error::NoConfigDir => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful degradation
// ─────────────────────────────────────────────────────────────────────────────

pub trait ResultExt<T> {
    /// Log the error as a warning (prefixed with `context`) and fall back to `default`.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{}: {}; falling back to defaults", context, err);
            default
        })
    }
}
