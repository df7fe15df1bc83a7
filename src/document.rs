//! The note being read.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Note shown when no file is given on the command line.
const SAMPLE_NOTE: &str = include_str!("../assets/sample.md");

/// Markdown source plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// `None` for the bundled sample
    pub path: Option<PathBuf>,
    pub source: String,
}

impl Document {
    pub fn sample() -> Self {
        Self {
            path: None,
            source: SAMPLE_NOTE.to_string(),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::DocumentRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// Re-read from disk. Returns whether the text changed.
    pub fn reload(&mut self) -> Result<bool> {
        let Some(path) = &self.path else {
            return Ok(false);
        };
        let fresh = Self::open(path)?;
        if fresh.source == self.source {
            return Ok(false);
        }
        self.source = fresh.source;
        Ok(true)
    }

    /// Window title: the file name, or "Sample note".
    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sample note".to_string())
    }
}
