//! File watcher for the open note.
//!
//! Watches the note's directory rather than the file itself: many editors
//! save by writing a temp file and renaming it over the original, which
//! would drop a watch on the old inode.

use log::{debug, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

use crate::error::{Error, Result};

/// Changes to the watched note.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentEvent {
    /// The note was written, created or renamed into place
    Changed,
    /// The note was deleted or renamed away
    Removed,
    /// The watcher reported an error
    Error(String),
}

/// Watches a single note on disk.
#[derive(Debug)]
pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<DocumentEvent>,
    path: PathBuf,
}

impl DocumentWatcher {
    pub fn new(path: &Path) -> Result<Self> {
        let (tx, rx) = channel();
        let target = path.to_path_buf();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let handler_target = target.clone();
        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                Self::handle_event(result, &handler_target, &tx);
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )
        .map_err(|e| Error::Watch {
            path: target.clone(),
            source: e,
        })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch {
                path: dir.clone(),
                source: e,
            })?;
        debug!("Watching {} for changes", target.display());

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            path: target,
        })
    }

    fn handle_event(
        result: std::result::Result<Event, notify::Error>,
        target: &Path,
        tx: &Sender<DocumentEvent>,
    ) {
        let event = match result {
            Ok(event) => classify_event(&event.kind, &event.paths, target),
            Err(e) => {
                warn!("File watcher error: {}", e);
                Some(DocumentEvent::Error(e.to_string()))
            }
        };
        if let Some(event) = event {
            let _ = tx.send(event);
        }
    }

    /// Drain pending events without blocking.
    pub fn poll_events(&self) -> Vec<DocumentEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Map a raw notify event onto the watched note, ignoring siblings.
pub fn classify_event(kind: &EventKind, paths: &[PathBuf], target: &Path) -> Option<DocumentEvent> {
    if !paths.iter().any(|p| same_file(p, target)) {
        return None;
    }
    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => {
            if target.exists() {
                Some(DocumentEvent::Changed)
            } else {
                Some(DocumentEvent::Removed)
            }
        }
        EventKind::Remove(_) => Some(DocumentEvent::Removed),
        _ => None,
    }
}

/// Watch events carry absolute paths; the note may have been opened relatively.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.file_name().is_some() && a.file_name() == b.file_name() && a.ends_with(b),
    }
}
