//! Background workspace indexing

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use ignore::{DirEntry, WalkBuilder};
use tracing::{debug, error, info, warn};

use crate::session::config::SessionConfig;

/// File extensions picked up by the indexer.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["erl", "hrl"];

/// Directories never descended into, besides hidden ones.
const SKIPPED_DIRS: [&str; 1] = ["_build"];

/// Entry point of the background indexer.
#[cfg_attr(test, mockall::automock)]
pub trait Indexer: Send + Sync {
    /// Starts indexing unless it is disabled or already running. Returns
    /// immediately; the indexer decides whether any work happens.
    fn maybe_start(&self, session: &SessionConfig);
}

/// Indexer that collects Erlang sources under the workspace root into an
/// in-memory list.
///
/// The walk runs on Tokio's blocking pool, so `maybe_start` must be called
/// from within a Tokio runtime.
#[derive(Default)]
pub struct WorkspaceIndexer {
    started: AtomicBool,
    files: Arc<RwLock<Vec<PathBuf>>>,
}

impl WorkspaceIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Snapshot of the files indexed so far.
    pub fn indexed_files(&self) -> Vec<PathBuf> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Indexer for WorkspaceIndexer {
    fn maybe_start(&self, session: &SessionConfig) {
        if !session.indexing_enabled() {
            info!("Indexing disabled by client, skipping");
            return;
        }

        let Some(root) = session.root_path() else {
            warn!("Workspace root {} is not a local path, skipping indexing", session.root_uri);
            return;
        };

        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Indexing already started");
            return;
        }

        let files = Arc::clone(&self.files);
        tokio::task::spawn_blocking(move || {
            info!("Indexing workspace {:?}", root);
            match collect_source_files(&root) {
                Ok(found) => {
                    info!("Indexed {} source files", found.len());
                    *files.write().unwrap_or_else(PoisonError::into_inner) = found;
                }
                Err(e) => error!("Failed to index workspace {:?}: {}", root, e),
            }
        });
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|ft| ft.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// Recursively lists `.erl` and `.hrl` files below `root`, sorted.
///
/// Hidden entries and anything excluded by `.gitignore` are left out.
/// Unreadable subdirectories are skipped; a missing root is an error.
pub fn collect_source_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{:?} is not a directory", root),
        ));
    }

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .filter_entry(|entry| !is_skipped_dir(entry))
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_some_and(|ft| ft.is_file()) && is_source_file(entry.path()) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}
