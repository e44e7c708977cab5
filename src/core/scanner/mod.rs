//! # Scanner Module
//!
//! Concurrent directory traversal.
//!
//! Each walk covers exactly one directory level's files; every
//! subdirectory it meets becomes a new task spawned into a shared rayon
//! scope, and the local walk prunes it to avoid double-visiting. The scope
//! is the completion barrier: `scan` returns only once every transitively
//! spawned sub-walk has finished.
//!
//! Directories whose base name is on the skip-list are pruned outright,
//! at any depth. Per-file I/O errors are recorded and the file skipped;
//! only an invalid root fails the scan itself.

use crate::core::classifier::MimeClassifier;
use crate::core::collection::ImageCollection;
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use walkdir::WalkDir;

/// Recursive, concurrent directory scanner.
pub struct Scanner {
    classifier: MimeClassifier,
    skip: HashSet<String>,
}

impl Scanner {
    /// Create a scanner with a classifier and a set of directory base
    /// names to prune.
    pub fn new<I, S>(classifier: MimeClassifier, skip: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classifier,
            skip: skip.into_iter().map(Into::into).collect(),
        }
    }

    /// Walk `root` and append every accepted image path to `collection`.
    ///
    /// Returns the per-file errors encountered along the way; the only
    /// fatal error is a root that does not exist or is not a directory.
    pub fn scan(
        &self,
        root: &Path,
        collection: &ImageCollection,
        events: &EventSender,
    ) -> Result<Vec<ScanError>, ScanError> {
        let metadata = std::fs::metadata(root).map_err(|_| ScanError::DirectoryNotFound {
            path: root.to_path_buf(),
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let errors = Mutex::new(Vec::new());
        let directories = AtomicUsize::new(0);
        let ctx = WalkContext {
            scanner: self,
            collection,
            events,
            errors: &errors,
            directories: &directories,
        };

        // The scope blocks until every spawned sub-walk, including ones
        // spawned by sub-walks, has returned.
        rayon::scope(|scope| ctx.walk(scope, root.to_path_buf()));

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: collection.len(),
        }));

        Ok(errors
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

/// Shared state for one scan run, copied into every directory task.
#[derive(Clone, Copy)]
struct WalkContext<'a> {
    scanner: &'a Scanner,
    collection: &'a ImageCollection,
    events: &'a EventSender,
    errors: &'a Mutex<Vec<ScanError>>,
    directories: &'a AtomicUsize,
}

impl<'a> WalkContext<'a> {
    /// Walk one directory, spawning a task per subdirectory.
    fn walk<'s>(self, scope: &rayon::Scope<'s>, start: PathBuf)
    where
        'a: 's,
    {
        let mut walker = WalkDir::new(&start).into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let path = error
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| start.clone());
                    self.record(ScanError::ReadEntry {
                        path,
                        source: error.into(),
                    });
                    continue;
                }
            };
            let path = entry.path();

            if entry.file_type().is_dir() {
                let base_name = path.file_name().and_then(|name| name.to_str());
                if base_name.is_some_and(|name| self.scanner.skip.contains(name)) {
                    walker.skip_current_dir();
                    continue;
                }

                // Hand every subdirectory to its own task and stop
                // descending here, so no entry is visited twice.
                if entry.depth() > 0 {
                    let subdir = path.to_path_buf();
                    scope.spawn(move |scope| self.walk(scope, subdir));
                    walker.skip_current_dir();
                    continue;
                }

                let visited = self.directories.fetch_add(1, Ordering::SeqCst) + 1;
                self.events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    directories_scanned: visited,
                    images_found: self.collection.len(),
                    current_path: path.to_path_buf(),
                })));
                continue;
            }

            // Symlinks and other non-regular entries are ignored.
            if !entry.file_type().is_file() {
                continue;
            }

            match self.scanner.classifier.classify_file(path) {
                Ok(true) => {
                    self.collection.add_file(path.to_path_buf());
                    self.events.send(Event::Scan(ScanEvent::ImageFound {
                        path: path.to_path_buf(),
                    }));
                }
                Ok(false) => {}
                Err(error) => {
                    self.events.send(Event::Scan(ScanEvent::Error {
                        path: path.to_path_buf(),
                        message: error.to_string(),
                    }));
                    self.record(error);
                }
            }
        }
    }

    fn record(&self, error: ScanError) {
        self.errors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(error);
    }
}
