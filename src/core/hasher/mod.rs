//! # Hasher Module
//!
//! Content digesting and the fixed-size hash worker pool.
//!
//! The digest is XXH3-128 over the file's full byte stream, rendered as
//! lowercase hex by the collection. Files of 1 MiB and up are
//! memory-mapped to avoid the kernel-to-user copy; smaller files are
//! streamed through the accumulator in 64 KiB chunks.
//!
//! Workers pull paths from a bounded queue and emit exactly one outcome
//! per path on a results channel, so the caller knows when every digest
//! has been registered.

use crate::core::collection::ImageCollection;
use crate::error::HashError;
use crate::events::{Event, EventSender, HashEvent, HashProgress};
use crossbeam_channel::bounded;
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;
use xxhash_rust::xxh3::Xxh3;

/// Number of hash workers when no override is given.
pub const DEFAULT_WORKERS: usize = 50;

/// Minimum file size for memory-mapped reads (1 MiB).
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Chunk size for streamed reads of small files.
const READ_CHUNK: usize = 64 * 1024;

/// Compute the content digest of a single file.
pub fn hash_file(path: &Path) -> Result<[u8; 16], HashError> {
    let file = File::open(path).map_err(|e| HashError::OpenFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let metadata = file.metadata().map_err(|e| HashError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Xxh3::new();

    if metadata.len() >= MMAP_THRESHOLD {
        // SAFETY: read-only map; the file handle outlives the mmap.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| HashError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        hasher.update(&mmap);
    } else {
        let mut file = file;
        let mut buffer = [0u8; READ_CHUNK];
        loop {
            let read = file.read(&mut buffer).map_err(|e| HashError::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
    }

    Ok(hasher.digest128().to_be_bytes())
}

/// Fixed-size pool of content-hash workers.
#[derive(Debug, Clone)]
pub struct HashPool {
    workers: usize,
}

impl HashPool {
    /// Create a pool with the given worker count (at least 1).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Digest every path and register (digest, path) in the collection.
    ///
    /// Blocks until one outcome per submitted path has been received,
    /// then returns the per-file failures. Completion order among workers
    /// is arbitrary; grouping is commutative so the final index does not
    /// depend on it.
    pub fn run(
        &self,
        paths: &[PathBuf],
        collection: &ImageCollection,
        events: &EventSender,
    ) -> Vec<HashError> {
        let total = paths.len();
        if total == 0 {
            return Vec::new();
        }

        events.send(Event::Hash(HashEvent::Started { total_files: total }));

        let (job_tx, job_rx) = bounded::<PathBuf>(total);
        let (outcome_tx, outcome_rx) = bounded::<Result<PathBuf, HashError>>(total);
        let workers = self.workers.min(total);
        let mut errors = Vec::new();

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let outcome_tx = outcome_tx.clone();
                scope.spawn(move || {
                    // Exits when the job channel is closed and drained.
                    for path in job_rx.iter() {
                        let outcome = match hash_file(&path) {
                            Ok(digest) => {
                                collection.add_hash(&digest, path.clone());
                                Ok(path)
                            }
                            Err(error) => Err(error),
                        };
                        if outcome_tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            }

            // The queue is sized to hold every job, so feeding never blocks.
            for path in paths {
                let _ = job_tx.send(path.clone());
            }
            drop(job_tx);

            // One outcome per path, whichever worker produced it.
            for completed in 1..=total {
                match outcome_rx.recv() {
                    Ok(Ok(path)) => {
                        events.send(Event::Hash(HashEvent::Progress(HashProgress {
                            completed,
                            total,
                            current_path: path,
                        })));
                    }
                    Ok(Err(error)) => {
                        let (HashError::OpenFile { path, .. }
                        | HashError::ReadFile { path, .. }) = &error;
                        events.send(Event::Hash(HashEvent::Error {
                            path: path.clone(),
                            message: error.to_string(),
                        }));
                        errors.push(error);
                    }
                    Err(_) => break,
                }
            }
        });

        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: total - errors.len(),
        }));

        errors
    }
}

impl Default for HashPool {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collection::hex_digest;
    use crate::events::null_sender;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn identical_content_gives_identical_digests() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn different_content_gives_different_digests() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"some bytes").unwrap();
        fs::write(&b, b"other bytes").unwrap();

        assert_ne!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn empty_file_digests_fine() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.png");
        fs::File::create(&empty).unwrap();

        assert_eq!(hash_file(&empty).unwrap().len(), 16);
    }

    #[test]
    fn large_files_take_the_mmap_path() {
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..(MMAP_THRESHOLD as usize + 2))
            .map(|i| (i % 251) as u8)
            .collect();
        let large_a = dir.path().join("large_a.bin");
        let large_b = dir.path().join("large_b.bin");
        fs::write(&large_a, &content).unwrap();
        fs::write(&large_b, &content).unwrap();

        assert_eq!(hash_file(&large_a).unwrap(), hash_file(&large_b).unwrap());
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = hash_file(Path::new("/nonexistent/file.jpg"));
        assert!(matches!(result, Err(HashError::OpenFile { .. })));
    }

    #[test]
    fn pool_registers_every_path() {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..20 {
            let path = dir.path().join(format!("img{i}.jpg"));
            // Ten distinct contents, each written twice
            fs::write(&path, format!("content {}", i % 10)).unwrap();
            paths.push(path);
        }

        let collection = ImageCollection::new();
        let pool = HashPool::new(4);
        let errors = pool.run(&paths, &collection, &null_sender());

        assert!(errors.is_empty());
        let report = collection.find_doubles();
        assert_eq!(report.len(), 10);
        assert_eq!(report.duplicate_file_count(), 20);
    }

    #[test]
    fn pool_reports_failures_without_stopping() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.jpg");
        fs::write(&good, b"bytes").unwrap();
        let paths = vec![good.clone(), dir.path().join("missing.jpg"), good.clone()];

        let collection = ImageCollection::new();
        let pool = HashPool::new(2);
        let errors = pool.run(&paths, &collection, &null_sender());

        assert_eq!(errors.len(), 1);
        // The good file was hashed twice and forms one group
        let report = collection.find_doubles();
        assert_eq!(report.len(), 1);
        assert_eq!(report.groups()[0].len(), 2);
    }

    #[test]
    fn pool_with_more_workers_than_paths_still_finishes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("only.jpg");
        fs::write(&path, b"bytes").unwrap();

        let collection = ImageCollection::new();
        let errors = HashPool::default().run(&[path], &collection, &null_sender());

        assert!(errors.is_empty());
    }

    #[test]
    fn digest_hex_is_stable_for_known_content() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.bin");
        fs::write(&a, b"stable").unwrap();

        let first = hex_digest(&hash_file(&a).unwrap());
        let second = hex_digest(&hash_file(&a).unwrap());

        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
    }
}
