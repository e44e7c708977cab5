//! # Collection Module
//!
//! The shared aggregate for one scan run: the ordered list of discovered
//! image paths and the digest-hex to paths index.
//!
//! ## Lifecycle
//! One collection per run. The scanner appends paths, the hash pool
//! appends (digest, path) pairs, and [`ImageCollection::find_doubles`]
//! consumes the collection to produce a read-only [`DoublesReport`].
//! Because extraction takes the collection by value, nothing can mutate it
//! afterwards.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Lowercase hex rendering of a digest, used as the index key.
pub fn hex_digest(digest: &[u8]) -> String {
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[derive(Debug, Default)]
struct Inner {
    /// Discovery order; each path appears at most once (the scanner
    /// visits each regular file exactly once).
    files: Vec<PathBuf>,
    /// Digest-hex to paths, within-bucket order = hash-completion order.
    hashes: HashMap<String, Vec<PathBuf>>,
}

/// Thread-safe aggregate of discovered files and their content digests.
///
/// All mutation goes through one mutex; critical sections are O(1)
/// appends, so coarse locking costs little even with 50 hash workers.
#[derive(Debug, Default)]
pub struct ImageCollection {
    inner: Mutex<Inner>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a discovered file path.
    pub fn add_file(&self, path: PathBuf) {
        let mut inner = self.lock();
        inner.files.push(path);
    }

    /// Register a digest for a path, creating the bucket if needed.
    pub fn add_hash(&self, digest: &[u8], path: PathBuf) {
        let key = hex_digest(digest);
        let mut inner = self.lock();
        inner.hashes.entry(key).or_default().push(path);
    }

    /// Number of discovered files.
    pub fn len(&self) -> usize {
        self.lock().files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().files.is_empty()
    }

    /// Snapshot of the discovered paths, in discovery order.
    ///
    /// Used to feed the hash pool's queue after scanning finishes.
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock().files.clone()
    }

    /// Extract the duplicate groups, consuming the collection.
    ///
    /// Only buckets with two or more paths are kept. Group order is
    /// unspecified; within a group, order is hash-completion order, so
    /// the keeper is whichever file was digested first.
    pub fn find_doubles(self) -> DoublesReport {
        let inner = self
            .inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let groups = inner
            .hashes
            .into_iter()
            .filter(|(_, paths)| paths.len() >= 2)
            .map(|(digest, paths)| DuplicateGroup { digest, paths })
            .collect();

        DoublesReport { groups }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Appends can't leave the structure half-written, so a poisoned
        // lock is still safe to reuse.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A set of two or more files sharing one content digest.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// Lowercase hex digest shared by every file in the group
    pub digest: String,
    /// Files with this digest; length >= 2 by construction
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// The file that survives deletion: first to finish hashing.
    pub fn keeper(&self) -> &Path {
        &self.paths[0]
    }

    /// Every file except the keeper.
    pub fn extras(&self) -> &[PathBuf] {
        &self.paths[1..]
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The duplicate groups extracted from one run. Read-only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DoublesReport {
    groups: Vec<DuplicateGroup>,
}

impl DoublesReport {
    /// Number of duplicate groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total files across all groups (sum of bucket sizes).
    pub fn duplicate_file_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn hex_digest_is_lowercase_and_padded() {
        assert_eq!(hex_digest(&[0x00, 0x0A, 0xFF]), "000aff");
        assert_eq!(hex_digest(&[]), "");
    }

    #[test]
    fn add_file_preserves_discovery_order() {
        let collection = ImageCollection::new();
        collection.add_file(PathBuf::from("/a.jpg"));
        collection.add_file(PathBuf::from("/b.jpg"));

        assert_eq!(
            collection.files(),
            vec![PathBuf::from("/a.jpg"), PathBuf::from("/b.jpg")]
        );
    }

    #[test]
    fn identical_digests_share_a_bucket() {
        let collection = ImageCollection::new();
        collection.add_hash(&[0xAB, 0xCD], PathBuf::from("/a.jpg"));
        collection.add_hash(&[0xAB, 0xCD], PathBuf::from("/b.jpg"));
        collection.add_hash(&[0x12, 0x34], PathBuf::from("/c.png"));

        let report = collection.find_doubles();

        assert_eq!(report.len(), 1);
        assert_eq!(report.groups()[0].digest, "abcd");
        assert_eq!(report.groups()[0].len(), 2);
    }

    #[test]
    fn singleton_buckets_are_excluded() {
        let collection = ImageCollection::new();
        collection.add_hash(&[0x01], PathBuf::from("/a.jpg"));
        collection.add_hash(&[0x02], PathBuf::from("/b.jpg"));

        let report = collection.find_doubles();

        assert!(report.is_empty());
        assert_eq!(report.duplicate_file_count(), 0);
    }

    #[test]
    fn duplicate_file_count_sums_bucket_sizes() {
        let collection = ImageCollection::new();
        for i in 0..3 {
            collection.add_hash(&[0xAA], PathBuf::from(format!("/a{i}.jpg")));
        }
        for i in 0..2 {
            collection.add_hash(&[0xBB], PathBuf::from(format!("/b{i}.jpg")));
        }

        let report = collection.find_doubles();

        assert_eq!(report.len(), 2);
        assert_eq!(report.duplicate_file_count(), 5);
    }

    #[test]
    fn keeper_is_first_registered() {
        let collection = ImageCollection::new();
        collection.add_hash(&[0xAA], PathBuf::from("/first.jpg"));
        collection.add_hash(&[0xAA], PathBuf::from("/second.jpg"));

        let report = collection.find_doubles();
        let group = &report.groups()[0];

        assert_eq!(group.keeper(), Path::new("/first.jpg"));
        assert_eq!(group.extras(), &[PathBuf::from("/second.jpg")]);
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let collection = Arc::new(ImageCollection::new());
        let mut handles = Vec::new();

        for t in 0..8u8 {
            let collection = Arc::clone(&collection);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    collection.add_file(PathBuf::from(format!("/t{t}/f{i}.jpg")));
                    collection.add_hash(&[t], PathBuf::from(format!("/t{t}/f{i}.jpg")));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(collection.len(), 800);

        let collection = Arc::into_inner(collection).unwrap();
        let report = collection.find_doubles();
        // One bucket per thread, 100 paths each
        assert_eq!(report.len(), 8);
        assert_eq!(report.duplicate_file_count(), 800);
    }
}
