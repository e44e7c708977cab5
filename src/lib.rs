//! # Image Doubles
//!
//! Finds duplicate image files under a directory tree by content hash.
//!
//! ## How it works
//! 1. A concurrent scanner walks the tree (one task per subdirectory) and
//!    collects every file whose sniffed MIME type is in the accepted set.
//! 2. A fixed pool of hash workers digests each candidate file (XXH3-128)
//!    and indexes paths by digest.
//! 3. Any digest bucket with two or more paths is a duplicate group; the
//!    first path in the bucket is the keeper, the rest may be deleted.
//!
//! ## Architecture
//! The library is split into a core engine and presentation layers:
//! - `core` - The scan/hash/group pipeline
//! - `config` - Accepted image types and dump-file location
//! - `events` - Event-driven progress reporting
//! - `error` - Error types with path context

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{DoublesError, Result};

/// Initialize tracing for the library
///
/// This should be called once by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
