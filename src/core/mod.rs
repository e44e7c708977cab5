//! # Core Module
//!
//! The duplicate detection engine.
//!
//! ## Modules
//! - `classifier` - Sniffs MIME types from leading bytes
//! - `scanner` - Concurrent directory traversal
//! - `hasher` - Content-digest worker pool
//! - `collection` - Shared path list and digest index
//! - `remover` - Deletes redundant copies
//! - `reporter` - JSON dump of duplicate groups
//! - `pipeline` - Orchestrates the full workflow

pub mod classifier;
pub mod collection;
pub mod hasher;
pub mod pipeline;
pub mod remover;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use classifier::MimeClassifier;
pub use collection::{DoublesReport, DuplicateGroup, ImageCollection};
pub use hasher::HashPool;
pub use remover::DeleteOutcome;
pub use scanner::Scanner;
