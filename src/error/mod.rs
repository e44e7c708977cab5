//! # Error Module
//!
//! Error types for the duplicate image finder.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - every I/O failure names the path involved
//! - **No process aborts from worker tasks** - per-file failures are
//!   collected and reported after each phase; only an invalid root or an
//!   invalid configuration stops a run before it starts

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum DoublesError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Deletion error: {0}")]
    Delete(#[from] DeleteError),

    #[error("Dump error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that occur during directory scanning
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory entry under {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while content-hashing a file
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to open file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while deleting duplicate files
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("Failed to delete {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while writing the duplicate dump
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write dump file {path}: {source}")]
    WriteDump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize duplicate groups: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that occur while loading or validating the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config lists no accepted image types")]
    NoImageTypes,

    #[error("Config has an empty dump file path")]
    NoDumpFile,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, DoublesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/photos/vacation"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/vacation"));
    }

    #[test]
    fn hash_error_includes_path_and_cause() {
        let error = HashError::OpenFile {
            path: PathBuf::from("/photos/img.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/img.jpg"));
    }

    #[test]
    fn empty_type_list_is_its_own_error() {
        let message = ConfigError::NoImageTypes.to_string();
        assert!(message.contains("no accepted image types"));
    }
}
