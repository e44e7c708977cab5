//! # Config Module
//!
//! Accepted image types and the dump-file location, loaded from a JSON
//! file. The accepted-type list drives the MIME classifier; an empty list
//! makes every scan a no-op, so it is rejected at load time.
//!
//! ## Example config
//! ```json
//! {
//!     "image_types": ["image/jpeg", "image/png", "image/gif"],
//!     "dump_file": "doubles.json"
//! }
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration: which MIME types count as images, and where to
/// write the duplicate dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// MIME types accepted by the scanner, e.g. `image/jpeg`
    pub image_types: Vec<String>,
    /// Path the `--dump` flag writes the duplicate map to
    pub dump_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            dump_file: PathBuf::from("doubles.json"),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_json::from_str(&data).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the given file, fall back to the default location, then to
    /// built-in defaults.
    ///
    /// An explicit `--config` path that fails to load is an error; a
    /// missing file at the default location is not.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Self::default_path();
        if default_path.is_file() {
            return Self::load(&default_path);
        }

        Ok(Self::default())
    }

    /// Default config file location under the user config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("image-doubles")
            .join("config.json")
    }

    /// Reject configs that can't drive a useful scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_types.is_empty() {
            return Err(ConfigError::NoImageTypes);
        }
        if self.dump_file.as_os_str().is_empty() {
            return Err(ConfigError::NoDumpFile);
        }
        Ok(())
    }
}
