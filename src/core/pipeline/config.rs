//! Run configuration.

use crate::core::organize::NamingScheme;
use crate::core::scanner::WalkOptions;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Files smaller than this are ignored unless configured otherwise (100 KiB)
pub const DEFAULT_MIN_SIZE: u64 = 100 * 1024;

/// Everything a sort run needs to know
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    /// Directories to ingest, in order
    pub sources: Vec<PathBuf>,
    /// Library root. `None` runs in report-only mode.
    pub destination: Option<PathBuf>,
    /// Minimum file size in bytes, applied in both phases
    pub min_size: u64,
    /// Plan and register without copying
    pub dry_run: bool,
    /// Worker threads; 0 means one per logical CPU
    pub threads: usize,
    pub naming: NamingScheme,
    pub walk: WalkOptions,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            destination: None,
            min_size: DEFAULT_MIN_SIZE,
            dry_run: false,
            threads: 0,
            naming: NamingScheme::default(),
            walk: WalkOptions::default(),
        }
    }
}

impl SortConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Check that every source is an existing directory and the destination,
    /// if it already exists, is a directory too
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        for source in &self.sources {
            if !source.exists() {
                return Err(ConfigError::SourceNotFound {
                    path: source.clone(),
                });
            }
            if !source.is_dir() {
                return Err(ConfigError::SourceNotDirectory {
                    path: source.clone(),
                });
            }
        }

        if let Some(destination) = &self.destination {
            if destination.exists() && !destination.is_dir() {
                return Err(ConfigError::DestinationNotDirectory {
                    path: destination.clone(),
                });
            }
        }

        Ok(())
    }
}
