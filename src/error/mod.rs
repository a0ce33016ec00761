//! # Error Module
//!
//! Error types for the photo sorter.
//!
//! ## Design Principles
//! - **Setup errors fail the run** - bad configuration or an unusable root is
//!   reported through [`SorterError`] before any file is touched
//! - **File errors fail one file** - everything in [`FileError`] is reported
//!   for the file it happened to and the run carries on
//! - **Include context** - paths and what went wrong

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error, returned only for problems that stop a whole run
#[derive(Error, Debug)]
pub enum SorterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid or unreadable configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No source directories configured")]
    NoSources,

    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Source is not a directory: {path}")]
    SourceNotDirectory { path: PathBuf },

    #[error("Destination exists but is not a directory: {path}")]
    DestinationNotDirectory { path: PathBuf },

    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Errors that occur while walking a directory tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// The path the error refers to
    pub fn path(&self) -> &Path {
        match self {
            ScanError::DirectoryNotFound { path }
            | ScanError::PermissionDenied { path }
            | ScanError::ReadDirectory { path, .. } => path,
        }
    }
}

/// Errors that occur while fingerprinting a file
#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Metadata could not be decoded. Only ever triggers a date fallback.
#[derive(Error, Debug)]
#[error("Metadata decode failed: {reason}")]
pub struct DecodeError {
    pub reason: String,
}

/// Errors that occur while copying a file into the library
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open {path}: {source}")]
    OpenSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Refusing to overwrite existing file: {path}")]
    DestinationExists { path: PathBuf },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to set timestamps on {path}: {source}")]
    SetTimes {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the duplicate registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Duplicate registry is unusable: a worker panicked while holding it")]
    Poisoned,
}

/// Anything that can go wrong with a single file
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error(transparent)]
    Copy(#[from] CopyError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Identical content was registered first, but its copy failed
    #[error("Same content as {}, which could not be placed", original.display())]
    OriginalNotPlaced { original: PathBuf },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SorterError>;
