//! # Date Module
//!
//! Works out when a photo or video was captured.
//!
//! ## Fallback chain
//! 1. **EXIF** - embedded metadata (images only)
//! 2. **Filename** - dates such as `IMG_20230714_120000.mp4`
//! 3. **Modification time** - always available, so resolution never fails
//!
//! Each step is a [`DateStrategy`]; the [`DateResolver`] tries them in order
//! and tags the result with the step that produced it.

mod strategies;

pub use strategies::{ExifStrategy, FilenameStrategy, ModifiedTimeStrategy};

use crate::core::metadata::{ExifDecoder, MetadataDecoder};
use crate::core::scanner::MediaKind;
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Which signal supplied a resolved date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    ExifMetadata,
    FilenamePattern,
    FileModificationTime,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSource::ExifMetadata => write!(f, "Exif"),
            DateSource::FilenamePattern => write!(f, "Filename"),
            DateSource::FileModificationTime => write!(f, "Last modified"),
        }
    }
}

/// A capture date and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDate {
    /// Local wall-clock time
    pub timestamp: NaiveDateTime,
    pub source: DateSource,
}

/// One step of the fallback chain
pub trait DateStrategy: Send + Sync {
    /// The tag attached to dates this strategy produces
    fn source(&self) -> DateSource;

    /// Try to date the file; `None` passes the file on to the next strategy
    fn attempt(&self, path: &Path, kind: MediaKind, modified: SystemTime)
        -> Option<NaiveDateTime>;
}

/// Convert a filesystem timestamp to local wall-clock time
pub fn local_modified_time(modified: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(modified).naive_local()
}

/// Runs the fallback chain
pub struct DateResolver {
    strategies: Vec<Box<dyn DateStrategy>>,
}

impl DateResolver {
    /// The standard chain: EXIF via `decoder`, filename, modification time
    pub fn new(decoder: Arc<dyn MetadataDecoder>) -> Self {
        Self::with_strategies(vec![
            Box::new(ExifStrategy::new(decoder)),
            Box::new(FilenameStrategy::new()),
            Box::new(ModifiedTimeStrategy),
        ])
    }

    /// A custom chain, tried in the given order
    pub fn with_strategies(strategies: Vec<Box<dyn DateStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve the capture date of a file. Never fails.
    pub fn resolve(&self, path: &Path, kind: MediaKind, modified: SystemTime) -> ResolvedDate {
        for strategy in &self.strategies {
            if let Some(timestamp) = strategy.attempt(path, kind, modified) {
                debug!(path = %path.display(), source = %strategy.source(), %timestamp, "date resolved");
                return ResolvedDate {
                    timestamp,
                    source: strategy.source(),
                };
            }
        }

        // Custom chains may leave out the terminal step
        ResolvedDate {
            timestamp: local_modified_time(modified),
            source: DateSource::FileModificationTime,
        }
    }
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(Arc::new(ExifDecoder))
    }
}
