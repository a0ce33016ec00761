//! # Core Module
//!
//! The UI-agnostic sorting engine.
//!
//! ## Modules
//! - `scanner` - Walks directories and classifies media files
//! - `fingerprint` - Content digests for duplicate detection
//! - `metadata` - Extracts EXIF capture dates
//! - `date` - Resolves capture dates through a fallback chain
//! - `registry` - Run-wide duplicate registry
//! - `organize` - Plans library paths and copies files there
//! - `pipeline` - Orchestrates the pre-scan and ingestion phases

pub mod date;
pub mod fingerprint;
pub mod metadata;
pub mod organize;
pub mod pipeline;
pub mod registry;
pub mod scanner;

// Re-export commonly used types
pub use date::{DateResolver, DateSource, ResolvedDate};
pub use fingerprint::Fingerprint;
pub use organize::NamingScheme;
pub use pipeline::{SortConfig, SortReport, Sorter};
pub use registry::{DuplicateRegistry, FileRecord, Registration};
pub use scanner::{MediaEntry, MediaKind};
