//! # Pipeline Module
//!
//! Orchestrates a sort run.
//!
//! ## Phases
//! 1. **Destination pre-scan** - register what the library already holds
//! 2. **Source ingestion** - fingerprint, date, plan and copy new files,
//!    one source root at a time
//!
//! Each phase finishes completely before the next starts.

mod config;
mod dispatcher;
mod executor;
mod types;

pub use config::{SortConfig, DEFAULT_MIN_SIZE};
pub use executor::{Sorter, SorterBuilder};
pub use types::{DuplicateConflict, FailedFile, FileOutcome, PhaseResult, PlacedFile, SortReport};
