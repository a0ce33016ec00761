//! Outcome and report types for sort runs.

use crate::core::fingerprint::Fingerprint;
use crate::core::registry::FileRecord;
use crate::error::FileError;
use crate::events::{PhaseSummary, RunSummary};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A new file accepted into the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedFile {
    pub source: PathBuf,
    pub fingerprint: Fingerprint,
    /// The registered record, including the final destination
    pub record: FileRecord,
    /// False when nothing was written (dry run or report-only)
    pub copied: bool,
}

/// A file whose content was already registered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateConflict {
    pub fingerprint: Fingerprint,
    /// The record that won
    pub original: FileRecord,
    /// The file that lost
    pub duplicate: PathBuf,
}

/// A file that could not be processed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub message: String,
}

/// What happened to one file
#[derive(Debug)]
pub enum FileOutcome {
    /// An existing library file was registered by the pre-scan
    Registered { path: PathBuf },
    Placed(PlacedFile),
    Duplicate(DuplicateConflict),
    Failed { path: PathBuf, error: FileError },
}

/// Everything one phase produced for one root
#[derive(Debug)]
pub struct PhaseResult {
    pub summary: PhaseSummary,
    pub outcomes: Vec<FileOutcome>,
}

/// Result of a whole sort run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortReport {
    /// One entry per phase and root, in execution order
    pub phases: Vec<PhaseSummary>,
    pub placed: Vec<PlacedFile>,
    pub duplicates: Vec<DuplicateConflict>,
    pub failures: Vec<FailedFile>,
    /// Library files registered by the pre-scan
    pub registered: usize,
    /// Distinct fingerprints known at the end of the run
    pub registry_size: usize,
    pub dry_run: bool,
    pub duration_ms: u64,
}

impl SortReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            phases: Vec::new(),
            placed: Vec::new(),
            duplicates: Vec::new(),
            failures: Vec::new(),
            registered: 0,
            registry_size: 0,
            dry_run,
            duration_ms: 0,
        }
    }

    /// Fold a finished phase into the report
    pub fn absorb(&mut self, result: PhaseResult) {
        self.phases.push(result.summary);

        for outcome in result.outcomes {
            match outcome {
                FileOutcome::Registered { .. } => self.registered += 1,
                FileOutcome::Placed(placed) => self.placed.push(placed),
                FileOutcome::Duplicate(conflict) => self.duplicates.push(conflict),
                FileOutcome::Failed { path, error } => self.failures.push(FailedFile {
                    path,
                    message: error.to_string(),
                }),
            }
        }
    }

    /// Totals for the run
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            files_seen: self.phases.iter().map(|p| p.files_seen).sum(),
            registered: self.registered,
            placed: self.placed.len(),
            duplicates: self.duplicates.len(),
            failures: self.failures.len(),
            registry_size: self.registry_size,
            dry_run: self.dry_run,
            duration_ms: self.duration_ms,
        }
    }
}

impl PhaseResult {
    /// Count `outcomes` into `summary`
    pub(crate) fn tally(mut summary: PhaseSummary, outcomes: Vec<FileOutcome>) -> Self {
        summary.files_seen = outcomes.len();
        for outcome in &outcomes {
            match outcome {
                FileOutcome::Registered { .. } => summary.registered += 1,
                FileOutcome::Placed(_) => summary.placed += 1,
                FileOutcome::Duplicate(_) => summary.duplicates += 1,
                FileOutcome::Failed { .. } => summary.failures += 1,
            }
        }
        Self { summary, outcomes }
    }
}
