//! Event type definitions for progress reporting.

use crate::core::date::DateSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during a sort run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Run-level events
    Run(RunEvent),
    /// Phase boundaries
    Phase(PhaseEvent),
    /// Per-file outcomes
    File(FileEvent),
}

/// Run-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
    /// The run has started
    Started {
        sources: Vec<PathBuf>,
        destination: Option<PathBuf>,
        dry_run: bool,
    },
    /// The run finished; per-file failures do not prevent this
    Completed { summary: RunSummary },
}

/// The two phases of a run, always in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortPhase {
    /// Registering what is already in the library
    DestinationPrescan,
    /// Placing new files from a source directory
    SourceIngestion,
}

impl std::fmt::Display for SortPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortPhase::DestinationPrescan => write!(f, "Indexing library"),
            SortPhase::SourceIngestion => write!(f, "Sorting"),
        }
    }
}

/// Phase boundary events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PhaseEvent {
    /// A phase started walking `root`
    Started { phase: SortPhase, root: PathBuf },
    /// Every task of the phase has finished
    Completed { summary: PhaseSummary },
}

/// Counters for one phase over one root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: SortPhase,
    pub root: PathBuf,
    /// Media files handled, including ones that failed
    pub files_seen: usize,
    /// Library files registered (pre-scan only)
    pub registered: usize,
    /// New files accepted into the library
    pub placed: usize,
    pub duplicates: usize,
    pub failures: usize,
    pub duration_ms: u64,
}

impl PhaseSummary {
    /// Empty counters for a phase about to start
    pub fn new(phase: SortPhase, root: PathBuf) -> Self {
        Self {
            phase,
            root,
            files_seen: 0,
            registered: 0,
            placed: 0,
            duplicates: 0,
            failures: 0,
            duration_ms: 0,
        }
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_seen: usize,
    pub registered: usize,
    pub placed: usize,
    pub duplicates: usize,
    pub failures: usize,
    /// Distinct fingerprints known at the end of the run
    pub registry_size: usize,
    pub dry_run: bool,
    pub duration_ms: u64,
}

/// Per-file events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileEvent {
    /// An existing library file was registered
    Registered { path: PathBuf },
    /// A new file was accepted; `copied` is false in dry-run and report-only runs
    Placed {
        source: PathBuf,
        destination: PathBuf,
        date_source: DateSource,
        copied: bool,
    },
    /// Content was already known
    Duplicate {
        duplicate: PathBuf,
        original: PathBuf,
    },
    /// The file could not be processed; the run continues
    Failed { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::File(FileEvent::Placed {
            source: PathBuf::from("/card/DCIM/photo.jpg"),
            destination: PathBuf::from("/lib/image/2022/3/image-20220301-102030.jpg"),
            date_source: DateSource::ExifMetadata,
            copied: true,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::File(FileEvent::Placed {
                date_source,
                copied,
                ..
            }) => {
                assert_eq!(date_source, DateSource::ExifMetadata);
                assert!(copied);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn run_summary_is_serializable() {
        let summary = RunSummary {
            files_seen: 1000,
            placed: 850,
            duplicates: 150,
            registry_size: 850,
            duration_ms: 5000,
            ..Default::default()
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"duplicates\":150"));
    }

    #[test]
    fn phase_summary_starts_empty() {
        let summary = PhaseSummary::new(SortPhase::SourceIngestion, PathBuf::from("/card"));
        assert_eq!(summary.files_seen, 0);
        assert_eq!(summary.phase.to_string(), "Sorting");
    }
}
