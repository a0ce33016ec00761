//! Per-phase fan-out.
//!
//! A phase walks one root and hands every qualifying media file to a task on
//! the current rayon pool. Collecting the parallel iterator is the barrier:
//! a phase returns only once every task it started has finished.
//!
//! Duplicates are reported after the barrier. By then every copy of the phase
//! has succeeded or failed, so a duplicate of content whose copy failed is
//! reported as a failure instead.

use super::types::{DuplicateConflict, FileOutcome, PhaseResult, PlacedFile};
use crate::core::date::{local_modified_time, DateResolver, DateSource};
use crate::core::fingerprint::{fingerprint, Fingerprint};
use crate::core::organize::{CopyTimes, FileCopier, NamingScheme, PlacementPlanner};
use crate::core::registry::{DuplicateRegistry, FileRecord, Registration};
use crate::core::scanner::{walk, MediaEntry, MediaFilter, MediaKind, WalkOptions};
use crate::error::{FileError, ScanError};
use crate::events::{Event, EventSender, FileEvent, PhaseEvent, PhaseSummary, SortPhase};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Shared state for the tasks of a run. Everything here is read-only except
/// the registry.
pub(crate) struct Dispatcher<'a> {
    pub registry: &'a DuplicateRegistry,
    pub resolver: &'a DateResolver,
    pub filter: MediaFilter,
    pub walk_options: &'a WalkOptions,
    /// Library root; `None` means report-only
    pub destination: Option<&'a Path>,
    pub naming: NamingScheme,
    pub dry_run: bool,
    pub events: &'a EventSender,
}

impl Dispatcher<'_> {
    /// Register every media file already under the library root
    pub fn prescan(&self, root: &Path) -> Result<PhaseResult, ScanError> {
        self.run_phase(SortPhase::DestinationPrescan, root, |entry, _| {
            self.register_existing(entry)
        })
    }

    /// Place every new media file under a source root
    pub fn ingest(&self, root: &Path) -> Result<PhaseResult, ScanError> {
        self.run_phase(SortPhase::SourceIngestion, root, |entry, kind| {
            self.ingest_file(entry, kind)
        })
    }

    fn run_phase<F>(&self, phase: SortPhase, root: &Path, task: F) -> Result<PhaseResult, ScanError>
    where
        F: Fn(&MediaEntry, MediaKind) -> FileOutcome + Sync,
    {
        let start_time = Instant::now();
        info!(phase = %phase, root = %root.display(), "Phase started");
        self.events.send(Event::Phase(PhaseEvent::Started {
            phase,
            root: root.to_path_buf(),
        }));

        let entries = walk(root, self.walk_options)?;

        let outcomes: Vec<FileOutcome> = entries
            .par_bridge()
            .filter_map(|entry| match entry {
                Ok(entry) => {
                    let kind = self.filter.classify(&entry)?;
                    Some(task(&entry, kind))
                }
                Err(error) => {
                    let path = error.path().to_path_buf();
                    Some(self.failed(&path, error.into()))
                }
            })
            .collect();

        let outcomes = outcomes.into_iter().map(|outcome| self.settle(outcome)).collect();

        let mut result = PhaseResult::tally(PhaseSummary::new(phase, root.to_path_buf()), outcomes);
        result.summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            phase = %phase,
            root = %root.display(),
            files = result.summary.files_seen,
            placed = result.summary.placed,
            duplicates = result.summary.duplicates,
            failures = result.summary.failures,
            "Phase completed"
        );
        self.events.send(Event::Phase(PhaseEvent::Completed {
            summary: result.summary.clone(),
        }));

        Ok(result)
    }

    fn register_existing(&self, entry: &MediaEntry) -> FileOutcome {
        self.try_register_existing(entry)
            .unwrap_or_else(|error| self.failed(&entry.path, error))
    }

    fn try_register_existing(&self, entry: &MediaEntry) -> Result<FileOutcome, FileError> {
        let fingerprint = fingerprint(&entry.path)?;
        let record = FileRecord {
            destination_path: entry.path.clone(),
            resolved_date: local_modified_time(entry.modified),
            date_source: DateSource::FileModificationTime,
        };

        match self.registry.register_if_absent(fingerprint, record)? {
            Registration::Accepted(_) => {
                debug!(path = %entry.path.display(), %fingerprint, "Registered library file");
                self.events.send(Event::File(FileEvent::Registered {
                    path: entry.path.clone(),
                }));
                Ok(FileOutcome::Registered {
                    path: entry.path.clone(),
                })
            }
            // The library already holds this content twice
            Registration::Duplicate(original) => Ok(Self::conflict(fingerprint, original, entry)),
        }
    }

    fn ingest_file(&self, entry: &MediaEntry, kind: MediaKind) -> FileOutcome {
        self.try_ingest(entry, kind)
            .unwrap_or_else(|error| self.failed(&entry.path, error))
    }

    fn try_ingest(&self, entry: &MediaEntry, kind: MediaKind) -> Result<FileOutcome, FileError> {
        let fingerprint = fingerprint(&entry.path)?;

        // Known content needs no date or plan
        if let Some(original) = self.registry.lookup(&fingerprint)? {
            return Ok(Self::conflict(fingerprint, original, entry));
        }

        let date = self.resolver.resolve(&entry.path, kind, entry.modified);
        let destination_path = match self.destination {
            Some(root) => {
                let name = entry
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                PlacementPlanner::plan_destination(root, kind, date.timestamp, &name, self.naming)
            }
            None => entry.path.clone(),
        };

        let candidate = FileRecord {
            destination_path,
            resolved_date: date.timestamp,
            date_source: date.source,
        };

        let registration = match self.destination {
            Some(_) => self.registry.register_placement(fingerprint, candidate)?,
            None => self.registry.register_if_absent(fingerprint, candidate)?,
        };
        let record = match registration {
            Registration::Accepted(record) => record,
            Registration::Duplicate(original) => {
                return Ok(Self::conflict(fingerprint, original, entry));
            }
        };

        let copied = match self.destination {
            Some(_) if !self.dry_run => {
                // Only a capture date from EXIF is trusted enough to stamp on the copy
                let times = (record.date_source == DateSource::ExifMetadata)
                    .then(|| CopyTimes::at(record.resolved_date));
                if let Err(error) =
                    FileCopier::copy_with_times(&entry.path, &record.destination_path, times)
                {
                    self.registry.mark_unplaced(fingerprint)?;
                    return Err(error.into());
                }
                true
            }
            _ => false,
        };

        info!(
            source = %entry.path.display(),
            destination = %record.destination_path.display(),
            date_source = %record.date_source,
            copied,
            "Placed file"
        );
        self.events.send(Event::File(FileEvent::Placed {
            source: entry.path.clone(),
            destination: record.destination_path.clone(),
            date_source: record.date_source,
            copied,
        }));

        Ok(FileOutcome::Placed(PlacedFile {
            source: entry.path.clone(),
            fingerprint,
            record,
            copied,
        }))
    }

    fn conflict(fingerprint: Fingerprint, original: FileRecord, entry: &MediaEntry) -> FileOutcome {
        FileOutcome::Duplicate(DuplicateConflict {
            fingerprint,
            original,
            duplicate: entry.path.clone(),
        })
    }

    /// Report a duplicate found during the phase, once its original's copy
    /// has finished one way or the other
    fn settle(&self, outcome: FileOutcome) -> FileOutcome {
        let FileOutcome::Duplicate(conflict) = outcome else {
            return outcome;
        };

        match self.registry.is_unplaced(&conflict.fingerprint) {
            Ok(false) => self.duplicate(conflict),
            Ok(true) => self.failed(
                &conflict.duplicate,
                FileError::OriginalNotPlaced {
                    original: conflict.original.destination_path,
                },
            ),
            Err(error) => self.failed(&conflict.duplicate, error.into()),
        }
    }

    fn duplicate(&self, conflict: DuplicateConflict) -> FileOutcome {
        info!(
            duplicate = %conflict.duplicate.display(),
            original = %conflict.original.destination_path.display(),
            "Duplicate content"
        );
        self.events.send(Event::File(FileEvent::Duplicate {
            duplicate: conflict.duplicate.clone(),
            original: conflict.original.destination_path.clone(),
        }));

        FileOutcome::Duplicate(conflict)
    }

    fn failed(&self, path: &Path, error: FileError) -> FileOutcome {
        warn!(path = %path.display(), error = %error, "Failed to process file");
        self.events.send(Event::File(FileEvent::Failed {
            path: path.to_path_buf(),
            message: error.to_string(),
        }));

        FileOutcome::Failed {
            path: path.to_path_buf(),
            error,
        }
    }
}
