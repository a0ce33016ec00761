//! # Registry Module
//!
//! The run-wide record of which content has already been placed.
//!
//! Every worker shares one [`DuplicateRegistry`]. Its
//! [`register_if_absent`](DuplicateRegistry::register_if_absent) is the only
//! point where workers synchronise: checking for a fingerprint and inserting
//! it happen under one write lock, so for any fingerprint exactly one caller
//! is ever told `Accepted`. Entries are never replaced or removed.
//!
//! The registry also remembers every destination path it has handed out.
//! Two different files that plan the same path (same capture second, say)
//! get `name_1.ext`, `name_2.ext`, ... instead of overwriting each other.
//! [`register_placement`](DuplicateRegistry::register_placement) additionally
//! steps around files already on disk that the registry does not track
//! (too small, hidden, not media).
//!
//! A record whose copy failed is marked unplaced. Its content is still
//! registered, but the library does not hold it.
//!
//! A task that panics while holding the lock poisons it. Tasks still running
//! in the same phase then get [`RegistryError::Poisoned`], and the panic
//! itself resurfaces at the phase barrier and ends the run.

use crate::core::date::DateSource;
use crate::core::fingerprint::Fingerprint;
use crate::error::RegistryError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// The canonical record for one piece of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Where the content lives (or will live) in the library
    pub destination_path: PathBuf,
    pub resolved_date: NaiveDateTime,
    pub date_source: DateSource,
}

/// Outcome of [`DuplicateRegistry::register_if_absent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The caller won; this is the stored record, whose destination may have
    /// been renamed to avoid a collision
    Accepted(FileRecord),
    /// Someone got there first; this is their record
    Duplicate(FileRecord),
}

#[derive(Debug, Default)]
struct RegistryState {
    records: HashMap<Fingerprint, FileRecord>,
    claimed_paths: HashSet<PathBuf>,
    unplaced: HashSet<Fingerprint>,
}

/// Thread-safe fingerprint -> record map with first-writer-wins semantics
#[derive(Debug, Default)]
pub struct DuplicateRegistry {
    state: RwLock<RegistryState>,
}

impl DuplicateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `candidate` for `fingerprint` unless a record already exists.
    ///
    /// The existence check and the insert are one atomic step.
    pub fn register_if_absent(
        &self,
        fingerprint: Fingerprint,
        candidate: FileRecord,
    ) -> Result<Registration, RegistryError> {
        self.register(fingerprint, candidate, false)
    }

    /// Like [`register_if_absent`](Self::register_if_absent) for a planned
    /// library path: a destination that already exists on disk counts as
    /// claimed, so the record is renamed instead of colliding with it.
    pub fn register_placement(
        &self,
        fingerprint: Fingerprint,
        candidate: FileRecord,
    ) -> Result<Registration, RegistryError> {
        self.register(fingerprint, candidate, true)
    }

    fn register(
        &self,
        fingerprint: Fingerprint,
        candidate: FileRecord,
        avoid_existing: bool,
    ) -> Result<Registration, RegistryError> {
        let mut state = self.state.write().map_err(|_| RegistryError::Poisoned)?;

        if let Some(existing) = state.records.get(&fingerprint) {
            return Ok(Registration::Duplicate(existing.clone()));
        }

        let mut record = candidate;
        let taken =
            |path: &Path| state.claimed_paths.contains(path) || (avoid_existing && path.exists());
        if taken(&record.destination_path) {
            record.destination_path = unique_path(&record.destination_path, taken);
        }

        state.claimed_paths.insert(record.destination_path.clone());
        state.records.insert(fingerprint, record.clone());

        Ok(Registration::Accepted(record))
    }

    /// Note that the content registered for `fingerprint` never reached its
    /// destination
    pub fn mark_unplaced(&self, fingerprint: Fingerprint) -> Result<(), RegistryError> {
        let mut state = self.state.write().map_err(|_| RegistryError::Poisoned)?;
        state.unplaced.insert(fingerprint);
        Ok(())
    }

    /// Whether the copy for `fingerprint` failed
    pub fn is_unplaced(&self, fingerprint: &Fingerprint) -> Result<bool, RegistryError> {
        let state = self.state.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(state.unplaced.contains(fingerprint))
    }

    /// Shared-read lookup, for callers that only need to know whether the
    /// content is already known
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Result<Option<FileRecord>, RegistryError> {
        let state = self.state.read().map_err(|_| RegistryError::Poisoned)?;
        Ok(state.records.get(fingerprint).cloned())
    }

    /// Number of distinct fingerprints registered
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every record, for reporting
    pub fn records(&self) -> Vec<(Fingerprint, FileRecord)> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .records
            .iter()
            .map(|(fingerprint, record)| (*fingerprint, record.clone()))
            .collect()
    }
}

/// First `stem_N.ext` (N = 1, 2, ...) not taken
fn unique_path(path: &Path, taken: impl Fn(&Path) -> bool) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parent = path.parent().unwrap_or(Path::new(""));

    let mut counter = 1;
    loop {
        let new_name = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };
        let new_path = parent.join(new_name);
        if !taken(&new_path) {
            return new_path;
        }
        counter += 1;
    }
}
