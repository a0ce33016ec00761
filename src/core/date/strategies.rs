//! The individual steps of the date fallback chain.

use super::{local_modified_time, DateSource, DateStrategy};
use crate::core::metadata::MetadataDecoder;
use crate::core::scanner::MediaKind;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

/// Earliest year accepted from a filename
const MIN_FILENAME_YEAR: i32 = 1900;

/// Reads the capture date from embedded metadata. Images only.
pub struct ExifStrategy {
    decoder: Arc<dyn MetadataDecoder>,
}

impl ExifStrategy {
    pub fn new(decoder: Arc<dyn MetadataDecoder>) -> Self {
        Self { decoder }
    }
}

impl DateStrategy for ExifStrategy {
    fn source(&self) -> DateSource {
        DateSource::ExifMetadata
    }

    fn attempt(&self, path: &Path, kind: MediaKind, _modified: SystemTime) -> Option<NaiveDateTime> {
        if kind != MediaKind::Image {
            return None;
        }

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cannot open for metadata");
                return None;
            }
        };
        let mut reader = BufReader::new(file);

        match self.decoder.creation_time(&mut reader) {
            Ok(Some(timestamp)) if timestamp.and_utc().timestamp() != 0 => Some(timestamp),
            Ok(_) => None,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "metadata not decodable");
                None
            }
        }
    }
}

/// Finds a date written into the file name.
///
/// Candidates are digit runs plus `NN/NN/NNNN` and `NN.NN.NNNN` runs, taken
/// left to right:
/// - 8 digits: `YYYYMMDD`
/// - 10 characters with `/`: `MM/DD/YYYY`
/// - 10 characters with `.`: `DD.MM.YYYY`
///
/// The first candidate that is a real calendar date between 1900 and the
/// current year wins.
pub struct FilenameStrategy {
    candidates: Regex,
    max_year: i32,
}

impl FilenameStrategy {
    pub fn new() -> Self {
        Self::with_max_year(Local::now().year())
    }

    /// Use a fixed latest-acceptable year instead of the current one
    pub fn with_max_year(max_year: i32) -> Self {
        Self {
            candidates: Regex::new(r"\d{2}[./]\d{2}[./]\d{4}|\d+").unwrap(),
            max_year,
        }
    }

    /// Parse the first acceptable date in `name`
    pub fn parse_filename_date(&self, name: &str) -> Option<NaiveDate> {
        self.candidates
            .find_iter(name)
            .find_map(|candidate| self.parse_candidate(candidate.as_str()))
    }

    fn parse_candidate(&self, run: &str) -> Option<NaiveDate> {
        let bytes = run.as_bytes();

        // (year, month, day) slices
        let (year, month, day) = match run.len() {
            8 if bytes.iter().all(u8::is_ascii_digit) => (&run[0..4], &run[4..6], &run[6..8]),
            10 if bytes[2] == b'/' && bytes[5] == b'/' => (&run[6..10], &run[0..2], &run[3..5]),
            10 if bytes[2] == b'.' && bytes[5] == b'.' => (&run[6..10], &run[3..5], &run[0..2]),
            _ => return None,
        };

        let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;

        (MIN_FILENAME_YEAR..=self.max_year)
            .contains(&date.year())
            .then_some(date)
    }
}

impl Default for FilenameStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl DateStrategy for FilenameStrategy {
    fn source(&self) -> DateSource {
        DateSource::FilenamePattern
    }

    fn attempt(&self, path: &Path, _kind: MediaKind, _modified: SystemTime) -> Option<NaiveDateTime> {
        let name = path.file_name()?.to_string_lossy();
        self.parse_filename_date(&name)
            .map(|date| date.and_time(NaiveTime::MIN))
    }
}

/// Terminal step: the filesystem modification time
pub struct ModifiedTimeStrategy;

impl DateStrategy for ModifiedTimeStrategy {
    fn source(&self) -> DateSource {
        DateSource::FileModificationTime
    }

    fn attempt(&self, _path: &Path, _kind: MediaKind, modified: SystemTime) -> Option<NaiveDateTime> {
        Some(local_modified_time(modified))
    }
}
