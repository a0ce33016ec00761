//! Types for the organize module.

use chrono::{Local, NaiveDateTime, TimeZone};
use filetime::FileTime;
use serde::{Deserialize, Serialize};
use std::fs::Metadata;

/// How files are named inside their year/month folder
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// Derived from the capture time (e.g., `image-20240115-143000.jpg`)
    #[default]
    Timestamp,
    /// Keep the source file name
    Original,
}

/// Access and modification times to stamp on a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyTimes {
    pub accessed: FileTime,
    pub modified: FileTime,
}

impl CopyTimes {
    /// Both times set to a local wall-clock instant
    pub fn at(local: NaiveDateTime) -> Self {
        // Wall-clock times inside a DST gap have no local instant; treat them as UTC
        let instant = Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| (dt.timestamp(), dt.timestamp_subsec_nanos()))
            .unwrap_or_else(|| {
                let utc = local.and_utc();
                (utc.timestamp(), utc.timestamp_subsec_nanos())
            });

        let time = FileTime::from_unix_time(instant.0, instant.1);
        Self {
            accessed: time,
            modified: time,
        }
    }

    /// The times currently on a file
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            accessed: FileTime::from_last_access_time(metadata),
            modified: FileTime::from_last_modification_time(metadata),
        }
    }
}
