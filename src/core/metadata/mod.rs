//! # Metadata Module
//!
//! Reads capture dates from embedded photo metadata.
//!
//! The date resolver only sees the [`MetadataDecoder`] trait, so tests (or a
//! different metadata library) can stand in for [`ExifDecoder`].
//!
//! ## Tags consulted, in order
//! - `DateTimeOriginal` (when the shutter fired)
//! - `DateTimeDigitized`
//! - `DateTime` (last modification recorded by the camera or editor)

use crate::error::DecodeError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;

/// Capability: extract a creation timestamp from an open media file
pub trait MetadataDecoder: Send + Sync {
    /// `Ok(None)` means the file simply carries no usable date.
    /// `Err` means the metadata was present but could not be decoded.
    fn creation_time(
        &self,
        reader: &mut BufReader<File>,
    ) -> Result<Option<NaiveDateTime>, DecodeError>;
}

/// EXIF decoder backed by kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifDecoder;

impl MetadataDecoder for ExifDecoder {
    fn creation_time(
        &self,
        reader: &mut BufReader<File>,
    ) -> Result<Option<NaiveDateTime>, DecodeError> {
        let exif = match Reader::new().read_from_container(reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(e) => {
                return Err(DecodeError {
                    reason: e.to_string(),
                })
            }
        };

        for tag in [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime] {
            let parsed = exif
                .get_field(tag, In::PRIMARY)
                .and_then(|field| ascii_value(&field.value))
                .and_then(|s| parse_exif_datetime(&s));

            if parsed.is_some() {
                return Ok(parsed);
            }
        }

        Ok(None)
    }
}

/// Helper to extract a string from an EXIF ASCII value
fn ascii_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        let bytes = vec.first()?;
        let s = std::str::from_utf8(bytes).ok()?;
        let trimmed = s.trim_end_matches('\0').trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    None
}

/// Parse an EXIF datetime.
///
/// The standard form is `"2024:01:15 14:30:00"`; some writers use dashes in
/// the date or omit the time. Blank dates such as `"0000:00:00 00:00:00"` do
/// not parse.
pub(crate) fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim_matches('"').trim();

    for format in ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime);
        }
    }

    let date_part = s.split_whitespace().next()?;
    ["%Y:%m:%d", "%Y-%m-%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}
