//! # Fingerprint Module
//!
//! Exact content fingerprints for duplicate detection.
//!
//! Files are streamed through xxh3-128 in fixed-size chunks, so memory use
//! does not grow with file size. Two files with identical bytes always get the
//! same fingerprint; name, location and timestamps play no part.

use crate::error::FingerprintError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;
use xxhash_rust::xxh3::Xxh3;

/// Read buffer size for streaming (64KB)
const CHUNK_SIZE: usize = 64 * 1024;

/// 128-bit content fingerprint, rendered as 32 lowercase hex characters
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("{:032x}", u128::from_be_bytes(self.0))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(format!("expected 32 hex characters, got {}", s.len()));
        }
        u128::from_str_radix(s, 16)
            .map(|value| Self(value.to_be_bytes()))
            .map_err(|e| format!("invalid fingerprint {s}: {e}"))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        hex.parse().map_err(de::Error::custom)
    }
}

/// Fingerprint everything readable from `reader`
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<Fingerprint> {
    let mut hasher = Xxh3::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Fingerprint(hasher.digest128().to_be_bytes()))
}

/// Fingerprint the full contents of the file at `path`
pub fn fingerprint(path: &Path) -> Result<Fingerprint, FingerprintError> {
    let io_error = |source| FingerprintError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    fingerprint_reader(file).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn identical_content_gives_identical_fingerprint() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&nested).unwrap();

        let a = write(&temp_dir, "IMG_0001.jpg", b"the same bytes");
        let b = nested.join("holiday copy.JPG");
        fs::write(&b, b"the same bytes").unwrap();

        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn one_byte_difference_changes_fingerprint() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(&temp_dir, "a.jpg", b"the same bytes");
        let b = write(&temp_dir, "b.jpg", b"the same bytez");

        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn streaming_matches_across_chunk_boundaries() {
        let content: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();

        let whole = fingerprint_reader(&content[..]).unwrap();
        let chained = fingerprint_reader((&content[..100]).chain(&content[100..])).unwrap();

        assert_eq!(whole, chained);
    }

    #[test]
    fn empty_file_has_stable_fingerprint() {
        let temp_dir = TempDir::new().unwrap();
        let a = write(&temp_dir, "empty1.jpg", b"");
        let b = write(&temp_dir, "empty2.jpg", b"");

        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = fingerprint(Path::new("/nonexistent/photo.jpg")).unwrap_err();
        assert!(error.to_string().contains("/nonexistent/photo.jpg"));
    }

    #[test]
    fn hex_rendering_round_trips() {
        let fp = fingerprint_reader(&b"hello"[..]).unwrap();
        let hex = fp.to_hex();

        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hex.parse::<Fingerprint>().unwrap(), fp);
    }

    #[test]
    fn fingerprint_serializes_as_hex_string() {
        let fp = Fingerprint::from_bytes([0xAB; 16]);
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(16)));
    }
}
