//! Copies files into the library.

use super::types::CopyTimes;
use crate::error::CopyError;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Copies files byte-for-byte, carrying timestamps across
pub struct FileCopier;

impl FileCopier {
    /// Copy `source` to `destination`, creating missing parent directories.
    ///
    /// The copy gets `times` if given, otherwise the source's own access and
    /// modification times. An existing destination is never overwritten, and a
    /// partially written copy is removed. Returns the number of bytes copied.
    pub fn copy_with_times(
        source: &Path,
        destination: &Path,
        times: Option<CopyTimes>,
    ) -> Result<u64, CopyError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| CopyError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let open_error = |e| CopyError::OpenSource {
            path: source.to_path_buf(),
            source: e,
        };
        let input = File::open(source).map_err(open_error)?;
        let times = match times {
            Some(times) => times,
            None => CopyTimes::from_metadata(&input.metadata().map_err(open_error)?),
        };

        let output = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    CopyError::DestinationExists {
                        path: destination.to_path_buf(),
                    }
                } else {
                    CopyError::Write {
                        path: destination.to_path_buf(),
                        source: e,
                    }
                }
            })?;

        let written = Self::copy_bytes(input, output).map_err(|e| {
            // Never leave a truncated file in the library
            let _ = fs::remove_file(destination);
            CopyError::Write {
                path: destination.to_path_buf(),
                source: e,
            }
        })?;

        filetime::set_file_times(destination, times.accessed, times.modified).map_err(|e| {
            CopyError::SetTimes {
                path: destination.to_path_buf(),
                source: e,
            }
        })?;

        Ok(written)
    }

    fn copy_bytes(input: File, output: File) -> io::Result<u64> {
        let mut reader = BufReader::new(input);
        let mut writer = BufWriter::new(output);
        let written = io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(written)
    }
}
