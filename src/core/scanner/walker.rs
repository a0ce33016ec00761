//! Directory walking implementation using walkdir.

use super::MediaEntry;
use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Options for a directory walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    /// Descend into subdirectories
    pub recursive: bool,
    /// Yield directory entries as well as files
    pub include_dirs: bool,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_dirs: false,
            follow_symlinks: false,
            include_hidden: false,
        }
    }
}

/// Walk `root`, yielding one [`MediaEntry`] per file (and per directory when
/// `include_dirs` is set).
///
/// A missing or non-directory root is an error up front. Problems with
/// individual entries inside the tree are yielded as `Err` items so the caller
/// can report them and keep going. The root itself is never yielded.
pub fn walk(
    root: &Path,
    options: &WalkOptions,
) -> Result<impl Iterator<Item = Result<MediaEntry, ScanError>> + Send, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut walker = WalkDir::new(root).follow_links(options.follow_symlinks);
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let include_hidden = options.include_hidden;
    let include_dirs = options.include_dirs;

    let entries = walker
        .into_iter()
        .filter_entry(move |entry: &DirEntry| {
            include_hidden || entry.depth() == 0 || !is_hidden(entry)
        })
        .filter_map(move |result| match result {
            Ok(entry) => {
                if entry.depth() == 0 {
                    return None;
                }
                if entry.file_type().is_dir() && !include_dirs {
                    return None;
                }
                Some(to_media_entry(&entry))
            }
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                Some(Err(scan_error(path, e)))
            }
        });

    Ok(entries)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn to_media_entry(entry: &DirEntry) -> Result<MediaEntry, ScanError> {
    let metadata = entry
        .metadata()
        .map_err(|e| scan_error(entry.path().to_path_buf(), e))?;

    Ok(MediaEntry {
        path: entry.path().to_path_buf(),
        size: if metadata.is_dir() { 0 } else { metadata.len() },
        modified: metadata
            .modified()
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH),
        is_dir: metadata.is_dir(),
    })
}

fn scan_error(path: std::path::PathBuf, error: walkdir::Error) -> ScanError {
    if error.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
        ScanError::PermissionDenied { path }
    } else {
        ScanError::ReadDirectory {
            path,
            source: io::Error::from(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn collect(root: &Path, options: &WalkOptions) -> Vec<MediaEntry> {
        walk(root, options)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn walk_empty_directory_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(collect(temp_dir.path(), &WalkOptions::default()).is_empty());
    }

    #[test]
    fn walk_reports_size_and_kind() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "photo.jpg", b"twelve bytes");

        let entries = collect(temp_dir.path(), &WalkOptions::default());

        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.ends_with("photo.jpg"));
        assert_eq!(entries[0].size, 12);
        assert!(!entries[0].is_dir);
    }

    #[test]
    fn walk_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("2023").join("summer");
        fs::create_dir_all(&nested).unwrap();
        create_file(temp_dir.path(), "root.jpg", b"a");
        create_file(&nested, "nested.jpg", b"b");

        let entries = collect(temp_dir.path(), &WalkOptions::default());

        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn non_recursive_walk_stays_at_top_level() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("sub");
        fs::create_dir_all(&nested).unwrap();
        create_file(temp_dir.path(), "root.jpg", b"a");
        create_file(&nested, "nested.jpg", b"b");

        let options = WalkOptions {
            recursive: false,
            ..Default::default()
        };
        let entries = collect(temp_dir.path(), &options);

        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.ends_with("root.jpg"));
    }

    #[test]
    fn include_dirs_yields_directories_but_not_root() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("album")).unwrap();

        let options = WalkOptions {
            include_dirs: true,
            ..Default::default()
        };
        let entries = collect(temp_dir.path(), &options);

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_dir);
        assert!(entries[0].path.ends_with("album"));
    }

    #[test]
    fn hidden_entries_are_skipped_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let hidden_dir = temp_dir.path().join(".thumbnails");
        fs::create_dir_all(&hidden_dir).unwrap();
        create_file(temp_dir.path(), "visible.jpg", b"a");
        create_file(temp_dir.path(), ".hidden.jpg", b"b");
        create_file(&hidden_dir, "thumb.jpg", b"c");

        let entries = collect(temp_dir.path(), &WalkOptions::default());
        assert_eq!(entries.len(), 1);

        let options = WalkOptions {
            include_hidden: true,
            ..Default::default()
        };
        assert_eq!(collect(temp_dir.path(), &options).len(), 3);
    }

    #[test]
    fn walk_nonexistent_root_is_an_error() {
        let result = walk(Path::new("/nonexistent/path/12345"), &WalkOptions::default());
        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
