//! # Scanner Module
//!
//! Walks directory trees and decides which files are media worth sorting.
//!
//! ## Supported Formats
//! - Images: JPEG, PNG, WebP, HEIC/HEIF, GIF, BMP, TIFF and common RAW formats
//! - Videos: MP4, MOV, AVI, MKV, WMV, WebM, M4V, 3GP, MTS
//!
//! ## Example
//! ```rust,ignore
//! use photo_sorter::core::scanner::{walk, MediaFilter, WalkOptions};
//!
//! let filter = MediaFilter::new(100 * 1024);
//! for entry in walk(Path::new("/Users/me/Camera"), &WalkOptions::default())? {
//!     let entry = entry?;
//!     if let Some(kind) = filter.classify(&entry) {
//!         println!("{} is a {}", entry.path.display(), kind);
//!     }
//! }
//! ```

mod filter;
mod walker;

pub use filter::MediaFilter;
pub use walker::{walk, WalkOptions};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif", "heic", "heif", "raw", "cr2",
    "nef", "dng", "arw", "raf",
];

const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "wmv", "webm", "m4v", "3gp", "mts",
];

/// One item produced by a directory walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaEntry {
    /// Path to the file or directory
    pub path: PathBuf,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Last modified time
    pub modified: SystemTime,
    /// Whether this entry is a directory
    pub is_dir: bool,
}

/// Media category, which is also the top-level folder in the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Detect the media kind from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Detect the media kind from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Folder name used for this kind in the library
    pub fn category(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_from_extension_lowercase() {
        assert_eq!(MediaKind::from_extension("jpg"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("jpeg"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("heic"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("mov"), Some(MediaKind::Video));
    }

    #[test]
    fn media_kind_from_extension_uppercase() {
        assert_eq!(MediaKind::from_extension("JPG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("MP4"), Some(MediaKind::Video));
    }

    #[test]
    fn unknown_extension_is_not_media() {
        assert_eq!(MediaKind::from_extension("txt"), None);
        assert_eq!(MediaKind::from_extension("pdf"), None);
        assert_eq!(MediaKind::from_path(Path::new("/photos/no_extension")), None);
    }

    #[test]
    fn category_names_library_folders() {
        assert_eq!(MediaKind::Image.category(), "image");
        assert_eq!(MediaKind::Video.to_string(), "video");
    }
}
