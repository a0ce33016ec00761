//! Decides which walked entries qualify for sorting.

use super::{MediaEntry, MediaKind};

/// Filters walk entries down to media files worth processing
#[derive(Debug, Clone)]
pub struct MediaFilter {
    /// Files smaller than this are ignored (thumbnails, previews)
    min_size: u64,
}

impl MediaFilter {
    /// Create a filter that ignores files smaller than `min_size` bytes
    pub fn new(min_size: u64) -> Self {
        Self { min_size }
    }

    /// Returns the media kind if the entry should be processed
    pub fn classify(&self, entry: &MediaEntry) -> Option<MediaKind> {
        if entry.is_dir || entry.size < self.min_size {
            return None;
        }
        MediaKind::from_path(&entry.path)
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn entry(path: &str, size: u64) -> MediaEntry {
        MediaEntry {
            path: PathBuf::from(path),
            size,
            modified: SystemTime::UNIX_EPOCH,
            is_dir: false,
        }
    }

    #[test]
    fn filter_classifies_images_and_videos() {
        let filter = MediaFilter::default();
        assert_eq!(filter.classify(&entry("/in/a.JPG", 10)), Some(MediaKind::Image));
        assert_eq!(filter.classify(&entry("/in/b.mp4", 10)), Some(MediaKind::Video));
    }

    #[test]
    fn filter_excludes_non_media() {
        let filter = MediaFilter::default();
        assert_eq!(filter.classify(&entry("/in/notes.txt", 10)), None);
    }

    #[test]
    fn filter_excludes_small_files() {
        let filter = MediaFilter::new(1024);
        assert_eq!(filter.classify(&entry("/in/thumb.jpg", 1023)), None);
        assert_eq!(filter.classify(&entry("/in/photo.jpg", 1024)), Some(MediaKind::Image));
    }

    #[test]
    fn filter_excludes_directories() {
        let filter = MediaFilter::default();
        let mut dir = entry("/in/album.jpg", 0);
        dir.is_dir = true;
        assert_eq!(filter.classify(&dir), None);
    }
}
