//! Destination planning.

use super::types::NamingScheme;
use crate::core::scanner::MediaKind;
use chrono::{Datelike, NaiveDateTime};
use std::path::{Path, PathBuf};

/// Computes where a file belongs in the library
pub struct PlacementPlanner;

impl PlacementPlanner {
    /// `root/<category>/<year>/<month>/<name>`
    ///
    /// Year and month are plain decimals (`2024/1`, not `2024/01`). Pure: no
    /// filesystem access, same inputs always give the same path.
    pub fn plan_destination(
        root: &Path,
        kind: MediaKind,
        date: NaiveDateTime,
        original_name: &str,
        naming: NamingScheme,
    ) -> PathBuf {
        let file_name = match naming {
            NamingScheme::Timestamp => Self::derived_name(kind, date, original_name),
            NamingScheme::Original => original_name.to_string(),
        };

        root.join(kind.category())
            .join(date.year().to_string())
            .join(date.month().to_string())
            .join(file_name)
    }

    /// `<category>-<YYYYMMDD>-<HHMMSS>.<ext>`, keeping the original extension
    /// lowercased
    fn derived_name(kind: MediaKind, date: NaiveDateTime, original_name: &str) -> String {
        let stem = format!("{}-{}", kind.category(), date.format("%Y%m%d-%H%M%S"));

        match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", stem, ext.to_lowercase()),
            None => stem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_plan_year_month_without_padding() {
        let path = PlacementPlanner::plan_destination(
            Path::new("/lib"),
            MediaKind::Image,
            at(2024, 1, 15),
            "IMG_0001.JPG",
            NamingScheme::Timestamp,
        );
        assert_eq!(path, PathBuf::from("/lib/image/2024/1/image-20240115-143005.jpg"));
    }

    #[test]
    fn test_plan_video_category() {
        let path = PlacementPlanner::plan_destination(
            Path::new("/lib"),
            MediaKind::Video,
            at(2023, 12, 25),
            "clip.MP4",
            NamingScheme::Timestamp,
        );
        assert_eq!(path, PathBuf::from("/lib/video/2023/12/video-20231225-143005.mp4"));
    }

    #[test]
    fn test_plan_keeps_original_name() {
        let path = PlacementPlanner::plan_destination(
            Path::new("/lib"),
            MediaKind::Image,
            at(2024, 1, 15),
            "Beach Day.jpeg",
            NamingScheme::Original,
        );
        assert_eq!(path, PathBuf::from("/lib/image/2024/1/Beach Day.jpeg"));
    }

    #[test]
    fn test_plan_is_deterministic() {
        let plan = || {
            PlacementPlanner::plan_destination(
                Path::new("/lib"),
                MediaKind::Image,
                at(2022, 3, 1),
                "photo.jpg",
                NamingScheme::Original,
            )
        };
        assert_eq!(plan(), plan());
    }

    #[test]
    fn test_plan_month_change_only_changes_month_segment() {
        let march = PlacementPlanner::plan_destination(
            Path::new("/lib"),
            MediaKind::Image,
            at(2022, 3, 1),
            "photo.jpg",
            NamingScheme::Original,
        );
        let november = PlacementPlanner::plan_destination(
            Path::new("/lib"),
            MediaKind::Image,
            at(2022, 11, 1),
            "photo.jpg",
            NamingScheme::Original,
        );

        let differing: Vec<_> = march
            .components()
            .zip(november.components())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(differing.len(), 1);
        assert_eq!(differing[0].0.as_os_str(), "3");
        assert_eq!(differing[0].1.as_os_str(), "11");
    }

    #[test]
    fn test_derived_name_without_extension() {
        let name = PlacementPlanner::derived_name(MediaKind::Image, at(2024, 1, 15), "RAWFILE");
        assert_eq!(name, "image-20240115-143005");
    }
}
