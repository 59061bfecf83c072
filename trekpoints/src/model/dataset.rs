//! Static registry of dataset sources.

use serde::Serialize;

use super::point::PointType;

/// Declaration of one raw dataset file.
///
/// `point_type` and `source` are stamped onto every record read from `path`;
/// they are never inferred from row content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileSpec {
    /// Path relative to the public origin, with a leading `/`.
    pub path: &'static str,
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub source: &'static str,
}

impl FileSpec {
    pub const fn new(path: &'static str, point_type: PointType, source: &'static str) -> Self {
        Self {
            path,
            point_type,
            source,
        }
    }
}

/// Every dataset the pipeline reads, in concatenation order.
///
/// Order matters: when two datasets produce the same slug the record from the
/// earlier entry survives deduplication.
pub const DATASETS: &[FileSpec] = &[
    FileSpec::new("/data/trailheads-usfs.json", PointType::Trailhead, "usfs"),
    FileSpec::new("/data/trailheads-ridb.json", PointType::Trailhead, "ridb"),
    FileSpec::new("/data/campgrounds-usfs-ridb.json", PointType::Campground, "usfs-ridb"),
    FileSpec::new("/data/freecamping.json", PointType::Freecamp, "custom"),
    FileSpec::new("/data/freecamping-usfs.json", PointType::Freecamp, "usfs"),
    FileSpec::new("/data/backpackcamping-usfs.json", PointType::Backpackcamp, "usfs"),
    FileSpec::new("/data/swimming-holes.json", PointType::Swimming, "custom"),
    FileSpec::new("/data/epic-trails.json", PointType::Epic, "custom"),
    FileSpec::new("/data/at-points.json", PointType::Feature, "at"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_paths_are_unique_and_rooted() {
        let mut seen = HashSet::new();
        for spec in DATASETS {
            assert!(spec.path.starts_with("/data/"), "{}", spec.path);
            assert!(seen.insert(spec.path), "duplicate path {}", spec.path);
        }
    }

    #[test]
    fn test_registry_covers_every_point_type() {
        for t in PointType::ALL {
            assert!(
                DATASETS.iter().any(|s| s.point_type == t),
                "no dataset declared for {}",
                t
            );
        }
    }
}
