//! Rough per-state bounding boxes.
//!
//! Hand-curated, coarse, and overlapping between neighbours. Only consulted
//! when precise boundary geometry cannot place a point.

use serde::Serialize;

/// Axis-aligned box in degrees. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BBox {
    /// Box containing nothing; the identity for [`BBox::union`].
    pub const EMPTY: BBox = BBox {
        min_lat: f64::INFINITY,
        max_lat: f64::NEG_INFINITY,
        min_lon: f64::INFINITY,
        max_lon: f64::NEG_INFINITY,
    };

    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Inclusive containment test.
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// Grows the box to cover a `(lon, lat)` position.
    pub fn expand(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lon > self.max_lon
    }
}

/// Static bounding-box table, scanned in order.
///
/// Adjacent boxes overlap; the first entry containing a point wins. For
/// example (39.1, -94.6) on the Kansas/Missouri line resolves to `ks`
/// because `ks` precedes `mo` here.
pub const STATE_BBOXES: &[(&str, BBox)] = &[
    ("al", BBox::new(30.1, 35.1, -88.6, -84.7)),
    ("ak", BBox::new(51.2, 71.5, -179.2, -129.9)),
    ("az", BBox::new(31.2, 37.1, -114.9, -109.0)),
    ("ar", BBox::new(33.0, 36.6, -94.6, -89.6)),
    ("ca", BBox::new(32.4, 42.1, -124.5, -114.1)),
    ("co", BBox::new(36.9, 41.1, -109.1, -102.0)),
    ("ct", BBox::new(41.0, 42.1, -73.7, -71.8)),
    ("de", BBox::new(38.4, 39.9, -75.8, -75.0)),
    ("fl", BBox::new(24.4, 31.1, -87.7, -80.0)),
    ("ga", BBox::new(30.4, 35.1, -85.6, -80.8)),
    ("hi", BBox::new(18.8, 22.4, -160.5, -154.5)),
    ("ia", BBox::new(40.4, 43.6, -96.7, -90.1)),
    ("id", BBox::new(41.9, 49.1, -117.3, -111.0)),
    ("il", BBox::new(36.9, 42.6, -91.6, -87.0)),
    ("in", BBox::new(37.8, 41.8, -88.2, -84.8)),
    ("ks", BBox::new(36.9, 40.1, -102.1, -94.6)),
    ("ky", BBox::new(36.5, 39.3, -89.6, -81.9)),
    ("la", BBox::new(28.9, 33.1, -94.1, -89.0)),
    ("ma", BBox::new(41.2, 42.9, -73.5, -69.9)),
    ("md", BBox::new(37.9, 39.8, -79.5, -75.0)),
    ("me", BBox::new(43.0, 47.5, -71.1, -66.9)),
    ("mi", BBox::new(41.5, 48.3, -90.5, -82.1)),
    ("mn", BBox::new(43.5, 49.4, -97.3, -89.5)),
    ("mo", BBox::new(35.9, 40.7, -95.8, -89.1)),
    ("ms", BBox::new(30.2, 35.0, -91.7, -88.1)),
    ("mt", BBox::new(44.4, 49.1, -116.1, -104.0)),
    ("nc", BBox::new(33.8, 36.6, -84.3, -75.4)),
    ("nd", BBox::new(46.0, 49.1, -104.1, -96.5)),
    ("ne", BBox::new(39.9, 43.1, -104.1, -95.3)),
    ("nh", BBox::new(42.7, 45.3, -72.6, -70.6)),
    ("nj", BBox::new(38.9, 41.4, -75.6, -73.9)),
    ("nm", BBox::new(31.3, 37.0, -109.1, -103.0)),
    ("nv", BBox::new(35.0, 42.1, -120.0, -114.0)),
    ("ny", BBox::new(40.5, 45.1, -79.8, -71.8)),
    ("oh", BBox::new(38.4, 42.3, -84.8, -80.5)),
    ("ok", BBox::new(33.6, 37.1, -103.0, -94.4)),
    ("or", BBox::new(42.0, 46.3, -124.7, -116.5)),
    ("pa", BBox::new(39.7, 42.5, -80.6, -74.7)),
    ("ri", BBox::new(41.1, 42.1, -71.9, -71.1)),
    ("sc", BBox::new(32.0, 35.2, -83.4, -78.5)),
    ("sd", BBox::new(42.5, 45.9, -104.1, -96.4)),
    ("tn", BBox::new(34.9, 36.7, -90.4, -81.6)),
    ("tx", BBox::new(25.8, 36.6, -106.7, -93.5)),
    ("ut", BBox::new(37.0, 42.1, -114.1, -109.0)),
    ("va", BBox::new(36.5, 39.5, -83.7, -75.2)),
    ("vt", BBox::new(42.7, 45.1, -73.5, -71.5)),
    ("wa", BBox::new(45.5, 49.1, -124.8, -116.9)),
    ("wi", BBox::new(42.5, 47.3, -92.9, -86.2)),
    ("wv", BBox::new(37.1, 40.7, -82.7, -77.7)),
    ("wy", BBox::new(41.0, 45.1, -111.1, -104.0)),
    ("dc", BBox::new(38.79, 39.0, -77.12, -76.91)),
];

/// Linear-scan lookup over a bounding-box table.
#[derive(Debug, Clone, Copy)]
pub struct BboxGazetteer {
    entries: &'static [(&'static str, BBox)],
}

impl BboxGazetteer {
    /// Gazetteer over [`STATE_BBOXES`].
    pub fn standard() -> Self {
        Self {
            entries: STATE_BBOXES,
        }
    }

    /// Gazetteer over a custom table.
    pub fn with_entries(entries: &'static [(&'static str, BBox)]) -> Self {
        Self { entries }
    }

    /// First state whose box contains the point, in table order.
    pub fn locate(&self, lat: f64, lon: f64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, bbox)| bbox.contains(lat, lon))
            .map(|(abbr, _)| *abbr)
    }

    /// The box for a code, if present.
    pub fn get(&self, abbr: &str) -> Option<&BBox> {
        self.entries
            .iter()
            .find(|(a, _)| a.eq_ignore_ascii_case(abbr))
            .map(|(_, bbox)| bbox)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BboxGazetteer {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::names::STATES;

    #[test]
    fn test_every_state_has_a_box() {
        let gazetteer = BboxGazetteer::standard();
        assert_eq!(gazetteer.len(), STATES.len());
        for (abbr, _) in STATES {
            assert!(gazetteer.get(abbr).is_some(), "missing box for {}", abbr);
        }
    }

    #[test]
    fn test_kansas_missouri_border_resolves_to_table_order() {
        // Inside both ks (max_lon -94.6, inclusive) and mo; ks is listed first.
        let gazetteer = BboxGazetteer::standard();
        assert_eq!(gazetteer.locate(39.1, -94.6), Some("ks"));
        assert!(gazetteer.get("mo").unwrap().contains(39.1, -94.6));
    }

    #[test]
    fn test_interior_points() {
        let gazetteer = BboxGazetteer::standard();
        assert_eq!(gazetteer.locate(42.5, -107.5), Some("wy"));
        assert_eq!(gazetteer.locate(61.2, -149.9), Some("ak"));
        assert_eq!(gazetteer.locate(21.3, -157.8), Some("hi"));
    }

    #[test]
    fn test_yellowstone_resolves_to_montana_by_table_order() {
        // Northern Wyoming also sits inside the mt box, which is listed first.
        let gazetteer = BboxGazetteer::standard();
        assert_eq!(gazetteer.locate(44.43, -110.59), Some("mt"));
        assert!(gazetteer.get("wy").unwrap().contains(44.43, -110.59));
    }

    #[test]
    fn test_point_outside_all_boxes() {
        let gazetteer = BboxGazetteer::standard();
        assert_eq!(gazetteer.locate(51.5, -0.12), None);
        assert_eq!(gazetteer.locate(0.0, 0.0), None);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bbox = BBox::new(0.0, 10.0, 0.0, 10.0);
        assert!(bbox.contains(0.0, 0.0));
        assert!(bbox.contains(10.0, 10.0));
        assert!(!bbox.contains(10.000001, 5.0));
    }

    #[test]
    fn test_empty_box_union() {
        let mut bbox = BBox::EMPTY;
        assert!(bbox.is_empty());
        bbox.expand(-105.0, 39.0);
        assert!(!bbox.is_empty());
        let merged = bbox.union(&BBox::new(40.0, 41.0, -104.0, -103.0));
        assert_eq!(merged, BBox::new(39.0, 41.0, -105.0, -103.0));
    }
}
