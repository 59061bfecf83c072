//! The canonical point record and its closed type set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display name used when a record carries no usable name.
pub const UNNAMED: &str = "Unnamed";

/// Kind of recreation site. Always taken from the dataset declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    Trailhead,
    Campground,
    Freecamp,
    Backpackcamp,
    Swimming,
    Epic,
    Feature,
}

impl PointType {
    /// All point types in declaration order.
    pub const ALL: [PointType; 7] = [
        PointType::Trailhead,
        PointType::Campground,
        PointType::Freecamp,
        PointType::Backpackcamp,
        PointType::Swimming,
        PointType::Epic,
        PointType::Feature,
    ];

    /// Lowercase wire name (`"trailhead"`, `"freecamp"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            PointType::Trailhead => "trailhead",
            PointType::Campground => "campground",
            PointType::Freecamp => "freecamp",
            PointType::Backpackcamp => "backpackcamp",
            PointType::Swimming => "swimming",
            PointType::Epic => "epic",
            PointType::Feature => "feature",
        }
    }
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unknown point type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePointTypeError(pub String);

impl fmt::Display for ParsePointTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown point type '{}'", self.0)
    }
}

impl std::error::Error for ParsePointTypeError {}

impl FromStr for PointType {
    type Err = ParsePointTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PointType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParsePointTypeError(s.to_string()))
    }
}

/// A canonical recreation point.
///
/// Produced by [`FieldNormalizer`](crate::normalize::FieldNormalizer) and
/// never mutated afterwards. `lat`/`lon` are `None` when the source gave no
/// usable coordinates; `state` is always set (possibly to `"unknown"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub source: String,

    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Lowercase two-letter code or `"unknown"`.
    pub state: String,

    pub location: Option<String>,
    pub description: Option<String>,
    pub water: Option<String>,
    pub bathrooms: Option<String>,
    pub fee: Option<String>,
    pub image: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub distance_miles: Option<f64>,
    pub elevation_gain_ft: Option<f64>,
    /// `None` means no signal either way.
    pub dogs_allowed: Option<bool>,
    pub source_url: Option<String>,
}

impl Point {
    /// Both coordinates, when known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Key used for duplicate detection: the slug, or the name when the slug is empty.
    pub fn dedupe_key(&self) -> &str {
        if self.slug.is_empty() {
            &self.name
        } else {
            &self.slug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Point {
        Point {
            slug: "clear-lake-3945120--10578210".to_string(),
            name: "Clear Lake".to_string(),
            point_type: PointType::Freecamp,
            source: "custom".to_string(),
            lat: Some(39.4512),
            lon: Some(-105.7821),
            state: "co".to_string(),
            location: None,
            description: None,
            water: None,
            bathrooms: None,
            fee: None,
            image: None,
            difficulty: None,
            features: Vec::new(),
            distance_miles: None,
            elevation_gain_ft: None,
            dogs_allowed: None,
            source_url: None,
        }
    }

    #[test]
    fn test_point_type_round_trips_through_str() {
        for t in PointType::ALL {
            assert_eq!(t.as_str().parse::<PointType>().unwrap(), t);
        }
        assert_eq!(" Epic ".parse::<PointType>().unwrap(), PointType::Epic);
        assert!("lodge".parse::<PointType>().is_err());
    }

    #[test]
    fn test_point_serializes_type_field() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "freecamp");
        assert_eq!(json["state"], "co");
        assert!(json["dogs_allowed"].is_null());
    }

    #[test]
    fn test_dedupe_key_falls_back_to_name() {
        let mut point = sample();
        assert_eq!(point.dedupe_key(), "clear-lake-3945120--10578210");
        point.slug.clear();
        assert_eq!(point.dedupe_key(), "Clear Lake");
    }

    #[test]
    fn test_coordinates_require_both_axes() {
        let mut point = sample();
        assert_eq!(point.coordinates(), Some((39.4512, -105.7821)));
        point.lon = None;
        assert_eq!(point.coordinates(), None);
    }
}
