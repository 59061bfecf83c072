//! Raw row → canonical [`Point`] mapping.
//!
//! [`FieldNormalizer`] is a pure function of the row, the dataset declaration
//! and the shared read-only [`StateResolver`], so rows can be normalized in
//! parallel.

pub mod fields;
mod slug;

pub use fields::{coerce_f64, first_present, first_text, CoerceError};
pub use slug::{round_half_up, slugify, stable_slug, COORDINATE_SCALE};

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde_json::Value;

use crate::model::{Point, PointType, RawRecord, UNNAMED};
use crate::states::{ResolveContext, StateResolver, Tier};
use fields::{
    first_number, value_text, BATHROOM_KEYS, CITY_KEYS, CLOSE_TO_KEYS, DESCRIPTION_KEYS,
    DIFFICULTY_KEYS, DISTANCE_KEYS, ELEVATION_KEYS, FEE_KEYS, IMAGE_KEYS, LAT_KEYS, LON_KEYS,
    NAME_KEYS, STATE_LIKE_KEYS, URL_KEYS, WATER_KEYS,
};

fn no_dogs_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)no\s*dogs").expect("no-dogs pattern is valid"))
}

/// A normalized point plus what was learned while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeOutcome {
    pub point: Point,
    /// Tier that produced the state; `None` when it is unknown.
    pub tier: Option<Tier>,
    /// Canonical fields whose source value was present but unusable.
    pub invalid_fields: Vec<&'static str>,
}

impl NormalizeOutcome {
    pub fn has_invalid_coordinates(&self) -> bool {
        self.invalid_fields
            .iter()
            .any(|field| *field == "lat" || *field == "lon")
    }

    pub fn invalid_number_count(&self) -> usize {
        self.invalid_fields
            .iter()
            .filter(|field| **field == "distance_miles" || **field == "elevation_gain_ft")
            .count()
    }
}

/// Maps heterogeneous rows into [`Point`]s.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    resolver: Arc<StateResolver>,
}

impl FieldNormalizer {
    pub fn new(resolver: Arc<StateResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &StateResolver {
        &self.resolver
    }

    /// Normalizes one row. `point_type` and `source` come from the dataset
    /// declaration and are never read from the row.
    pub fn normalize(&self, row: &RawRecord, point_type: PointType, source: &str) -> Point {
        self.normalize_detailed(row, point_type, source).point
    }

    pub fn normalize_detailed(
        &self,
        row: &RawRecord,
        point_type: PointType,
        source: &str,
    ) -> NormalizeOutcome {
        let mut invalid_fields = Vec::new();
        let mut number = |keys: &[&str], field: &'static str| match first_number(row, keys) {
            Some(Ok(value)) => Some(value),
            Some(Err(_)) => {
                invalid_fields.push(field);
                None
            }
            None => None,
        };

        let lat = number(LAT_KEYS, "lat");
        let lon = number(LON_KEYS, "lon");
        let distance_miles = number(DISTANCE_KEYS, "distance_miles");
        let elevation_gain_ft = number(ELEVATION_KEYS, "elevation_gain_ft");

        let name = first_text(row, NAME_KEYS).unwrap_or_else(|| UNNAMED.to_string());
        let location = location_text(row);

        let coordinates = match (lat, lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        let resolution = self.resolver.resolve_context(&ResolveContext {
            row,
            location: &location,
            coordinates,
        });

        let slug = row
            .get("slug")
            .and_then(value_text)
            .unwrap_or_else(|| stable_slug(&name, lat, lon));

        let point = Point {
            slug,
            name,
            point_type,
            source: source.to_string(),
            lat,
            lon,
            state: resolution.state,
            location: Some(location).filter(|s| !s.is_empty()),
            description: first_text(row, DESCRIPTION_KEYS),
            water: first_text(row, WATER_KEYS),
            bathrooms: first_text(row, BATHROOM_KEYS),
            fee: first_text(row, FEE_KEYS),
            image: first_text(row, IMAGE_KEYS),
            difficulty: first_text(row, DIFFICULTY_KEYS),
            features: features(row),
            distance_miles,
            elevation_gain_ft,
            dogs_allowed: dogs_allowed(row),
            source_url: first_text(row, URL_KEYS),
        };

        NormalizeOutcome {
            point,
            tier: resolution.tier,
            invalid_fields,
        }
    }
}

/// "Closest to" text, else `"<city>, <state>"`, else whichever fragment exists.
fn location_text(row: &RawRecord) -> String {
    if let Some(close_to) = first_text(row, CLOSE_TO_KEYS) {
        return close_to;
    }
    match (first_text(row, CITY_KEYS), first_text(row, STATE_LIKE_KEYS)) {
        (Some(city), Some(state)) => format!("{}, {}", city, state),
        (Some(city), None) => city,
        (None, Some(state)) => state,
        (None, None) => String::new(),
    }
}

/// Explicit boolean, else permissive reading of a restriction note.
fn dogs_allowed(row: &RawRecord) -> Option<bool> {
    if let Some(Value::Bool(allowed)) = row.get("dogs_allowed") {
        return Some(*allowed);
    }
    row.get("RESTRICTIO")
        .and_then(value_text)
        .map(|text| !no_dogs_pattern().is_match(&text))
}

/// Tag list from a `features` array or a comma-separated `FEATURES` string.
fn features(row: &RawRecord) -> Vec<String> {
    if let Some(Value::Array(items)) = row.get("features") {
        return items.iter().filter_map(value_text).collect();
    }
    row.get("FEATURES")
        .and_then(value_text)
        .map(|text| {
            text.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::{GeometryIndex, Polygon, StateFeature, UNKNOWN_STATE};
    use serde_json::json;

    fn row(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn normalizer() -> FieldNormalizer {
        let ring = vec![(-109.0, 37.0), (-109.0, 41.0), (-102.0, 41.0), (-102.0, 37.0)];
        let index = GeometryIndex::from_features(vec![StateFeature::new(
            "co",
            None,
            vec![Polygon::new(vec![ring])],
        )]);
        FieldNormalizer::new(Arc::new(StateResolver::standard(Arc::new(index))))
    }

    #[test]
    fn test_usfs_style_row() {
        let r = row(json!({
            "RECAREA_NA": "Bear Lake TH",
            "LATITUDE": 1,
            "lat_dd": "40.1",
            "long_dd": "-105.6",
            "RECAREA_DE": "Popular hike",
            "RESTROOM_A": "Vault toilet",
            "FEE_DESCRI": "$5",
            "RESTRICTIO": "Leashed pets welcome",
            "FEATURES": "lake, views, ,wildflowers",
            "length_mi": "3.2",
            "gain_ft": 450,
        }));
        let outcome = normalizer().normalize_detailed(&r, PointType::Trailhead, "usfs");
        let p = outcome.point;

        assert_eq!(p.name, "Bear Lake TH");
        assert_eq!(p.point_type, PointType::Trailhead);
        assert_eq!(p.source, "usfs");
        assert_eq!(p.coordinates(), Some((40.1, -105.6)));
        assert_eq!(p.state, "co");
        assert_eq!(outcome.tier, Some(Tier::PolygonTest));
        assert_eq!(p.slug, "bear-lake-th-4010000--10560000");
        assert_eq!(p.description.as_deref(), Some("Popular hike"));
        assert_eq!(p.bathrooms.as_deref(), Some("Vault toilet"));
        assert_eq!(p.fee.as_deref(), Some("$5"));
        assert_eq!(p.features, vec!["lake", "views", "wildflowers"]);
        assert_eq!(p.distance_miles, Some(3.2));
        assert_eq!(p.elevation_gain_ft, Some(450.0));
        assert_eq!(p.dogs_allowed, Some(true));
        assert!(outcome.invalid_fields.is_empty());
    }

    #[test]
    fn test_declared_type_wins_over_row_content() {
        let r = row(json!({ "name": "X", "type": "campground", "source": "elsewhere" }));
        let p = normalizer().normalize(&r, PointType::Swimming, "custom");
        assert_eq!(p.point_type, PointType::Swimming);
        assert_eq!(p.source, "custom");
    }

    #[test]
    fn test_location_assembly() {
        let n = normalizer();
        let location = |v: Value| n.normalize(&row(v), PointType::Freecamp, "usfs").location;

        assert_eq!(
            location(json!({ "CLOSEST_TO": "Ouray", "city": "Ridgway" })).as_deref(),
            Some("Ouray")
        );
        assert_eq!(
            location(json!({ "city": "Ridgway", "STATE": "CO" })).as_deref(),
            Some("Ridgway, CO")
        );
        assert_eq!(
            location(json!({ "TOWN": "Ridgway" })).as_deref(),
            Some("Ridgway")
        );
        assert_eq!(location(json!({})), None);
    }

    #[test]
    fn test_dogs_allowed_signals() {
        let n = normalizer();
        let dogs = |v: Value| n.normalize(&row(v), PointType::Campground, "ridb").dogs_allowed;

        assert_eq!(dogs(json!({ "dogs_allowed": false })), Some(false));
        assert_eq!(dogs(json!({ "RESTRICTIO": "NO DOGS on beach" })), Some(false));
        assert_eq!(dogs(json!({ "RESTRICTIO": "nodogs" })), Some(false));
        assert_eq!(dogs(json!({ "RESTRICTIO": "Horses prohibited" })), Some(true));
        assert_eq!(dogs(json!({ "RESTRICTIO": "" })), None);
        assert_eq!(dogs(json!({})), None);
    }

    #[test]
    fn test_features_array() {
        let r = row(json!({ "features": ["shade", 4, null], "FEATURES": "ignored" }));
        let p = normalizer().normalize(&r, PointType::Swimming, "custom");
        assert_eq!(p.features, vec!["shade", "4"]);
    }

    #[test]
    fn test_invalid_numbers_become_none() {
        let r = row(json!({ "name": "Bad", "lat": "north", "lon": -105.0, "distance": "far" }));
        let outcome = normalizer().normalize_detailed(&r, PointType::Trailhead, "ridb");

        assert_eq!(outcome.point.lat, None);
        assert_eq!(outcome.point.lon, Some(-105.0));
        assert_eq!(outcome.point.distance_miles, None);
        assert_eq!(outcome.point.slug, "bad");
        assert_eq!(outcome.invalid_fields, vec!["lat", "distance_miles"]);
        assert!(outcome.has_invalid_coordinates());
        assert_eq!(outcome.invalid_number_count(), 1);
    }

    #[test]
    fn test_source_slug_and_default_name() {
        let r = row(json!({ "slug": "custom-slug", "lat": 39.0, "lon": -105.0 }));
        let p = normalizer().normalize(&r, PointType::Epic, "custom");
        assert_eq!(p.slug, "custom-slug");
        assert_eq!(p.name, UNNAMED);

        let p = normalizer().normalize(&row(json!({})), PointType::Epic, "custom");
        assert_eq!(p.slug, "unnamed");
    }

    #[test]
    fn test_unknown_state_is_still_emitted() {
        let r = row(json!({ "name": "Mystery Spot" }));
        let outcome = normalizer().normalize_detailed(&r, PointType::Feature, "at");
        assert_eq!(outcome.point.state, UNKNOWN_STATE);
        assert_eq!(outcome.tier, None);
        assert_eq!(outcome.point.lat, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let r = row(json!({
            "title": "Hanging Lake",
            "latitude": 39.6014,
            "longitude": -107.1917,
            "description": "Travertine lake",
            "image": "https://img.example/hl.jpg",
            "link": "https://example.org/hl",
        }));
        let n = normalizer();
        let first = n.normalize(&r, PointType::Swimming, "custom");
        let second = n.normalize(&r, PointType::Swimming, "custom");

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
