//! Candidate-key tables and typed field extraction.
//!
//! Every canonical field has an ordered list of source keys. Lookups take the
//! first key that is present (non-null) in the row; keeping the tables as data
//! lets them be tested without the control flow that consumes them.

use serde_json::Value;
use thiserror::Error;

use crate::model::RawRecord;

/// Ordered candidate keys for one canonical field.
pub type Aliases = &'static [&'static str];

pub const LAT_KEYS: Aliases = &["lat", "latitude", "Latitude", "LAT", "lat_dd"];
pub const LON_KEYS: Aliases = &["lon", "lng", "longitude", "Longitude", "LON", "long_dd"];
pub const NAME_KEYS: Aliases = &[
    "name",
    "title",
    "Title",
    "SITE_NAME",
    "RECAREA_NA",
    "FacilityName",
];

/// State-ish fragment used only to synthesize `location`.
pub const STATE_LIKE_KEYS: Aliases = &["StateProvince", "STATE", "STATE_CODE", "state"];
pub const CITY_KEYS: Aliases = &["city", "TOWN", "NEAREST_CITY"];
pub const CLOSE_TO_KEYS: Aliases = &["location", "CLOSEST_TO", "closest_town"];

pub const DISTANCE_KEYS: Aliases = &["distance_miles", "distance", "length_mi"];
pub const ELEVATION_KEYS: Aliases = &["elevation_gain_ft", "elevation_gain", "gain_ft"];
pub const DIFFICULTY_KEYS: Aliases = &["difficulty", "DIFFICULTY"];
pub const DESCRIPTION_KEYS: Aliases = &["description", "desc", "RECAREA_DE"];
pub const DIRECTIONS_KEYS: Aliases = &["directions", "DIRECTIONS"];
pub const OPERATOR_KEYS: Aliases = &["operator", "OPERATED_B"];
pub const WATER_KEYS: Aliases = &["water", "WATER_AVAI"];
pub const BATHROOM_KEYS: Aliases = &["bathrooms", "RESTROOM_A"];
pub const IMAGE_KEYS: Aliases = &["image", "photo", "thumbnail"];
pub const FEE_KEYS: Aliases = &["fee", "FEE_DESCRI"];
pub const URL_KEYS: Aliases = &["url", "link"];

/// Keys consulted by the explicit-field state tier, in priority order.
pub const EXPLICIT_STATE_KEYS: Aliases = &[
    "state",
    "State",
    "STATE",
    "StateProvince",
    "STATE_CODE",
    "state_code",
];

/// A value that was present but could not be read as a finite number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("empty value")]
    Empty,

    #[error("not a number: {0}")]
    NotNumeric(String),

    #[error("non-finite number: {0}")]
    NonFinite(String),

    #[error("unsupported JSON type: {0}")]
    UnsupportedType(&'static str),
}

/// First value present (and not `null`) under any of `keys`.
pub fn first_present<'a>(row: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find(|value| !value.is_null())
}

/// Renders a scalar as display text. Blank strings and containers yield `None`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// First key whose value renders as non-blank text.
pub fn first_text(row: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .find_map(value_text)
}

/// Coerces a loosely-typed value to a finite `f64`.
pub fn coerce_f64(value: &Value) -> Result<f64, CoerceError> {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(CoerceError::NonFinite(n.to_string())),
        },
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(CoerceError::Empty);
            }
            let parsed: f64 = trimmed
                .parse()
                .map_err(|_| CoerceError::NotNumeric(trimmed.to_string()))?;
            if parsed.is_finite() {
                Ok(parsed)
            } else {
                Err(CoerceError::NonFinite(trimmed.to_string()))
            }
        }
        Value::Bool(_) => Err(CoerceError::UnsupportedType("bool")),
        Value::Array(_) => Err(CoerceError::UnsupportedType("array")),
        Value::Object(_) => Err(CoerceError::UnsupportedType("object")),
        Value::Null => Err(CoerceError::Empty),
    }
}

/// Numeric lookup. `None` when absent, `Some(Err)` when present but invalid.
pub fn first_number(row: &RawRecord, keys: &[&str]) -> Option<Result<f64, CoerceError>> {
    first_present(row, keys).map(coerce_f64)
}

/// Latitude and longitude lookups.
pub fn coordinates(
    row: &RawRecord,
) -> (
    Option<Result<f64, CoerceError>>,
    Option<Result<f64, CoerceError>>,
) {
    (first_number(row, LAT_KEYS), first_number(row, LON_KEYS))
}

/// Both coordinates when each is present and valid.
pub fn valid_coordinates(row: &RawRecord) -> Option<(f64, f64)> {
    match coordinates(row) {
        (Some(Ok(lat)), Some(Ok(lon))) => Some((lat, lon)),
        _ => None,
    }
}
