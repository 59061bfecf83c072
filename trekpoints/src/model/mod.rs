//! Canonical data model.
//!
//! [`Point`] is the normalized record shape every dataset is mapped into;
//! [`FileSpec`] and [`DATASETS`] declare where the raw datasets live.

mod dataset;
mod point;

pub use dataset::{FileSpec, DATASETS};
pub use point::{ParsePointTypeError, Point, PointType, UNNAMED};

/// A raw dataset row: a JSON object with unknown, agency-specific keys.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
