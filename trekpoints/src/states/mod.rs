//! US state inference.
//!
//! Resolves a raw record to a lowercase two-letter state code through a
//! cascade of strategies (see [`StateResolver`]). Precise answers come from
//! the [`GeometryIndex`] of state boundaries; the static [`BboxGazetteer`]
//! covers the case where that file is unavailable.

mod bbox;
mod geometry;
mod names;
mod resolver;

pub use bbox::{BBox, BboxGazetteer, STATE_BBOXES};
pub use geometry::{
    point_in_polygon, point_in_ring, GeometryCache, GeometryIndex, Polygon, Ring, StateFeature,
};
pub use names::{abbr_for_name, is_state_abbr, name_for_abbr, STATES, UNKNOWN_STATE};
pub use resolver::{
    BboxTest, ExplicitField, PolygonTest, Resolution, ResolveContext, StateResolver,
    StateStrategy, TextPattern, Tier,
};
