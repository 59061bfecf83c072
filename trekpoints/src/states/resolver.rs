//! Four-tier state resolution.
//!
//! [`StateResolver`] walks an ordered list of [`StateStrategy`] values and
//! takes the first answer. The standard chain is:
//!
//! 1. [`ExplicitField`]: a state code or full name in a known column
//! 2. [`TextPattern`]: a bounded two-letter code, then a full state name,
//!    anywhere in the record's free text
//! 3. [`PolygonTest`]: exact point-in-polygon against loaded boundaries
//! 4. [`BboxTest`]: the static bounding-box table
//!
//! Nothing is retried or reconciled across tiers. A record no tier can place
//! resolves to [`UNKNOWN_STATE`].

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::bbox::BboxGazetteer;
use super::geometry::GeometryIndex;
use super::names::{abbr_for_name, is_state_abbr, STATES, UNKNOWN_STATE};
use crate::model::RawRecord;
use crate::normalize::fields::{
    first_present, valid_coordinates, value_text, Aliases, DIRECTIONS_KEYS, EXPLICIT_STATE_KEYS,
    OPERATOR_KEYS,
};

/// Description columns searched for place names. The short `desc` alias is
/// display-only.
const BLOB_DESCRIPTION_KEYS: Aliases = &["description", "RECAREA_DE"];

/// Identifies which strategy produced a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    ExplicitField,
    TextPattern,
    PolygonTest,
    BboxTest,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::ExplicitField => "explicit_field",
            Tier::TextPattern => "text_pattern",
            Tier::PolygonTest => "polygon_test",
            Tier::BboxTest => "bbox_test",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Inputs available to every strategy.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub row: &'a RawRecord,
    /// Location text already assembled by the normalizer.
    pub location: &'a str,
    /// `(lat, lon)` when both coordinates are valid.
    pub coordinates: Option<(f64, f64)>,
}

/// One tier of the resolution chain.
pub trait StateStrategy: Send + Sync {
    fn tier(&self) -> Tier;

    /// A lowercase two-letter code, or `None` to defer to the next tier.
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<String>;
}

/// Reads a state column, accepting either a code or a full name.
///
/// Only the first present column is considered; an unrecognized value there
/// does not fall through to later columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitField;

impl StateStrategy for ExplicitField {
    fn tier(&self) -> Tier {
        Tier::ExplicitField
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let raw = match first_present(ctx.row, EXPLICIT_STATE_KEYS)? {
            Value::String(s) => s.trim().to_lowercase(),
            _ => return None,
        };
        if raw.is_empty() {
            return None;
        }
        if is_state_abbr(&raw) {
            return Some(raw);
        }
        abbr_for_name(&raw).map(str::to_string)
    }
}

fn abbr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let codes = STATES
            .iter()
            .map(|(abbr, _)| *abbr)
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?:^|[^a-z])({})(?:[^a-z]|$)", codes))
            .expect("state code pattern is valid")
    })
}

/// Searches the record's free text for a state.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextPattern;

impl TextPattern {
    /// Lowercase `" | "`-joined blob of every descriptive text field.
    pub fn text_blob(ctx: &ResolveContext<'_>) -> String {
        let row = ctx.row;
        let single = |key: &str| row.get(key).and_then(value_text);

        let parts = [
            Some(ctx.location.trim().to_string()).filter(|s| !s.is_empty()),
            single("closest_town"),
            single("CLOSEST_TO"),
            single("city"),
            single("TOWN"),
            first_present(row, DIRECTIONS_KEYS).and_then(value_text),
            first_present(row, BLOB_DESCRIPTION_KEYS).and_then(value_text),
            first_present(row, OPERATOR_KEYS).and_then(value_text),
        ];

        parts
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" | ")
            .to_lowercase()
    }

    /// Matches text against codes first, then full names in table order.
    pub fn match_text(text: &str) -> Option<&'static str> {
        if let Some(code) = abbr_pattern()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| STATES.iter().find(|(abbr, _)| *abbr == m.as_str()))
        {
            return Some(code.0);
        }
        STATES
            .iter()
            .find(|(_, name)| text.contains(name))
            .map(|(abbr, _)| *abbr)
    }
}

impl StateStrategy for TextPattern {
    fn tier(&self) -> Tier {
        Tier::TextPattern
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let text = Self::text_blob(ctx);
        if text.is_empty() {
            return None;
        }
        Self::match_text(&text).map(str::to_string)
    }
}

/// Exact containment against loaded state boundaries.
#[derive(Debug, Clone)]
pub struct PolygonTest {
    index: Arc<GeometryIndex>,
}

impl PolygonTest {
    pub fn new(index: Arc<GeometryIndex>) -> Self {
        Self { index }
    }
}

impl StateStrategy for PolygonTest {
    fn tier(&self) -> Tier {
        Tier::PolygonTest
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let (lat, lon) = ctx.coordinates?;
        self.index.locate(lat, lon).map(str::to_string)
    }
}

/// Coarse containment against the static bounding-box table.
#[derive(Debug, Clone, Default)]
pub struct BboxTest {
    gazetteer: BboxGazetteer,
}

impl BboxTest {
    pub fn new(gazetteer: BboxGazetteer) -> Self {
        Self { gazetteer }
    }
}

impl StateStrategy for BboxTest {
    fn tier(&self) -> Tier {
        Tier::BboxTest
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Option<String> {
        let (lat, lon) = ctx.coordinates?;
        self.gazetteer.locate(lat, lon).map(str::to_string)
    }
}

/// Outcome of a resolution. `tier` is `None` for [`UNKNOWN_STATE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub state: String,
    pub tier: Option<Tier>,
}

impl Resolution {
    pub fn unknown() -> Self {
        Self {
            state: UNKNOWN_STATE.to_string(),
            tier: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.tier.is_none()
    }
}

/// Ordered chain of strategies; the first answer wins.
pub struct StateResolver {
    strategies: Vec<Box<dyn StateStrategy>>,
}

impl StateResolver {
    pub fn new(strategies: Vec<Box<dyn StateStrategy>>) -> Self {
        Self { strategies }
    }

    /// The full four-tier chain over `geometry`.
    ///
    /// An empty index is valid: the polygon tier then never answers and
    /// coordinates fall through to the bounding-box table.
    pub fn standard(geometry: Arc<GeometryIndex>) -> Self {
        Self::new(vec![
            Box::new(ExplicitField),
            Box::new(TextPattern),
            Box::new(PolygonTest::new(geometry)),
            Box::new(BboxTest::default()),
        ])
    }

    /// The chain without boundary data.
    pub fn bbox_only() -> Self {
        Self::standard(Arc::new(GeometryIndex::empty()))
    }

    pub fn tiers(&self) -> Vec<Tier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Resolves a raw row. Coordinates are read from the row's own aliases.
    pub fn resolve(&self, row: &RawRecord, location: &str) -> Resolution {
        let coordinates = valid_coordinates(row);
        self.resolve_context(&ResolveContext {
            row,
            location,
            coordinates,
        })
    }

    pub fn resolve_context(&self, ctx: &ResolveContext<'_>) -> Resolution {
        self.strategies
            .iter()
            .find_map(|strategy| {
                strategy.resolve(ctx).map(|state| Resolution {
                    state,
                    tier: Some(strategy.tier()),
                })
            })
            .unwrap_or_else(Resolution::unknown)
    }

    /// State code only.
    pub fn resolve_state(&self, row: &RawRecord, location: &str) -> String {
        self.resolve(row, location).state
    }
}

impl fmt::Debug for StateResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateResolver")
            .field("tiers", &self.tiers())
            .finish()
    }
}
