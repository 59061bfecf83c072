//! Deduplication and `(type, state)` grouping.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::model::{Point, PointType};
use crate::states::UNKNOWN_STATE;

/// Keeps the first point for every key, then sorts by name.
///
/// The key is the slug, or the name when the slug is empty; points with
/// neither are dropped. Later duplicates are discarded, never merged.
pub fn dedupe(points: Vec<Point>) -> Vec<Point> {
    let mut seen: HashSet<String> = HashSet::with_capacity(points.len());
    let mut out: Vec<Point> = points
        .into_iter()
        .filter(|p| {
            let key = p.dedupe_key();
            !key.is_empty() && seen.insert(key.to_string())
        })
        .collect();
    out.sort_by(compare_names);
    out
}

/// Accent- and case-insensitive sort key for display names.
pub fn collation_key(name: &str) -> String {
    name.nfkd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Orders by [`collation_key`]; names that fold equal put lowercase first.
fn compare_names(a: &Point, b: &Point) -> Ordering {
    collation_key(&a.name)
        .cmp(&collation_key(&b.name))
        .then_with(|| lowercase_first(&a.name).cmp(lowercase_first(&b.name)))
        .then_with(|| a.name.cmp(&b.name))
}

fn lowercase_first(name: &str) -> impl Iterator<Item = (bool, char)> + '_ {
    name.chars().map(|c| (c.is_uppercase(), c))
}

/// Composite grouping key, rendered as `"<type>::<state>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub point_type: PointType,
    pub state: String,
}

impl GroupKey {
    pub fn new(point_type: PointType, state: &str) -> Self {
        let state = state.trim().to_lowercase();
        Self {
            point_type,
            state: if state.is_empty() {
                UNKNOWN_STATE.to_string()
            } else {
                state
            },
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.point_type, self.state)
    }
}

impl Serialize for GroupKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Points grouped by type and state. Only populated pairs have entries.
#[derive(Debug, Default, Clone)]
pub struct PointIndex<'a> {
    groups: BTreeMap<GroupKey, Vec<&'a Point>>,
}

impl<'a> PointIndex<'a> {
    pub fn get(&self, point_type: PointType, state: &str) -> &[&'a Point] {
        self.groups
            .get(&GroupKey::new(point_type, state))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[&'a Point])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of populated groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `"<type>::<state>"` → member slugs, for serialized output.
    pub fn slug_map(&self) -> BTreeMap<String, Vec<String>> {
        self.groups
            .iter()
            .map(|(key, points)| {
                (
                    key.to_string(),
                    points.iter().map(|p| p.slug.clone()).collect(),
                )
            })
            .collect()
    }
}

/// Groups points by `(type, lowercase state)`, preserving input order.
pub fn aggregate(points: &[Point]) -> PointIndex<'_> {
    let mut groups: BTreeMap<GroupKey, Vec<&Point>> = BTreeMap::new();
    for point in points {
        groups
            .entry(GroupKey::new(point.point_type, &point.state))
            .or_default()
            .push(point);
    }
    PointIndex { groups }
}
