//! State boundary geometry and point-in-polygon queries.
//!
//! Loads a GeoJSON `FeatureCollection` of state boundaries into
//! [`StateFeature`]s, each with a precomputed bounding box. Lookups are a
//! linear scan over features with a bbox pre-filter; with ~51 features and
//! dataset-sized call volume no spatial index is needed.
//!
//! A missing or malformed file yields an empty index, which callers treat as
//! "geometry unavailable" and fall through to the bbox gazetteer.

use std::path::Path;
use std::sync::Arc;

use geojson::GeoJson;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::bbox::BBox;
use super::names::abbr_for_name;
use crate::source::{AsyncHttpClient, SourceReader};

/// Ordered `(lon, lat)` positions. Closure is not checked.
pub type Ring = Vec<(f64, f64)>;

/// One outer ring followed by zero or more hole rings.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub rings: Vec<Ring>,
}

impl Polygon {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn outer(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        self.rings.get(1..).unwrap_or(&[])
    }

    fn bbox(&self) -> BBox {
        let mut bbox = BBox::EMPTY;
        for &(lon, lat) in self.rings.iter().flatten() {
            bbox.expand(lon, lat);
        }
        bbox
    }
}

/// Ray-casting (even-odd) test of a point against one ring.
///
/// The half-open comparison `(yi > lat) != (yj > lat)` decides whether an
/// edge straddles the ray; horizontal edges never straddle, so vertices on
/// the ray are counted exactly once.
pub fn point_in_ring(lon: f64, lat: f64, ring: &[(f64, f64)]) -> bool {
    let n = ring.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inside the outer ring and inside none of the holes.
pub fn point_in_polygon(lon: f64, lat: f64, polygon: &Polygon) -> bool {
    let Some(outer) = polygon.outer() else {
        return false;
    };
    if !point_in_ring(lon, lat, outer) {
        return false;
    }
    !polygon
        .holes()
        .iter()
        .any(|hole| point_in_ring(lon, lat, hole))
}

/// Boundary of one state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateFeature {
    /// Lowercase two-letter code.
    pub abbr: String,
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
    /// Union of every ring's bounding box.
    pub bbox: BBox,
}

impl StateFeature {
    /// Builds a feature and computes its bounding box.
    pub fn new(abbr: impl Into<String>, name: Option<String>, polygons: Vec<Polygon>) -> Self {
        let bbox = polygons
            .iter()
            .fold(BBox::EMPTY, |acc, poly| acc.union(&poly.bbox()));
        Self {
            abbr: abbr.into().to_lowercase(),
            name,
            polygons,
            bbox,
        }
    }

    /// Bbox pre-filter, then exact polygon test.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if !self.bbox.contains(lat, lon) {
            return false;
        }
        self.polygons
            .iter()
            .any(|poly| point_in_polygon(lon, lat, poly))
    }
}

/// Read-only collection of state boundaries.
#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    features: Vec<StateFeature>,
}

impl GeometryIndex {
    /// An index with no features (bbox-only mode).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_features(features: Vec<StateFeature>) -> Self {
        Self { features }
    }

    /// Parses a GeoJSON value.
    ///
    /// Never fails: unparseable input produces an empty index. Features with
    /// no resolvable abbreviation or no polygons are dropped.
    pub fn from_geojson(value: Value) -> Self {
        let geojson = match GeoJson::from_json_value(value) {
            Ok(g) => g,
            Err(e) => {
                warn!(error = %e, "state geometry is not valid GeoJSON; using bbox only");
                return Self::empty();
            }
        };

        let raw_features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => Vec::new(),
        };
        let total = raw_features.len();

        let features: Vec<StateFeature> = raw_features
            .into_iter()
            .filter_map(convert_feature)
            .collect();

        debug!(
            total,
            kept = features.len(),
            "converted state boundary features"
        );
        Self { features }
    }

    /// Loads an index from a local file, degrading to empty on any failure.
    pub fn load_file(path: &Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string()));

        match parsed {
            Ok(value) => {
                let index = Self::from_geojson(value);
                log_load_result(&index);
                index
            }
            Err(reason) => {
                warn!(path = %path.display(), %reason, "polygons not loaded; using bbox only");
                Self::empty()
            }
        }
    }

    pub fn features(&self) -> &[StateFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// First feature whose geometry contains the point.
    pub fn locate(&self, lat: f64, lon: f64) -> Option<&str> {
        self.features
            .iter()
            .find(|f| f.contains(lat, lon))
            .map(|f| f.abbr.as_str())
    }
}

fn convert_feature(feature: geojson::Feature) -> Option<StateFeature> {
    let props = feature.properties.as_ref();
    let name = props
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let abbr = match props.and_then(|p| p.get("abbr")) {
        Some(Value::String(s)) => s.trim().to_lowercase(),
        Some(Value::Null) | None => name
            .as_deref()
            .and_then(abbr_for_name)
            .unwrap_or_default()
            .to_string(),
        Some(other) => other.to_string().to_lowercase(),
    };

    let polygons = match feature.geometry.map(|g| g.value) {
        Some(geojson::Value::Polygon(rings)) => vec![convert_polygon(&rings)],
        Some(geojson::Value::MultiPolygon(polys)) => {
            polys.iter().map(|rings| convert_polygon(rings)).collect()
        }
        _ => Vec::new(),
    };

    if abbr.is_empty() || polygons.is_empty() {
        return None;
    }
    Some(StateFeature::new(abbr, name, polygons))
}

fn convert_polygon(rings: &[Vec<geojson::Position>]) -> Polygon {
    Polygon::new(
        rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .filter_map(|pos| Some((*pos.first()?, *pos.get(1)?)))
                    .collect()
            })
            .collect(),
    )
}

fn log_load_result(index: &GeometryIndex) {
    if index.is_empty() {
        warn!("polygons not loaded; using bbox only");
    } else {
        info!(states = index.len(), "state polygons loaded");
    }
}

/// Process-lifetime, load-once holder for a [`GeometryIndex`].
///
/// The first caller of [`get_or_load`](Self::get_or_load) performs the load;
/// concurrent callers wait for it, later callers get the cached index.
#[derive(Debug, Default)]
pub struct GeometryCache {
    cell: OnceCell<Arc<GeometryIndex>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache that already holds `index` and never loads.
    pub fn preloaded(index: GeometryIndex) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(index))),
        }
    }

    /// Returns the cached index, loading it through `reader` on first use.
    pub async fn get_or_load<C: AsyncHttpClient>(
        &self,
        reader: &SourceReader<C>,
        path: &str,
    ) -> Arc<GeometryIndex> {
        self.cell
            .get_or_init(|| async {
                let index = match reader.read_json(path).await {
                    Some(value) => GeometryIndex::from_geojson(value),
                    None => GeometryIndex::empty(),
                };
                log_load_result(&index);
                Arc::new(index)
            })
            .await
            .clone()
    }

    /// The cached index, if loaded.
    pub fn get(&self) -> Option<Arc<GeometryIndex>> {
        self.cell.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square(min: f64, max: f64) -> Ring {
        vec![(min, min), (min, max), (max, max), (max, min)]
    }

    #[test]
    fn test_point_inside_simple_square() {
        let poly = Polygon::new(vec![square(0.0, 10.0)]);
        assert!(point_in_polygon(5.0, 5.0, &poly));
        assert!(!point_in_polygon(15.0, 5.0, &poly));
        assert!(!point_in_polygon(5.0, -1.0, &poly));
    }

    #[test]
    fn test_point_inside_hole_is_outside() {
        let poly = Polygon::new(vec![square(0.0, 10.0), square(4.0, 6.0)]);
        assert!(!point_in_polygon(5.0, 5.0, &poly));
        assert!(point_in_polygon(2.0, 2.0, &poly));
    }

    #[test]
    fn test_horizontal_edge_not_double_counted() {
        // Ray at lat=10 runs along the top edge; the half-open rule means the
        // top edge's endpoints each count at most once.
        let ring = square(0.0, 10.0);
        assert!(!point_in_ring(5.0, 10.0, &ring));
        // Bottom edge is included: yi > 0 is false for both bottom vertices,
        // the vertical edges straddle.
        assert!(point_in_ring(5.0, 0.0, &ring));
    }

    #[test]
    fn test_vertex_on_ray_counted_once() {
        // Diamond with a vertex at (0, 5); ray from (-1, 5) passes through it.
        let ring = vec![(0.0, 5.0), (5.0, 10.0), (10.0, 5.0), (5.0, 0.0)];
        assert!(point_in_ring(5.0, 5.0, &ring));
        assert!(!point_in_ring(-1.0, 5.0, &ring));
    }

    #[test]
    fn test_empty_ring_and_polygon() {
        assert!(!point_in_ring(0.0, 0.0, &[]));
        assert!(!point_in_polygon(0.0, 0.0, &Polygon::new(Vec::new())));
    }

    #[test]
    fn test_feature_bbox_is_union_of_polygons() {
        let feature = StateFeature::new(
            "XX",
            None,
            vec![
                Polygon::new(vec![square(0.0, 1.0)]),
                Polygon::new(vec![square(5.0, 6.0)]),
            ],
        );
        assert_eq!(feature.abbr, "xx");
        assert_eq!(feature.bbox, BBox::new(0.0, 6.0, 0.0, 6.0));
    }

    #[test]
    fn test_bbox_rejects_before_ring_test() {
        // Polygon covers the point but the stored bbox does not: the bbox
        // check must short-circuit.
        let mut feature = StateFeature::new("xx", None, vec![Polygon::new(vec![square(0.0, 10.0)])]);
        assert!(feature.contains(5.0, 5.0));
        feature.bbox = BBox::new(0.0, 1.0, 0.0, 1.0);
        assert!(!feature.contains(5.0, 5.0));
    }

    #[test]
    fn test_from_geojson_polygon_and_multipolygon() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "abbr": "CO", "name": "Colorado" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-109.05, 37.0], [-109.05, 41.0], [-102.05, 41.0], [-102.05, 37.0], [-109.05, 37.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Hawaii" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [
                            [[[-156.1, 20.5], [-156.1, 21.1], [-155.9, 21.1], [-155.9, 20.5]]],
                            [[[-158.3, 21.2], [-158.3, 21.7], [-157.6, 21.7], [-157.6, 21.2]]]
                        ]
                    }
                }
            ]
        });

        let index = GeometryIndex::from_geojson(value);
        assert_eq!(index.len(), 2);
        assert_eq!(index.features()[0].abbr, "co");
        assert_eq!(index.features()[1].abbr, "hi");
        assert_eq!(index.features()[1].polygons.len(), 2);
        assert_eq!(index.locate(39.5, -105.0), Some("co"));
        assert_eq!(index.locate(21.4, -157.9), Some("hi"));
        assert_eq!(index.locate(45.0, -100.0), None);
    }

    #[test]
    fn test_unresolvable_and_empty_features_dropped() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Puerto Rico" },
                    "geometry": { "type": "Polygon", "coordinates": [[[-67.0, 18.0], [-67.0, 18.5], [-65.6, 18.5], [-65.6, 18.0]]] }
                },
                {
                    "type": "Feature",
                    "properties": { "abbr": "ut" },
                    "geometry": { "type": "Point", "coordinates": [-111.9, 40.7] }
                },
                {
                    "type": "Feature",
                    "properties": { "abbr": "nv" },
                    "geometry": null
                }
            ]
        });

        assert!(GeometryIndex::from_geojson(value).is_empty());
    }

    #[test]
    fn test_malformed_geojson_degrades_to_empty() {
        assert!(GeometryIndex::from_geojson(json!({ "type": "Nonsense" })).is_empty());
        assert!(GeometryIndex::from_geojson(json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let index = GeometryIndex::load_file(&dir.path().join("nope.json"));
        assert!(index.is_empty());
    }

    #[test]
    fn test_preloaded_cache_returns_same_index() {
        let cache = GeometryCache::preloaded(GeometryIndex::from_features(vec![StateFeature::new(
            "co",
            None,
            vec![Polygon::new(vec![square(0.0, 1.0)])],
        )]));
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_share_one_load() {
        use crate::source::{MockAsyncHttpClient, SourceReader, SourceSettings};
        use std::time::Duration;

        let geojson = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "abbr": "CO" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-109.0, 37.0], [-109.0, 41.0], [-102.0, 41.0], [-102.0, 37.0], [-109.0, 37.0]]]
                }
            }]
        });
        let client = MockAsyncHttpClient::new()
            .with_body("http://geo.test/geo/states.json", &geojson.to_string())
            .with_delay(Duration::from_millis(50));
        let reader = Arc::new(SourceReader::new(
            client,
            SourceSettings {
                origin: "http://geo.test".to_string(),
                local_fallback: false,
                ..SourceSettings::default()
            },
        ));
        let cache = Arc::new(GeometryCache::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reader = Arc::clone(&reader);
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.get_or_load(&reader, "/geo/states.json").await })
            })
            .collect();

        let mut loaded = Vec::new();
        for handle in handles {
            loaded.push(handle.await.unwrap());
        }

        assert_eq!(reader.client().requested().len(), 1);
        assert!(loaded.iter().all(|index| index.len() == 1));
        assert!(loaded.iter().all(|index| Arc::ptr_eq(index, &loaded[0])));
        assert_eq!(loaded[0].locate(39.0, -105.0), Some("co"));
    }
}
