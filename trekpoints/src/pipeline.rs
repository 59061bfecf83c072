//! End-to-end ingestion: read every dataset, normalize, dedupe.
//!
//! Dataset reads run concurrently on the async runtime, each bounded by the
//! configured timeout. Row normalization runs on the rayon pool, off the
//! async workers, against a shared read-only [`StateResolver`]. Deduplication and sorting happen once
//! every source has completed.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::aggregate::{aggregate, dedupe, PointIndex};
use crate::config::ConfigFile;
use crate::model::{FileSpec, Point, PointType, RawRecord, DATASETS};
use crate::normalize::{FieldNormalizer, NormalizeOutcome};
use crate::source::{AsyncHttpClient, SourceOrigin, SourceRead, SourceReader};
use crate::states::{GeometryCache, GeometryIndex, StateResolver, Tier, UNKNOWN_STATE};

/// Where state polygons come from.
enum GeometrySource {
    /// Loaded on first run through the reader, then reused.
    Cached {
        cache: Arc<GeometryCache>,
        path: String,
    },
    /// Polygon tier never answers; bounding boxes only.
    Disabled,
}

/// Per-dataset retrieval summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub path: String,
    pub source: String,
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub origin: SourceOrigin,
    /// Rows normalized from this dataset.
    pub records: usize,
}

/// Observational counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub sources: Vec<SourceReport>,
    /// Points normalized, before deduplication.
    pub total: usize,
    /// Points with an unresolved state, before deduplication.
    pub unknown: usize,
    /// Points after deduplication.
    pub output: usize,
    pub duplicates_removed: usize,
    pub polygons_loaded: usize,
    /// How many points each resolution tier placed.
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Points with a present but unparseable coordinate.
    pub invalid_coordinates: usize,
    /// Present but unparseable distance/elevation values.
    pub invalid_numbers: usize,
    /// Array entries that were not JSON objects.
    pub skipped_rows: usize,
}

impl PipelineReport {
    /// Sources that could not be read at all.
    pub fn unavailable_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources
            .iter()
            .filter(|s| s.origin == SourceOrigin::Unavailable)
    }

    fn record(&mut self, outcome: &NormalizeOutcome) {
        self.total += 1;
        if outcome.point.state == UNKNOWN_STATE {
            self.unknown += 1;
        }
        if let Some(tier) = outcome.tier {
            *self.tier_counts.entry(tier).or_default() += 1;
        }
        if outcome.has_invalid_coordinates() {
            self.invalid_coordinates += 1;
        }
        self.invalid_numbers += outcome.invalid_number_count();
    }
}

/// Deduplicated points plus the run's counters.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub points: Vec<Point>,
    pub report: PipelineReport,
}

impl PipelineOutput {
    /// Groups the points by `(type, state)`.
    pub fn index(&self) -> PointIndex<'_> {
        aggregate(&self.points)
    }
}

/// The ingestion pipeline.
pub struct Pipeline<C> {
    reader: SourceReader<C>,
    datasets: Vec<FileSpec>,
    geometry: GeometrySource,
}

impl<C: AsyncHttpClient> Pipeline<C> {
    /// Builds a pipeline over the static dataset registry.
    pub fn new(config: &ConfigFile, client: C) -> Self {
        let geometry = if config.geometry.enabled {
            GeometrySource::Cached {
                cache: Arc::new(GeometryCache::new()),
                path: config.geometry.path.clone(),
            }
        } else {
            GeometrySource::Disabled
        };

        Self {
            reader: SourceReader::new(client, config.sources.reader_settings()),
            datasets: DATASETS.to_vec(),
            geometry,
        }
    }

    /// Replaces the dataset list.
    pub fn with_datasets(mut self, datasets: Vec<FileSpec>) -> Self {
        self.datasets = datasets;
        self
    }

    /// Shares an existing geometry cache, e.g. across runs in one process.
    pub fn with_geometry_cache(mut self, cache: Arc<GeometryCache>) -> Self {
        let path = match self.geometry {
            GeometrySource::Cached { path, .. } => path,
            GeometrySource::Disabled => crate::config::DEFAULT_GEOMETRY_PATH.to_string(),
        };
        self.geometry = GeometrySource::Cached { cache, path };
        self
    }

    /// Uses an already-built index instead of loading one.
    pub fn with_geometry(self, index: GeometryIndex) -> Self {
        self.with_geometry_cache(Arc::new(GeometryCache::preloaded(index)))
    }

    /// Skips polygon lookups entirely.
    pub fn without_geometry(mut self) -> Self {
        self.geometry = GeometrySource::Disabled;
        self
    }

    pub fn datasets(&self) -> &[FileSpec] {
        &self.datasets
    }

    async fn geometry_index(&self) -> Arc<GeometryIndex> {
        match &self.geometry {
            GeometrySource::Cached { cache, path } => cache.get_or_load(&self.reader, path).await,
            GeometrySource::Disabled => {
                info!("polygon lookups disabled; using bbox only");
                Arc::new(GeometryIndex::empty())
            }
        }
    }

    /// Runs the pipeline. Unreadable datasets and bad rows are absorbed and
    /// show up only in the report.
    pub async fn run(&self) -> PipelineOutput {
        let geometry = self.geometry_index().await;
        let mut report = PipelineReport {
            polygons_loaded: geometry.len(),
            ..PipelineReport::default()
        };
        let normalizer = Arc::new(FieldNormalizer::new(Arc::new(StateResolver::standard(
            geometry,
        ))));

        let reads = join_all(self.datasets.iter().map(|spec| async move {
            let read = self.reader.read_records(spec.path).await;
            debug!(
                path = spec.path,
                origin = %read.origin,
                records = read.records.len(),
                "dataset read"
            );
            (spec, read)
        }))
        .await;

        let mut all = Vec::new();
        for (spec, read) in reads {
            let SourceRead { records, origin } = read;
            let (rows, skipped) = split_rows(records);
            report.skipped_rows += skipped;

            let outcomes = normalize_rows(Arc::clone(&normalizer), rows, *spec).await;

            report.sources.push(SourceReport {
                path: spec.path.to_string(),
                source: spec.source.to_string(),
                point_type: spec.point_type,
                origin,
                records: outcomes.len(),
            });
            for outcome in &outcomes {
                report.record(outcome);
            }
            all.extend(outcomes.into_iter().map(|o| o.point));
        }

        info!(total = report.total, unknown = report.unknown, "points normalized");

        let points = dedupe(all);
        report.output = points.len();
        report.duplicates_removed = report.total - report.output;

        info!(
            output = report.output,
            duplicates_removed = report.duplicates_removed,
            polygons = report.polygons_loaded,
            skipped_rows = report.skipped_rows,
            "pipeline complete"
        );

        PipelineOutput { points, report }
    }
}

/// Normalizes one dataset's rows on the rayon pool, keeping input order.
async fn normalize_rows(
    normalizer: Arc<FieldNormalizer>,
    rows: Vec<RawRecord>,
    spec: FileSpec,
) -> Vec<NormalizeOutcome> {
    let task = tokio::task::spawn_blocking(move || {
        rows.par_iter()
            .map(|row| normalizer.normalize_detailed(row, spec.point_type, spec.source))
            .collect::<Vec<_>>()
    });
    match task.await {
        Ok(outcomes) => outcomes,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            warn!(path = spec.path, error = %e, "normalization cancelled");
            Vec::new()
        }
    }
}

/// Separates object rows from anything else in a dataset array.
fn split_rows(records: Vec<Value>) -> (Vec<RawRecord>, usize) {
    let mut skipped = 0;
    let rows = records
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(map) => Some(map),
            _ => {
                skipped += 1;
                None
            }
        })
        .collect();
    (rows, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockAsyncHttpClient;
    use serde_json::json;

    const ORIGIN: &str = "http://localhost:4321";

    fn config() -> ConfigFile {
        let mut config = ConfigFile::default();
        config.sources.local_fallback = false;
        config
    }

    #[test]
    fn test_split_rows_counts_non_objects() {
        let (rows, skipped) =
            split_rows(vec![json!({ "a": 1 }), json!(3), json!(null), json!({})]);
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_from_spawned_task_keeps_row_order() {
        let mut rows = vec![json!({"name": "Dup", "lat": 39.0, "lon": -105.0, "state": "UT"})];
        rows.extend((0..500).map(|_| json!({"name": "Dup", "lat": 39.0, "lon": -105.0, "state": "CO"})));
        rows.extend((0..500).map(|i| json!({"name": format!("Site {}", i), "state": "CO"})));
        let client = MockAsyncHttpClient::new().with_body(
            &format!("{}/data/freecamping.json", ORIGIN),
            &serde_json::Value::Array(rows).to_string(),
        );
        let pipeline = Arc::new(
            Pipeline::new(&config(), client)
                .with_datasets(vec![DATASETS[3]])
                .without_geometry(),
        );

        let spawned = Arc::clone(&pipeline);
        let output = tokio::spawn(async move { spawned.run().await }).await.unwrap();

        assert_eq!(output.report.total, 1001);
        assert_eq!(output.report.output, 501);
        let dup = output.points.iter().find(|p| p.name == "Dup").unwrap();
        assert_eq!(dup.state, "ut");
    }

    #[tokio::test]
    async fn test_run_counts_and_tiers() {
        let client = MockAsyncHttpClient::new()
            .with_body(
                &format!("{}/data/trailheads-usfs.json", ORIGIN),
                r#"[
                    {"name": "Alpha", "state": "CO"},
                    {"name": "Beta", "lat": 39.1, "lon": -94.6},
                    {"name": "Gamma", "lat": "bad", "distance": "far"},
                    "not a row"
                ]"#,
            )
            .with_body(
                &format!("{}/data/trailheads-ridb.json", ORIGIN),
                r#"{"RECDATA": [{"name": "Alpha", "state": "CO"}]}"#,
            );

        let pipeline = Pipeline::new(&config(), client)
            .with_datasets(DATASETS[..2].to_vec())
            .with_geometry(GeometryIndex::empty());
        let output = pipeline.run().await;
        let report = &output.report;

        assert_eq!(report.total, 4);
        assert_eq!(report.output, 3);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.unknown, 1);
        assert_eq!(report.skipped_rows, 1);
        assert_eq!(report.invalid_coordinates, 1);
        assert_eq!(report.invalid_numbers, 1);
        assert_eq!(report.tier_counts.get(&Tier::ExplicitField), Some(&2));
        assert_eq!(report.tier_counts.get(&Tier::BboxTest), Some(&1));
        assert_eq!(report.sources[1].records, 1);
        assert_eq!(report.sources[1].origin, SourceOrigin::Network);

        let alpha = output.points.iter().find(|p| p.name == "Alpha").unwrap();
        assert_eq!(alpha.source, "usfs");
    }

    #[tokio::test]
    async fn test_unavailable_sources_reported() {
        let pipeline = Pipeline::new(&config(), MockAsyncHttpClient::new()).without_geometry();
        let output = pipeline.run().await;

        assert!(output.points.is_empty());
        assert_eq!(output.report.sources.len(), DATASETS.len());
        assert_eq!(output.report.unavailable_sources().count(), DATASETS.len());
        assert_eq!(output.report.polygons_loaded, 0);
    }

    #[tokio::test]
    async fn test_geometry_loaded_once_through_reader() {
        let geojson = r#"{"type": "FeatureCollection", "features": [{
            "type": "Feature",
            "properties": {"name": "Colorado"},
            "geometry": {"type": "Polygon", "coordinates": [[[-109,37],[-109,41],[-102,41],[-102,37],[-109,37]]]}
        }]}"#;
        let client = MockAsyncHttpClient::new()
            .with_body(&format!("{}/geo/us-states.min.json", ORIGIN), geojson)
            .with_body(
                &format!("{}/data/freecamping.json", ORIGIN),
                r#"[{"name": "Spot", "lat": 39.0, "lon": -105.0}]"#,
            );
        let cache = Arc::new(GeometryCache::new());
        let pipeline = Pipeline::new(&config(), client)
            .with_datasets(vec![DATASETS[3]])
            .with_geometry_cache(cache.clone());

        let first = pipeline.run().await;
        let second = pipeline.run().await;

        assert_eq!(first.report.polygons_loaded, 1);
        assert_eq!(first.points[0].state, "co");
        assert_eq!(first.report.tier_counts.get(&Tier::PolygonTest), Some(&1));
        assert_eq!(second.points, first.points);
        assert_eq!(cache.get().map(|g| g.len()), Some(1));

        let geometry_requests = pipeline
            .reader
            .client()
            .requested()
            .iter()
            .filter(|url| url.ends_with("us-states.min.json"))
            .count();
        assert_eq!(geometry_requests, 1);
    }
}
