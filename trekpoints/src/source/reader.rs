//! Network-then-local dataset reader.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::SourceError;
use super::http::AsyncHttpClient;

/// Origin used when none is configured or provided by the environment.
pub const DEFAULT_ORIGIN: &str = "http://localhost:4321";

/// Local directory mirroring the origin's public files.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Default per-source fetch timeout.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a dataset was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    Network,
    LocalFile,
    /// Both avenues failed; the dataset is treated as empty.
    Unavailable,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Network => write!(f, "network"),
            SourceOrigin::LocalFile => write!(f, "local file"),
            SourceOrigin::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Records read from one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRead {
    pub records: Vec<Value>,
    pub origin: SourceOrigin,
}

impl SourceRead {
    pub fn unavailable() -> Self {
        Self {
            records: Vec::new(),
            origin: SourceOrigin::Unavailable,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Base URL dataset paths are resolved against.
    pub origin: String,
    /// Directory holding local copies of the public files.
    pub public_dir: PathBuf,
    /// Upper bound for one network fetch.
    pub timeout: Duration,
    /// Whether a failed fetch may fall back to `public_dir`. Disabled in
    /// sandboxed/serverless deployments.
    pub local_fallback: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            timeout: DEFAULT_SOURCE_TIMEOUT,
            local_fallback: true,
        }
    }
}

/// Coerces a parsed body into a record array.
///
/// Arrays are returned as-is. For an object, the first array-valued property
/// (in document order) is taken, so wrapper envelopes like
/// `{"meta": {...}, "results": [...]}` work. Anything else is empty.
pub fn as_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Reads public JSON files over HTTP with a local-directory fallback.
pub struct SourceReader<C> {
    client: C,
    settings: SourceSettings,
}

impl<C: AsyncHttpClient> SourceReader<C> {
    pub fn new(client: C, settings: SourceSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &SourceSettings {
        &self.settings
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolves a public path against the origin.
    pub fn url_for(&self, path: &str) -> Result<Url, SourceError> {
        let invalid = |reason: String| SourceError::InvalidUrl {
            origin: self.settings.origin.clone(),
            path: path.to_string(),
            reason,
        };
        Url::parse(&self.settings.origin)
            .map_err(|e| invalid(e.to_string()))?
            .join(path)
            .map_err(|e| invalid(e.to_string()))
    }

    /// Local equivalent of a public path.
    pub fn local_path(&self, path: &str) -> PathBuf {
        self.settings.public_dir.join(path.trim_start_matches('/'))
    }

    /// Reads and parses a public JSON file. `None` when both avenues fail.
    pub async fn read_json(&self, path: &str) -> Option<Value> {
        self.read_json_with_origin(path).await.map(|(value, _)| value)
    }

    /// Reads a dataset and coerces it to a record array.
    ///
    /// Never fails; an unreadable dataset is empty with
    /// [`SourceOrigin::Unavailable`].
    pub async fn read_records(&self, path: &str) -> SourceRead {
        match self.read_json_with_origin(path).await {
            Some((value, origin)) => SourceRead {
                records: as_array(value),
                origin,
            },
            None => SourceRead::unavailable(),
        }
    }

    async fn read_json_with_origin(&self, path: &str) -> Option<(Value, SourceOrigin)> {
        let network_error = match self.fetch_json(path).await {
            Ok(value) => return Some((value, SourceOrigin::Network)),
            Err(e) => e,
        };
        debug!(path, error = %network_error, "network fetch failed");

        if !self.settings.local_fallback {
            warn!(
                path,
                error = %network_error,
                "dataset unavailable via HTTP and local fallback is disabled"
            );
            return None;
        }

        match self.read_local_json(path).await {
            Ok(value) => Some((value, SourceOrigin::LocalFile)),
            Err(local_error) => {
                warn!(
                    path,
                    network = %network_error,
                    local = %local_error,
                    "dataset unavailable; treating as empty"
                );
                None
            }
        }
    }

    async fn fetch_json(&self, path: &str) -> Result<Value, SourceError> {
        let url = self.url_for(path)?;
        let timeout = self.settings.timeout;

        let body = tokio::time::timeout(timeout, self.client.get(url.as_str()))
            .await
            .map_err(|_| SourceError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })??;

        serde_json::from_slice(&body).map_err(|e| SourceError::Json {
            location: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn read_local_json(&self, path: &str) -> Result<Value, SourceError> {
        let local = self.local_path(path);
        let location = local.display().to_string();

        let raw = tokio::fs::read_to_string(&local)
            .await
            .map_err(|e| SourceError::Io {
                path: location.clone(),
                reason: e.to_string(),
            })?;

        serde_json::from_str(&raw).map_err(|e| SourceError::Json {
            location,
            reason: e.to_string(),
        })
    }
}
