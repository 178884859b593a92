//! Where boundary GeoJSON comes from.
//!
//! `BoundarySource` is the seam between the loader and transport:
//! - `HttpBoundarySource` fetches from a static file server or CDN
//! - `FilesystemBoundarySource` reads from a local data directory
//! - `StaticBoundarySource` serves in-memory payloads

use std::collections::BTreeMap;
use std::path::PathBuf;

use formats::BoundaryParseError;
use foundation::BoundaryDataset;

pub use foundation::BoxFuture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryLoadError {
    Network {
        dataset: BoundaryDataset,
        message: String,
    },
    Status {
        dataset: BoundaryDataset,
        status: u16,
    },
    Io {
        dataset: BoundaryDataset,
        message: String,
    },
    Parse {
        dataset: BoundaryDataset,
        source: BoundaryParseError,
    },
}

impl BoundaryLoadError {
    pub fn dataset(&self) -> BoundaryDataset {
        match self {
            BoundaryLoadError::Network { dataset, .. }
            | BoundaryLoadError::Status { dataset, .. }
            | BoundaryLoadError::Io { dataset, .. }
            | BoundaryLoadError::Parse { dataset, .. } => *dataset,
        }
    }
}

impl std::fmt::Display for BoundaryLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryLoadError::Network { dataset, message } => {
                write!(f, "failed to fetch {dataset} boundaries: {message}")
            }
            BoundaryLoadError::Status { dataset, status } => {
                write!(f, "failed to fetch {dataset} boundaries: HTTP {status}")
            }
            BoundaryLoadError::Io { dataset, message } => {
                write!(f, "failed to read {dataset} boundaries: {message}")
            }
            BoundaryLoadError::Parse { dataset, source } => {
                write!(f, "invalid {dataset} boundaries: {source}")
            }
        }
    }
}

impl std::error::Error for BoundaryLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoundaryLoadError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// File names of the two boundary datasets, relative to a data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub districts: String,
    pub states: String,
}

impl DatasetPaths {
    pub fn path(&self, dataset: BoundaryDataset) -> &str {
        match dataset {
            BoundaryDataset::CongressionalDistricts => &self.districts,
            BoundaryDataset::States => &self.states,
        }
    }
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            districts: "us_cd_119.geojson".to_string(),
            states: "us_state.geojson".to_string(),
        }
    }
}

/// Trait for boundary providers.
///
/// Returns the raw GeoJSON text; parsing and bucketing happen in the loader.
/// Methods return boxed futures for dyn-compatibility.
pub trait BoundarySource: Send + Sync {
    /// Human-readable location of a dataset, for logs.
    fn locate(&self, dataset: BoundaryDataset) -> String;

    fn fetch(&self, dataset: BoundaryDataset) -> BoxFuture<'_, Result<String, BoundaryLoadError>>;
}

pub struct HttpBoundarySource {
    client: reqwest::Client,
    base_url: String,
    paths: DatasetPaths,
}

impl HttpBoundarySource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, paths: DatasetPaths) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            paths,
        }
    }

    fn url(&self, dataset: BoundaryDataset) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.paths.path(dataset).trim_start_matches('/')
        )
    }
}

impl BoundarySource for HttpBoundarySource {
    fn locate(&self, dataset: BoundaryDataset) -> String {
        self.url(dataset)
    }

    fn fetch(&self, dataset: BoundaryDataset) -> BoxFuture<'_, Result<String, BoundaryLoadError>> {
        Box::pin(async move {
            let network = |e: reqwest::Error| BoundaryLoadError::Network {
                dataset,
                message: e.to_string(),
            };
            let resp = self
                .client
                .get(self.url(dataset))
                .send()
                .await
                .map_err(network)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(BoundaryLoadError::Status {
                    dataset,
                    status: status.as_u16(),
                });
            }
            resp.text().await.map_err(network)
        })
    }
}

pub struct FilesystemBoundarySource {
    root: PathBuf,
    paths: DatasetPaths,
}

impl FilesystemBoundarySource {
    pub fn new(root: impl Into<PathBuf>, paths: DatasetPaths) -> Self {
        Self {
            root: root.into(),
            paths,
        }
    }

    fn file(&self, dataset: BoundaryDataset) -> PathBuf {
        self.root.join(self.paths.path(dataset))
    }
}

impl BoundarySource for FilesystemBoundarySource {
    fn locate(&self, dataset: BoundaryDataset) -> String {
        self.file(dataset).display().to_string()
    }

    fn fetch(&self, dataset: BoundaryDataset) -> BoxFuture<'_, Result<String, BoundaryLoadError>> {
        let path = self.file(dataset);
        Box::pin(async move {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| BoundaryLoadError::Io {
                    dataset,
                    message: format!("{}: {e}", path.display()),
                })
        })
    }
}

/// In-memory payloads keyed by dataset.
#[derive(Debug, Default, Clone)]
pub struct StaticBoundarySource {
    payloads: BTreeMap<BoundaryDataset, String>,
}

impl StaticBoundarySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dataset: BoundaryDataset, geojson: impl Into<String>) -> Self {
        self.payloads.insert(dataset, geojson.into());
        self
    }
}

impl BoundarySource for StaticBoundarySource {
    fn locate(&self, dataset: BoundaryDataset) -> String {
        format!("memory:{dataset}")
    }

    fn fetch(&self, dataset: BoundaryDataset) -> BoxFuture<'_, Result<String, BoundaryLoadError>> {
        let result = self
            .payloads
            .get(&dataset)
            .cloned()
            .ok_or_else(|| BoundaryLoadError::Io {
                dataset,
                message: "no payload registered".to_string(),
            });
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BoundaryLoadError, BoundarySource, DatasetPaths, FilesystemBoundarySource,
        HttpBoundarySource, StaticBoundarySource,
    };
    use foundation::BoundaryDataset;

    #[test]
    fn http_urls_join_cleanly() {
        let src = HttpBoundarySource::new(
            reqwest::Client::new(),
            "https://example.org/data/",
            DatasetPaths::default(),
        );
        assert_eq!(
            src.locate(BoundaryDataset::CongressionalDistricts),
            "https://example.org/data/us_cd_119.geojson"
        );
        assert_eq!(
            src.locate(BoundaryDataset::States),
            "https://example.org/data/us_state.geojson"
        );
    }

    #[tokio::test]
    async fn static_source_serves_registered_payloads_only() {
        let src = StaticBoundarySource::new().with(BoundaryDataset::States, "{}");
        assert_eq!(src.fetch(BoundaryDataset::States).await.as_deref(), Ok("{}"));
        let err = src
            .fetch(BoundaryDataset::CongressionalDistricts)
            .await
            .unwrap_err();
        assert_eq!(err.dataset(), BoundaryDataset::CongressionalDistricts);
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let src = FilesystemBoundarySource::new(
            "/nonexistent-boundary-root",
            DatasetPaths::default(),
        );
        let err = src.fetch(BoundaryDataset::States).await.unwrap_err();
        assert!(matches!(err, BoundaryLoadError::Io { .. }), "{err}");
    }
}
