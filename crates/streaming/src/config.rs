use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::source::{BoundarySource, DatasetPaths, FilesystemBoundarySource, HttpBoundarySource};

/// Where boundary files live and how to reach them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundaryConfig {
    /// Local directory, or an `http(s)://` base URL.
    pub data_root: String,
    pub paths: DatasetPaths,
    pub http_timeout: Duration,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            data_root: "data".to_string(),
            paths: DatasetPaths::default(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl BoundaryConfig {
    /// Reads `DISTRICT_DATA_ROOT`, `DISTRICT_HOUSE_PATH`, `DISTRICT_STATES_PATH`
    /// and `DISTRICT_HTTP_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_root: lookup("DISTRICT_DATA_ROOT").unwrap_or(defaults.data_root),
            paths: DatasetPaths {
                districts: lookup("DISTRICT_HOUSE_PATH").unwrap_or(defaults.paths.districts),
                states: lookup("DISTRICT_STATES_PATH").unwrap_or(defaults.paths.states),
            },
            http_timeout: lookup("DISTRICT_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }

    pub fn is_remote(&self) -> bool {
        self.data_root.starts_with("http://") || self.data_root.starts_with("https://")
    }

    pub fn build_source(&self) -> Result<Arc<dyn BoundarySource>, reqwest::Error> {
        if self.is_remote() {
            let client = reqwest::Client::builder()
                .timeout(self.http_timeout)
                .build()?;
            Ok(Arc::new(HttpBoundarySource::new(
                client,
                self.data_root.clone(),
                self.paths.clone(),
            )))
        } else {
            Ok(Arc::new(FilesystemBoundarySource::new(
                &self.data_root,
                self.paths.clone(),
            )))
        }
    }
}
