//! Roster providers: the roster service over HTTP, or a JSON file on disk.

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use foundation::Chamber;
use tracing::info;

use crate::member::{MemberRecord, RosterMember, parse_roster};

pub use foundation::BoxFuture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    Network(String),
    Status(u16),
    Io(String),
    Decode(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Network(msg) => write!(f, "roster request failed: {msg}"),
            RosterError::Status(code) => write!(f, "roster service returned HTTP {code}"),
            RosterError::Io(msg) => write!(f, "roster file error: {msg}"),
            RosterError::Decode(msg) => write!(f, "roster payload invalid: {msg}"),
        }
    }
}

impl std::error::Error for RosterError {}

pub trait RosterSource: Send + Sync {
    fn fetch(&self, chamber: Chamber) -> BoxFuture<'_, Result<Vec<RosterMember>, RosterError>>;
}

/// Endpoint and page size per chamber, as served by the roster service.
pub fn endpoint(chamber: Chamber) -> (&'static str, u32) {
    match chamber {
        Chamber::House => ("house_rep_members", 438),
        Chamber::Senate => ("senate_members", 100),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RosterConfig {
    /// Reads `ROSTER_API_URL` and `DISTRICT_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("ROSTER_API_URL").unwrap_or(defaults.api_url),
            timeout: env::var("DISTRICT_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

pub struct HttpRosterSource {
    client: reqwest::Client,
    api_url: String,
}

impl HttpRosterSource {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    pub fn from_config(config: &RosterConfig) -> Result<Self, RosterError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RosterError::Network(e.to_string()))?;
        Ok(Self::new(client, config.api_url.clone()))
    }

    pub fn url(&self, chamber: Chamber) -> String {
        let (path, limit) = endpoint(chamber);
        format!("{}/{path}?limit={limit}", self.api_url.trim_end_matches('/'))
    }
}

impl RosterSource for HttpRosterSource {
    fn fetch(&self, chamber: Chamber) -> BoxFuture<'_, Result<Vec<RosterMember>, RosterError>> {
        Box::pin(async move {
            let url = self.url(chamber);
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| RosterError::Network(e.to_string()))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(RosterError::Status(status.as_u16()));
            }
            let records: Vec<MemberRecord> = resp
                .json()
                .await
                .map_err(|e| RosterError::Decode(e.to_string()))?;
            info!(%chamber, members = records.len(), "loaded roster from {url}");
            Ok(records
                .into_iter()
                .map(|r| r.into_member(chamber))
                .collect())
        })
    }
}

/// One JSON array file per chamber. A chamber with no file registered fails
/// with [`RosterError::Io`].
#[derive(Debug, Default, Clone)]
pub struct FileRosterSource {
    paths: BTreeMap<Chamber, PathBuf>,
}

impl FileRosterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, chamber: Chamber, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(chamber, path.into());
        self
    }
}

impl RosterSource for FileRosterSource {
    fn fetch(&self, chamber: Chamber) -> BoxFuture<'_, Result<Vec<RosterMember>, RosterError>> {
        let path = self.paths.get(&chamber).cloned();
        Box::pin(async move {
            let path =
                path.ok_or_else(|| RosterError::Io(format!("no roster file for {chamber}")))?;
            let payload = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| RosterError::Io(format!("{}: {e}", path.display())))?;
            let members =
                parse_roster(chamber, &payload).map_err(|e| RosterError::Decode(e.to_string()))?;
            info!(%chamber, members = members.len(), "loaded roster from {}", path.display());
            Ok(members)
        })
    }
}
