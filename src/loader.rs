//! Async section loading.
//!
//! A `SectionSource` produces the raw text of a section document; `load_section`
//! validates and normalizes it. `SectionLoader` keeps the latest state of one
//! section in a `watch` channel. Every `refetch` takes a new request token and
//! a completion only lands if its token is still the newest, so a slow,
//! superseded fetch never overwrites fresher state.

use crate::catalog::{CatalogRepository, CategoryDictionary, Record, Section, SectionKind};
use crate::normalize::normalize_section;
use crate::validation::{ValidationIssues, validate};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("section not found: {0}")]
    NotFound(String),

    #[error("invalid JSON in {location}: {message}")]
    Parse { location: String, message: String },

    #[error("{kind} failed validation:\n{issues}")]
    Schema {
        kind: SectionKind,
        issues: ValidationIssues,
    },

    #[error("network error: {0}")]
    Network(String),
}

/// Where section documents come from.
pub trait SectionSource: Send + Sync + 'static {
    /// Raw text of the section document.
    fn fetch(&self, kind: SectionKind) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Reads `<dir>/<kind>.json` from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, kind: SectionKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl SectionSource for FileSource {
    async fn fetch(&self, kind: SectionKind) -> Result<String, LoadError> {
        let path = self.path(kind);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(LoadError::NotFound(path.display().to_string()))
            }
            Err(err) => Err(LoadError::Network(format!(
                "reading {}: {err}",
                path.display()
            ))),
        }
    }
}

/// Fetches `<base_url>/data/<kind>.json` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("osint-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn url(&self, kind: SectionKind) -> String {
        format!("{}/data/{}", self.base_url, kind.file_name())
    }
}

/// Map an HTTP status to a load outcome: success passes, 404 is `NotFound`,
/// everything else is a network failure.
pub fn classify_status(url: &str, status: u16) -> Result<(), LoadError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(LoadError::NotFound(url.to_string())),
        other => Err(LoadError::Network(format!("{url} returned HTTP {other}"))),
    }
}

impl SectionSource for HttpSource {
    async fn fetch(&self, kind: SectionKind) -> Result<String, LoadError> {
        let url = self.url(kind);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|err| LoadError::Network(format!("{url}: {err}")))?;
        classify_status(&url, response.status().as_u16())?;
        response
            .text()
            .await
            .map_err(|err| LoadError::Network(format!("{url}: {err}")))
    }
}

/// Fetch, validate and normalize one section.
pub async fn load_section<S>(source: &S, kind: SectionKind) -> Result<Section, LoadError>
where
    S: SectionSource + ?Sized,
{
    let text = source.fetch(kind).await?;
    let document: serde_json::Value =
        serde_json::from_str(&text).map_err(|err| LoadError::Parse {
            location: kind.file_name(),
            message: err.to_string(),
        })?;
    let validated =
        validate(kind, &document).map_err(|issues| LoadError::Schema { kind, issues })?;
    for warning in &validated.warnings {
        debug!(section = %kind, "{warning}");
    }
    let section = normalize_section(&validated.section);
    info!(section = %kind, records = section.records.len(), "section loaded");
    Ok(section)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

/// Observable state of one section. Records and metadata from the last
/// successful load stay in place while a refetch runs or after it fails.
#[derive(Clone, Debug)]
pub struct SectionState {
    pub kind: SectionKind,
    pub status: LoadStatus,
    pub metadata: Option<CategoryDictionary>,
    pub records: Vec<Record>,
    pub error: Option<LoadError>,
    /// Token of the newest request issued for this section.
    pub request: u64,
}

impl SectionState {
    fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            status: LoadStatus::Loading,
            metadata: None,
            records: Vec::new(),
            error: None,
            request: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// Loads one section and publishes its state.
pub struct SectionLoader<S> {
    kind: SectionKind,
    source: Arc<S>,
    state: Arc<watch::Sender<SectionState>>,
}

impl<S> Clone for SectionLoader<S> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: SectionSource> SectionLoader<S> {
    /// A loader in the `Loading` state with no request issued yet.
    pub fn new(source: Arc<S>, kind: SectionKind) -> Self {
        let (state, _) = watch::channel(SectionState::new(kind));
        Self {
            kind,
            source,
            state: Arc::new(state),
        }
    }

    /// Create a loader and issue its first fetch. Must run inside a tokio runtime.
    pub fn start(source: Arc<S>, kind: SectionKind) -> Self {
        let loader = Self::new(source, kind);
        drop(loader.refetch());
        loader
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SectionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every applied state change.
    pub fn subscribe(&self) -> watch::Receiver<SectionState> {
        self.state.subscribe()
    }

    /// Issue a new request. The returned handle completes once the response
    /// has been applied or discarded as stale.
    pub fn refetch(&self) -> JoinHandle<()> {
        let mut token = 0;
        self.state.send_modify(|state| {
            state.request += 1;
            token = state.request;
            state.status = LoadStatus::Loading;
            state.error = None;
        });
        debug!(section = %self.kind, token, "refetch issued");

        let kind = self.kind;
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let result = load_section(source.as_ref(), kind).await;
            apply_completion(&state, kind, token, result);
        })
    }
}

fn apply_completion(
    state: &watch::Sender<SectionState>,
    kind: SectionKind,
    token: u64,
    result: Result<Section, LoadError>,
) {
    state.send_if_modified(|current| {
        if current.request != token {
            debug!(section = %kind, token, newest = current.request, "dropping stale response");
            return false;
        }
        match result {
            Ok(section) => {
                current.status = LoadStatus::Ready;
                current.metadata = Some(section.categories);
                current.records = section.records;
                current.error = None;
            }
            Err(err) => {
                warn!(section = %kind, "load failed: {err}");
                current.status = LoadStatus::Failed;
                current.error = Some(err);
            }
        }
        true
    });
}

/// Outcome of loading every section: what loaded plus per-section failures.
#[derive(Debug, Default)]
pub struct CatalogLoad {
    pub repository: CatalogRepository,
    pub failures: BTreeMap<SectionKind, LoadError>,
}

/// Load all sections concurrently. One section failing never affects the others.
pub async fn load_catalog<S: SectionSource>(source: Arc<S>) -> CatalogLoad {
    let mut join_set = JoinSet::new();
    for kind in SectionKind::ALL {
        let source = Arc::clone(&source);
        join_set.spawn(async move { (kind, load_section(source.as_ref(), kind).await) });
    }

    let mut outcome = CatalogLoad::default();
    let mut aborted = Vec::new();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((_, Ok(section))) => outcome.repository.register(section),
            Ok((kind, Err(err))) => {
                outcome.failures.insert(kind, err);
            }
            Err(err) => {
                warn!("section load task failed: {err}");
                aborted.push(err.to_string());
            }
        }
    }

    // A task that died never reported its kind; every missing section is a failure.
    for kind in SectionKind::ALL {
        if outcome.repository.get(kind).is_none() && !outcome.failures.contains_key(&kind) {
            let reason = if aborted.is_empty() {
                "load task did not complete".to_string()
            } else {
                format!("load task did not complete: {}", aborted.join("; "))
            };
            outcome.failures.insert(kind, LoadError::Network(reason));
        }
    }
    outcome
}
