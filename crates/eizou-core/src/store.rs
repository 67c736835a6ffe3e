//! Catalog loading and the read-only display copy.
//!
//! The catalog is fetched once per process. Remote sources get a
//! `nocache=<millis>` query parameter on every request; there is no retry
//! and no other cache handling.

use std::path::PathBuf;

use url::Url;

use crate::error::LoadError;
use crate::models::Catalog;

/// Query parameter appended to remote catalog requests.
const CACHE_BUST_PARAM: &str = "nocache";

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Url(Url),
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret a configured source: `http(s)://` is a URL, anything else a path.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LoadError::InvalidSource("empty catalog source".into()));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Url::parse(raw)
                .map(Self::Url)
                .map_err(|e| LoadError::InvalidSource(e.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(raw)))
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Append the cache-busting parameter to a catalog URL.
pub fn cache_busted(url: &Url, millis: i64) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &millis.to_string());
    url
}

/// Parse a catalog document. No schema validation beyond the model's
/// required fields.
pub fn parse(text: &str) -> Result<Catalog, LoadError> {
    Ok(serde_json::from_str(text)?)
}

/// Fetch and parse the catalog once.
pub async fn load(source: &CatalogSource) -> Result<Catalog, LoadError> {
    let text = match source {
        CatalogSource::Url(url) => {
            let url = cache_busted(url, chrono::Utc::now().timestamp_millis());
            tracing::debug!(%url, "fetching catalog");
            let resp = reqwest::get(url.clone()).await?;
            if !resp.status().is_success() {
                return Err(LoadError::Status {
                    status: resp.status().as_u16(),
                    url: url.to_string(),
                });
            }
            resp.text().await?
        }
        CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
    };

    let catalog = parse(&text)?;
    tracing::info!(%source, anime = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Load the catalog, logging and swallowing any failure.
///
/// The caller gets an empty catalog, so every page renders blank.
pub async fn load_or_empty(source: &CatalogSource) -> Catalog {
    match load(source).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(%source, error = %e, "failed to load catalog");
            Catalog::default()
        }
    }
}

/// Owner of the read-only display copy with an explicit init/reset lifecycle.
#[derive(Debug, Default)]
pub struct CatalogStore {
    catalog: Catalog,
    loaded: bool,
}

impl CatalogStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn init(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.loaded = true;
    }

    pub fn reset(&mut self) {
        self.catalog = Catalog::default();
        self.loaded = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Deep copy for the admin editor. Edits to it never reach the display copy.
    pub fn working_copy(&self) -> Catalog {
        self.catalog.clone()
    }
}
