use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use meridian_util::{FetchConfig, http_exec};
use once_cell::sync::Lazy;
use tracing::warn;

/// Fetches the body of a network resource as text.
#[async_trait]
pub trait ResourceFetcher: Send + Sync + Debug {
    async fn fetch(&self, url: &str) -> Result<String, http_exec::FetchError>;
}

/// Default fetcher backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct HttpResourceFetcher {
    config: FetchConfig,
}

impl HttpResourceFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Build from the on-disk configuration, falling back to defaults when the
    /// file cannot be read.
    pub fn from_environment() -> Self {
        let config = FetchConfig::load().unwrap_or_else(|error| {
            warn!(error = %error, "Failed to load fetch config; using defaults");
            FetchConfig::default()
        });
        Self::new(config)
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl ResourceFetcher for HttpResourceFetcher {
    async fn fetch(&self, url: &str) -> Result<String, http_exec::FetchError> {
        http_exec::fetch_text(url, &self.config).await
    }
}

static DEFAULT_FETCHER: Lazy<Arc<dyn ResourceFetcher>> = Lazy::new(|| Arc::new(HttpResourceFetcher::from_environment()));

/// Process-wide fetcher used by resource choices that were not given one.
pub fn default_fetcher() -> Arc<dyn ResourceFetcher> {
    Arc::clone(&DEFAULT_FETCHER)
}
