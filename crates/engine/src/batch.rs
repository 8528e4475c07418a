//! Concurrent creation of data sources from a list of defining objects.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::future::join_all;
use meridian_types::ResolveError;
use meridian_util::{is_network_url, redact_url};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::choice::{ResourceFetcher, default_fetcher};
use crate::results::DataSourceResults;

/// Creates one data source from one defining object.
#[async_trait]
pub trait DataSourceFactory: Send + Sync + 'static {
    /// The opaque input a source is created from (a URL, a file path, ...).
    type Defining: Clone + Send + Sync + fmt::Debug + 'static;
    type Source: Send + 'static;

    async fn create(&self, defining: &Self::Defining) -> Result<Self::Source, ResolveError>;
}

pub type BatchResults<F> = DataSourceResults<<F as DataSourceFactory>::Source, <F as DataSourceFactory>::Defining, ResolveError>;

/// Runs one creation attempt per defining object and collects the outcomes.
///
/// Every attempt runs as its own task with its own results. Once all attempts have
/// finished they are merged in input order, so the final ordering does not depend
/// on which attempt completed first.
#[derive(Debug)]
pub struct BatchLoader<F> {
    factory: Arc<F>,
    attempt_timeout: Option<Duration>,
}

impl<F: DataSourceFactory> BatchLoader<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
            attempt_timeout: None,
        }
    }

    /// Limit how long a single attempt may take. An attempt that runs out of time
    /// is recorded as a remote failure.
    pub fn with_timeout(mut self, attempt_timeout: Option<Duration>) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub async fn load_all(&self, defining_objects: Vec<F::Defining>) -> BatchResults<F> {
        let total = defining_objects.len();
        let attempts = defining_objects.into_iter().map(|defining| {
            let factory = Arc::clone(&self.factory);
            let attempt_timeout = self.attempt_timeout;
            let fallback = defining.clone();
            let handle = tokio::spawn(async move { run_attempt(factory.as_ref(), defining, attempt_timeout).await });
            async move {
                match handle.await {
                    Ok(results) => results,
                    Err(join_error) => {
                        warn!(defining = ?fallback, error = %join_error, "data source attempt aborted");
                        DataSourceResults::with_failure(fallback, ResolveError::Processing(join_error.to_string()))
                    }
                }
            }
        });

        let mut results = DataSourceResults::new();
        for attempt in join_all(attempts).await {
            results.absorb(attempt);
        }
        info!(
            total,
            loaded = results.success_count(),
            failed = results.failure_count(),
            "data source batch finished"
        );
        results
    }
}

async fn run_attempt<F: DataSourceFactory>(factory: &F, defining: F::Defining, attempt_timeout: Option<Duration>) -> BatchResults<F> {
    let outcome = match attempt_timeout {
        Some(limit) => match timeout(limit, factory.create(&defining)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ResolveError::Remote(format!("timed out after {limit:?}"))),
        },
        None => factory.create(&defining).await,
    };

    match outcome {
        Ok(source) => {
            debug!(defining = ?defining, "data source created");
            DataSourceResults::with_success(source, defining)
        }
        Err(error) => {
            warn!(defining = ?defining, error = %error, "Failed to create data source");
            DataSourceResults::with_failure(defining, error)
        }
    }
}

/// Content loaded from a URL, or literal text when the input was not a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedResource {
    pub url: String,
    pub content: String,
}

/// Loads resources for the batch driver.
///
/// Follows the same literal-text rule as resource choices, but fetch failures are
/// returned so the batch records them instead of turning them into "no data".
#[derive(Debug, Clone)]
pub struct ResourceSourceFactory {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl ResourceSourceFactory {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }
}

impl Default for ResourceSourceFactory {
    fn default() -> Self {
        Self::new(default_fetcher())
    }
}

#[async_trait]
impl DataSourceFactory for ResourceSourceFactory {
    type Defining = String;
    type Source = LoadedResource;

    async fn create(&self, defining: &String) -> Result<LoadedResource, ResolveError> {
        if !is_network_url(defining) {
            return Ok(LoadedResource {
                url: defining.clone(),
                content: defining.clone(),
            });
        }
        let content = self.fetcher.fetch(defining).await?;
        debug!(url = %redact_url(defining), bytes = content.len(), "resource loaded");
        Ok(LoadedResource {
            url: defining.clone(),
            content,
        })
    }
}
