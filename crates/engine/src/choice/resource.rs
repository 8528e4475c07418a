use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use meridian_types::{Data, DataCategory, DataSelection, RequestProperties, ResolveError};
use meridian_util::{block_on_future, is_network_url, redact_url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ChoiceIdentity, ResolveData, ResourceFetcher, default_fetcher};

/// A choice backed by a URL.
///
/// Strings that are not network URLs are returned as literal text. Network URLs
/// are fetched on every resolution (content is not cached) and the body is
/// returned as text. Fetch failures are logged and resolve to no data so a single
/// broken reference cannot abort a larger evaluation.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ResourceDataChoice {
    #[serde(flatten)]
    identity: ChoiceIdentity,
    #[serde(default)]
    url: String,
    #[serde(skip)]
    fetcher: Option<Arc<dyn ResourceFetcher>>,
}

impl ResourceDataChoice {
    pub fn new(identity: ChoiceIdentity, url: impl Into<String>) -> Self {
        Self {
            identity,
            url: url.into(),
            fetcher: None,
        }
    }

    /// Use `fetcher` instead of the process-wide HTTP fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    fn fetcher(&self) -> Arc<dyn ResourceFetcher> {
        self.fetcher.clone().unwrap_or_else(default_fetcher)
    }
}

impl ResolveData for ResourceDataChoice {
    fn identity(&self) -> &ChoiceIdentity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut ChoiceIdentity {
        &mut self.identity
    }

    fn resolve(
        &self,
        _category: Option<&DataCategory>,
        _selection: Option<&DataSelection>,
        _request_properties: &mut RequestProperties,
    ) -> Result<Option<Arc<Data>>, ResolveError> {
        if !is_network_url(&self.url) {
            return Ok(Some(Arc::new(Data::text(self.url.clone()))));
        }

        let fetcher = self.fetcher();
        match block_on_future(fetcher.fetch(&self.url)) {
            Ok(Ok(content)) => {
                debug!(choice = %self.identity.name(), url = %redact_url(&self.url), bytes = content.len(), "resource resolved");
                Ok(Some(Arc::new(Data::Text(content))))
            }
            Ok(Err(error)) => {
                warn!(
                    choice = %self.identity.name(),
                    url = %redact_url(&self.url),
                    error = %error,
                    "Failed to fetch resource; resolving to no data"
                );
                Ok(None)
            }
            Err(error) => {
                warn!(
                    choice = %self.identity.name(),
                    url = %redact_url(&self.url),
                    error = %error,
                    "Failed to start runtime for resource fetch; resolving to no data"
                );
                Ok(None)
            }
        }
    }
}

impl fmt::Debug for ResourceDataChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDataChoice")
            .field("identity", &self.identity)
            .field("url", &redact_url(&self.url))
            .field("custom_fetcher", &self.fetcher.is_some())
            .finish()
    }
}

impl PartialEq for ResourceDataChoice {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.url == other.url
    }
}

impl Eq for ResourceDataChoice {}

impl Hash for ResourceDataChoice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
        self.url.hash(state);
    }
}
