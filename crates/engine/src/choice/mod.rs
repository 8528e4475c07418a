//! Data choices: named, categorized handles that resolve to a data value on demand.
//!
//! Modules:
//! - `identity`: id, name, description, categories, and fixed selection/properties
//! - `direct`: choice wrapping an in-memory value
//! - `unbound`: placeholder that always resolves to no data
//! - `resource`: choice backed by a URL or literal text
//! - `fetch`: fetcher trait and default HTTP fetcher used by resource choices
//!
//! The variant set is closed: [`DataChoice`] is an enum over the three variants and
//! delegates to each through the [`ResolveData`] trait.

mod direct;
mod fetch;
mod identity;
mod resource;
mod unbound;

use std::{fmt::Debug, sync::Arc};

use meridian_types::{Data, DataCategory, DataSelection, RequestProperties, ResolveError, any_applicable, merge_request_properties};
use serde::{Deserialize, Serialize};

pub use direct::DirectDataChoice;
pub use fetch::{HttpResourceFetcher, ResourceFetcher, default_fetcher};
pub use identity::{ChoiceIdentity, DEFAULT_CHOICE_LABEL, PARAM_CATEGORY_PREFIX};
pub use resource::ResourceDataChoice;
pub use unbound::UnboundDataChoice;

/// Receives notifications when the data behind a choice changes.
pub trait DataChangeListener: Send + Sync + Debug {
    fn data_changed(&self, choice_id: &str);
}

/// Behavior every data choice variant provides.
pub trait ResolveData {
    fn identity(&self) -> &ChoiceIdentity;

    fn identity_mut(&mut self) -> &mut ChoiceIdentity;

    /// Produce the data for this choice.
    ///
    /// * `category`: narrows the acceptable shape of data; may be ignored.
    /// * `selection`: subsetting parameters, opaque to the choice itself.
    /// * `request_properties`: implementation-specific hints. Variants may write
    ///   keys back for the caller.
    ///
    /// `Ok(None)` means "no data" and is not an error.
    fn resolve(
        &self,
        category: Option<&DataCategory>,
        selection: Option<&DataSelection>,
        request_properties: &mut RequestProperties,
    ) -> Result<Option<Arc<Data>>, ResolveError>;

    /// Register for change notifications. A no-op for variants whose data never
    /// changes after construction.
    fn add_change_listener(&self, _listener: Arc<dyn DataChangeListener>) {}

    fn remove_change_listener(&self, _listener: &Arc<dyn DataChangeListener>) {}

    /// Whether registered listeners will ever be notified.
    fn supports_change_notification(&self) -> bool {
        false
    }
}

/// A data choice of any variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataChoice {
    Direct(DirectDataChoice),
    Unbound(UnboundDataChoice),
    Resource(ResourceDataChoice),
}

impl DataChoice {
    fn inner(&self) -> &dyn ResolveData {
        match self {
            Self::Direct(choice) => choice,
            Self::Unbound(choice) => choice,
            Self::Resource(choice) => choice,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ResolveData {
        match self {
            Self::Direct(choice) => choice,
            Self::Unbound(choice) => choice,
            Self::Resource(choice) => choice,
        }
    }

    /// Short label for the variant, used in logs and listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Unbound(_) => "unbound",
            Self::Resource(_) => "resource",
        }
    }

    pub fn identity(&self) -> &ChoiceIdentity {
        self.inner().identity()
    }

    pub fn identity_mut(&mut self) -> &mut ChoiceIdentity {
        self.inner_mut().identity_mut()
    }

    pub fn id(&self) -> &str {
        self.identity().id()
    }

    pub fn name(&self) -> &str {
        self.identity().name()
    }

    pub fn description(&self) -> &str {
        self.identity().description()
    }

    pub fn categories(&self) -> &[DataCategory] {
        self.identity().categories()
    }

    /// See [`ResolveData::resolve`].
    pub fn resolve(
        &self,
        category: Option<&DataCategory>,
        selection: Option<&DataSelection>,
        request_properties: &mut RequestProperties,
    ) -> Result<Option<Arc<Data>>, ResolveError> {
        self.inner().resolve(category, selection, request_properties)
    }

    /// Resolve with `selection` merged over the choice's own fixed selection.
    pub fn get_data(&self, selection: Option<&DataSelection>) -> Result<Option<Arc<Data>>, ResolveError> {
        let merged = DataSelection::merge(selection, self.identity().selection());
        self.resolve(None, merged.as_ref(), &mut RequestProperties::new())
    }

    /// Resolve with request properties.
    ///
    /// The caller's properties are merged with the choice's fixed properties
    /// (caller keys win) and the merged bag becomes the new fixed bag. Keys present
    /// after resolution are copied back into `request_properties`.
    pub fn get_data_with_properties(
        &mut self,
        selection: Option<&DataSelection>,
        request_properties: &mut RequestProperties,
    ) -> Result<Option<Arc<Data>>, ResolveError> {
        let fixed = merge_request_properties(Some(&*request_properties), self.identity().fixed_request_properties());
        self.identity_mut().set_fixed_request_properties(fixed.clone());

        let mut working = fixed.unwrap_or_default();
        let merged = DataSelection::merge(selection, self.identity().selection());
        let data = self.resolve(None, merged.as_ref(), &mut working)?;
        request_properties.extend(working);
        Ok(data)
    }

    pub fn add_change_listener(&self, listener: Arc<dyn DataChangeListener>) {
        self.inner().add_change_listener(listener);
    }

    pub fn remove_change_listener(&self, listener: &Arc<dyn DataChangeListener>) {
        self.inner().remove_change_listener(listener);
    }

    pub fn supports_change_notification(&self) -> bool {
        self.inner().supports_change_notification()
    }

    /// Whether any of `requested` matches this choice's filtering categories.
    /// An empty request matches every choice.
    pub fn is_applicable(&self, requested: &[DataCategory]) -> bool {
        requested.is_empty() || any_applicable(requested, self.categories())
    }
}

impl From<DirectDataChoice> for DataChoice {
    fn from(choice: DirectDataChoice) -> Self {
        Self::Direct(choice)
    }
}

impl From<UnboundDataChoice> for DataChoice {
    fn from(choice: UnboundDataChoice) -> Self {
        Self::Unbound(choice)
    }
}

impl From<ResourceDataChoice> for DataChoice {
    fn from(choice: ResourceDataChoice) -> Self {
        Self::Resource(choice)
    }
}

/// Choices applicable to any of the `requested` categories, in input order.
pub fn filter_choices<'a>(choices: &'a [DataChoice], requested: &[DataCategory]) -> Vec<&'a DataChoice> {
    choices.iter().filter(|choice| choice.is_applicable(requested)).collect()
}
