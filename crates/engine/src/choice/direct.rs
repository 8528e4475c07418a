use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use meridian_types::{Data, DataCategory, DataSelection, RequestProperties, ResolveError};
use serde::{Deserialize, Serialize};

use super::{ChoiceIdentity, ResolveData};

/// A choice wrapping a value that is already held in memory.
///
/// The value is immutable once set, so clones share the same `Arc` instead of
/// copying the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectDataChoice {
    #[serde(flatten)]
    identity: ChoiceIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Arc<Data>>,
}

impl DirectDataChoice {
    pub fn new(identity: ChoiceIdentity, value: impl Into<Arc<Data>>) -> Self {
        Self {
            identity,
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&Arc<Data>> {
        self.value.as_ref()
    }

    /// Populate the value of an empty choice. Only meant for the persistence path.
    pub fn set_value(&mut self, value: impl Into<Arc<Data>>) {
        self.value = Some(value.into());
    }
}

impl ResolveData for DirectDataChoice {
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
        Ok(self.value.clone())
    }
}

impl PartialEq for DirectDataChoice {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for DirectDataChoice {}

impl Hash for DirectDataChoice {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}
