use std::sync::Arc;

use meridian_types::{Data, DataCategory, DataSelection, RequestProperties, ResolveError};
use serde::{Deserialize, Serialize};

use super::{ChoiceIdentity, ResolveData};

/// A named placeholder for an operand that has not been bound yet.
///
/// Resolving it always yields no data; the caller is expected to substitute a
/// bound choice through its own binding step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnboundDataChoice {
    #[serde(flatten)]
    identity: ChoiceIdentity,
    #[serde(default)]
    label: String,
}

impl UnboundDataChoice {
    /// Create a placeholder for the parameter `name`, shown to users as `label`.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            identity: ChoiceIdentity::new(name.clone(), name, None, Vec::new()),
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }
}

impl ResolveData for UnboundDataChoice {
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
        Ok(None)
    }
}
