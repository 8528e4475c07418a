//! Identity and category data shared by every data choice variant.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use meridian_types::{DataCategory, DataSelection, PROP_FOR_USER, RequestProperties};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name and description used when a choice is created without either.
pub const DEFAULT_CHOICE_LABEL: &str = "Data";

/// Prefix of the category appended for each choice's parameter name.
pub const PARAM_CATEGORY_PREFIX: &str = "param:";

/// The identity of a data choice: id, name, description, categories, and the
/// optional selection/properties that travel with it.
///
/// Fields are read through accessors. Setters exist for the persistence path,
/// where a choice is built empty and populated field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceIdentity {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    categories: Vec<DataCategory>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selection: Option<DataSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_request_properties: Option<RequestProperties>,
}

impl ChoiceIdentity {
    /// Create an identity.
    ///
    /// The description defaults to the name; when neither is given both become
    /// [`DEFAULT_CHOICE_LABEL`]. If any filtering (non-display) category is present a
    /// `param:<name>` filtering category is appended so requests can target the
    /// parameter directly.
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: Option<String>, categories: Vec<DataCategory>) -> Self {
        let mut name = name.into();
        let mut description = description.filter(|text| !text.is_empty()).unwrap_or_else(|| name.clone());
        if description.is_empty() {
            name = DEFAULT_CHOICE_LABEL.to_string();
            description = DEFAULT_CHOICE_LABEL.to_string();
        }
        let mut identity = Self {
            id: id.into(),
            name,
            description,
            categories,
            ..Self::default()
        };
        identity.add_param_category();
        identity
    }

    fn add_param_category(&mut self) {
        if self.categories.iter().all(DataCategory::is_for_display) {
            return;
        }
        // Parsed like any other path so the persisted form splits the same way.
        let Some(param) = DataCategory::parse(&format!("{PARAM_CATEGORY_PREFIX}{}", self.name), false) else {
            return;
        };
        if !self.categories.contains(&param) {
            self.categories.push(param);
        }
    }

    pub fn with_selection(mut self, selection: DataSelection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Human readable summary, e.g. `Field: T (Temperature)`.
    pub fn full_description(&self) -> String {
        format!("Field: {} ({})", self.name, self.description)
    }

    /// All categories in order, display categories included.
    pub fn categories(&self) -> &[DataCategory] {
        &self.categories
    }

    /// Categories, optionally without display categories.
    pub fn data_categories(&self, exclude_display: bool) -> Vec<&DataCategory> {
        self.categories.iter().filter(|category| !exclude_display || !category.is_for_display()).collect()
    }

    /// The first display category, if any.
    pub fn display_category(&self) -> Option<&DataCategory> {
        self.categories.iter().find(|category| category.is_for_display())
    }

    pub fn set_categories(&mut self, categories: Vec<DataCategory>) {
        self.categories = categories;
    }

    pub fn add_category(&mut self, category: DataCategory) {
        self.categories.push(category);
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Boolean property, accepting JSON booleans and `"true"`/`"false"` strings.
    pub fn property_bool(&self, name: &str, default: bool) -> bool {
        match self.properties.get(name) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// String property with surrounding whitespace removed.
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str).map(str::trim)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Whether the choice should be offered to end users (defaults to `true`).
    pub fn for_user(&self) -> bool {
        self.property_bool(PROP_FOR_USER, true)
    }

    /// The selection fixed on this choice, merged under every incoming selection.
    pub fn selection(&self) -> Option<&DataSelection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<DataSelection>) {
        self.selection = selection;
    }

    pub fn fixed_request_properties(&self) -> Option<&RequestProperties> {
        self.fixed_request_properties.as_ref()
    }

    pub fn set_fixed_request_properties(&mut self, properties: Option<RequestProperties>) {
        self.fixed_request_properties = properties;
    }
}

impl PartialEq for ChoiceIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.categories == other.categories && self.selection == other.selection
    }
}

impl Eq for ChoiceIdentity {}

impl Hash for ChoiceIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.categories.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_defaults_to_name_then_data() {
        let identity = ChoiceIdentity::new("t", "T", None, Vec::new());
        assert_eq!(identity.description(), "T");

        let identity = ChoiceIdentity::new("anon", "", None, Vec::new());
        assert_eq!(identity.name(), DEFAULT_CHOICE_LABEL);
        assert_eq!(identity.description(), DEFAULT_CHOICE_LABEL);
    }

    #[test]
    fn param_category_added_only_with_filtering_categories() {
        let display_only = ChoiceIdentity::new("t", "T", None, vec![DataCategory::new("Temperature", true)]);
        assert_eq!(display_only.categories().len(), 1);

        let categories = DataCategory::parse_list("Temperature;GRID-3D", true);
        let identity = ChoiceIdentity::new("t", "T", Some("Temperature".into()), categories);
        let names: Vec<String> = identity.categories().iter().map(DataCategory::full_name).collect();
        assert_eq!(names, vec!["Temperature", "GRID-3D", "param:T"]);
        assert_eq!(identity.display_category().map(DataCategory::full_name).as_deref(), Some("Temperature"));
        assert_eq!(identity.data_categories(true).len(), 2);
    }

    #[test]
    fn typed_property_access() {
        let identity = ChoiceIdentity::new("t", "T", None, Vec::new())
            .with_property(PROP_FOR_USER, "false")
            .with_property("units", "  K ");
        assert!(!identity.for_user());
        assert_eq!(identity.property_str("units"), Some("K"));
        assert!(identity.property_bool("missing", true));
    }

    #[test]
    fn equality_covers_id_categories_and_selection() {
        let base = ChoiceIdentity::new("t", "T", None, DataCategory::parse_list("GRID-3D", false));
        let mut renamed = base.clone();
        renamed.set_description("Temperature at 2m");
        assert_eq!(base, renamed);

        let narrowed = base.clone().with_selection(DataSelection::with_level("500 hPa"));
        assert_ne!(base, narrowed);

        let mut other_id = base.clone();
        other_id.set_id("u");
        assert_ne!(base, other_id);
    }
}
