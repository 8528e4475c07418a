//! Subsetting parameters and request properties passed into choice resolution.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open key/value bag of implementation-specific resolution hints.
pub type RequestProperties = IndexMap<String, Value>;

/// Subsetting parameters for a resolution request (time range, level, and opaque
/// extras). Every field is optional; an unset field defers to whatever selection it
/// is merged with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSelection {
    /// Selected times, when the request narrows by time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<DateTime<Utc>>>,
    /// Selected vertical level, in its textual form (for example `500 hPa`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Additional subsetting properties (spatial subset, strides, ...).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,
}

impl DataSelection {
    pub fn with_times(times: Vec<DateTime<Utc>>) -> Self {
        Self {
            times: Some(times),
            ..Self::default()
        }
    }

    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: Some(level.into()),
            ..Self::default()
        }
    }

    /// True when no field narrows anything.
    pub fn is_empty(&self) -> bool {
        self.times.is_none() && self.level.is_none() && self.properties.is_empty()
    }

    /// Merge two optional selections. Fields set on `primary` win; `fallback`
    /// fills the rest. Property maps are combined with `primary` keys taking
    /// precedence.
    pub fn merge(primary: Option<&DataSelection>, fallback: Option<&DataSelection>) -> Option<DataSelection> {
        match (primary, fallback) {
            (None, None) => None,
            (Some(selection), None) | (None, Some(selection)) => Some(selection.clone()),
            (Some(primary), Some(fallback)) => {
                let mut properties = fallback.properties.clone();
                for (key, value) in &primary.properties {
                    properties.insert(key.clone(), value.clone());
                }
                Some(DataSelection {
                    times: primary.times.clone().or_else(|| fallback.times.clone()),
                    level: primary.level.clone().or_else(|| fallback.level.clone()),
                    properties,
                })
            }
        }
    }
}

/// Merge a caller-supplied property bag with a choice's fixed properties.
///
/// Keys present in `incoming` keep their value; keys only present in `fixed` are
/// added. The result is always a fresh map so neither input is aliased.
pub fn merge_request_properties(incoming: Option<&RequestProperties>, fixed: Option<&RequestProperties>) -> Option<RequestProperties> {
    match (incoming, fixed) {
        (None, None) => None,
        (Some(properties), None) | (None, Some(properties)) => Some(properties.clone()),
        (Some(incoming), Some(fixed)) => {
            let mut merged = incoming.clone();
            for (key, value) in fixed {
                if merged.get(key).is_none_or(Value::is_null) {
                    merged.insert(key.clone(), value.clone());
                }
            }
            Some(merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn merge_prefers_primary_fields() {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut primary = DataSelection::with_level("500 hPa");
        primary.properties.insert("stride".into(), "2".into());
        let mut fallback = DataSelection::with_times(vec![time]);
        fallback.level = Some("850 hPa".into());
        fallback.properties.insert("stride".into(), "4".into());
        fallback.properties.insert("bbox".into(), "10,20,30,40".into());

        let merged = DataSelection::merge(Some(&primary), Some(&fallback)).expect("merged selection");
        assert_eq!(merged.level.as_deref(), Some("500 hPa"));
        assert_eq!(merged.times, Some(vec![time]));
        assert_eq!(merged.properties.get("stride").map(String::as_str), Some("2"));
        assert_eq!(merged.properties.get("bbox").map(String::as_str), Some("10,20,30,40"));
    }

    #[test]
    fn merge_with_missing_sides() {
        let level = DataSelection::with_level("surface");
        assert_eq!(DataSelection::merge(None, None), None);
        assert_eq!(DataSelection::merge(Some(&level), None), Some(level.clone()));
        assert_eq!(DataSelection::merge(None, Some(&level)), Some(level));
        assert!(DataSelection::default().is_empty());
    }

    #[test]
    fn request_properties_keep_incoming_values() {
        let mut incoming = RequestProperties::new();
        incoming.insert("fromderived".into(), json!(true));
        incoming.insert("unit".into(), Value::Null);
        let mut fixed = RequestProperties::new();
        fixed.insert("fromderived".into(), json!(false));
        fixed.insert("unit".into(), json!("K"));
        fixed.insert("stride".into(), json!(3));

        let merged = merge_request_properties(Some(&incoming), Some(&fixed)).expect("merged properties");
        assert_eq!(merged.get("fromderived"), Some(&json!(true)));
        assert_eq!(merged.get("unit"), Some(&json!("K")));
        assert_eq!(merged.get("stride"), Some(&json!(3)));
        assert_eq!(merge_request_properties(None, None), None);
        assert_eq!(merge_request_properties(None, Some(&fixed)), Some(fixed));
    }
}
