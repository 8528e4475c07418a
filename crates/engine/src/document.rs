//! Loading persisted choice lists.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::choice::DataChoice;

/// A persisted list of data choices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChoiceDocument {
    pub choices: Vec<DataChoice>,
}

/// Loads a choice document from the filesystem.
///
/// JSON and YAML are both accepted (YAML is a superset, so one parser handles
/// both). The document may wrap the list under a `choices` key or be a bare list.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not contain a choice list.
///
/// # Examples
///
/// ```rust
/// use meridian_engine::parse_choice_document;
///
/// let temp_dir = tempfile::tempdir()?;
/// let path = temp_dir.path().join("choices.yaml");
/// std::fs::write(&path, r#"
/// choices:
///   - type: unbound
///     id: T
///     name: T
///     label: Temperature
/// "#)?;
///
/// let document = parse_choice_document(&path)?;
/// assert_eq!(document.choices.len(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_choice_document(file_path: impl AsRef<Path>) -> Result<ChoiceDocument> {
    let file_path = file_path.as_ref();
    let file_content = fs::read(file_path).with_context(|| format!("Failed to read choice document: {}", file_path.display()))?;
    parse_choice_str(&String::from_utf8_lossy(&file_content)).with_context(|| format!("Invalid choice document: {}", file_path.display()))
}

/// Parses a choice document from text. See [`parse_choice_document`].
pub fn parse_choice_str(content: &str) -> Result<ChoiceDocument> {
    let wrapped_error = match serde_yaml::from_str::<ChoiceDocument>(content) {
        Ok(document) => return Ok(document),
        Err(error) => error,
    };

    if let Ok(choices) = serde_yaml::from_str::<Vec<DataChoice>>(content) {
        return Ok(ChoiceDocument { choices });
    }

    anyhow::bail!(
        "Unsupported choice document format ({wrapped_error}). Expected one of:\n\
         - A mapping with the list of choices under a 'choices' key\n\
         - A bare list of choices, each tagged with 'type: direct|unbound|resource'\n\
         "
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::ResolveData;
    use meridian_types::Data;

    #[test]
    fn parses_wrapped_yaml_document() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("choices.yaml");
        let content = r#"
choices:
  - type: resource
    id: stations
    name: stations
    description: Station list
    categories:
      - path: TEXT
        display: true
      - path: POINT-stations
    url: "KDEN KBOU"
  - type: direct
    id: t2m
    name: T
    value:
      kind: json
      value: [271.5, 272.0]
  - type: unbound
    id: U
    name: U
    label: Wind speed
"#;
        fs::write(&path, content).unwrap();

        let document = parse_choice_document(&path).expect("parse wrapped document");
        assert_eq!(document.choices.len(), 3);
        assert_eq!(document.choices[0].kind(), "resource");
        assert_eq!(document.choices[0].categories().len(), 2);
        assert!(document.choices[0].categories()[0].is_for_display());
        assert_eq!(document.choices[1].get_data(None).unwrap().as_deref(), Some(&Data::Json(serde_json::json!([271.5, 272.0]))));
        match &document.choices[2] {
            DataChoice::Unbound(choice) => {
                assert_eq!(choice.label(), "Wind speed");
                assert_eq!(choice.identity().name(), "U");
            }
            other => panic!("unexpected variant {}", other.kind()),
        }
    }

    #[test]
    fn parses_bare_json_list() {
        let content = r#"[{"type": "resource", "id": "r", "name": "r", "url": "literal"}]"#;
        let document = parse_choice_str(content).expect("parse bare list");
        assert_eq!(document.choices.len(), 1);
        assert_eq!(document.choices[0].get_data(None).unwrap().unwrap().as_text(), Some("literal"));
    }

    #[test]
    fn rejects_unknown_variants() {
        let error = parse_choice_str("choices:\n  - type: derived\n    id: x\n").unwrap_err();
        assert!(error.to_string().contains("Unsupported choice document format"));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = parse_choice_document("/nonexistent/choices.yaml").unwrap_err();
        assert!(error.to_string().contains("/nonexistent/choices.yaml"));
    }
}
