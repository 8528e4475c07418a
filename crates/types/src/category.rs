//! Hierarchical data categories.
//!
//! A category is written as a `-` separated path (for example `GRID-3D-*`) and is
//! stored as a head segment with an optional chain of children. Categories flagged
//! for display name the primary category of a choice; the remaining (secondary)
//! categories are the ones consulted when deciding which choices apply to a request.
//!
//! Requested categories act as patterns over a choice's categories:
//!
//! - `*` matches zero or more path segments
//! - `+` matches one or more path segments
//! - `.` matches exactly one path segment
//! - anything else matches the segment literally

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Separator between path segments.
pub const DIVIDER: char = '-';

/// Separator between categories in a category list string.
pub const LIST_SEPARATOR: char = ';';

/// Category name that matches anything.
pub const CATEGORY_ANY: &str = "*";

/// A category path used to filter data choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CategoryRecord", into = "CategoryRecord")]
pub struct DataCategory {
    name: String,
    child: Option<Box<DataCategory>>,
    for_display: bool,
    /// Compiled pattern, built on first use as a request pattern.
    matcher: OnceCell<Option<Regex>>,
}

impl DataCategory {
    /// Create a single-segment category.
    pub fn new(name: impl Into<String>, for_display: bool) -> Self {
        Self {
            name: name.into(),
            child: None,
            for_display,
            matcher: OnceCell::new(),
        }
    }

    /// Build a category from already split path segments. Returns `None` when
    /// `names` is empty.
    pub fn from_names<S: AsRef<str>>(names: &[S], for_display: bool) -> Option<Self> {
        let mut reversed = names.iter().rev();
        let mut current = Self::new(reversed.next()?.as_ref(), for_display);
        for name in reversed {
            current = Self {
                name: name.as_ref().to_string(),
                child: Some(Box::new(current)),
                for_display,
                matcher: OnceCell::new(),
            };
        }
        Some(current)
    }

    /// Parse a `-` separated category path. Blank segments are skipped; a path
    /// with no segments yields `None`.
    pub fn parse(text: &str, for_display: bool) -> Option<Self> {
        let names: Vec<&str> = text.split(DIVIDER).map(str::trim).filter(|name| !name.is_empty()).collect();
        Self::from_names(&names, for_display)
    }

    /// Parse a `;` separated list of category paths.
    ///
    /// When `first_for_display` is set the first path becomes the display category
    /// and every following path is a filtering category.
    pub fn parse_list(text: &str, first_for_display: bool) -> Vec<Self> {
        text.split(LIST_SEPARATOR)
            .enumerate()
            .filter_map(|(index, path)| Self::parse(path.trim(), index == 0 && first_for_display))
            .collect()
    }

    /// Head segment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Next segment in the path, if any.
    pub fn child(&self) -> Option<&DataCategory> {
        self.child.as_deref()
    }

    /// Whether this is a display (primary) category.
    pub fn is_for_display(&self) -> bool {
        self.for_display
    }

    pub fn set_for_display(&mut self, for_display: bool) {
        self.for_display = for_display;
    }

    /// Full path joined with [`DIVIDER`].
    pub fn full_name(&self) -> String {
        self.segments().collect::<Vec<_>>().join(&DIVIDER.to_string())
    }

    /// Whether this category, used as a pattern, matches `other`.
    pub fn applicable_to(&self, other: &DataCategory) -> bool {
        let input = other.framed_name();
        if input == framed(CATEGORY_ANY) {
            return true;
        }
        self.matcher().is_some_and(|regex| regex.is_match(&input))
    }

    fn matcher(&self) -> Option<&Regex> {
        self.matcher.get_or_init(|| Regex::new(&self.pattern()).ok()).as_ref()
    }

    /// Whether this pattern matches any filtering category in `categories`.
    ///
    /// Display categories are skipped. When nothing is left to check the result is
    /// `true`: a choice without filtering categories is offered everywhere.
    pub fn applicable_to_any(&self, categories: &[DataCategory]) -> bool {
        let mut checked = 0;
        for category in categories.iter().filter(|category| !category.for_display) {
            checked += 1;
            if self.applicable_to(category) {
                return true;
            }
        }
        checked == 0
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::successors(Some(self), |category| category.child()).map(|category| category.name.as_str())
    }

    /// Path with every segment wrapped in dividers, e.g. `-GRID--3D-`.
    fn framed_name(&self) -> String {
        self.segments().map(framed).collect()
    }

    fn pattern(&self) -> String {
        let body: String = self
            .segments()
            .map(|segment| match segment {
                "*" => "(?:-[^-]+-)*".to_string(),
                "+" => "(?:-[^-]+-)+".to_string(),
                "." => "-[^-]+-".to_string(),
                literal => framed(&regex::escape(literal)),
            })
            .collect();
        format!("^{body}$")
    }
}

/// Whether any category in `from` matches any filtering category in `to`.
pub fn any_applicable(from: &[DataCategory], to: &[DataCategory]) -> bool {
    from.iter().any(|category| category.applicable_to_any(to))
}

fn framed(segment: &str) -> String {
    format!("{DIVIDER}{segment}{DIVIDER}")
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl PartialEq for DataCategory {
    fn eq(&self, other: &Self) -> bool {
        self.full_name() == other.full_name()
    }
}

impl Eq for DataCategory {}

impl Hash for DataCategory {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

/// Persisted form: `{ "path": "GRID-3D", "display": true }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoryRecord {
    path: String,
    #[serde(default, skip_serializing_if = "is_false")]
    display: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TryFrom<CategoryRecord> for DataCategory {
    type Error = String;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        Self::parse(&record.path, record.display).ok_or_else(|| format!("category path '{}' has no segments", record.path))
    }
}

impl From<DataCategory> for CategoryRecord {
    fn from(category: DataCategory) -> Self {
        Self {
            path: category.full_name(),
            display: category.for_display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtering(path: &str) -> DataCategory {
        DataCategory::parse(path, false).expect("valid category path")
    }

    #[test]
    fn parses_paths_into_segment_chains() {
        let category = filtering(" GRID - 3D -  ");
        assert_eq!(category.name(), "GRID");
        assert_eq!(category.child().map(DataCategory::name), Some("3D"));
        assert_eq!(category.full_name(), "GRID-3D");
        assert_eq!(category.to_string(), "GRID-3D");
        assert!(DataCategory::parse(" - ", false).is_none());
    }

    #[test]
    fn parse_list_marks_only_first_for_display() {
        let categories = DataCategory::parse_list("Temperature;GRID-3D;GRID-2D", true);
        assert_eq!(categories.len(), 3);
        assert!(categories[0].is_for_display());
        assert!(!categories[1].is_for_display());
        assert!(!categories[2].is_for_display());

        let categories = DataCategory::parse_list("GRID-3D", false);
        assert!(!categories[0].is_for_display());
        assert!(DataCategory::parse_list("", true).is_empty());
    }

    #[test]
    fn literal_patterns_match_exact_paths() {
        assert!(filtering("GRID-3D").applicable_to(&filtering("GRID-3D")));
        assert!(!filtering("GRID-3D").applicable_to(&filtering("GRID-2D")));
        assert!(!filtering("GRID").applicable_to(&filtering("GRID-3D")));
    }

    #[test]
    fn wildcard_segments() {
        let star = filtering("GRID-*");
        assert!(star.applicable_to(&filtering("GRID")));
        assert!(star.applicable_to(&filtering("GRID-3D")));
        assert!(star.applicable_to(&filtering("GRID-3D-trajectory")));
        assert!(!star.applicable_to(&filtering("POINT-3D")));

        let plus = filtering("GRID-+");
        assert!(!plus.applicable_to(&filtering("GRID")));
        assert!(plus.applicable_to(&filtering("GRID-3D-x")));

        let dot = filtering("GRID-.-trajectory");
        assert!(dot.applicable_to(&filtering("GRID-3D-trajectory")));
        assert!(!dot.applicable_to(&filtering("GRID-trajectory")));
    }

    #[test]
    fn pattern_is_compiled_once_and_reused() {
        let pattern = filtering("GRID-*");
        assert!(pattern.matcher.get().is_none());
        let candidates: Vec<DataCategory> = ["GRID-3D", "POINT", "GRID"].into_iter().map(filtering).collect();
        let matched: Vec<bool> = candidates.iter().map(|candidate| pattern.applicable_to(candidate)).collect();
        assert_eq!(matched, vec![true, false, true]);

        let compiled = pattern.matcher.get().and_then(Option::as_ref).expect("compiled pattern");
        assert!(std::ptr::eq(compiled, pattern.matcher().unwrap()));
        assert!(pattern.clone().applicable_to(&filtering("GRID-2D")));
    }

    #[test]
    fn any_input_matches_every_pattern() {
        assert!(filtering("IMAGE-2D").applicable_to(&filtering("*")));
    }

    #[test]
    fn regex_metacharacters_in_names_are_literal() {
        assert!(filtering("param:T(2m)").applicable_to(&filtering("param:T(2m)")));
        assert!(!filtering("a.b").applicable_to(&filtering("axb")));
    }

    #[test]
    fn display_categories_are_ignored_when_filtering() {
        let pattern = filtering("GRID-3D");
        let only_display = vec![DataCategory::new("Temperature", true)];
        assert!(pattern.applicable_to_any(&only_display));

        let mixed = vec![DataCategory::new("Temperature", true), filtering("POINT")];
        assert!(!pattern.applicable_to_any(&mixed));
        assert!(any_applicable(&[filtering("POINT"), pattern], &mixed));
    }

    #[test]
    fn equality_uses_full_name_only() {
        let display = DataCategory::parse("GRID-3D", true).unwrap();
        assert_eq!(display, filtering("GRID-3D"));
        assert_ne!(display, filtering("GRID"));
    }

    #[test]
    fn persisted_form_round_trips() {
        let yaml = "- path: GRID-3D\n  display: true\n- path: param:T\n";
        let categories: Vec<DataCategory> = serde_yaml::from_str(yaml).expect("deserialize categories");
        assert!(categories[0].is_for_display());
        assert_eq!(categories[1].full_name(), "param:T");

        let json = serde_json::to_value(&categories).expect("serialize categories");
        assert_eq!(json, serde_json::json!([{"path": "GRID-3D", "display": true}, {"path": "param:T"}]));

        let empty = serde_json::from_str::<DataCategory>(r#"{"path": "-"}"#);
        assert!(empty.is_err());
    }
}
