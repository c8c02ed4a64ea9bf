//! Data model for a documentation search index — format-agnostic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Variable name the generator assigns the index to in `search_index.js`.
pub const DEFAULT_BINDING: &str = "documenterSearchIndex";

/// Docstring kinds the generator emits as categories besides `page` and `section`.
pub const DOCSTRING_CATEGORIES: &[&str] = &[
    "function",
    "method",
    "type",
    "abstract type",
    "primitive type",
    "module",
    "macro",
    "constant",
];

/// Complete search index from a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchIndex {
    /// JS variable the payload was assigned to (`None` for bare JSON input)
    #[serde(skip)]
    pub binding: Option<String>,
    /// Records in source order
    pub docs: Vec<DocRecord>,
}

/// One entry of the index: a documentation location and its extracted text.
///
/// Serialization always writes the generator's key order (`location, page,
/// title, text, category`), whatever order the keys were read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocRecord {
    /// URL fragment, e.g. "References/#References", or empty
    pub location: String,
    pub page: String,
    pub title: String,
    /// Extracted prose, possibly empty
    pub text: String,
    pub category: Category,
}

impl DocRecord {
    /// Page path part of the location (everything before `#`).
    pub fn path(&self) -> &str {
        match self.location.split_once('#') {
            Some((path, _)) => path,
            None => &self.location,
        }
    }

    /// Anchor fragment of the location, without the `#`.
    pub fn anchor(&self) -> Option<&str> {
        self.location.split_once('#').map(|(_, anchor)| anchor)
    }
}

/// Role of a record in the page hierarchy.
///
/// Backed by the raw string so unrecognized values survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Page,
    Section,
    /// One of [`DOCSTRING_CATEGORIES`]
    Docstring(String),
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Page => "page",
            Category::Section => "section",
            Category::Docstring(kind) | Category::Other(kind) => kind,
        }
    }

    /// Whether the record points at an anchor inside a page.
    pub fn is_anchored(&self) -> bool {
        matches!(self, Category::Section | Category::Docstring(_))
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "page" => Category::Page,
            "section" => Category::Section,
            kind if DOCSTRING_CATEGORIES.contains(&kind) => Category::Docstring(s),
            _ => Category::Other(s),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::from(s.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Page => "page".to_string(),
            Category::Section => "section".to_string(),
            Category::Docstring(kind) | Category::Other(kind) => kind,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(location: &str, category: &str) -> DocRecord {
        DocRecord {
            location: location.to_string(),
            page: "Home".to_string(),
            title: "Home".to_string(),
            text: String::new(),
            category: category.into(),
        }
    }

    #[test]
    fn category_from_known_strings() {
        assert_eq!(Category::from("page"), Category::Page);
        assert_eq!(Category::from("section"), Category::Section);
        assert_eq!(
            Category::from("abstract type"),
            Category::Docstring("abstract type".to_string())
        );
        assert_eq!(Category::from("Page"), Category::Other("Page".to_string()));
    }

    #[test]
    fn category_keeps_raw_string() {
        for raw in ["page", "section", "macro", "glossary"] {
            assert_eq!(String::from(Category::from(raw)), raw);
        }
    }

    #[test]
    fn anchored_categories() {
        assert!(Category::Section.is_anchored());
        assert!(Category::from("function").is_anchored());
        assert!(!Category::Page.is_anchored());
        assert!(!Category::from("glossary").is_anchored());
    }

    #[test]
    fn path_and_anchor() {
        let r = record("References/#References", "section");
        assert_eq!(r.path(), "References/");
        assert_eq!(r.anchor(), Some("References"));

        let r = record("#Kinematic1D.jl", "section");
        assert_eq!(r.path(), "");
        assert_eq!(r.anchor(), Some("Kinematic1D.jl"));

        let r = record("References/", "page");
        assert_eq!(r.path(), "References/");
        assert_eq!(r.anchor(), None);
    }

    #[test]
    fn record_serializes_in_generator_order() {
        let json = serde_json::to_string(&record("", "page")).unwrap();
        assert_eq!(
            json,
            r#"{"location":"","page":"Home","title":"Home","text":"","category":"page"}"#
        );
    }
}
