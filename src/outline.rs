//! Page/section outline of an index, plus anchor slug generation.
//!
//! Two slug flavours live here: the generator's own heading anchors (used to
//! check section locations) and GitHub heading anchors (used by the markdown
//! outline to link to its own page headings).

use crate::model::{Category, SearchIndex};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_NOT_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{P}\d\-]+").unwrap());

static RE_DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Outline of every page in an index, in first-appearance order.
#[derive(Debug, Default, Serialize)]
pub struct Outline {
    pub pages: Vec<PageOutline>,
}

#[derive(Debug, Serialize)]
pub struct PageOutline {
    pub page: String,
    /// Path part shared by the page's locations ("" for the site root)
    pub path: String,
    pub sections: Vec<Entry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub docstrings: Vec<Entry>,
    /// `page` records carrying text
    pub paragraphs: usize,
    /// Total characters of extracted text across the page's records
    pub text_len: usize,
}

#[derive(Debug, Serialize)]
pub struct Entry {
    pub title: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Group records by page, keeping the order pages first appear in.
pub fn build(index: &SearchIndex) -> Outline {
    let mut outline = Outline::default();

    for record in &index.docs {
        let pos = match outline.pages.iter().position(|p| p.page == record.page) {
            Some(pos) => pos,
            None => {
                outline.pages.push(PageOutline {
                    page: record.page.clone(),
                    path: String::new(),
                    sections: Vec::new(),
                    docstrings: Vec::new(),
                    paragraphs: 0,
                    text_len: 0,
                });
                outline.pages.len() - 1
            }
        };
        let page = &mut outline.pages[pos];

        if page.path.is_empty() && !record.path().is_empty() {
            page.path = record.path().to_string();
        }
        page.text_len += record.text.chars().count();

        match &record.category {
            Category::Section => page.sections.push(Entry {
                title: record.title.clone(),
                location: record.location.clone(),
                kind: None,
            }),
            Category::Docstring(kind) => page.docstrings.push(Entry {
                title: record.title.clone(),
                location: record.location.clone(),
                kind: Some(kind.clone()),
            }),
            Category::Page | Category::Other(_) => {
                if !record.text.is_empty() {
                    page.paragraphs += 1;
                }
            }
        }
    }

    outline
}

/// Heading anchor as the documentation generator derives it from a title.
///
/// - whitespace runs become `-`
/// - `&` becomes `-and-`
/// - anything but letters, punctuation, digits and `-` is removed
/// - repeated `-` collapse, leading/trailing `-` are trimmed
pub fn documenter_slug(text: &str) -> String {
    let s = RE_WHITESPACE.replace_all(text, "-");
    let s = s.replace('&', "-and-");
    let s = RE_NOT_SLUG.replace_all(&s, "");
    let s = RE_DASHES.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}

/// Whether `anchor` is the slug of `title`, allowing the `-N` suffix used
/// for repeated headings.
pub fn anchor_matches(anchor: &str, title: &str) -> bool {
    let slug = documenter_slug(title);
    if anchor == slug {
        return true;
    }
    anchor
        .strip_prefix(slug.as_str())
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

/// GitHub heading anchor slug.
///
/// - lowercase
/// - remove all chars that aren't alphanumeric, space or hyphen
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Markdown link to a record location. Empty locations point at the site root.
pub fn render_location_link(title: &str, location: &str) -> String {
    let target = if location.is_empty() { "./" } else { location };
    format!("[{}]({})", title, target)
}

/// Index list item linking to a page heading in the same outline.
pub fn render_toc_item(page: &str) -> String {
    format!("* [{}](#{})", page, github_slug(page))
}
