//! Semantic checks on a loaded index.
//!
//! Key presence and string types are enforced by the loader; everything here
//! is about the values. Nothing is enforced upstream except by the generator,
//! so most findings are warnings.

use crate::model::{Category, SearchIndex};
use crate::outline;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single finding. `index` is the record position, `None` for index-wide findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub index: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn error(index: Option<usize>, message: impl Into<String>) -> Self {
        Issue {
            index,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(index: Option<usize>, message: impl Into<String>) -> Self {
        Issue {
            index,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "record {}: {}: {}", i, self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Run every check and return findings in record order.
pub fn validate(index: &SearchIndex) -> Vec<Issue> {
    let mut issues = Vec::new();

    if index.docs.is_empty() {
        issues.push(Issue::warning(None, "index contains no records"));
        return issues;
    }

    let mut seen_locations: HashMap<&str, usize> = HashMap::new();
    let mut page_paths: HashMap<&str, (&str, usize)> = HashMap::new();

    for (i, record) in index.docs.iter().enumerate() {
        let at = Some(i);

        if record.page.is_empty() {
            issues.push(Issue::error(at, "empty page name"));
        }
        if record.title.is_empty() {
            issues.push(Issue::error(at, "empty title"));
        }

        match &record.category {
            Category::Other(raw) => {
                issues.push(Issue::warning(at, format!("unrecognized category `{}`", raw)));
            }
            Category::Page => {
                if record.anchor().is_some() {
                    issues.push(Issue::warning(
                        at,
                        format!("page record location `{}` has an anchor", record.location),
                    ));
                }
            }
            Category::Section | Category::Docstring(_) => {}
        }

        if record.category.is_anchored() {
            match record.anchor() {
                _ if record.location.is_empty() => {
                    issues.push(Issue::warning(
                        at,
                        format!("{} record has no location", record.category),
                    ));
                }
                None => {
                    issues.push(Issue::warning(
                        at,
                        format!("location `{}` has no anchor", record.location),
                    ));
                }
                Some(anchor) => {
                    if record.category == Category::Section
                        && !outline::anchor_matches(anchor, &record.title)
                    {
                        issues.push(Issue::warning(
                            at,
                            format!(
                                "anchor `{}` does not match title slug `{}`",
                                anchor,
                                outline::documenter_slug(&record.title)
                            ),
                        ));
                    }
                }
            }

            if !record.location.is_empty() {
                if let Some(first) = seen_locations.get(record.location.as_str()) {
                    issues.push(Issue::warning(
                        at,
                        format!(
                            "duplicate location `{}` (first seen at record {})",
                            record.location, first
                        ),
                    ));
                } else {
                    seen_locations.insert(record.location.as_str(), i);
                }
            }
        }

        if !record.location.is_empty() {
            let path = record.path();
            match page_paths.get(record.page.as_str()) {
                Some(&(first_path, first)) if first_path != path => {
                    issues.push(Issue::warning(
                        at,
                        format!(
                            "page `{}` uses path `{}` but record {} used `{}`",
                            record.page, path, first, first_path
                        ),
                    ));
                }
                Some(_) => {}
                None => {
                    page_paths.insert(record.page.as_str(), (path, i));
                }
            }
        }
    }

    issues
}

/// Highest severity among `issues`.
pub fn worst(issues: &[Issue]) -> Option<Severity> {
    issues.iter().map(|i| i.severity).max()
}
