//! Summary counts for an index.

use crate::model::SearchIndex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub records: usize,
    pub pages: usize,
    /// Per-category counts, in the order categories first appear
    pub categories: Vec<CategoryCount>,
    pub empty_text: usize,
    pub text_bytes: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

pub fn collect(index: &SearchIndex) -> Stats {
    let mut stats = Stats {
        records: index.docs.len(),
        ..Stats::default()
    };
    let mut pages: Vec<&str> = Vec::new();

    for record in &index.docs {
        if !pages.contains(&record.page.as_str()) {
            pages.push(&record.page);
        }

        let category = record.category.as_str();
        match stats.categories.iter_mut().find(|c| c.category == category) {
            Some(entry) => entry.count += 1,
            None => stats.categories.push(CategoryCount {
                category: category.to_string(),
                count: 1,
            }),
        }

        if record.text.is_empty() {
            stats.empty_text += 1;
        }
        stats.text_bytes += record.text.len();
    }

    stats.pages = pages.len();
    stats
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "records:    {}", self.records)?;
        writeln!(f, "pages:      {}", self.pages)?;
        for c in &self.categories {
            writeln!(f, "  {:<16} {}", c.category, c.count)?;
        }
        writeln!(f, "empty text: {}", self.empty_text)?;
        writeln!(f, "text bytes: {}", self.text_bytes)
    }
}
