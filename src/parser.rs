//! Loader for `search_index.js` files.
//!
//! The generator writes the index as a JS assignment,
//! `var documenterSearchIndex = {"docs": [...]}`. The assignment is stripped
//! and the object literal handed to serde_json. Bare JSON is accepted as well.

use crate::model::SearchIndex;
use anyhow::{anyhow, bail, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static RE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:var|let|const)\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*=\s*").unwrap()
});

/// Parse the contents of a search index file.
pub fn parse(raw: &str) -> Result<SearchIndex> {
    let input = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let bom_len = raw.len() - input.len();
    if input.trim().is_empty() {
        bail!("empty input");
    }

    let (binding, offset) = match RE_BINDING.captures(input) {
        Some(caps) => (Some(caps[1].to_string()), caps[0].len()),
        None => (None, 0),
    };

    let body = input[offset..].trim_end();
    let body = body.strip_suffix(';').unwrap_or(body);

    let mut index: SearchIndex =
        serde_json::from_str(body).map_err(|e| locate_error(&e, &raw[..bom_len + offset]))?;
    debug!(
        binding = binding.as_deref().unwrap_or("<none>"),
        records = index.docs.len(),
        "parsed search index"
    );
    index.binding = binding;
    Ok(index)
}

/// Rewrite a serde_json position so it refers to the original input rather
/// than to the payload after the stripped BOM and `var x =` prefix.
///
/// serde_json counts columns in bytes, so the prefix is measured in bytes too.
fn locate_error(err: &serde_json::Error, prefix: &str) -> anyhow::Error {
    if err.line() == 0 {
        return anyhow!("{}", err);
    }

    let full = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    let message = full.strip_suffix(&suffix).unwrap_or(&full);

    let prefix_lines = prefix.matches('\n').count();
    let prefix_col = match prefix.rfind('\n') {
        Some(pos) => prefix.len() - pos - 1,
        None => prefix.len(),
    };
    let (line, column) = if err.line() == 1 {
        (prefix_lines + 1, prefix_col + err.column())
    } else {
        (prefix_lines + err.line(), err.column())
    };

    anyhow!("{} at line {} column {}", message, line, column)
}
