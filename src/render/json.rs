//! JSON renderer — plain `{"docs": [...]}` for tooling integration.

use crate::model::SearchIndex;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, index: &SearchIndex) -> Result<String> {
        let mut out =
            serde_json::to_string_pretty(index).context("failed to serialize search index")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
