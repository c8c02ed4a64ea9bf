//! Canonical `search_index.js` writer.
//!
//! Reproduces the generator's layout byte for byte:
//! `var <binding> = {"docs":\n[...compact records...]\n}\n`.

use crate::model::{SearchIndex, DEFAULT_BINDING};
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsRenderer;

impl Renderer for JsRenderer {
    fn render(&self, index: &SearchIndex) -> Result<String> {
        let binding = index.binding.as_deref().unwrap_or(DEFAULT_BINDING);
        let docs = serde_json::to_string(&index.docs).context("failed to serialize records")?;
        Ok(format!("var {} = {{\"docs\":\n{}\n}}\n", binding, docs))
    }

    fn file_extension(&self) -> &str {
        "js"
    }
}
