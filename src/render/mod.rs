//! Renderer module — trait-based format dispatch.

pub mod js;
pub mod json;
pub mod markdown;

use crate::model::SearchIndex;
use anyhow::{anyhow, Result};

/// Trait for rendering a SearchIndex into a specific output format.
pub trait Renderer {
    fn render(&self, index: &SearchIndex) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "js" | "javascript" => Ok(Box::new(js::JsRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use js, json, or markdown",
            format
        )),
    }
}
