//! Markdown outline renderer: an index of pages, then one block per page
//! listing its sections as links into the built site.

use crate::model::SearchIndex;
use crate::outline::{self, PageOutline};
use crate::render::Renderer;
use anyhow::Result;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, index: &SearchIndex) -> Result<String> {
        let outline = outline::build(index);
        let mut output = String::new();

        if !outline.pages.is_empty() {
            output.push_str("## Index\n\n");
            for page in &outline.pages {
                output.push_str(&outline::render_toc_item(&page.page));
                output.push('\n');
            }
            output.push('\n');
        }

        for page in &outline.pages {
            output.push_str(&render_page(page));
        }

        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_page(page: &PageOutline) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("## {}\n", page.page));
    let path = if page.path.is_empty() { "./" } else { page.path.as_str() };
    lines.push(format!("Path: `{}`\n", path));

    if !page.sections.is_empty() {
        for section in &page.sections {
            lines.push(format!(
                "* {}",
                outline::render_location_link(&section.title, &section.location)
            ));
        }
        lines.push(String::new());
    }

    if !page.docstrings.is_empty() {
        lines.push("### Docstrings\n".to_string());
        for doc in &page.docstrings {
            let link = outline::render_location_link(&doc.title, &doc.location);
            match doc.kind {
                Some(ref kind) => lines.push(format!("* {} `{}`", link, kind)),
                None => lines.push(format!("* {}", link)),
            }
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "{} {}, {} characters of text\n",
        page.paragraphs,
        if page.paragraphs == 1 { "paragraph" } else { "paragraphs" },
        page.text_len
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn renders_index_and_pages() {
        let input = r#"{"docs":[
{"location":"Guide/#Setup","page":"Guide","title":"Setup","text":"","category":"section"},
{"location":"Guide/","page":"Guide","title":"Guide","text":"Run it.","category":"page"},
{"location":"Guide/#Main.run","page":"Guide","title":"Main.run","text":"Runs.","category":"function"}
]}"#;
        let index = parser::parse(input).unwrap();
        let out = MarkdownRenderer.render(&index).unwrap();
        let expected = "\
## Index

* [Guide](#guide)

## Guide

Path: `Guide/`

* [Setup](Guide/#Setup)

### Docstrings

* [Main.run](Guide/#Main.run) `function`

1 paragraph, 12 characters of text

";
        assert_eq!(out, expected);
    }

    #[test]
    fn root_page_path() {
        let input = r##"{"docs":[{"location":"#Intro","page":"Home","title":"Intro","text":"","category":"section"}]}"##;
        let index = parser::parse(input).unwrap();
        let out = MarkdownRenderer.render(&index).unwrap();
        assert!(out.contains("Path: `./`"));
        assert!(out.contains("* [Intro](#Intro)"));
        assert!(out.contains("0 paragraphs, 0 characters of text"));
    }

    #[test]
    fn empty_index_renders_nothing() {
        let index = parser::parse(r#"{"docs":[]}"#).unwrap();
        assert_eq!(MarkdownRenderer.render(&index).unwrap(), "");
    }
}
