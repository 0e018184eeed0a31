//! JSON renderer: structured output for tooling integration.
//!
//! Carries the rewritten lines alongside the joined text so consumers do not
//! have to re-split.

use crate::render::{RenderedDocstring, Renderer};
use anyhow::{Context, Result};
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonDocstring<'a> {
    #[serde(flatten)]
    doc: &'a RenderedDocstring,
    text: String,
}

impl Renderer for JsonRenderer {
    fn render(&self, doc: &RenderedDocstring) -> Result<String> {
        let value = JsonDocstring {
            doc,
            text: doc.lines.join("\n"),
        };
        let mut out = serde_json::to_string_pretty(&value).context("failed to serialize docstring")?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_source_lines_and_text() {
        let doc = RenderedDocstring {
            source: Some("a.txt".into()),
            lines: vec![":Keys: **k** -- \"quoted\"".into(), String::new()],
        };
        let out = JsonRenderer.render(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["source"], "a.txt");
        assert_eq!(value["lines"][0], ":Keys: **k** -- \"quoted\"");
        assert_eq!(value["text"], ":Keys: **k** -- \"quoted\"\n");
    }

    #[test]
    fn stdin_source_is_null() {
        let doc = RenderedDocstring {
            source: None,
            lines: vec!["x".into()],
        };
        let value: serde_json::Value =
            serde_json::from_str(&JsonRenderer.render(&doc).unwrap()).unwrap();
        assert!(value["source"].is_null());
    }
}
