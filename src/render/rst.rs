//! Plain reStructuredText output.

use crate::render::{RenderedDocstring, Renderer};
use anyhow::Result;

pub struct RstRenderer;

impl Renderer for RstRenderer {
    fn render(&self, doc: &RenderedDocstring) -> Result<String> {
        let mut out = doc.lines.join("\n");
        if !out.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "rst"
    }
}
