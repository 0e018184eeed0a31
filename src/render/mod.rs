//! Output formats for rewritten docstrings.

pub mod json;
pub mod rst;

use anyhow::{anyhow, Result};
use serde::Serialize;

/// One rewritten docstring and where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocstring {
    /// Input path, or `None` for stdin.
    pub source: Option<String>,
    pub lines: Vec<String>,
}

/// Turns a [`RenderedDocstring`] into file contents.
pub trait Renderer {
    fn render(&self, doc: &RenderedDocstring) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "rst" | "rest" => Ok(Box::new(rst::RstRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use rst or json", format)),
    }
}
