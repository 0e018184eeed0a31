//! Google-style docstring to reST rewriter.
//!
//! A single forward pass over a [`LineCursor`]. Outside a section, lines
//! pass through untouched. A recognized header (`Args:`, `Keys:`,
//! `Version Added:` ...) hands the following indented block to the
//! section's [`SectionStrategy`], which consumes it and returns the
//! rendered lines.

mod fields;
mod format;
pub mod sections;

use crate::config::DocstringConfig;
use crate::cursor::LineCursor;
use crate::error::Result;
use crate::typeref::{RoleStyle, TypeRewriter};
use format::{
    dedent, format_docutils_params, format_field, format_fields, format_notice, indent,
    indent_of, is_indented, strip_empty,
};
use regex::Regex;
pub use sections::{ReturnsOptions, SectionRegistry, SectionStrategy};
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s|\w)+:\s*$").unwrap());

// `:exc:`ValueError`` and friends, as written in a Raises entry.
static RE_XREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(:(?:[a-zA-Z0-9]+[\-_+:.])*[a-zA-Z0-9]+:)?`(.+?)`$").unwrap()
});

/// Continuation lines scanned when a field's type wraps.
pub const DEFAULT_MAX_WRAPPED_TYPE_LINES: usize = 3;

/// One parsed `(name, type, description)` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: String,
    pub desc: Vec<String>,
}

/// Reusable docstring rewriter: section registry, alias table and options.
#[derive(Debug, Clone)]
pub struct Parser {
    registry: SectionRegistry,
    aliases: HashMap<String, String>,
    roles: RoleStyle,
    max_wrapped_type_lines: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            registry: SectionRegistry::google(),
            aliases: HashMap::new(),
            roles: RoleStyle::Domain,
            max_wrapped_type_lines: DEFAULT_MAX_WRAPPED_TYPE_LINES,
        }
    }
}

impl Parser {
    /// Build a parser from configuration, registering the built-in custom
    /// sections (when enabled) and any configured extra sections.
    pub fn new(config: &DocstringConfig) -> Result<Self> {
        let mut registry = if config.custom_sections {
            SectionRegistry::extended()?
        } else {
            SectionRegistry::google()
        };
        for spec in &config.sections {
            spec.register(&mut registry)?;
        }

        Ok(Self {
            registry,
            aliases: config.type_aliases.clone(),
            roles: if config.legacy_roles {
                RoleStyle::Legacy
            } else {
                RoleStyle::Domain
            },
            max_wrapped_type_lines: config.max_wrapped_type_lines,
        })
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SectionRegistry {
        &mut self.registry
    }

    pub fn type_rewriter(&self) -> TypeRewriter<'_> {
        TypeRewriter::new(&self.aliases, self.roles)
    }

    /// Rewrite a docstring given as one string.
    pub fn parse(&self, text: &str) -> Vec<String> {
        self.parse_lines(text.lines())
    }

    /// Rewrite a docstring given as lines.
    pub fn parse_lines<I, S>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Scanner::new(self, LineCursor::new(lines)).run()
    }

    /// Rewrite a docstring and join the result with newlines.
    pub fn render(&self, text: &str) -> String {
        self.parse(text).join("\n")
    }
}

/// Per-docstring scanning state.
pub(crate) struct Scanner<'p> {
    parser: &'p Parser,
    cursor: LineCursor,
    in_section: bool,
    section_indent: usize,
}

impl<'p> Scanner<'p> {
    fn new(parser: &'p Parser, cursor: LineCursor) -> Self {
        Self {
            parser,
            cursor,
            in_section: false,
            section_indent: 0,
        }
    }

    fn run(mut self) -> Vec<String> {
        let mut parsed = self.consume_empty();

        while !self.cursor.is_empty() {
            let lines = if let Some(strategy) = self.section_header() {
                let header = self.cursor.next_line().unwrap_or_default();
                let title = header.trim().trim_end_matches(':').trim().to_string();
                self.in_section = true;
                self.section_indent = self.current_indent(0);
                let lines = self.render_section(strategy, &title);
                self.in_section = false;
                self.section_indent = 0;
                lines
            } else if parsed.is_empty() {
                let mut lines = self.consume_contiguous();
                lines.extend(self.consume_empty());
                lines
            } else {
                self.consume_to_next_section()
            };
            parsed.extend(lines);
        }

        parsed
    }

    /// Strategy for the current line when it opens a section.
    ///
    /// The header must be followed by a block indented deeper than itself.
    /// Indented headers are never keywords, so `Note:` nested in a
    /// description stays part of it.
    fn section_header(&self) -> Option<&'p SectionStrategy> {
        let parser = self.parser;
        let line = self.cursor.get(0)?;
        let lowered = line.to_lowercase();
        if !RE_SECTION_HEADER.is_match(&lowered) {
            return None;
        }
        let strategy = parser.registry.get(lowered.trim_matches(':'))?;
        (self.current_indent(1) > indent_of(line)).then_some(strategy)
    }

    fn is_section_break(&self) -> bool {
        match self.cursor.get(0) {
            None => true,
            Some(line) => {
                self.section_header().is_some()
                    || (self.in_section
                        && !line.is_empty()
                        && !is_indented(line, self.section_indent))
            }
        }
    }

    /// Indent of the first non-blank line at or after `offset`.
    fn current_indent(&self, offset: usize) -> usize {
        (offset..)
            .map_while(|i| self.cursor.get(i))
            .find(|l| !l.is_empty())
            .map(indent_of)
            .unwrap_or(0)
    }

    fn consume_empty(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while self.cursor.get(0) == Some("") {
            lines.extend(self.cursor.next_line());
        }
        lines
    }

    fn consume_contiguous(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while self.cursor.get(0).is_some_and(|l| !l.is_empty()) && self.section_header().is_none() {
            lines.extend(self.cursor.next_line());
        }
        lines
    }

    fn consume_to_next_section(&mut self) -> Vec<String> {
        self.consume_empty();
        let mut lines = Vec::new();
        while !self.is_section_break() {
            lines.extend(self.cursor.next_line());
        }
        lines.extend(self.consume_empty());
        lines
    }

    fn consume_indented_block(&mut self, indent: usize) -> Vec<String> {
        let mut lines = Vec::new();
        while !self.is_section_break() {
            match self.cursor.get(0) {
                Some(line) if line.is_empty() || is_indented(line, indent) => {
                    lines.extend(self.cursor.next_line());
                }
                _ => break,
            }
        }
        lines
    }

    fn render_section(&mut self, strategy: &SectionStrategy, title: &str) -> Vec<String> {
        match strategy {
            SectionStrategy::Fields { label } => {
                let fields = self.consume_fields(true, false, false);
                format_fields(label, &fields)
            }
            SectionStrategy::ReturnsLike {
                label,
                require_type,
            } => self.render_returns_like(label, *require_type),
            SectionStrategy::Admonition { directive } => self.render_admonition(directive),
            SectionStrategy::Params => {
                let fields = self.consume_fields(true, false, true);
                format_docutils_params(&fields, "param", "type")
            }
            SectionStrategy::KeywordParams => {
                let fields = self.consume_fields(true, false, true);
                format_docutils_params(&fields, "keyword", "kwtype")
            }
            SectionStrategy::Returns => self.render_returns(),
            SectionStrategy::Raises => self.render_raises(),
            SectionStrategy::Attributes => self.render_attributes(),
            SectionStrategy::Notice { directive } => {
                let lines = self.consume_to_next_section();
                format_notice(directive, &lines)
            }
            SectionStrategy::Rubric => self.render_rubric(title),
        }
    }

    fn render_returns_like(&mut self, label: &str, require_type: bool) -> Vec<String> {
        if require_type {
            let bare = self
                .cursor
                .get(0)
                .filter(|l| !l.is_empty() && !l.ends_with(':'))
                .map(|l| format!("{l}:"));
            if let Some(line) = bare {
                self.cursor.consume(1);
                self.cursor.push_front(line);
            }
        }
        let fields = self.consume_returns_section();
        format_fields(label, &fields)
    }

    /// `.. directive:: version` plus the body. An empty block, reachable
    /// only when called without a header check, gives the bare directive.
    fn render_admonition(&mut self, directive: &str) -> Vec<String> {
        let lines = strip_empty(&dedent(&self.consume_to_next_section()));
        let Some((first, body)) = lines.split_first() else {
            return vec![format!(".. {directive}::"), String::new()];
        };

        let param = first.trim();
        let param = param.strip_suffix(':').unwrap_or(param);
        let mut out = vec![format!(".. {directive}:: {param}"), String::new()];
        out.extend(indent(&dedent(body), 3));
        out.push(String::new());
        out
    }

    fn render_returns(&mut self) -> Vec<String> {
        let fields = self.consume_returns_section();
        let multi = fields.len() > 1;

        let mut lines: Vec<String> = Vec::new();
        for field in &fields {
            if multi {
                let body = format_field(&field.name, &field.ty, &field.desc);
                let prefix = if lines.is_empty() {
                    ":returns: * "
                } else {
                    "          * "
                };
                lines.extend(format::format_block(prefix, &body));
            } else {
                let body = format_field(&field.name, "", &field.desc);
                if body.iter().any(|l| !l.is_empty()) {
                    lines.extend(format::format_block(":returns: ", &body));
                }
                if !field.ty.is_empty() {
                    lines.push(format!(":rtype: {}", field.ty));
                    lines.push(String::new());
                }
            }
        }
        if lines.last().is_some_and(|l| !l.is_empty()) {
            lines.push(String::new());
        }
        lines
    }

    fn render_raises(&mut self) -> Vec<String> {
        let fields = self.consume_fields(false, true, false);
        let mut lines = Vec::new();
        for field in &fields {
            let ty = match RE_XREF.captures(&field.ty) {
                Some(caps) => caps[2].to_string(),
                None => field.ty.clone(),
            };
            let marker = if ty.is_empty() {
                ":raises:".to_string()
            } else {
                format!(":raises {ty}:")
            };
            let desc = strip_empty(&field.desc);
            if desc.is_empty() {
                lines.push(marker);
            } else {
                lines.extend(format::format_block_with_padding(
                    &format!("{marker} "),
                    &desc,
                    "    ",
                ));
            }
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    fn render_attributes(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for field in self.consume_fields(true, false, false) {
            lines.push(format!(".. attribute:: {}", field.name));
            lines.push(String::new());
            lines.extend(indent(&format_field("", "", &field.desc), 3));
            if !field.ty.is_empty() {
                lines.push(String::new());
                lines.push(format!("   :type: {}", field.ty));
            }
            lines.push(String::new());
        }
        lines
    }

    fn render_rubric(&mut self, title: &str) -> Vec<String> {
        let lines = dedent(&strip_empty(&self.consume_to_next_section()));
        let mut out = vec![format!(".. rubric:: {title}"), String::new()];
        if !lines.is_empty() {
            out.extend(lines);
            out.push(String::new());
        }
        out
    }
}
