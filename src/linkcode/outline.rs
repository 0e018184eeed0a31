//! Indentation outline of a Python module.
//!
//! Not a Python parser: it finds where logical statements start (skipping
//! string literals, bracketed continuations and backslash continuations),
//! classifies each start line, and nests statements by indentation. That
//! is enough to answer "which line defines `ClassB.do_thing`".

use regex::Regex;
use std::sync::LazyLock;

static RE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+([A-Za-z_]\w*)").unwrap());

static RE_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_]\w*)").unwrap());

static RE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_]\w*$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Class(String),
    Function(String),
    /// Plain `name = ...` assignment; one entry per simple name target.
    Assign(Vec<String>),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub kind: NodeKind,
    /// 1-based line of the statement's first line.
    pub line: usize,
    pub indent: usize,
    pub children: Vec<OutlineNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub nodes: Vec<OutlineNode>,
}

impl Outline {
    pub fn parse(source: &str) -> Self {
        let mut roots = Vec::new();
        let mut open: Vec<OutlineNode> = Vec::new();

        for (line, indent, text) in statement_starts(source) {
            while open.last().is_some_and(|top| top.indent >= indent) {
                if let Some(done) = open.pop() {
                    attach(&mut open, &mut roots, done);
                }
            }
            open.push(OutlineNode {
                kind: classify(text),
                line,
                indent,
                children: Vec::new(),
            });
        }
        while let Some(done) = open.pop() {
            attach(&mut open, &mut roots, done);
        }

        Self { nodes: roots }
    }

    /// Node defining a dotted path such as `["ClassB", "do_thing"]`.
    ///
    /// An assignment to the first segment matches outright, since names
    /// below it (namedtuple fields and the like) have no source of their
    /// own. Only classes and functions are searched into.
    pub fn find(&self, path: &[&str]) -> Option<&OutlineNode> {
        find_in(&self.nodes, path)
    }
}

fn find_in<'a>(nodes: &'a [OutlineNode], path: &[&str]) -> Option<&'a OutlineNode> {
    let (name, rest) = path.split_first()?;
    for node in nodes {
        match &node.kind {
            NodeKind::Assign(targets) if targets.iter().any(|t| t == name) => return Some(node),
            NodeKind::Class(n) | NodeKind::Function(n) if n == name => {
                return if rest.is_empty() {
                    Some(node)
                } else {
                    find_in(&node.children, rest)
                };
            }
            _ => {}
        }
    }
    None
}

fn attach(open: &mut [OutlineNode], roots: &mut Vec<OutlineNode>, node: OutlineNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn classify(text: &str) -> NodeKind {
    if let Some(caps) = RE_CLASS.captures(text) {
        return NodeKind::Class(caps[1].to_string());
    }
    if let Some(caps) = RE_DEF.captures(text) {
        return NodeKind::Function(caps[1].to_string());
    }
    let targets = assignment_targets(text);
    if targets.is_empty() {
        NodeKind::Other
    } else {
        NodeKind::Assign(targets)
    }
}

/// Simple-name targets of `a = b = value`. Annotated, augmented and tuple
/// assignments yield nothing.
///
/// Collection stops at the first segment that is not a bare name, so an
/// `=` inside the value (`lambda x=1: x`) does not void the targets.
fn assignment_targets(text: &str) -> Vec<String> {
    let mut targets = Vec::new();
    let mut start = 0;
    for pos in top_level_assign_positions(text) {
        let target = text[start..pos].trim();
        if !RE_IDENTIFIER.is_match(target) {
            // `x: int = 1`, `a, b = ...`, `obj.attr = ...` when first.
            break;
        }
        targets.push(target.to_string());
        start = pos + 1;
    }
    targets
}

/// Text after the last bare `=` of an assignment's first line.
pub(crate) fn assigned_value(text: &str) -> Option<&str> {
    let targets = assignment_targets(text);
    if targets.is_empty() {
        return None;
    }
    let pos = top_level_assign_positions(text)[targets.len() - 1];
    Some(&text[pos + 1..])
}

/// Byte offsets of bare `=` outside brackets and strings.
fn top_level_assign_positions(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut positions = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'#' => break,
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 => {
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                let next = bytes.get(i + 1).copied().unwrap_or(b' ');
                if next != b'=' && !b"=!<>:+-*/%&|^@".contains(&prev) {
                    positions.push(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    positions
}

#[derive(Debug, Clone, Copy)]
struct OpenString {
    quote: u8,
    triple: bool,
}

/// `(line number, indent, text)` for each line that begins a statement.
fn statement_starts(source: &str) -> Vec<(usize, usize, &str)> {
    let mut starts = Vec::new();
    let mut depth = 0usize;
    let mut string: Option<OpenString> = None;
    let mut continued = false;

    for (idx, line) in source.lines().enumerate() {
        let text = line.trim_start();
        let at_start = depth == 0 && string.is_none() && !continued;
        if at_start && !text.is_empty() && !text.starts_with('#') {
            starts.push((idx + 1, line.len() - text.len(), text));
        }

        continued = false;
        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if let Some(open) = string {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == open.quote {
                    if !open.triple {
                        string = None;
                    } else if bytes[i..].starts_with(&[b, b, b]) {
                        string = None;
                        i += 3;
                        continue;
                    }
                }
                i += 1;
                continue;
            }
            match b {
                b'#' => break,
                b'"' | b'\'' => {
                    let triple = bytes[i..].starts_with(&[b, b, b]);
                    string = Some(OpenString { quote: b, triple });
                    if triple {
                        i += 3;
                        continue;
                    }
                }
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth = depth.saturating_sub(1),
                b'\\' if i + 1 == bytes.len() => continued = true,
                _ => {}
            }
            i += 1;
        }

        // Single-quoted strings end at the line unless escaped onward.
        if let Some(open) = string {
            if !open.triple && !line.ends_with('\\') {
                string = None;
            }
        }
    }

    starts
}
