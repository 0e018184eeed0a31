//! Member filtering for generated API docs.
//!
//! A module can hide top-level names by listing them in
//! `__autodoc_excludes__` or `__deprecated__`, both in the same shape as
//! `__all__`. The `[docstring.autodoc_excludes]` table hides names
//! globally, keyed by the kind of object being documented (`module`,
//! `class`, `exception` ...) or `*` for any kind.

use crate::config::DocstringConfig;
use crate::error::{Error, Result};
use crate::linkcode::outline::assigned_value;
use crate::linkcode::{NodeKind, Outline};
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Names hidden for every kind when no table is configured.
pub const DEFAULT_EXCLUDES: &[&str] = &["__dict__", "__doc__", "__module__", "__weakref__"];

/// Key applying to every object kind.
pub const ANY_KIND: &str = "*";

const MODULE_EXCLUDES: &str = "__autodoc_excludes__";
const MODULE_DEPRECATED: &str = "__deprecated__";

// `__autodoc_excludes__ = __all__` and the like.
static RE_NAME_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z_]\w*)\s*(?:#.*)?$").unwrap());

/// Bound on `a = b` indirections followed when reading a module list.
const MAX_NAME_HOPS: usize = 4;

/// Global exclusions, object kind to hidden names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeTable {
    by_kind: HashMap<String, BTreeSet<String>>,
}

impl ExcludeTable {
    /// `*` mapped to [`DEFAULT_EXCLUDES`].
    pub fn defaults() -> Self {
        let mut table = Self::default();
        table.insert(ANY_KIND, DEFAULT_EXCLUDES.iter().copied());
        table
    }

    /// The configured table, or the defaults when none is configured.
    /// `autodoc_exclude_defaults` merges the defaults into a configured
    /// table.
    pub fn from_config(config: &DocstringConfig) -> Self {
        let Some(configured) = &config.autodoc_excludes else {
            return Self::defaults();
        };
        let mut table = if config.autodoc_exclude_defaults {
            Self::defaults()
        } else {
            Self::default()
        };
        for (kind, names) in configured {
            table.insert(kind, names.iter().map(String::as_str));
        }
        table
    }

    pub fn insert<'a>(&mut self, kind: &str, names: impl IntoIterator<Item = &'a str>) {
        self.by_kind
            .entry(kind.to_string())
            .or_default()
            .extend(names.into_iter().map(str::to_string));
    }

    /// Whether `name` is hidden for `what` directly or through `*`.
    pub fn excludes(&self, what: &str, name: &str) -> bool {
        [what, ANY_KIND]
            .iter()
            .filter_map(|kind| self.by_kind.get(*kind))
            .any(|names| names.contains(name))
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.values().all(BTreeSet::is_empty)
    }
}

/// The module-level `__autodoc_excludes__` and `__deprecated__` lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMembers {
    pub excludes: Vec<String>,
    pub deprecated: Vec<String>,
}

impl ModuleMembers {
    /// Read both lists from module source. Lists that are absent, or are
    /// not literal lists of strings, come back empty.
    pub fn from_source(source: &str) -> Self {
        let outline = Outline::parse(source);
        let lines: Vec<&str> = source.lines().collect();
        Self {
            excludes: string_list(&outline, &lines, MODULE_EXCLUDES).unwrap_or_default(),
            deprecated: string_list(&outline, &lines, MODULE_DEPRECATED).unwrap_or_default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_source(&source))
    }
}

/// Whether documentation for member `name` of a `what` object is skipped.
///
/// The module's own excludes are checked first, then the global table
/// under `what` and `*`, then the module's deprecated list. When none
/// matches, the caller's `skip` verdict stands.
pub fn should_skip_member(
    module: &ModuleMembers,
    global: &ExcludeTable,
    what: &str,
    name: &str,
    skip: bool,
) -> bool {
    if module.excludes.iter().any(|n| n == name) {
        tracing::debug!(name, "excluded by module");
        return true;
    }
    if global.excludes(what, name) {
        tracing::debug!(name, what, "excluded by configuration");
        return true;
    }
    if module.deprecated.iter().any(|n| n == name) {
        tracing::debug!(name, "deprecated");
        return true;
    }
    skip
}

/// Strings of the last top-level `name = [...]`, following plain
/// `name = other` indirections.
fn string_list(outline: &Outline, lines: &[&str], name: &str) -> Option<Vec<String>> {
    let mut name = name.to_string();
    for _ in 0..MAX_NAME_HOPS {
        let node = outline.nodes.iter().rev().find(|node| {
            matches!(&node.kind, NodeKind::Assign(targets) if targets.iter().any(|t| *t == name))
        })?;
        let first = lines.get(node.line - 1)?.trim_start();
        let value = assigned_value(first)?;
        if let Some(caps) = RE_NAME_VALUE.captures(value) {
            name = caps[1].to_string();
            continue;
        }

        let mut text = value.to_string();
        for line in &lines[node.line..] {
            text.push('\n');
            text.push_str(line);
        }
        return parse_string_sequence(&text);
    }
    tracing::debug!(name = %name, "too many indirections reading module list");
    None
}

/// String literals of a bracketed literal at the start of `text`.
fn parse_string_sequence(text: &str) -> Option<Vec<String>> {
    let mut chars = text.trim_start().chars();
    if !matches!(chars.next(), Some('[' | '(' | '{')) {
        return None;
    }

    let mut items = Vec::new();
    let mut depth = 1usize;
    while let Some(c) = chars.next() {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(items);
                }
            }
            '#' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '"' | '\'' => {
                let mut item = String::new();
                loop {
                    match chars.next()? {
                        '\\' => item.push(chars.next()?),
                        q if q == c => break,
                        other => item.push(other),
                    }
                }
                items.push(item);
            }
            _ => {}
        }
    }
    None
}
