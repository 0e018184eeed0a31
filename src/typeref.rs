//! Type expression to cross-reference markup.
//!
//! `list of int, optional` becomes
//! ``:py:class:`list` of :py:class:`int`, *optional*``. Aliases replace a
//! token's markup outright.

use std::collections::HashMap;

/// Words kept verbatim between type names.
const CONNECTORS: &[&str] = &["of", "or"];

/// Which role names the generated references use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoleStyle {
    /// `:py:class:` / `:py:obj:`
    #[default]
    Domain,
    /// `:class:` / `:obj:`
    Legacy,
}

impl RoleStyle {
    fn class_role(self) -> &'static str {
        match self {
            RoleStyle::Domain => ":py:class:",
            RoleStyle::Legacy => ":class:",
        }
    }

    fn obj_role(self) -> &'static str {
        match self {
            RoleStyle::Domain => ":py:obj:",
            RoleStyle::Legacy => ":obj:",
        }
    }
}

/// Rewrites raw type expressions against a read-only alias table.
#[derive(Debug, Clone, Copy)]
pub struct TypeRewriter<'a> {
    aliases: &'a HashMap<String, String>,
    roles: RoleStyle,
}

impl<'a> TypeRewriter<'a> {
    pub fn new(aliases: &'a HashMap<String, String>, roles: RoleStyle) -> Self {
        Self { aliases, roles }
    }

    /// Rewrite one type expression. Empty input stays empty.
    pub fn rewrite(&self, type_expr: &str) -> String {
        if type_expr.is_empty() {
            return String::new();
        }

        let clauses = split_top_level(type_expr, |c| c == ',');
        let (primary, suffixes) = match clauses.split_first() {
            Some((primary, rest)) => (*primary, rest),
            None => return String::new(),
        };

        let mut out = split_top_level(primary, char::is_whitespace)
            .into_iter()
            .filter(|t| !t.is_empty())
            .map(|token| self.resolve(token))
            .collect::<Vec<_>>()
            .join(" ");

        for suffix in suffixes.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            out.push_str(", *");
            out.push_str(suffix);
            out.push('*');
        }
        out
    }

    fn resolve(&self, token: &str) -> String {
        if CONNECTORS.contains(&token) {
            return token.to_string();
        }
        if let Some(markup) = self.aliases.get(token) {
            return markup.clone();
        }
        if token == "None" {
            format!("{}`None`", self.roles.obj_role())
        } else {
            format!("{}`{}`", self.roles.class_role(), token)
        }
    }
}

/// Split on separator characters that sit outside `[]`, `()` and `{}`.
fn split_top_level(s: &str, is_sep: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && is_sep(c) => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
