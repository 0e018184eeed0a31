//! reST formatting helpers shared by the section strategies.

use super::Field;
use regex::Regex;
use std::sync::LazyLock;

static RE_BULLET_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*|\+|-)(\s+\S|\s*$)").unwrap());

static RE_ENUMERATED_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(\((\d+|#|[ivxlcdm]+|[IVXLCDM]+|[a-zA-Z])\)",
        r"|(\d+|#|[ivxlcdm]+|[IVXLCDM]+|[a-zA-Z])\.)",
        r"(\s+\S|\s*$)"
    ))
    .unwrap()
});

/// Count of leading whitespace characters.
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// True when `line` has at least `indent` leading whitespace characters
/// followed by content.
pub fn is_indented(line: &str, indent: usize) -> bool {
    for (i, c) in line.chars().enumerate() {
        if i >= indent {
            return true;
        }
        if !c.is_whitespace() {
            return false;
        }
    }
    false
}

fn min_indent(lines: &[String]) -> usize {
    lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(|l| indent_of(l))
        .min()
        .unwrap_or(0)
}

fn strip_indent(line: &str, n: usize) -> String {
    let mut rest = line;
    for _ in 0..n {
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c.is_whitespace() => rest = chars.as_str(),
            _ => break,
        }
    }
    rest.to_string()
}

/// Remove the common leading indentation of the non-blank lines.
pub fn dedent(lines: &[String]) -> Vec<String> {
    let n = min_indent(lines);
    lines.iter().map(|l| strip_indent(l, n)).collect()
}

/// Prefix every line, blank ones included, with `n` spaces.
pub fn indent(lines: &[String], n: usize) -> Vec<String> {
    let pad = " ".repeat(n);
    lines.iter().map(|l| format!("{pad}{l}")).collect()
}

/// Drop leading and trailing blank lines.
pub fn strip_empty(lines: &[String]) -> Vec<String> {
    let Some(start) = lines.iter().position(|l| !l.is_empty()) else {
        return Vec::new();
    };
    let end = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(start);
    lines[start..=end].to_vec()
}

/// Escape leading `*`/`**` so reST does not read them as emphasis.
pub fn escape_args_and_kwargs(name: &str) -> String {
    if let Some(rest) = name.strip_prefix("**") {
        format!(r"\*\*{rest}")
    } else if let Some(rest) = name.strip_prefix('*') {
        format!(r"\*{rest}")
    } else {
        name.to_string()
    }
}

/// Whether a description starts with a list or an indented block.
fn is_list(lines: &[String]) -> bool {
    let Some(first) = lines.first() else {
        return false;
    };
    if RE_BULLET_LIST.is_match(first) || RE_ENUMERATED_LIST.is_match(first) {
        return true;
    }
    if lines.len() < 2 || first.ends_with("::") {
        return false;
    }
    let base = indent_of(first);
    let next = lines[1..]
        .iter()
        .find(|l| !l.is_empty())
        .map(|l| indent_of(l))
        .unwrap_or(base);
    next > base
}

/// Move list or literal-block descriptions onto their own lines so the
/// field marker does not swallow the markup.
fn fix_field_desc(desc: Vec<String>) -> Vec<String> {
    if is_list(&desc) {
        let mut out = vec![String::new()];
        out.extend(desc);
        return out;
    }
    match desc.split_first() {
        Some((first, block)) if first.ends_with("::") => {
            let base = indent_of(first);
            let block_indent = block
                .iter()
                .find(|l| !l.is_empty())
                .map(|l| indent_of(l))
                .unwrap_or(0);
            if block_indent > base {
                let mut out = vec![String::new()];
                out.extend(desc);
                out
            } else {
                let mut out = vec![String::new(), first.clone()];
                out.extend(indent(block, 4));
                out
            }
        }
        _ => desc,
    }
}

/// Prefix the first line, pad the rest to line up with it.
pub fn format_block(prefix: &str, lines: &[String]) -> Vec<String> {
    format_block_with_padding(prefix, lines, &" ".repeat(prefix.chars().count()))
}

/// Like [`format_block`] with an explicit continuation padding.
pub fn format_block_with_padding(prefix: &str, lines: &[String], padding: &str) -> Vec<String> {
    if lines.is_empty() {
        return vec![prefix.to_string()];
    }
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{prefix}{line}").trim_end().to_string()
            } else if line.is_empty() {
                String::new()
            } else {
                format!("{padding}{line}")
            }
        })
        .collect()
}

/// `**name** (type) -- description`, with the pieces that are present.
pub fn format_field(name: &str, ty: &str, desc: &[String]) -> Vec<String> {
    let desc = strip_empty(desc);
    let has_desc = !desc.is_empty();
    let separator = if has_desc { " -- " } else { "" };

    let field = match (name.is_empty(), ty.is_empty()) {
        (false, false) if ty.contains('`') => format!("**{name}** ({ty}){separator}"),
        (false, false) => format!("**{name}** (*{ty}*){separator}"),
        (false, true) => format!("**{name}**{separator}"),
        (true, false) if ty.contains('`') => format!("{ty}{separator}"),
        (true, false) => format!("*{ty}*{separator}"),
        (true, true) => String::new(),
    };

    if !has_desc {
        return vec![field];
    }

    let mut desc = fix_field_desc(desc);
    if desc[0].is_empty() {
        let mut out = vec![field];
        out.extend(desc);
        out
    } else {
        desc[0] = format!("{field}{}", desc[0]);
        desc
    }
}

/// A labeled field list: `:Label: entry`, or bullets when there are several.
pub fn format_fields(label: &str, fields: &[Field]) -> Vec<String> {
    let marker = format!(":{}:", label.trim());
    let padding = " ".repeat(marker.chars().count());
    let multi = fields.len() > 1;

    let mut lines: Vec<String> = Vec::new();
    for field in fields {
        let body = format_field(&field.name, &field.ty, &field.desc);
        let prefix = match (multi, lines.is_empty()) {
            (true, true) => format!("{marker} * "),
            (true, false) => format!("{padding} * "),
            (false, _) => format!("{marker} "),
        };
        lines.extend(format_block(&prefix, &body));
    }
    if lines.last().is_some_and(|l| !l.is_empty()) {
        lines.push(String::new());
    }
    lines
}

/// `:param name: desc` / `:type name: type` pairs.
pub fn format_docutils_params(fields: &[Field], field_role: &str, type_role: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for field in fields {
        let desc = strip_empty(&field.desc);
        if desc.is_empty() {
            lines.push(format!(":{field_role} {}:", field.name));
        } else {
            let prefix = format!(":{field_role} {}: ", field.name);
            lines.extend(format_block(&prefix, &fix_field_desc(desc)));
        }
        if !field.ty.is_empty() {
            lines.push(format!(":{type_role} {}: {}", field.name, field.ty));
        }
    }
    lines.push(String::new());
    lines
}

/// A note/warning style directive, inline when it fits on one line.
pub fn format_notice(directive: &str, lines: &[String]) -> Vec<String> {
    let lines = strip_empty(lines);
    match lines.as_slice() {
        [] => vec![format!(".. {directive}::"), String::new()],
        [only] => vec![format!(".. {directive}:: {}", only.trim()), String::new()],
        _ => {
            let mut out = vec![format!(".. {directive}::"), String::new()];
            out.extend(indent(&dedent(&lines), 3));
            out.push(String::new());
            out
        }
    }
}
