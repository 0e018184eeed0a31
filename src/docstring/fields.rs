//! Field entries: `name (type): description` lines and their indented
//! description blocks, including headers whose type wraps across lines.

use super::format::{dedent, escape_args_and_kwargs, indent_of};
use super::{Field, Scanner};
use regex::Regex;
use std::sync::LazyLock;

static RE_TYPED_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\(\s*(.*\S)\s*\)").unwrap());

// `name (partial.type` with nothing closing it on the same line.
static RE_WRAPPED_FIELD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\*{0,2}[\w.]+)\s*\(\s*([^:)]*)$").unwrap());

static RE_WRAPPED_FIELD_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\):\s*$").unwrap());

// Role references and inline literals; colons inside these never split a field.
static RE_XREF_OR_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(:(?:[a-zA-Z0-9]+[\-_+:.])*[a-zA-Z0-9]+:`.+?`)",
        r"|(``.+?``)",
        r"|(:meta .+:.*)",
        r"|(`.+?`)"
    ))
    .unwrap()
});

impl Scanner<'_> {
    /// Consume fields until the section ends.
    ///
    /// With `multiple`, `a, b (int)` yields one field per name.
    pub(super) fn consume_fields(
        &mut self,
        parse_type: bool,
        prefer_type: bool,
        multiple: bool,
    ) -> Vec<Field> {
        self.consume_empty();
        let mut fields = Vec::new();
        while !self.is_section_break() {
            let field = self.consume_field(parse_type, prefer_type);
            if multiple && !field.name.is_empty() {
                for name in field.name.split(',').map(str::trim) {
                    fields.push(Field {
                        name: escape_args_and_kwargs(name),
                        ty: field.ty.clone(),
                        desc: field.desc.clone(),
                    });
                }
            } else if !field.name.is_empty() || !field.ty.is_empty() || !field.desc.is_empty() {
                fields.push(Field {
                    name: escape_args_and_kwargs(&field.name),
                    ..field
                });
            }
        }
        fields
    }

    fn consume_field(&mut self, parse_type: bool, prefer_type: bool) -> Field {
        if parse_type {
            self.join_wrapped_field();
        }

        let line = self.cursor.next_line().unwrap_or_default();
        let (before, _colon, after) = partition_field_on_colon(&line);

        let mut name = before.clone();
        let mut ty = String::new();
        if parse_type {
            if let Some(caps) = RE_TYPED_ARG.captures(&before) {
                name = caps[1].trim().to_string();
                ty = caps[2].to_string();
            }
        }
        if prefer_type && ty.is_empty() {
            std::mem::swap(&mut name, &mut ty);
        }

        let block = self.consume_indented_block(indent_of(&line) + 1);
        let mut desc = vec![after];
        desc.extend(dedent(&block));
        let desc = self.parser.parse_lines(desc);

        if parse_type {
            ty = self.parser.type_rewriter().rewrite(&ty);
        }
        Field { name, ty, desc }
    }

    /// The single `(type, description)` pair of a returns-like section.
    ///
    /// A first line with a colon supplies the type; otherwise the whole
    /// block is description.
    pub(super) fn consume_returns_section(&mut self) -> Vec<Field> {
        let lines = dedent(&self.consume_to_next_section());
        let Some(first) = lines.first() else {
            return Vec::new();
        };

        let (before, colon, after) = partition_field_on_colon(first);
        let (ty, desc) = if colon.is_empty() {
            (String::new(), lines.clone())
        } else {
            let mut desc = Vec::with_capacity(lines.len());
            if !after.is_empty() {
                desc.push(after);
            }
            desc.extend_from_slice(&lines[1..]);
            (before, desc)
        };

        vec![Field {
            name: String::new(),
            ty: self.parser.type_rewriter().rewrite(&ty),
            desc: self.parser.parse_lines(dedent(&desc)),
        }]
    }

    /// Splice a field header whose type wraps onto following lines back
    /// into one line.
    ///
    /// ```text
    /// arg2 (foo.bar.abc          arg2 (foo.bar.abc.def.ghi, optional):
    ///       .def.ghi,       =>
    ///       optional):
    /// ```
    ///
    /// Gives up, leaving the cursor untouched, when no closing `):` shows up
    /// within the configured number of continuation lines, or when a blank
    /// line or another wrapped header comes first.
    pub(super) fn join_wrapped_field(&mut self) {
        let Some(first) = self.cursor.get(0) else {
            return;
        };
        if !RE_WRAPPED_FIELD_START.is_match(first) {
            return;
        }

        let mut span = None;
        for i in 1..=self.parser.max_wrapped_type_lines {
            let Some(line) = self.cursor.get(i) else {
                break;
            };
            if line.trim().is_empty() || RE_WRAPPED_FIELD_START.is_match(line) {
                break;
            }
            if RE_WRAPPED_FIELD_END.is_match(line) {
                span = Some(i + 1);
                break;
            }
        }

        let Some(count) = span else {
            tracing::debug!(line = %first, "wrapped field type not closed; parsing header as-is");
            return;
        };

        let lines = self.cursor.peek(count);
        let joined = join_fragments(lines);
        if joined.is_empty() {
            return;
        }
        let leading: String = lines[0].chars().take_while(|c| c.is_whitespace()).collect();
        self.cursor.consume(count);
        self.cursor.push_front(format!("{leading}{joined}"));
    }
}

/// Join wrapped fragments, with no space on either side of a `.` break,
/// then normalize comma spacing.
fn join_fragments(lines: &[String]) -> String {
    let mut out = String::new();
    for fragment in lines.iter().map(|l| l.trim()).filter(|f| !f.is_empty()) {
        if !out.is_empty() && !out.ends_with('.') && !fragment.starts_with('.') {
            out.push(' ');
        }
        out.push_str(fragment);
    }
    if out.contains(',') {
        out = out.split(',').map(str::trim).collect::<Vec<_>>().join(", ");
    }
    out
}

/// Split on the first single `:` outside role references and literals.
///
/// Returns `(before, colon, after)` with both sides trimmed; `colon` is
/// empty when there is no split point.
pub(super) fn partition_field_on_colon(line: &str) -> (String, String, String) {
    let mut gap_start = 0;
    let spans = RE_XREF_OR_CODE
        .find_iter(line)
        .map(|m| (m.start(), m.end()))
        .chain(std::iter::once((line.len(), line.len())));

    for (start, end) in spans {
        if let Some(pos) = find_single_colon(&line[gap_start..start]) {
            let at = gap_start + pos;
            return (
                line[..at].trim().to_string(),
                ":".to_string(),
                line[at + 1..].trim().to_string(),
            );
        }
        gap_start = end;
    }

    (line.trim().to_string(), String::new(), String::new())
}

fn find_single_colon(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i] == b':'
            && (i == 0 || bytes[i - 1] != b':')
            && bytes.get(i + 1) != Some(&b':')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::LineCursor;
    use crate::docstring::Parser;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn partition_plain() {
        assert_eq!(
            partition_field_on_colon("  name (str): text "),
            ("name (str)".into(), ":".into(), "text".into())
        );
    }

    #[test]
    fn partition_skips_roles_and_double_colons() {
        assert_eq!(
            partition_field_on_colon(":py:class:`a.B`: desc"),
            (":py:class:`a.B`".into(), ":".into(), "desc".into())
        );
        assert_eq!(
            partition_field_on_colon("Example::"),
            ("Example::".into(), String::new(), String::new())
        );
    }

    #[test]
    fn fragments_join_across_dots_and_commas() {
        assert_eq!(
            join_fragments(&lines(&["arg2 (foo.bar.abc", "  .def.ghi,", "  optional):"])),
            "arg2 (foo.bar.abc.def.ghi, optional):"
        );
        assert_eq!(join_fragments(&lines(&["x (foo.", "bar):"])), "x (foo.bar):");
        assert_eq!(join_fragments(&lines(&["x (list of", "int):"])), "x (list of int):");
    }

    #[test]
    fn wrapped_header_two_lines() {
        let parser = Parser::default();
        let mut scanner = Scanner::new(
            &parser,
            LineCursor::new(["   arg2 (foo.bar.abc", "         .def.ghi, optional):", "       Desc."]),
        );
        let field = scanner.consume_field(true, false);
        assert_eq!(field.name, "arg2");
        assert_eq!(field.ty, ":py:class:`foo.bar.abc.def.ghi`, *optional*");
        assert_eq!(strip(&field.desc), lines(&["Desc."]));
    }

    #[test]
    fn unterminated_header_is_left_alone() {
        let parser = Parser::default();
        let input = ["arg (a.b", "  .c", "  .d", "  .e", "  .f):", "  Desc."];
        let mut scanner = Scanner::new(&parser, LineCursor::new(input));
        scanner.join_wrapped_field();
        assert_eq!(scanner.cursor.remaining(), input.len());
        assert_eq!(scanner.cursor.get(0), Some("arg (a.b"));

        let field = scanner.consume_field(true, false);
        assert_eq!(field.name, "arg (a.b");
        assert_eq!(field.ty, "");
    }

    #[test]
    fn closing_line_at_the_bound_is_joined() {
        let parser = Parser::default();
        let input = ["arg (a.b", "  .c", "  .d", "  .e):", "  Desc."];
        let mut scanner = Scanner::new(&parser, LineCursor::new(input));
        let field = scanner.consume_field(true, false);
        assert_eq!(field.name, "arg");
        assert_eq!(field.ty, ":py:class:`a.b.c.d.e`");
        assert_eq!(strip(&field.desc), lines(&["Desc."]));
    }

    #[test]
    fn configured_bound_limits_lookahead() {
        let config = crate::config::DocstringConfig {
            max_wrapped_type_lines: 2,
            ..Default::default()
        };
        let parser = Parser::new(&config).unwrap();
        let input = ["arg (a.b", "  .c", "  .d", "  .e):"];
        let mut scanner = Scanner::new(&parser, LineCursor::new(input));
        scanner.join_wrapped_field();
        assert_eq!(scanner.cursor.get(0), Some("arg (a.b"));
    }

    #[test]
    fn blank_line_stops_lookahead() {
        let parser = Parser::default();
        let input = ["a (foo", "", "b (int):"];
        let mut scanner = Scanner::new(&parser, LineCursor::new(input));
        scanner.join_wrapped_field();
        assert_eq!(scanner.cursor.peek(3), lines(&input).as_slice());
    }

    fn strip(desc: &[String]) -> Vec<String> {
        desc.iter().filter(|l| !l.is_empty()).cloned().collect()
    }
}
