//! Forward-only line cursor with single-line pushback.
//!
//! The docstring scanner reads through this instead of a mutable queue:
//! consumption only moves an index, and pushing a line back overwrites the
//! slot that was consumed last.

/// Cursor over the unconsumed lines of one docstring.
#[derive(Debug, Clone, Default)]
pub struct LineCursor {
    lines: Vec<String>,
    pos: usize,
}

impl LineCursor {
    /// Build a cursor, trimming trailing whitespace from every line.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|l| l.as_ref().trim_end().to_string())
                .collect(),
            pos: 0,
        }
    }

    /// Up to `n` lines from the current position. Shorter at end of input.
    pub fn peek(&self, n: usize) -> &[String] {
        let end = self.pos.saturating_add(n).min(self.lines.len());
        &self.lines[self.pos..end]
    }

    /// The line `offset` lines ahead, or `None` past the end.
    pub fn get(&self, offset: usize) -> Option<&str> {
        self.lines.get(self.pos + offset).map(String::as_str)
    }

    /// Consume and return the next line.
    pub fn next_line(&mut self) -> Option<String> {
        let line = self.lines.get_mut(self.pos).map(std::mem::take)?;
        self.pos += 1;
        Some(line)
    }

    /// Discard exactly `n` lines.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `n` lines remain. Callers peek first.
    pub fn consume(&mut self, n: usize) {
        assert!(
            n <= self.remaining(),
            "consume({n}) past end of input ({} remaining)",
            self.remaining()
        );
        self.pos += n;
    }

    /// Make `line` the next line returned.
    pub fn push_front(&mut self, line: String) {
        if self.pos > 0 {
            self.pos -= 1;
            self.lines[self.pos] = line;
        } else {
            self.lines.insert(0, line);
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
