//! Line sink shared by both codecs.

use std::io::Write;

use crate::error::Result;

/// Line terminator required by both formats.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Writes CRLF-terminated lines and counts the bytes emitted.
pub struct LineWriter<W: Write> {
    inner: W,
    bytes_written: usize,
}

impl<W: Write> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
        }
    }

    /// Write one line followed by the terminator.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(LINE_TERMINATOR.as_bytes())?;
        self.bytes_written += line.len() + LINE_TERMINATOR.len();
        Ok(())
    }

    pub fn write_lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.write_line(line.as_ref())?;
        }
        Ok(())
    }

    /// Flush the underlying sink and return the byte count.
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(self.bytes_written)
    }
}

/// Shortest decimal text that parses back to exactly `value`.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Greedily pack space-separated tokens onto lines of at most `budget` bytes.
///
/// A token is never split; a token longer than the budget gets a line of its
/// own. An empty input produces no lines.
pub fn pack_tokens<I, S>(budget: usize, tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in tokens {
        let token = token.as_ref();
        if !current.is_empty() && current.len() + 1 + token.len() > budget {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(token);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Pack floating point values, see [`pack_tokens`].
pub fn pack_numbers(budget: usize, values: &[f64]) -> Vec<String> {
    pack_tokens(budget, values.iter().map(|&v| format_number(v)))
}
