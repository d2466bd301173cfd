//! Line reader and value extraction shared by both codecs.
//!
//! Photometric files are strictly line oriented. [`LineReader`] hands out one
//! physical line at a time, tracks the 1-indexed line number for error
//! reporting and enforces per-field length budgets according to
//! [`ParseOptions`].

use std::io::BufRead;

use tracing::warn;

use crate::error::{LuxError, Result};

/// Configuration for the parsers.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Fail on lines longer than the format allows instead of warning.
    pub strict: bool,
}

impl ParseOptions {
    /// Create a new configuration with default (lenient) values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a strict configuration.
    pub fn strict() -> Self {
        Self::default().with_strict(true)
    }

    /// Set whether length violations are fatal.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Sequential line source over any buffered reader.
pub struct LineReader<R> {
    inner: R,
    line: usize,
    strict: bool,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    /// Create a new line reader.
    pub fn new(inner: R, options: &ParseOptions) -> Self {
        Self {
            inner,
            line: 0,
            strict: options.strict,
            buf: Vec::with_capacity(256),
        }
    }

    /// Number of the last line handed out (1-indexed, 0 before the first read).
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Read the next physical line without its terminator.
    ///
    /// Returns [`LuxError::UnexpectedEof`] when the input is exhausted.
    pub fn next_line(&mut self) -> Result<String> {
        self.buf.clear();
        let read = self.inner.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Err(LuxError::UnexpectedEof { line: self.line });
        }
        self.line += 1;

        while matches!(self.buf.last(), Some(b'\n' | b'\r')) {
            self.buf.pop();
        }

        Ok(decode_line(&self.buf))
    }

    /// Check `text` against a length budget.
    ///
    /// Strict readers fail with [`LuxError::LineTooLong`]; lenient readers
    /// log a warning and accept the line.
    pub fn check_length(&self, text: &str, max: usize) -> Result<()> {
        let length = text.chars().count();
        if length <= max {
            return Ok(());
        }
        if self.strict {
            return Err(LuxError::LineTooLong {
                line: self.line,
                length,
                max,
            });
        }
        warn!(
            line = self.line,
            length, max, "line exceeds maximum allowed length: {}", text
        );
        Ok(())
    }

    /// Read a trimmed text field limited to `max` characters.
    pub fn read_text(&mut self, max: usize) -> Result<String> {
        let line = self.next_line()?;
        let clean = line.trim();
        self.check_length(clean, max)?;
        Ok(clean.to_string())
    }

    /// Read a line holding a single integer.
    pub fn read_int(&mut self) -> Result<i64> {
        let line = self.next_line()?;
        parse_int(&line, self.line)
    }

    /// Read a line holding a non-negative integer (a count or index).
    pub fn read_count(&mut self) -> Result<usize> {
        let line = self.next_line()?;
        parse_count(&line, self.line)
    }

    /// Read a line holding a single floating point value.
    pub fn read_float(&mut self) -> Result<f64> {
        let line = self.next_line()?;
        parse_float(&line, self.line)
    }
}

/// Photometric files predate UTF-8; fall back to Latin-1 when decoding fails.
fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Strip whitespace and digit-group separators (`' '`, `'_'`).
fn clean_number(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|&c| c != ' ' && c != '_')
        .collect()
}

/// Parse an integer, tolerating embedded spaces and underscores.
pub fn parse_int(text: &str, line: usize) -> Result<i64> {
    let clean = clean_number(text);
    if clean.is_empty() {
        return Err(LuxError::NoValue {
            line,
            expected: "integer",
        });
    }
    clean
        .parse::<i64>()
        .map_err(|_| LuxError::malformed(line, text.trim(), "integer"))
}

/// Parse a non-negative integer.
pub fn parse_count(text: &str, line: usize) -> Result<usize> {
    let value = parse_int(text, line)?;
    usize::try_from(value).map_err(|_| LuxError::malformed(line, text.trim(), "non-negative integer"))
}

/// Parse a float, accepting a decimal comma as well as a decimal point.
pub fn parse_float(text: &str, line: usize) -> Result<f64> {
    let clean = clean_number(text).replace(',', ".");
    if clean.is_empty() {
        return Err(LuxError::NoValue {
            line,
            expected: "float",
        });
    }
    clean
        .parse::<f64>()
        .map_err(|_| LuxError::malformed(line, text.trim(), "float"))
}
