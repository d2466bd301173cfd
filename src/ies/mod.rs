//! IESNA LM-63 codec.
//!
//! Supports reading and writing the 1991, 1995 and 2002 revisions. A document
//! has four sections:
//!
//! ```text
//! IESNA:LM-63-2002                 format identifier
//! [TEST] 12345                     keyword lines
//! [MORE] continued value           (or leading whitespace before 2002)
//! TILT=NONE                        NONE | INCLUDE | <file>
//! 1 1000 1 19 1 1 2 0.5 0.5 0.1    lamps, lumens, multiplier, counts, type, units, size
//! 1 1 40                           ballast factor, future use, input watts
//! 0 5 10 ...                       vertical angles
//! 0                                horizontal angles
//! 1200 1180 ...                    candela, one run per horizontal angle
//! ```
//!
//! Numeric runs may be spread over any number of physical lines.
//! `TILT=<file>` is recognized but always rejected.

mod keywords;
mod model;
mod parser;
mod upgrade;
mod validate;
mod writer;

pub use keywords::{KeywordRules, MAX_KEYWORD_LENGTH};
pub use model::{IesDocument, IesFormat, Keywords, Tilt, TiltData};
pub use parser::IesParser;
pub use validate::validate_document;
pub use writer::{keyword_lines, write_document};

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{LuxError, Result};
use crate::reader::ParseOptions;

/// Parse an IES document from a string.
pub fn parse(input: &str, options: &ParseOptions) -> Result<IesDocument> {
    parse_reader(input.as_bytes(), options)
}

/// Parse an IES document from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<IesDocument> {
    IesParser::new(reader, options).parse()
}

/// Parse an IES file.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<IesDocument> {
    let file = File::open(path).map_err(|e| LuxError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_reader(BufReader::new(file), options)
}

/// Write an IES document to any writer.
///
/// Text fields are written as UTF-8. Input that was decoded from Latin-1 is
/// therefore re-encoded, and non-ASCII characters take more than one byte.
pub fn write<W: Write>(doc: &IesDocument, sink: W) -> Result<usize> {
    write_document(doc, sink)
}

/// Serialize an IES document to a string.
pub fn to_string(doc: &IesDocument) -> Result<String> {
    let mut out = Vec::new();
    write_document(doc, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Write an IES document to a file as UTF-8.
///
/// The document is validated before the file is created.
pub fn export_file(doc: &IesDocument, path: &Path) -> Result<usize> {
    validate_document(doc, false)?;
    let file = File::create(path).map_err(|e| LuxError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    write_document(doc, BufWriter::new(file))
}
