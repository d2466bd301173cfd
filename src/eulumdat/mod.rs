//! EULUMDAT codec.
//!
//! EULUMDAT is strictly positional: one scalar or one array element per line
//! in a fixed order. The length of the trailing intensity run depends on the
//! symmetry indicator, see [`Symmetry::plane_range`].

mod model;
mod parser;
mod photometry;
mod symmetry;
mod validate;
mod writer;

pub use model::{Eulumdat, LampSet, DIRECT_RATIO_COUNT};
pub use parser::{limits, EulumdatParser};
pub use symmetry::{PlaneRange, Symmetry};
pub use validate::validate_document;
pub use writer::write_document;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{LuxError, Result};
use crate::reader::ParseOptions;

/// Parse a EULUMDAT document from a string.
pub fn parse(input: &str, options: &ParseOptions) -> Result<Eulumdat> {
    parse_reader(input.as_bytes(), options)
}

/// Parse a EULUMDAT document from any buffered reader.
pub fn parse_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<Eulumdat> {
    EulumdatParser::new(reader, options).parse()
}

/// Parse a EULUMDAT file.
pub fn parse_file(path: &Path, options: &ParseOptions) -> Result<Eulumdat> {
    let file = File::open(path).map_err(|e| LuxError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_reader(BufReader::new(file), options)
}

/// Write a EULUMDAT document to any writer.
///
/// Text fields are written as UTF-8. Input that was decoded from Latin-1 is
/// therefore re-encoded, and non-ASCII characters take more than one byte.
pub fn write<W: Write>(ldt: &Eulumdat, sink: W) -> Result<usize> {
    write_document(ldt, sink)
}

/// Serialize a EULUMDAT document to a string.
pub fn to_string(ldt: &Eulumdat) -> Result<String> {
    let mut out = Vec::new();
    write_document(ldt, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Write a EULUMDAT document to a file as UTF-8.
///
/// The document is validated before the file is created.
pub fn export_file(ldt: &Eulumdat, path: &Path) -> Result<usize> {
    validate_document(ldt, false)?;
    let file = File::create(path).map_err(|e| LuxError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    write_document(ldt, BufWriter::new(file))
}
