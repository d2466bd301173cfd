//! IES serializer.

use std::io::Write;

use tracing::debug;

use super::model::{IesDocument, IesFormat, Tilt};
use super::validate::validate_document;
use crate::error::{LuxError, Result};
use crate::writer::{format_number, pack_numbers, pack_tokens, LineWriter};

/// Write `doc` to `sink`, returning the number of bytes written.
///
/// The document is validated first; nothing is written if validation fails.
pub fn write_document<W: Write>(doc: &IesDocument, sink: W) -> Result<usize> {
    validate_document(doc, false)?;

    let identifier = doc.format.identifier().ok_or_else(|| LuxError::UnsupportedFormat {
        found: doc.format.to_string(),
    })?;
    if let Tilt::File(name) = &doc.tilt {
        return Err(LuxError::UnsupportedTiltFile { name: name.clone() });
    }

    let mut out = LineWriter::new(sink);
    out.write_line(identifier)?;

    for (key, value) in doc.keywords.iter() {
        out.write_lines(keyword_lines(doc.format, key, value))?;
    }

    out.write_line(&format!("TILT={}", doc.tilt.label()))?;

    let budget = doc.format.max_data_line_length();
    if let Tilt::Include(tilt) = &doc.tilt {
        out.write_line(&tilt.lamp_to_luminaire_geometry.to_string())?;
        out.write_line(&tilt.pair_count.to_string())?;
        out.write_lines(pack_numbers(budget, &tilt.angles))?;
        out.write_lines(pack_numbers(budget, &tilt.multiplier_factors))?;
    }

    out.write_lines(pack_tokens(
        budget,
        [
            doc.number_lamps.to_string(),
            format_number(doc.lumens_per_lamp),
            format_number(doc.candela_multiplier),
            doc.number_vertical_angles.to_string(),
            doc.number_horizontal_angles.to_string(),
            doc.photometric_type.to_string(),
            doc.units_type.to_string(),
            format_number(doc.luminaire_width),
            format_number(doc.luminaire_length),
            format_number(doc.luminaire_height),
        ],
    ))?;
    out.write_lines(pack_tokens(
        budget,
        [
            format_number(doc.ballast_factor),
            format_number(doc.future_use),
            format_number(doc.input_watts),
        ],
    ))?;

    out.write_lines(pack_numbers(budget, &doc.vertical_angles))?;
    out.write_lines(pack_numbers(budget, &doc.horizontal_angles))?;
    for row in &doc.candela_values {
        out.write_lines(pack_numbers(budget, row))?;
    }

    let written = out.finish()?;
    debug!(format = %doc.format, bytes = written, "wrote IES document");
    Ok(written)
}

/// Split a keyword value into physical lines.
///
/// Each newline-separated segment is hard-chunked to the keyword line budget
/// in bytes, never splitting a character. The first chunk goes on the `[KEY]`
/// line, the rest become `[MORE]` lines (2002) or leading-space continuation
/// lines (earlier revisions).
///
/// A segment longer than the budget cannot be told apart from a multi-line
/// value once written: parsing the output yields the chunks joined by `\n`.
pub fn keyword_lines(format: IesFormat, key: &str, value: &str) -> Vec<String> {
    let budget = format.max_keyword_line_length();
    let modern = format == IesFormat::Lm63_2002;
    let first_budget = budget.saturating_sub(key.len() + 3).max(1);
    let more_budget = if modern { budget - 7 } else { budget - 1 };

    let mut chunks: Vec<String> = Vec::new();
    for segment in value.split('\n') {
        let mut rest = segment.trim_end_matches('\r');
        if rest.is_empty() {
            chunks.push(String::new());
            continue;
        }
        while !rest.is_empty() {
            let limit = if chunks.is_empty() { first_budget } else { more_budget };
            let (head, tail) = rest.split_at(char_boundary_within(rest, limit));
            chunks.push(head.to_string());
            rest = tail;
        }
    }

    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| match (i, modern) {
            (0, _) => join_tag(key, chunk),
            (_, true) => join_tag("MORE", chunk),
            (_, false) => format!(" {}", chunk),
        })
        .collect()
}

/// Largest char boundary of `text` at or below `limit` bytes, but at least
/// one character.
fn char_boundary_within(text: &str, limit: usize) -> usize {
    if text.len() <= limit {
        return text.len();
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    if end == 0 {
        text.chars().next().map_or(0, char::len_utf8)
    } else {
        end
    }
}

fn join_tag(key: &str, chunk: &str) -> String {
    if chunk.is_empty() {
        format!("[{}]", key)
    } else {
        format!("[{}] {}", key, chunk)
    }
}
