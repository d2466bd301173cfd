//! State-machine parser for IESNA LM-63 documents.

use std::io::BufRead;

use tracing::{debug, warn};

use super::keywords::{BLOCK, ENDBLOCK, MAX_IDENTIFIER_LENGTH, MORE};
use super::model::{IesDocument, IesFormat, Tilt, TiltData};
use crate::error::{LuxError, Result};
use crate::reader::{parse_count, parse_float, parse_int, LineReader, ParseOptions};

/// Upper bound on up-front allocation for a numeric run; declared counts
/// come from the file and are not trusted.
const MAX_PREALLOCATED_WORDS: usize = 4096;

/// Shape of a line in the keyword section.
#[derive(Debug, PartialEq)]
enum HeaderLine<'a> {
    /// `[KEY] value`
    Keyword { name: &'a str, value: &'a str },
    /// Leading whitespace followed by more text for the last keyword
    Continuation(&'a str),
    /// `TILT=<value>`
    Tilt(&'a str),
    Unrecognized,
}

fn classify(line: &str) -> HeaderLine<'_> {
    if let Some(rest) = line.strip_prefix('[') {
        if let Some(close) = rest.find(']') {
            let name = &rest[..close];
            let tail = &rest[close + 1..];
            let name_ok = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            let tail_ok = tail.is_empty() || tail.starts_with(char::is_whitespace);
            if name_ok && tail_ok {
                return HeaderLine::Keyword {
                    name,
                    value: tail.trim_start(),
                };
            }
        }
    }

    if let Some(rest) = line.strip_prefix("TILT") {
        if let Some(value) = rest.trim_start().strip_prefix('=') {
            return HeaderLine::Tilt(value.trim());
        }
    }

    if line.starts_with(char::is_whitespace) {
        return HeaderLine::Continuation(line.trim_start());
    }

    HeaderLine::Unrecognized
}

/// Transient keyword-section state, dropped once the TILT line is reached.
#[derive(Debug, Default)]
struct KeywordContext {
    inside_block: bool,
    last_keyword: Option<String>,
}

impl KeywordContext {
    fn keyword(&mut self, doc: &mut IesDocument, name: &str, value: &str, line: usize) -> Result<()> {
        if !doc.format.is_keyword_allowed(name) {
            return Err(LuxError::DisallowedKeyword {
                line,
                keyword: name.to_string(),
                format: doc.format.to_string(),
            });
        }

        self.track_block(name, line)?;

        if name == MORE {
            return self.continuation(doc, value, line);
        }

        if doc.keywords.contains(name) {
            warn!(line, keyword = name, "keyword redefined, previous value replaced");
        }
        doc.keywords.insert(name, value);
        self.last_keyword = Some(name.to_string());
        Ok(())
    }

    fn continuation(&mut self, doc: &mut IesDocument, value: &str, line: usize) -> Result<()> {
        let last = self
            .last_keyword
            .as_deref()
            .ok_or(LuxError::ContinuationWithoutKeyword { line })?;
        doc.keywords.append_line(last, value);
        Ok(())
    }

    fn track_block(&mut self, name: &str, line: usize) -> Result<()> {
        if name == BLOCK {
            if self.inside_block {
                return Err(LuxError::block_nesting(line, "BLOCK inside of an open block"));
            }
            self.inside_block = true;
        } else if name == ENDBLOCK {
            if !self.inside_block {
                return Err(LuxError::block_nesting(line, "ENDBLOCK without a matching BLOCK"));
            }
            self.inside_block = false;
        }
        Ok(())
    }
}

/// One whitespace-delimited value and the line it came from.
struct Word {
    text: String,
    line: usize,
}

/// Parser for IES documents.
pub struct IesParser<R> {
    reader: LineReader<R>,
    format: IesFormat,
    /// Next unconsumed line of the data section
    current: String,
}

impl<R: BufRead> IesParser<R> {
    /// Create a new parser over a line source.
    pub fn new(source: R, options: &ParseOptions) -> Self {
        Self {
            reader: LineReader::new(source, options),
            format: IesFormat::Unknown,
            current: String::new(),
        }
    }

    /// Parse the entire document.
    pub fn parse(mut self) -> Result<IesDocument> {
        let identifier = self.reader.read_text(MAX_IDENTIFIER_LENGTH)?;
        self.format = IesFormat::from_identifier(&identifier)
            .ok_or(LuxError::UnsupportedFormat { found: identifier })?;
        debug!(format = %self.format, "detected IES revision");

        let mut doc = IesDocument::new(self.format);
        self.parse_keywords(&mut doc)?;
        self.advance()?;

        if let Tilt::Include(data) = &mut doc.tilt {
            *data = self.parse_tilt_data()?;
        }

        self.parse_photometric_header(&mut doc)?;

        doc.vertical_angles = self.collect_floats(doc.number_vertical_angles, false)?;
        doc.horizontal_angles = self.collect_floats(doc.number_horizontal_angles, false)?;

        let (nv, nh) = (doc.number_vertical_angles, doc.number_horizontal_angles);
        let total = nv.checked_mul(nh).ok_or_else(|| {
            LuxError::syntax(
                self.reader.line_number(),
                format!("candela table of {} x {} values is too large", nv, nh),
            )
        })?;
        let values = self.collect_floats(total, true)?;
        doc.candela_values = if nv == 0 {
            vec![Vec::new(); nh]
        } else {
            values.chunks(nv).map(<[f64]>::to_vec).collect()
        };

        debug!(
            keywords = doc.keywords.len(),
            vertical = nv,
            horizontal = nh,
            "parsed IES document"
        );
        Ok(doc)
    }

    /// Keyword section up to and including the TILT line.
    fn parse_keywords(&mut self, doc: &mut IesDocument) -> Result<()> {
        let budget = self.format.max_keyword_line_length();
        let mut ctx = KeywordContext::default();

        loop {
            let line = self.reader.next_line()?;
            let line_no = self.reader.line_number();

            match classify(&line) {
                HeaderLine::Keyword { name, value } => {
                    self.reader.check_length(&line, budget)?;
                    ctx.keyword(doc, name, value, line_no)?;
                }
                HeaderLine::Tilt(value) => {
                    self.reader.check_length(&line, budget)?;
                    let missing = doc.missing_required_keywords();
                    if !missing.is_empty() {
                        return Err(LuxError::MissingRequiredKeywords {
                            format: self.format.to_string(),
                            missing: missing.into_iter().map(String::from).collect(),
                        });
                    }
                    if ctx.inside_block {
                        return Err(LuxError::block_nesting(line_no, "BLOCK not closed before TILT"));
                    }
                    doc.tilt = parse_tilt(value)?;
                    return Ok(());
                }
                HeaderLine::Continuation(value) => {
                    self.reader.check_length(&line, budget)?;
                    ctx.continuation(doc, value, line_no)?;
                }
                HeaderLine::Unrecognized => {
                    return Err(LuxError::syntax(
                        line_no,
                        format!("expected keyword or TILT line, got {:?}", line),
                    ));
                }
            }
        }
    }

    fn parse_tilt_data(&mut self) -> Result<TiltData> {
        let lamp_to_luminaire_geometry = parse_int(&self.current, self.reader.line_number())?;
        self.advance()?;
        let pair_count = parse_count(&self.current, self.reader.line_number())?;
        self.advance()?;

        let angles = self.collect_floats(pair_count, false)?;
        let multiplier_factors = self.collect_floats(pair_count, false)?;

        Ok(TiltData {
            lamp_to_luminaire_geometry,
            pair_count,
            angles,
            multiplier_factors,
        })
    }

    /// Lines 10 and 11: lamp data, counts, dimensions, ballast and watts.
    fn parse_photometric_header(&mut self, doc: &mut IesDocument) -> Result<()> {
        let w = self.collect_words(10, false)?;
        doc.number_lamps = parse_int(&w[0].text, w[0].line)?;
        doc.lumens_per_lamp = parse_float(&w[1].text, w[1].line)?;
        doc.candela_multiplier = parse_float(&w[2].text, w[2].line)?;
        doc.number_vertical_angles = parse_count(&w[3].text, w[3].line)?;
        doc.number_horizontal_angles = parse_count(&w[4].text, w[4].line)?;
        doc.photometric_type = parse_int(&w[5].text, w[5].line)?;
        doc.units_type = parse_int(&w[6].text, w[6].line)?;
        doc.luminaire_width = parse_float(&w[7].text, w[7].line)?;
        doc.luminaire_length = parse_float(&w[8].text, w[8].line)?;
        doc.luminaire_height = parse_float(&w[9].text, w[9].line)?;

        let w = self.collect_words(3, false)?;
        doc.ballast_factor = parse_float(&w[0].text, w[0].line)?;
        doc.future_use = parse_float(&w[1].text, w[1].line)?;
        doc.input_watts = parse_float(&w[2].text, w[2].line)?;
        Ok(())
    }

    /// Read the next line into `current`, checking the data line budget.
    fn advance(&mut self) -> Result<()> {
        let line = self.reader.next_line()?;
        self.reader
            .check_length(&line, self.format.max_data_line_length())?;
        self.current = line;
        Ok(())
    }

    /// Collect `count` whitespace-delimited values starting at `current`,
    /// pulling in further lines as needed.
    ///
    /// Unless `last` is set, the line after the run is loaded into `current`.
    fn collect_words(&mut self, count: usize, last: bool) -> Result<Vec<Word>> {
        let mut words = Vec::with_capacity(count.min(MAX_PREALLOCATED_WORDS));
        while words.len() < count {
            let line = self.reader.line_number();
            for token in self.current.split_whitespace() {
                if words.len() == count {
                    return Err(LuxError::syntax(
                        line,
                        format!("unexpected extra value {:?}, run needs {} values", token, count),
                    ));
                }
                words.push(Word {
                    text: token.to_string(),
                    line,
                });
            }
            if words.len() < count || !last {
                self.advance()?;
            }
        }
        Ok(words)
    }

    fn collect_floats(&mut self, count: usize, last: bool) -> Result<Vec<f64>> {
        self.collect_words(count, last)?
            .iter()
            .map(|w| parse_float(&w.text, w.line))
            .collect()
    }
}

fn parse_tilt(value: &str) -> Result<Tilt> {
    match value {
        "NONE" => Ok(Tilt::None),
        "INCLUDE" => Ok(Tilt::Include(TiltData {
            lamp_to_luminaire_geometry: 0,
            pair_count: 0,
            angles: Vec::new(),
            multiplier_factors: Vec::new(),
        })),
        other => Err(LuxError::UnsupportedTiltFile {
            name: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(input: &str) -> Result<IesDocument> {
        IesParser::new(input.as_bytes(), &ParseOptions::default()).parse()
    }

    const BODY: &str = "TILT=NONE\n\
        1 1000 1 3 1 1 2 0.5 0.6 0.1\n\
        1.0 1 42\n\
        0 45 90\n\
        0\n\
        100 50 0\n";

    #[test]
    fn test_classify_shapes() {
        assert_eq!(
            classify("[TEST] abc 123"),
            HeaderLine::Keyword {
                name: "TEST",
                value: "abc 123"
            }
        );
        assert_eq!(
            classify("[_VENDOR]"),
            HeaderLine::Keyword {
                name: "_VENDOR",
                value: ""
            }
        );
        assert_eq!(classify("  more text"), HeaderLine::Continuation("more text"));
        assert_eq!(classify("TILT=NONE"), HeaderLine::Tilt("NONE"));
        assert_eq!(classify("TILT = INCLUDE"), HeaderLine::Tilt("INCLUDE"));
        assert_eq!(classify("[TEST]abc"), HeaderLine::Unrecognized);
        assert_eq!(classify("garbage"), HeaderLine::Unrecognized);
    }

    #[test]
    fn test_parse_minimal_1995() {
        let doc = parse(&format!("IESNA:LM-63-1995\n[TEST] T1\n{}", BODY)).unwrap();
        assert_eq!(doc.format, IesFormat::Lm63_1995);
        assert_eq!(doc.keywords.get("TEST"), Some("T1"));
        assert_eq!(doc.tilt, Tilt::None);
        assert_eq!(doc.number_vertical_angles, 3);
        assert_eq!(doc.vertical_angles, vec![0.0, 45.0, 90.0]);
        assert_eq!(doc.candela_values, vec![vec![100.0, 50.0, 0.0]]);
    }

    #[test]
    fn test_line_eleven_fields_are_positional() {
        let doc = parse(&format!("IESNA:LM-63-1995\n{}", BODY.replace("1.0 1 42", "0.95 1.1 42"))).unwrap();
        assert_relative_eq!(doc.ballast_factor, 0.95);
        assert_relative_eq!(doc.future_use, 1.1);
        assert_relative_eq!(doc.input_watts, 42.0);
    }

    #[test]
    fn test_more_appends_to_last_keyword() {
        let doc = parse(&format!(
            "IESNA:LM-63-2002\n[TEST] abc\n[MORE] def\n[TESTLAB] L\n[ISSUEDATE] D\n[MANUFAC] M\n{}",
            BODY
        ))
        .unwrap();
        assert_eq!(doc.keywords.get("TEST"), Some("abc\ndef"));
        assert!(!doc.keywords.contains("MORE"));
    }

    #[test]
    fn test_more_before_keyword_fails() {
        let err = parse(&format!("IESNA:LM-63-1995\n[MORE] x\n{}", BODY)).unwrap_err();
        assert!(matches!(err, LuxError::ContinuationWithoutKeyword { line: 2 }));

        let err = parse(&format!("IESNA:LM-63-1995\n  x\n{}", BODY)).unwrap_err();
        assert!(matches!(err, LuxError::ContinuationWithoutKeyword { line: 2 }));
    }

    #[test]
    fn test_disallowed_keyword() {
        let err = parse(&format!("IESNA91\n[TEST] a\n[MANUFAC] b\n[OTHER] c\n{}", BODY)).unwrap_err();
        assert!(matches!(err, LuxError::DisallowedKeyword { line: 4, .. }));
    }

    #[test]
    fn test_tilt_include_block() {
        let input = "IESNA:LM-63-1995\n\
            TILT=INCLUDE\n\
            1\n\
            3\n\
            0 45\n\
            90\n\
            1.0 0.9 0.8\n\
            1 1000 1 2 1 1 2 0 0 0\n\
            1 1 10\n\
            0 90\n\
            0\n\
            10 5\n";
        let doc = parse(input).unwrap();
        match &doc.tilt {
            Tilt::Include(t) => {
                assert_eq!(t.lamp_to_luminaire_geometry, 1);
                assert_eq!(t.pair_count, 3);
                assert_eq!(t.angles, vec![0.0, 45.0, 90.0]);
                assert_eq!(t.multiplier_factors, vec![1.0, 0.9, 0.8]);
            }
            other => panic!("expected INCLUDE, got {:?}", other),
        }
        assert_eq!(doc.candela_values, vec![vec![10.0, 5.0]]);
    }

    #[test]
    fn test_tilt_file_is_unsupported() {
        let err = parse("IESNA:LM-63-1995\nTILT=lamp.tlt\n").unwrap_err();
        assert!(matches!(err, LuxError::UnsupportedTiltFile { ref name } if name == "lamp.tlt"));
    }

    #[test]
    fn test_run_spanning_lines_and_grid_shape() {
        let input = "IESNA:LM-63-1995\n\
            TILT=NONE\n\
            1 1000 1\n\
            2 3 1 2 0 0 0\n\
            1 1 10\n\
            0\n\
            90\n\
            0 90 180\n\
            1 2\n\
            3 4 5\n\
            6\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.number_horizontal_angles, 3);
        assert_eq!(
            doc.candela_values,
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]
        );
    }

    #[test]
    fn test_extra_value_on_line_is_syntax_error() {
        let err = parse(&format!("IESNA:LM-63-1995\n{}", BODY.replace("0 45 90", "0 45 90 135"))).unwrap_err();
        assert!(matches!(err, LuxError::Syntax { line: 5, .. }));
    }

    #[test]
    fn test_truncated_grid_is_eof() {
        let input = format!("IESNA:LM-63-1995\n{}", BODY.replace("100 50 0\n", "100 50\n"));
        assert!(matches!(parse(&input), Err(LuxError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_huge_declared_counts_fail_without_allocating() {
        let huge_vertical = BODY.replace("1 1000 1 3 1", "1 1000 1 900000000000 1");
        let err = parse(&format!("IESNA:LM-63-1995\n{}", huge_vertical)).unwrap_err();
        assert!(matches!(err, LuxError::UnexpectedEof { .. }));

        let huge_horizontal = BODY.replace("1 1000 1 3 1", "1 1000 1 0 9223372036854775807");
        let err = parse(&format!("IESNA:LM-63-1995\n{}", huge_horizontal)).unwrap_err();
        assert!(matches!(err, LuxError::UnexpectedEof { .. }));

        let huge_tilt = "IESNA:LM-63-1995\nTILT=INCLUDE\n1\n9223372036854775807\n0 90\n";
        assert!(matches!(parse(huge_tilt), Err(LuxError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_unknown_identifier() {
        let err = parse("IESNA:LM-63-1986\n").unwrap_err();
        assert!(matches!(err, LuxError::UnsupportedFormat { .. }));
    }
}
