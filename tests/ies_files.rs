use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use luxfile_core::ies::{self, IesDocument, IesFormat, Tilt};
use luxfile_core::{LuxError, ParseOptions};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn sample() -> IesDocument {
    ies::parse_file(&fixture("sample.ies"), &ParseOptions::strict()).unwrap()
}

const DATA_SECTION: &str = "TILT=NONE\r\n\
    1 1000 1 3 1 1 2 0.5 0.5 0.1\r\n\
    1 1 20\r\n\
    0 45 90\r\n\
    0\r\n\
    300 150 0\r\n";

fn with_header(identifier: &str, keywords: &[&str]) -> String {
    let mut text = format!("{}\r\n", identifier);
    for line in keywords {
        text.push_str(line);
        text.push_str("\r\n");
    }
    text.push_str(DATA_SECTION);
    text
}

#[test]
fn test_sample_keywords_and_tilt() {
    let doc = sample();
    assert_eq!(doc.format, IesFormat::Lm63_2002);
    assert_eq!(doc.keywords.len(), 8);
    assert_eq!(
        doc.keywords.get("LUMINAIRE"),
        Some("Lumex Wall 600 asymmetric wallwasher\nwith frosted diffuser")
    );
    assert_eq!(doc.keywords.get("_SERIAL"), Some("000417"));
    assert!(!doc.keywords.contains("MORE"));

    match &doc.tilt {
        Tilt::Include(tilt) => {
            assert_eq!(tilt.lamp_to_luminaire_geometry, 1);
            assert_eq!(tilt.pair_count, 3);
            assert_eq!(tilt.angles, vec![0.0, 45.0, 90.0]);
            assert_eq!(tilt.multiplier_factors, vec![1.0, 0.95, 0.9]);
        }
        other => panic!("unexpected tilt {:?}", other),
    }
}

#[test]
fn test_sample_photometric_data() {
    let doc = sample();
    assert_eq!(doc.number_lamps, 1);
    assert_relative_eq!(doc.lumens_per_lamp, 3000.0);
    assert_eq!(doc.number_vertical_angles, 7);
    assert_eq!(doc.number_horizontal_angles, 3);
    assert_eq!(doc.photometric_type, 1);
    assert_eq!(doc.units_type, 2);
    assert_relative_eq!(doc.luminaire_height, 0.08);
    assert_relative_eq!(doc.ballast_factor, 1.0);
    assert_relative_eq!(doc.future_use, 1.0);
    assert_relative_eq!(doc.input_watts, 32.5);
    assert_eq!(doc.vertical_angles, vec![0.0, 15.0, 30.0, 45.0, 60.0, 75.0, 90.0]);
    assert_eq!(doc.horizontal_angles, vec![0.0, 45.0, 90.0]);
    assert_eq!(
        doc.candela_row(1).unwrap(),
        &[700.0, 680.0, 610.0, 500.0, 360.0, 210.0, 80.0]
    );
    assert_eq!(doc.candela_row(2).unwrap()[6], 30.0);
    assert!(doc.candela_row(3).is_none());
}

#[test]
fn test_export_and_reparse_file() {
    let doc = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("copy.ies");

    ies::export_file(&doc, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("IESNA:LM-63-2002\r\n[TEST] LX-2023-0418\r\n"));
    assert!(text.contains("[MORE] with frosted diffuser\r\n"));
    assert!(text.contains("TILT=INCLUDE\r\n1\r\n3\r\n"));

    let reparsed = ies::parse_file(&path, &ParseOptions::strict()).unwrap();
    assert_eq!(reparsed, doc);
}

#[test]
fn test_keyword_order_survives_export() {
    let doc = sample();
    let text = ies::to_string(&doc).unwrap();
    let reparsed = ies::parse(&text, &ParseOptions::new()).unwrap();
    let before: Vec<&str> = doc.keywords.keys().collect();
    let after: Vec<&str> = reparsed.keywords.keys().collect();
    assert_eq!(before, after);
}

#[test]
fn test_long_values_reparse_as_chunks() {
    let input = with_header("IESNA:LM-63-1995", &["[TEST] T-1"]);
    let mut doc = ies::parse(&input, &ParseOptions::strict()).unwrap();
    let long = "x".repeat(100);
    let accented = "ä".repeat(60);
    doc.keywords.insert("OTHER", long.as_str());
    doc.keywords.insert("_NOTE", accented.as_str());

    let text = ies::to_string(&doc).unwrap();
    for line in text.split("\r\n") {
        assert!(line.len() <= 80, "{} bytes: {:?}", line.len(), line);
    }

    let reparsed = ies::parse(&text, &ParseOptions::strict()).unwrap();
    let other = reparsed.keywords.get("OTHER").unwrap();
    assert_eq!(other.replace('\n', ""), long);
    assert_eq!(other.lines().count(), 2);
    let note = reparsed.keywords.get("_NOTE").unwrap();
    assert_eq!(note.replace('\n', ""), accented);
}

#[test]
fn test_latin1_input_is_written_as_utf8() {
    let mut bytes = b"IESNA:LM-63-1995\r\n[TEST] T-1\r\n[MANUFAC] Stra".to_vec();
    bytes.push(0xDF);
    bytes.extend_from_slice(b"e GmbH\r\n");
    bytes.extend_from_slice(DATA_SECTION.as_bytes());

    let doc = ies::parse_reader(bytes.as_slice(), &ParseOptions::new()).unwrap();
    assert_eq!(doc.keywords.get("MANUFAC"), Some("Straße GmbH"));

    let mut out = Vec::new();
    ies::write(&doc, &mut out).unwrap();
    let text = String::from_utf8(out).expect("output is UTF-8");
    assert!(text.contains("[MANUFAC] Straße GmbH\r\n"));
}

#[test]
fn test_required_keywords_depend_on_revision() {
    let keywords = ["[TEST] T-1", "[ISSUEDATE] 2020", "[MANUFAC] ACME"];

    let modern = ies::parse(&with_header("IESNA:LM-63-2002", &keywords), &ParseOptions::new());
    match modern {
        Err(LuxError::MissingRequiredKeywords { missing, .. }) => {
            assert_eq!(missing, vec!["TESTLAB".to_string()]);
        }
        other => panic!("expected missing keywords, got {:?}", other.map(|d| d.format)),
    }

    let keywords_1995 = ["[TEST] T-1", "[DATE] 2020", "[MANUFAC] ACME"];
    let older = ies::parse(&with_header("IESNA:LM-63-1995", &keywords_1995), &ParseOptions::new());
    assert!(older.is_ok());
}

#[test]
fn test_1991_requires_test_and_manufac() {
    let missing = ies::parse(&with_header("IESNA91", &["[TEST] T-1"]), &ParseOptions::new());
    match missing {
        Err(LuxError::MissingRequiredKeywords { format, missing }) => {
            assert_eq!(format, IesFormat::Lm63_1991.to_string());
            assert_eq!(missing, vec!["MANUFAC".to_string()]);
        }
        other => panic!("expected missing keywords, got {:?}", other.map(|d| d.format)),
    }

    let complete = ies::parse(
        &with_header("IESNA91", &["[TEST] T-1", "[MANUFAC] ACME", "[DATE] 1993"]),
        &ParseOptions::strict(),
    )
    .unwrap();
    assert_eq!(complete.format, IesFormat::Lm63_1991);
    assert_eq!(complete.keywords.get("DATE"), Some("1993"));
}

#[test]
fn test_disallowed_keyword_names_revision() {
    let input = with_header("IESNA91", &["[TEST] T-1", "[MANUFAC] ACME", "[SEARCH] x"]);
    assert!(matches!(
        ies::parse(&input, &ParseOptions::new()),
        Err(LuxError::DisallowedKeyword { line: 4, ref keyword, .. }) if keyword == "SEARCH"
    ));
}

#[test]
fn test_blocks_in_1995() {
    let ok = with_header(
        "IESNA:LM-63-1995",
        &["[BLOCK]", "[LAMP] A", "[ENDBLOCK]", "[BLOCK]", "[LAMP] B", "[ENDBLOCK]"],
    );
    let doc = ies::parse(&ok, &ParseOptions::new()).unwrap();
    assert_eq!(doc.keywords.get("LAMP"), Some("B"));

    let nested = with_header("IESNA:LM-63-1995", &["[BLOCK]", "[BLOCK]", "[ENDBLOCK]"]);
    assert!(matches!(
        ies::parse(&nested, &ParseOptions::new()),
        Err(LuxError::BlockNesting { line: 3, .. })
    ));

    let stray = with_header("IESNA:LM-63-1995", &["[ENDBLOCK]"]);
    assert!(matches!(
        ies::parse(&stray, &ParseOptions::new()),
        Err(LuxError::BlockNesting { line: 2, .. })
    ));

    let unclosed = with_header("IESNA:LM-63-1995", &["[BLOCK]", "[LAMP] A"]);
    assert!(matches!(
        ies::parse(&unclosed, &ParseOptions::new()),
        Err(LuxError::BlockNesting { .. })
    ));
}

#[test]
fn test_continuation_before_keyword() {
    let input = with_header("IESNA:LM-63-1995", &["  orphan text"]);
    assert!(matches!(
        ies::parse(&input, &ParseOptions::new()),
        Err(LuxError::ContinuationWithoutKeyword { line: 2 })
    ));

    let more = with_header("IESNA:LM-63-2002", &["[MORE] orphan"]);
    assert!(matches!(
        ies::parse(&more, &ParseOptions::new()),
        Err(LuxError::ContinuationWithoutKeyword { line: 2 })
    ));
}

struct VecWriter(Arc<Mutex<Vec<u8>>>);

impl Write for VecWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber that records WARN and above; returns the log text.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buffer = buffer.clone();
        move || VecWriter(buffer.clone())
    };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(make_writer)
        .with_ansi(false)
        .without_time()
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let log = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
    (result, log)
}

#[test]
fn test_long_keyword_line_strict_and_lenient() {
    let line = format!("[OTHER] {}", "x".repeat(73));
    assert_eq!(line.len(), 81);
    let input = with_header("IESNA:LM-63-1995", &[line.as_str()]);

    let (lenient, log) = capture_warnings(|| ies::parse(&input, &ParseOptions::new()));
    let lenient = lenient.unwrap();
    assert_eq!(lenient.keywords.get("OTHER").map(str::len), Some(73));
    assert!(
        log.contains("line exceeds maximum allowed length"),
        "expected a length warning, got: {}",
        log
    );
    assert!(log.contains("line=2"), "expected the line number, got: {}", log);

    assert!(matches!(
        ies::parse(&input, &ParseOptions::strict()),
        Err(LuxError::LineTooLong {
            line: 2,
            length: 81,
            max: 80
        })
    ));
}

#[test]
fn test_tilt_file_is_rejected() {
    let input = "IESNA:LM-63-1995\r\n[TEST] x\r\nTILT=lamp.tlt\r\n";
    assert!(matches!(
        ies::parse(input, &ParseOptions::new()),
        Err(LuxError::UnsupportedTiltFile { ref name }) if name == "lamp.tlt"
    ));
}

#[test]
fn test_unknown_identifier() {
    let input = with_header("IESNA:LM-63-2019", &[]);
    assert!(matches!(
        ies::parse(&input, &ParseOptions::new()),
        Err(LuxError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_truncated_candela_run() {
    let input = with_header("IESNA:LM-63-1995", &[]).replace("300 150 0\r\n", "300 150\r\n");
    assert!(matches!(
        ies::parse(&input, &ParseOptions::new()),
        Err(LuxError::UnexpectedEof { .. })
    ));
}

#[test]
fn test_upgrade_round_trips_as_2002() {
    let input = with_header(
        "IESNA:LM-63-1995",
        &["[TEST] T-9", "[DATE] 2001-02-03", "[NEARFIELD] 1", "[BLOCK]", "[LAMP] X", "[ENDBLOCK]"],
    );
    let mut doc = ies::parse(&input, &ParseOptions::new()).unwrap();
    doc.upgrade().unwrap();

    let text = ies::to_string(&doc).unwrap();
    assert!(text.starts_with("IESNA:LM-63-2002\r\n"));
    let reparsed = ies::parse(&text, &ParseOptions::strict()).unwrap();
    assert_eq!(reparsed.format, IesFormat::Lm63_2002);
    assert_eq!(reparsed.keywords.get("ISSUEDATE"), Some("2001-02-03"));
    assert_eq!(reparsed.keywords.get("TESTLAB"), Some("unknown"));
    assert!(reparsed.keywords.contains("_BLOCK"));
    assert!(reparsed.validate(true).is_ok());
}
