//! Per-revision keyword rules and line budgets.
//!
//! | Revision | Required keywords | Keyword line | Data line |
//! |----------|-------------------|--------------|-----------|
//! | 1986 | none | 82 | 132 |
//! | 1991 | TEST, MANUFAC | 82 | 132 |
//! | 1995 | none | 82 | 132 |
//! | 2002 | TEST, TESTLAB, ISSUEDATE, MANUFAC | 256 | 256 |
//!
//! Budgets include the two-byte line terminator.

use super::model::IesFormat;
use crate::writer::LINE_TERMINATOR;

/// Longest keyword name any revision accepts.
pub const MAX_KEYWORD_LENGTH: usize = 18;

/// Budget for the format identifier line.
pub const MAX_IDENTIFIER_LENGTH: usize = 16;

/// Keyword that continues the previous keyword's value.
pub const MORE: &str = "MORE";
pub const BLOCK: &str = "BLOCK";
pub const ENDBLOCK: &str = "ENDBLOCK";

/// Value synthesized for required keywords during an upgrade.
pub const PLACEHOLDER_VALUE: &str = "unknown";

const ALLOWED_1991: &[&str] = &[
    "TEST",
    "DATE",
    "MANUFAC",
    "LUMCAT",
    "LUMINAIRE",
    "LAMPCAT",
    "LAMP",
    "BALLAST",
    "BALLASTCAT",
    "MAINTCAT",
    "DISTRIBUTION",
    "FLASHAREA",
    "COLORCONSTANT",
    "MORE",
];

const ALLOWED_1995: &[&str] = &[
    "TEST",
    "DATE",
    "NEARFIELD",
    "MANUFAC",
    "LUMCAT",
    "LUMINAIRE",
    "LAMPCAT",
    "LAMP",
    "BALLAST",
    "BALLASTCAT",
    "MAINTCAT",
    "DISTRIBUTION",
    "FLASHAREA",
    "COLORCONSTANT",
    "OTHER",
    "SEARCH",
    "MORE",
    "BLOCK",
    "ENDBLOCK",
];

const ALLOWED_2002: &[&str] = &[
    "TEST",
    "TESTLAB",
    "TESTDATE",
    "NEARFIELD",
    "MANUFAC",
    "LUMCAT",
    "LUMINAIRE",
    "LAMPCAT",
    "LAMP",
    "BALLAST",
    "BALLASTCAT",
    "MAINTCAT",
    "DISTRIBUTION",
    "FLASHAREA",
    "COLORCONSTANT",
    "LAMPPOSITION",
    "ISSUEDATE",
    "OTHER",
    "SEARCH",
    "MORE",
];

const REQUIRED_1991: &[&str] = &["TEST", "MANUFAC"];
const REQUIRED_2002: &[&str] = &["TEST", "TESTLAB", "ISSUEDATE", "MANUFAC"];

/// Keyword rules for one revision.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRules {
    /// Permitted keywords; `None` means anything goes
    pub allowed: Option<&'static [&'static str]>,
    pub required: &'static [&'static str],
    /// Keyword line budget including terminator
    pub keyword_line: usize,
    /// Data line budget including terminator
    pub data_line: usize,
}

const RULES_UNCHECKED: KeywordRules = KeywordRules {
    allowed: None,
    required: &[],
    keyword_line: 256,
    data_line: 256,
};

const RULES_1986: KeywordRules = KeywordRules {
    allowed: None,
    required: &[],
    keyword_line: 82,
    data_line: 132,
};

const RULES_1991: KeywordRules = KeywordRules {
    allowed: Some(ALLOWED_1991),
    required: REQUIRED_1991,
    keyword_line: 82,
    data_line: 132,
};

const RULES_1995: KeywordRules = KeywordRules {
    allowed: Some(ALLOWED_1995),
    required: &[],
    keyword_line: 82,
    data_line: 132,
};

const RULES_2002: KeywordRules = KeywordRules {
    allowed: Some(ALLOWED_2002),
    required: REQUIRED_2002,
    keyword_line: 256,
    data_line: 256,
};

impl IesFormat {
    /// Static rule table for this revision.
    pub fn rules(&self) -> &'static KeywordRules {
        match self {
            IesFormat::Unknown => &RULES_UNCHECKED,
            IesFormat::Lm63_1986 => &RULES_1986,
            IesFormat::Lm63_1991 => &RULES_1991,
            IesFormat::Lm63_1995 => &RULES_1995,
            IesFormat::Lm63_2002 => &RULES_2002,
        }
    }

    /// Usable keyword line length (terminator excluded).
    pub fn max_keyword_line_length(&self) -> usize {
        self.rules().keyword_line - LINE_TERMINATOR.len()
    }

    /// Usable data line length (terminator excluded).
    pub fn max_data_line_length(&self) -> usize {
        self.rules().data_line - LINE_TERMINATOR.len()
    }

    /// Whether `keyword` may appear in a document of this revision.
    ///
    /// Empty names and names over [`MAX_KEYWORD_LENGTH`] are always rejected;
    /// an underscore prefix marks a user extension and is always accepted.
    pub fn is_keyword_allowed(&self, keyword: &str) -> bool {
        if keyword.is_empty() || keyword.len() > MAX_KEYWORD_LENGTH {
            return false;
        }
        if keyword.starts_with('_') {
            return true;
        }
        match self.rules().allowed {
            Some(allowed) => allowed.iter().any(|k| *k == keyword),
            None => true,
        }
    }

    /// Keywords this revision requires before the TILT line.
    pub fn required_keywords(&self) -> &'static [&'static str] {
        self.rules().required
    }
}
