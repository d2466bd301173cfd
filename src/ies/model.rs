//! Data model for IESNA LM-63 documents.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// LM-63 standard revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IesFormat {
    /// Not yet determined
    Unknown,
    /// LM-63-1986 (no identifier line)
    Lm63_1986,
    /// LM-63-1991, identifier `IESNA91`
    Lm63_1991,
    /// LM-63-1995, identifier `IESNA:LM-63-1995`
    Lm63_1995,
    /// LM-63-2002, identifier `IESNA:LM-63-2002`
    Lm63_2002,
}

impl IesFormat {
    /// The newest supported revision.
    pub const LATEST: IesFormat = IesFormat::Lm63_2002;

    /// Map a first-line identifier to its revision.
    pub fn from_identifier(line: &str) -> Option<Self> {
        match line {
            "IESNA91" => Some(Self::Lm63_1991),
            "IESNA:LM-63-1995" => Some(Self::Lm63_1995),
            "IESNA:LM-63-2002" => Some(Self::Lm63_2002),
            _ => None,
        }
    }

    /// The identifier line written for this revision, if it has one.
    pub fn identifier(&self) -> Option<&'static str> {
        match self {
            Self::Lm63_1991 => Some("IESNA91"),
            Self::Lm63_1995 => Some("IESNA:LM-63-1995"),
            Self::Lm63_2002 => Some("IESNA:LM-63-2002"),
            Self::Unknown | Self::Lm63_1986 => None,
        }
    }
}

impl fmt::Display for IesFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Lm63_1986 => "LM-63-1986",
            Self::Lm63_1991 => "LM-63-1991",
            Self::Lm63_1995 => "LM-63-1995",
            Self::Lm63_2002 => "LM-63-2002",
        };
        f.write_str(name)
    }
}

/// Inline tilt table (`TILT=INCLUDE`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TiltData {
    /// Orientation of the lamp within the luminaire (1, 2 or 3)
    pub lamp_to_luminaire_geometry: i64,
    /// Declared number of angle/factor pairs
    pub pair_count: usize,
    /// Tilt angles in degrees
    pub angles: Vec<f64>,
    /// Candela multiplying factor per tilt angle
    pub multiplier_factors: Vec<f64>,
}

/// How lamp output varies with luminaire tilt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Tilt {
    /// Output does not vary with tilt
    None,
    /// Variation given inline after the TILT line
    Include(TiltData),
    /// Variation given in an external file (never resolved)
    File(String),
}

impl Tilt {
    /// Text after `TILT=`.
    pub fn label(&self) -> &str {
        match self {
            Tilt::None => "NONE",
            Tilt::Include(_) => "INCLUDE",
            Tilt::File(name) => name,
        }
    }
}

/// Keyword map that keeps first-insertion order.
///
/// Keys are unique; re-inserting an existing key overwrites its value in place.
/// Equality is order sensitive.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Keywords {
    entries: IndexMap<String, String>,
}

impl Keywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key` to `value`, keeping the key's position if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Append a continuation line to an existing key's value.
    ///
    /// Returns `false` if the key is absent.
    pub fn append_line(&mut self, key: &str, line: &str) -> bool {
        match self.entries.get_mut(key) {
            Some(value) => {
                value.push('\n');
                value.push_str(line);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Rename `from` to `to` in place. An existing `to` entry is dropped and
    /// its value replaced.
    pub fn rename(&mut self, from: &str, to: &str) {
        if from == to || !self.contains(from) {
            return;
        }
        self.entries.shift_remove(to);
        if let Some((index, _, value)) = self.entries.shift_remove_full(from) {
            self.entries.shift_insert(index, to.to_string(), value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl PartialEq for Keywords {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Keywords {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut keywords = Keywords::new();
        for (k, v) in iter {
            keywords.insert(k, v);
        }
        keywords
    }
}

/// A parsed IESNA LM-63 photometric document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IesDocument {
    /// Standard revision; selects keyword rules and line budgets
    pub format: IesFormat,
    /// Keyword values; continuation lines are joined with `'\n'`
    pub keywords: Keywords,
    pub tilt: Tilt,
    pub number_lamps: i64,
    /// Lumens per lamp (-1 for absolute photometry)
    pub lumens_per_lamp: f64,
    pub candela_multiplier: f64,
    pub number_vertical_angles: usize,
    pub number_horizontal_angles: usize,
    /// 1 = type C, 2 = type B, 3 = type A
    pub photometric_type: i64,
    /// 1 = feet, 2 = meters
    pub units_type: i64,
    pub luminaire_width: f64,
    pub luminaire_length: f64,
    pub luminaire_height: f64,
    pub ballast_factor: f64,
    pub future_use: f64,
    pub input_watts: f64,
    pub vertical_angles: Vec<f64>,
    pub horizontal_angles: Vec<f64>,
    /// One row per horizontal angle, one column per vertical angle
    pub candela_values: Vec<Vec<f64>>,
}

impl IesDocument {
    /// Create an empty document for the given revision.
    pub fn new(format: IesFormat) -> Self {
        Self {
            format,
            keywords: Keywords::new(),
            tilt: Tilt::None,
            number_lamps: 0,
            lumens_per_lamp: 0.0,
            candela_multiplier: 1.0,
            number_vertical_angles: 0,
            number_horizontal_angles: 0,
            photometric_type: 1,
            units_type: 2,
            luminaire_width: 0.0,
            luminaire_length: 0.0,
            luminaire_height: 0.0,
            ballast_factor: 1.0,
            future_use: 1.0,
            input_watts: 0.0,
            vertical_angles: Vec::new(),
            horizontal_angles: Vec::new(),
            candela_values: Vec::new(),
        }
    }

    /// Candela row for the horizontal angle at `index`.
    pub fn candela_row(&self, index: usize) -> Option<&[f64]> {
        self.candela_values.get(index).map(Vec::as_slice)
    }
}

impl Default for IesDocument {
    fn default() -> Self {
        Self::new(IesFormat::Unknown)
    }
}
