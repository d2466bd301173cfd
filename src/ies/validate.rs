//! IES document validation.

use crate::error::{LuxError, Result};

use super::model::{IesDocument, Tilt};

impl IesDocument {
    /// Required keywords of the document's revision that are absent.
    pub fn missing_required_keywords(&self) -> Vec<&'static str> {
        self.format
            .required_keywords()
            .iter()
            .copied()
            .filter(|k| !self.keywords.contains(k))
            .collect()
    }

    pub fn contains_required_keywords(&self) -> bool {
        self.missing_required_keywords().is_empty()
    }

    /// Validate the document, see [`validate_document`].
    pub fn validate(&self, strict: bool) -> Result<()> {
        validate_document(self, strict)
    }
}

/// Validate an IES document.
///
/// Checks:
/// - Required keywords of the revision are present
/// - Declared counts match the angle, tilt and candela array lengths
///
/// Strict mode additionally checks keyword names against the revision and
/// the ranges of the enumerated header fields.
pub fn validate_document(doc: &IesDocument, strict: bool) -> Result<()> {
    let missing = doc.missing_required_keywords();
    if !missing.is_empty() {
        return Err(LuxError::MissingRequiredKeywords {
            format: doc.format.to_string(),
            missing: missing.into_iter().map(String::from).collect(),
        });
    }

    if let Tilt::Include(tilt) = &doc.tilt {
        check_len("TiltAngles", tilt.pair_count, tilt.angles.len())?;
        check_len("TiltMultiplierFactors", tilt.pair_count, tilt.multiplier_factors.len())?;
    }

    let (nv, nh) = (doc.number_vertical_angles, doc.number_horizontal_angles);
    check_len("VerticalAngles", nv, doc.vertical_angles.len())?;
    check_len("HorizontalAngles", nh, doc.horizontal_angles.len())?;
    check_len("CandelaValues horizontal", nh, doc.candela_values.len())?;
    for row in &doc.candela_values {
        check_len("CandelaValues vertical", nv, row.len())?;
    }

    if strict {
        validate_strict(doc)?;
    }

    Ok(())
}

fn validate_strict(doc: &IesDocument) -> Result<()> {
    for key in doc.keywords.keys() {
        if !doc.format.is_keyword_allowed(key) {
            return Err(LuxError::invalid_field(
                "keywords",
                format!("'{}' is not allowed for {}", key, doc.format),
            ));
        }
    }

    if !(1..=3).contains(&doc.photometric_type) {
        return Err(LuxError::invalid_field(
            "photometric_type",
            format!("{} is not one of 1, 2, 3", doc.photometric_type),
        ));
    }

    if !(1..=2).contains(&doc.units_type) {
        return Err(LuxError::invalid_field(
            "units_type",
            format!("{} is not 1 (feet) or 2 (meters)", doc.units_type),
        ));
    }

    if let Tilt::Include(tilt) = &doc.tilt {
        if !(1..=3).contains(&tilt.lamp_to_luminaire_geometry) {
            return Err(LuxError::invalid_field(
                "lamp_to_luminaire_geometry",
                format!("{} is not one of 1, 2, 3", tilt.lamp_to_luminaire_geometry),
            ));
        }
    }

    Ok(())
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(LuxError::mismatch(field, expected, actual));
    }
    Ok(())
}
