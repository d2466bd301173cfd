//! EULUMDAT document validation.

use super::model::Eulumdat;
use super::parser::limits;
use crate::error::{LuxError, Result};

impl Eulumdat {
    /// Validate the document, see [`validate_document`].
    pub fn validate(&self, strict: bool) -> Result<()> {
        validate_document(self, strict)
    }
}

/// Validate a EULUMDAT document.
///
/// Checks:
/// - Every lamp-set array holds one entry per lamp set
/// - C and G angle arrays match their declared counts
/// - The raw intensity array matches the symmetry-derived length
///
/// Strict mode additionally checks text field lengths and the type indicator.
pub fn validate_document(ldt: &Eulumdat, strict: bool) -> Result<()> {
    let n = ldt.lamp_set_count;
    check_len("NumberLamps", n, ldt.number_lamps.len())?;
    check_len("TypeLamps", n, ldt.lamp_types.len())?;
    check_len("TotalLuminousFluxLamps", n, ldt.total_luminous_flux.len())?;
    check_len("ColorTemperature", n, ldt.color_temperatures.len())?;
    check_len("ColorRenderingIndexCRI", n, ldt.color_rendering.len())?;
    check_len("BallastWatts", n, ldt.ballast_watts.len())?;

    check_len("AnglesC", ldt.c_plane_count, ldt.angles_c.len())?;
    check_len("AnglesG", ldt.g_count, ldt.angles_g.len())?;
    check_len(
        "LuminousIntensityDistributionRaw",
        ldt.expected_raw_len()?,
        ldt.intensity_raw.len(),
    )?;

    if strict {
        validate_strict(ldt)?;
    }
    Ok(())
}

fn validate_strict(ldt: &Eulumdat) -> Result<()> {
    check_text("CompanyIdentification", &ldt.company_identification, limits::IDENTIFICATION)?;
    check_text("MeasurementReportNumber", &ldt.measurement_report_number, limits::IDENTIFICATION)?;
    check_text("LuminaireName", &ldt.luminaire_name, limits::IDENTIFICATION)?;
    check_text("LuminaireNumber", &ldt.luminaire_number, limits::IDENTIFICATION)?;
    check_text("FileName", &ldt.file_name, limits::FILE_NAME)?;
    check_text("DateUser", &ldt.date_user, limits::IDENTIFICATION)?;
    for lamp_type in &ldt.lamp_types {
        check_text("TypeLamps", lamp_type, limits::LAMP_TYPE)?;
    }
    for temperature in &ldt.color_temperatures {
        check_text("ColorTemperature", temperature, limits::COLOR_TEMPERATURE)?;
    }
    for cri in &ldt.color_rendering {
        check_text("ColorRenderingIndexCRI", cri, limits::COLOR_RENDERING)?;
    }

    if !(1..=3).contains(&ldt.type_indicator) {
        return Err(LuxError::invalid_field(
            "TypeIndicator",
            format!("{} is not one of 1, 2, 3", ldt.type_indicator),
        ));
    }
    Ok(())
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(LuxError::mismatch(field, expected, actual));
    }
    Ok(())
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<()> {
    let length = value.chars().count();
    if length > max {
        return Err(LuxError::invalid_field(
            field,
            format!("{} characters exceeds the limit of {}", length, max),
        ));
    }
    Ok(())
}
