//! Cross-format conversion.
//!
//! Only EULUMDAT to IES is defined. The mapping is lossy: only the first lamp
//! set is carried over and intensities are copied without unit conversion.

use tracing::{debug, warn};

use crate::error::{LuxError, Result};
use crate::eulumdat::Eulumdat;
use crate::ies::{IesDocument, IesFormat, Keywords, Tilt};

/// Build a new LM-63-2002 document from a EULUMDAT document.
///
/// Candela rows are rebuilt from `intensity_raw`, so a stale
/// `intensity_by_plane` cache does not leak into the output.
///
/// Fails with [`LuxError::Conversion`] when the input has no lamp set.
pub fn eulumdat_to_ies(ldt: &Eulumdat) -> Result<IesDocument> {
    ldt.validate(false)?;

    let lamp = ldt.lamp_set(0).ok_or_else(|| LuxError::Conversion {
        message: "EULUMDAT document has no lamp set".to_string(),
    })?;
    if ldt.lamp_set_count > 1 {
        warn!(
            lamp_sets = ldt.lamp_set_count,
            "only the first lamp set is converted"
        );
    }

    let other = format!("converted from EULUMDAT file {}", ldt.file_name);
    let keywords: Keywords = [
        ("TEST", ldt.measurement_report_number.as_str()),
        ("TESTLAB", ldt.company_identification.as_str()),
        ("ISSUEDATE", ldt.date_user.as_str()),
        ("MANUFAC", ldt.company_identification.as_str()),
        ("LUMINAIRE", ldt.luminaire_name.as_str()),
        ("LUMCAT", ldt.luminaire_number.as_str()),
        ("LAMP", lamp.lamp_type),
        ("OTHER", other.as_str()),
    ]
    .into_iter()
    .collect();

    let candela_values = ldt.planes_from_raw()?;
    let range = ldt.plane_range();
    let horizontal_angles: Vec<f64> = (0..range.mc)
        .map(|plane| {
            range
                .c_index(plane, ldt.c_plane_count)
                .and_then(|i| ldt.angles_c.get(i))
                .copied()
                .unwrap_or(0.0)
        })
        .collect();

    let doc = IesDocument {
        format: IesFormat::Lm63_2002,
        keywords,
        tilt: Tilt::None,
        number_lamps: lamp.number_lamps,
        lumens_per_lamp: lamp.total_luminous_flux,
        candela_multiplier: 1.0,
        number_vertical_angles: ldt.angles_g.len(),
        number_horizontal_angles: horizontal_angles.len(),
        photometric_type: 1,
        units_type: 2,
        luminaire_width: ldt.width_luminaire,
        luminaire_length: ldt.length_diameter,
        luminaire_height: ldt.height_luminaire,
        ballast_factor: 1.0,
        future_use: 1.0,
        input_watts: lamp.ballast_watts,
        vertical_angles: ldt.angles_g.clone(),
        horizontal_angles,
        candela_values,
    };

    debug!(
        vertical = doc.number_vertical_angles,
        horizontal = doc.number_horizontal_angles,
        "converted EULUMDAT to IES"
    );
    Ok(doc)
}

/// IES to EULUMDAT has no defined field mapping and always fails.
pub fn ies_to_eulumdat(_doc: &IesDocument) -> Result<Eulumdat> {
    Err(LuxError::Unsupported {
        operation: "IES to EULUMDAT conversion",
    })
}
