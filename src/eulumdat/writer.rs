//! EULUMDAT serializer.

use std::io::Write;

use tracing::debug;

use super::model::Eulumdat;
use super::validate::validate_document;
use crate::error::{LuxError, Result};
use crate::writer::{format_number, LineWriter};

/// Write `ldt` to `sink`, returning the number of bytes written.
///
/// The document is validated first; nothing is written if validation fails.
/// The intensity run length is derived from the symmetry indicator here, not
/// taken from the cached per-plane table.
pub fn write_document<W: Write>(ldt: &Eulumdat, sink: W) -> Result<usize> {
    validate_document(ldt, false)?;

    let mut out = LineWriter::new(sink);
    out.write_line(&ldt.company_identification)?;
    out.write_line(&ldt.type_indicator.to_string())?;
    out.write_line(&ldt.symmetry.code().to_string())?;
    out.write_line(&ldt.c_plane_count.to_string())?;
    out.write_line(&format_number(ldt.c_plane_spacing))?;
    out.write_line(&ldt.g_count.to_string())?;
    out.write_line(&format_number(ldt.g_spacing))?;
    out.write_line(&ldt.measurement_report_number)?;
    out.write_line(&ldt.luminaire_name)?;
    out.write_line(&ldt.luminaire_number)?;
    out.write_line(&ldt.file_name)?;
    out.write_line(&ldt.date_user)?;

    let dimensions = [
        ldt.length_diameter,
        ldt.width_luminaire,
        ldt.height_luminaire,
        ldt.length_diameter_luminous_area,
        ldt.width_luminous_area,
        ldt.height_luminous_area_c0,
        ldt.height_luminous_area_c90,
        ldt.height_luminous_area_c180,
        ldt.height_luminous_area_c270,
        ldt.downward_flux_fraction,
        ldt.light_output_ratio,
        ldt.intensity_conversion_factor,
        ldt.measurement_tilt,
    ];
    write_floats(&mut out, &dimensions)?;

    out.write_line(&ldt.lamp_set_count.to_string())?;
    for set in (0..ldt.lamp_set_count).filter_map(|i| ldt.lamp_set(i)) {
        out.write_line(&set.number_lamps.to_string())?;
        out.write_line(set.lamp_type)?;
        out.write_line(&format_number(set.total_luminous_flux))?;
        out.write_line(set.color_temperature)?;
        out.write_line(set.color_rendering)?;
        out.write_line(&format_number(set.ballast_watts))?;
    }

    write_floats(&mut out, &ldt.direct_ratios)?;
    write_floats(&mut out, &ldt.angles_c)?;
    write_floats(&mut out, &ldt.angles_g)?;

    let range = ldt.plane_range();
    let run = ldt.expected_raw_len()?;
    let intensities = ldt.intensity_raw.get(..run).ok_or_else(|| {
        LuxError::mismatch("LuminousIntensityDistributionRaw", run, ldt.intensity_raw.len())
    })?;
    write_floats(&mut out, intensities)?;

    let written = out.finish()?;
    debug!(
        symmetry = %ldt.symmetry,
        planes = range.mc,
        bytes = written,
        "wrote EULUMDAT document"
    );
    Ok(written)
}

fn write_floats<W: Write>(out: &mut LineWriter<W>, values: &[f64]) -> Result<()> {
    out.write_lines(values.iter().map(|v| format_number(*v)))
}
