//! Positional parser for EULUMDAT documents.

use std::io::BufRead;

use tracing::debug;

use super::model::Eulumdat;
use super::symmetry::Symmetry;
use crate::error::Result;
use crate::reader::{LineReader, ParseOptions};

/// Maximum text lengths of the string fields.
pub mod limits {
    pub const IDENTIFICATION: usize = 78;
    pub const FILE_NAME: usize = 8;
    pub const LAMP_TYPE: usize = 24;
    pub const COLOR_TEMPERATURE: usize = 16;
    pub const COLOR_RENDERING: usize = 6;
}

/// Parser for EULUMDAT documents.
pub struct EulumdatParser<R> {
    reader: LineReader<R>,
}

impl<R: BufRead> EulumdatParser<R> {
    pub fn new(source: R, options: &ParseOptions) -> Self {
        Self {
            reader: LineReader::new(source, options),
        }
    }

    /// Parse the entire document.
    ///
    /// Fields are read strictly in file order; trailing lines are ignored.
    pub fn parse(mut self) -> Result<Eulumdat> {
        let r = &mut self.reader;
        let mut ldt = Eulumdat::default();

        ldt.company_identification = r.read_text(limits::IDENTIFICATION)?;
        ldt.type_indicator = r.read_int()?;
        ldt.symmetry = Symmetry::from_code(r.read_int()?)?;
        ldt.c_plane_count = r.read_count()?;
        ldt.c_plane_spacing = r.read_float()?;
        ldt.g_count = r.read_count()?;
        ldt.g_spacing = r.read_float()?;
        ldt.measurement_report_number = r.read_text(limits::IDENTIFICATION)?;
        ldt.luminaire_name = r.read_text(limits::IDENTIFICATION)?;
        ldt.luminaire_number = r.read_text(limits::IDENTIFICATION)?;
        ldt.file_name = r.read_text(limits::FILE_NAME)?;
        ldt.date_user = r.read_text(limits::IDENTIFICATION)?;
        ldt.length_diameter = r.read_float()?;
        ldt.width_luminaire = r.read_float()?;
        ldt.height_luminaire = r.read_float()?;
        ldt.length_diameter_luminous_area = r.read_float()?;
        ldt.width_luminous_area = r.read_float()?;
        ldt.height_luminous_area_c0 = r.read_float()?;
        ldt.height_luminous_area_c90 = r.read_float()?;
        ldt.height_luminous_area_c180 = r.read_float()?;
        ldt.height_luminous_area_c270 = r.read_float()?;
        ldt.downward_flux_fraction = r.read_float()?;
        ldt.light_output_ratio = r.read_float()?;
        ldt.intensity_conversion_factor = r.read_float()?;
        ldt.measurement_tilt = r.read_float()?;
        ldt.lamp_set_count = r.read_count()?;

        for _ in 0..ldt.lamp_set_count {
            ldt.number_lamps.push(r.read_int()?);
            ldt.lamp_types.push(r.read_text(limits::LAMP_TYPE)?);
            ldt.total_luminous_flux.push(r.read_float()?);
            ldt.color_temperatures.push(r.read_text(limits::COLOR_TEMPERATURE)?);
            ldt.color_rendering.push(r.read_text(limits::COLOR_RENDERING)?);
            ldt.ballast_watts.push(r.read_float()?);
        }

        for ratio in ldt.direct_ratios.iter_mut() {
            *ratio = r.read_float()?;
        }

        ldt.angles_c = (0..ldt.c_plane_count)
            .map(|_| r.read_float())
            .collect::<Result<_>>()?;
        ldt.angles_g = (0..ldt.g_count)
            .map(|_| r.read_float())
            .collect::<Result<_>>()?;

        let raw_len = ldt.expected_raw_len()?;
        ldt.intensity_raw = (0..raw_len)
            .map(|_| r.read_float())
            .collect::<Result<_>>()?;
        ldt.refresh_planes()?;

        debug!(
            symmetry = %ldt.symmetry,
            c_planes = ldt.c_plane_count,
            g_count = ldt.g_count,
            lamp_sets = ldt.lamp_set_count,
            lines = r.line_number(),
            "parsed EULUMDAT document"
        );
        Ok(ldt)
    }
}
