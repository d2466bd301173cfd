//! Data model for EULUMDAT documents.
//!
//! Field numbers in the comments refer to the line positions of the format.

use serde::Serialize;

use super::symmetry::{PlaneRange, Symmetry};
use crate::error::{LuxError, Result};

/// Number of direct ratios (room indices k = 0.6 ... 5).
pub const DIRECT_RATIO_COUNT: usize = 10;

/// A parsed EULUMDAT photometric document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Eulumdat {
    /// 1: company identification / data bank / version
    pub company_identification: String,
    /// 2: type indicator I_typ (1 point source, 2 linear, 3 point source other symmetry)
    pub type_indicator: i64,
    /// 3: symmetry indicator I_sym
    pub symmetry: Symmetry,
    /// 4: number M_c of C-planes between 0 and 360 degrees
    pub c_plane_count: usize,
    /// 5: distance D_c between C-planes (0 for non-equidistant)
    pub c_plane_spacing: f64,
    /// 6: number N_g of luminous intensities in each C-plane
    pub g_count: usize,
    /// 7: distance D_g between intensities (0 for non-equidistant)
    pub g_spacing: f64,
    /// 8
    pub measurement_report_number: String,
    /// 9
    pub luminaire_name: String,
    /// 10
    pub luminaire_number: String,
    /// 11: DOS file name
    pub file_name: String,
    /// 12
    pub date_user: String,
    /// 13: length / diameter of luminaire (mm)
    pub length_diameter: f64,
    /// 14: width of luminaire (mm), 0 for circular
    pub width_luminaire: f64,
    /// 15: height of luminaire (mm)
    pub height_luminaire: f64,
    /// 16: length / diameter of luminous area (mm)
    pub length_diameter_luminous_area: f64,
    /// 17: width of luminous area (mm), 0 for circular
    pub width_luminous_area: f64,
    /// 18-21: height of luminous area in planes C0, C90, C180, C270 (mm)
    pub height_luminous_area_c0: f64,
    pub height_luminous_area_c90: f64,
    pub height_luminous_area_c180: f64,
    pub height_luminous_area_c270: f64,
    /// 22: downward flux fraction (%)
    pub downward_flux_fraction: f64,
    /// 23: light output ratio of the luminaire (%)
    pub light_output_ratio: f64,
    /// 24: conversion factor for luminous intensities
    pub intensity_conversion_factor: f64,
    /// 25: tilt of luminaire during measurement
    pub measurement_tilt: f64,
    /// 26: number n of standard sets of lamps
    pub lamp_set_count: usize,
    /// 26a-26f, one entry per lamp set
    pub number_lamps: Vec<i64>,
    pub lamp_types: Vec<String>,
    pub total_luminous_flux: Vec<f64>,
    pub color_temperatures: Vec<String>,
    pub color_rendering: Vec<String>,
    pub ballast_watts: Vec<f64>,
    /// 27
    pub direct_ratios: [f64; DIRECT_RATIO_COUNT],
    /// 28: C angles, beginning with 0
    pub angles_c: Vec<f64>,
    /// 29: G angles, beginning with 0
    pub angles_g: Vec<f64>,
    /// 30: intensities in cd/klm, stored planes back to back
    pub intensity_raw: Vec<f64>,
    /// 30 split into stored planes; always derived from `intensity_raw`
    pub intensity_by_plane: Vec<Vec<f64>>,
}

/// One lamp set (fields 26a-26f).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LampSet<'a> {
    pub number_lamps: i64,
    pub lamp_type: &'a str,
    pub total_luminous_flux: f64,
    pub color_temperature: &'a str,
    pub color_rendering: &'a str,
    pub ballast_watts: f64,
}

impl Eulumdat {
    /// Stored plane range for the current symmetry and plane count.
    pub fn plane_range(&self) -> PlaneRange {
        self.symmetry.plane_range(self.c_plane_count)
    }

    /// Expected length of [`Eulumdat::intensity_raw`].
    ///
    /// Fails with [`LuxError::InvalidField`] when the plane and intensity
    /// counts multiply past `usize`.
    pub fn expected_raw_len(&self) -> Result<usize> {
        let range = self.plane_range();
        range.raw_len(self.g_count).ok_or_else(|| {
            LuxError::invalid_field(
                "LuminousIntensityDistributionRaw",
                format!("{} planes of {} intensities overflows", range.mc, self.g_count),
            )
        })
    }

    /// `intensity_raw` split into stored planes of `g_count` values.
    pub fn planes_from_raw(&self) -> Result<Vec<Vec<f64>>> {
        let expected = self.expected_raw_len()?;
        if self.intensity_raw.len() != expected {
            return Err(LuxError::mismatch(
                "LuminousIntensityDistributionRaw",
                expected,
                self.intensity_raw.len(),
            ));
        }
        if self.g_count == 0 {
            let mc = self.plane_range().mc;
            let mut planes = Vec::new();
            planes.try_reserve_exact(mc).map_err(|_| {
                LuxError::invalid_field("NumberCPlanes", format!("cannot hold {} planes", mc))
            })?;
            planes.resize(mc, Vec::new());
            return Ok(planes);
        }
        Ok(self
            .intensity_raw
            .chunks(self.g_count)
            .map(<[f64]>::to_vec)
            .collect())
    }

    /// Recompute `intensity_by_plane` from `intensity_raw`.
    pub fn refresh_planes(&mut self) -> Result<()> {
        self.intensity_by_plane = self.planes_from_raw()?;
        Ok(())
    }

    /// Lamp set at `index`, if all per-set arrays reach that far.
    pub fn lamp_set(&self, index: usize) -> Option<LampSet<'_>> {
        Some(LampSet {
            number_lamps: *self.number_lamps.get(index)?,
            lamp_type: self.lamp_types.get(index)?,
            total_luminous_flux: *self.total_luminous_flux.get(index)?,
            color_temperature: self.color_temperatures.get(index)?,
            color_rendering: self.color_rendering.get(index)?,
            ballast_watts: *self.ballast_watts.get(index)?,
        })
    }

    /// Append a lamp set, keeping the per-set arrays and the count in step.
    pub fn push_lamp_set(&mut self, set: LampSet<'_>) {
        self.number_lamps.push(set.number_lamps);
        self.lamp_types.push(set.lamp_type.to_string());
        self.total_luminous_flux.push(set.total_luminous_flux);
        self.color_temperatures.push(set.color_temperature.to_string());
        self.color_rendering.push(set.color_rendering.to_string());
        self.ballast_watts.push(set.ballast_watts);
        self.lamp_set_count = self.number_lamps.len();
    }
}

impl Default for Eulumdat {
    fn default() -> Self {
        Self {
            company_identification: String::new(),
            type_indicator: 1,
            symmetry: Symmetry::None,
            c_plane_count: 0,
            c_plane_spacing: 0.0,
            g_count: 0,
            g_spacing: 0.0,
            measurement_report_number: String::new(),
            luminaire_name: String::new(),
            luminaire_number: String::new(),
            file_name: String::new(),
            date_user: String::new(),
            length_diameter: 0.0,
            width_luminaire: 0.0,
            height_luminaire: 0.0,
            length_diameter_luminous_area: 0.0,
            width_luminous_area: 0.0,
            height_luminous_area_c0: 0.0,
            height_luminous_area_c90: 0.0,
            height_luminous_area_c180: 0.0,
            height_luminous_area_c270: 0.0,
            downward_flux_fraction: 0.0,
            light_output_ratio: 0.0,
            intensity_conversion_factor: 1.0,
            measurement_tilt: 0.0,
            lamp_set_count: 0,
            number_lamps: Vec::new(),
            lamp_types: Vec::new(),
            total_luminous_flux: Vec::new(),
            color_temperatures: Vec::new(),
            color_rendering: Vec::new(),
            ballast_watts: Vec::new(),
            direct_ratios: [0.0; DIRECT_RATIO_COUNT],
            angles_c: Vec::new(),
            angles_g: Vec::new(),
            intensity_raw: Vec::new(),
            intensity_by_plane: Vec::new(),
        }
    }
}
