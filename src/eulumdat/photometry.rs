//! Derived photometric queries on the per-plane intensity table.

use super::model::Eulumdat;

/// Upper bound of the G range scanned for beam widths.
const BEAM_G_LIMIT: f64 = 90.0;

impl Eulumdat {
    /// Maximum intensity of stored plane `plane`.
    pub fn max_intensity_in_plane(&self, plane: usize) -> Option<f64> {
        self.intensity_by_plane.get(plane).and_then(|p| max_of(p))
    }

    /// Maximum intensity across all stored planes.
    pub fn max_intensity(&self) -> Option<f64> {
        max_of(self.intensity_by_plane.iter().flatten())
    }

    /// Index of the stored plane whose C-angle equals `c_angle` exactly.
    pub fn plane_index_for_angle(&self, c_angle: f64) -> Option<usize> {
        let range = self.plane_range();
        (0..range.mc).find(|&plane| {
            range
                .c_index(plane, self.c_plane_count)
                .and_then(|i| self.angles_c.get(i))
                .is_some_and(|&angle| angle == c_angle)
        })
    }

    /// Intensities of the stored plane at C-angle `c_angle`.
    pub fn plane_for_angle(&self, c_angle: f64) -> Option<&[f64]> {
        let index = self.plane_index_for_angle(c_angle)?;
        self.intensity_by_plane.get(index).map(Vec::as_slice)
    }

    /// Full width at half maximum of stored plane `plane`, in degrees.
    ///
    /// `None` unless the symmetry makes a single plane representative
    /// (indicator 1 or 4).
    pub fn fwhm(&self, plane: usize) -> Option<f64> {
        self.beam_width(plane, 2.0)
    }

    /// Full width at tenth maximum of stored plane `plane`, in degrees.
    pub fn fwtm(&self, plane: usize) -> Option<f64> {
        self.beam_width(plane, 10.0)
    }

    fn beam_width(&self, plane: usize, divisor: f64) -> Option<f64> {
        if !self.symmetry.supports_beam_width() {
            return None;
        }
        let intensities = self.intensity_by_plane.get(plane)?;
        let target = max_of(intensities)? / divisor;

        let mut best: Option<(f64, f64)> = None;
        for (&g, &value) in self.angles_g.iter().zip(intensities) {
            if g > BEAM_G_LIMIT {
                continue;
            }
            let distance = (value - target).abs();
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, g));
            }
        }
        best.map(|(_, g)| 2.0 * g)
    }
}

fn max_of<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().copied().reduce(f64::max)
}
