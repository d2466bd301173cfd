//! Symmetry indicator and the C-plane ranges it implies.
//!
//! ```text
//! I_sym    M_c1         M_c2           planes stored
//! 0        1            M_c            M_c
//! 1        1            1              1
//! 2        1            M_c/2+1        M_c/2+1
//! 3        3*M_c/4+1    M_c1+M_c/2     M_c/2+1
//! 4        1            M_c/4+1        M_c/4+1
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::{LuxError, Result};

/// EULUMDAT symmetry indicator `I_sym`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Symmetry {
    /// 0: no symmetry
    None,
    /// 1: symmetry about the vertical axis
    VerticalAxis,
    /// 2: symmetry to plane C0-C180
    PlaneC0C180,
    /// 3: symmetry to plane C90-C270
    PlaneC90C270,
    /// 4: symmetry to planes C0-C180 and C90-C270
    BothPlanes,
}

impl Symmetry {
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::VerticalAxis),
            2 => Ok(Self::PlaneC0C180),
            3 => Ok(Self::PlaneC90C270),
            4 => Ok(Self::BothPlanes),
            value => Err(LuxError::InvalidSymmetry { value }),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::VerticalAxis => 1,
            Self::PlaneC0C180 => 2,
            Self::PlaneC90C270 => 3,
            Self::BothPlanes => 4,
        }
    }

    /// Stored plane range for `c_planes` (`M_c`) C-planes.
    pub fn plane_range(&self, c_planes: usize) -> PlaneRange {
        let mc = c_planes;
        let (mc1, mc2, stored) = match self {
            Self::None => (1, mc, mc),
            Self::VerticalAxis => (1, 1, 1),
            Self::PlaneC0C180 => (1, mc / 2 + 1, mc / 2 + 1),
            Self::PlaneC90C270 => {
                // floor(3 * mc / 4) without overflowing for huge counts
                let mc1 = mc / 4 * 3 + mc % 4 * 3 / 4 + 1;
                (mc1, mc1.saturating_add(mc / 2), mc / 2 + 1)
            }
            Self::BothPlanes => (1, mc / 4 + 1, mc / 4 + 1),
        };
        PlaneRange { mc1, mc2, mc: stored }
    }

    /// Whether beam widths read from a single plane describe the luminaire.
    pub fn supports_beam_width(&self) -> bool {
        matches!(self, Self::VerticalAxis | Self::BothPlanes)
    }
}

impl fmt::Display for Symmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 1-based plane bounds derived from the symmetry indicator.
///
/// `mc1..=mc2` may run past `M_c` for [`Symmetry::PlaneC90C270`]; those
/// planes wrap around to C0..C90.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneRange {
    pub mc1: usize,
    pub mc2: usize,
    /// Number of planes the raw intensities are reshaped into
    pub mc: usize,
}

impl PlaneRange {
    /// Number of raw intensity samples for `g_count` intensities per plane,
    /// or `None` if it does not fit in `usize`.
    pub fn raw_len(&self, g_count: usize) -> Option<usize> {
        self.mc.checked_mul(g_count)
    }

    /// Index into the C-angle array for stored plane `plane`.
    pub fn c_index(&self, plane: usize, c_planes: usize) -> Option<usize> {
        if c_planes == 0 || plane >= self.mc {
            return None;
        }
        let index = (self.mc1 as u128 - 1 + plane as u128) % c_planes as u128;
        usize::try_from(index).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Symmetry; 5] = [
        Symmetry::None,
        Symmetry::VerticalAxis,
        Symmetry::PlaneC0C180,
        Symmetry::PlaneC90C270,
        Symmetry::BothPlanes,
    ];

    #[test]
    fn test_table_for_24_planes() {
        let r = |s: Symmetry| s.plane_range(24);
        assert_eq!(r(Symmetry::None), PlaneRange { mc1: 1, mc2: 24, mc: 24 });
        assert_eq!(r(Symmetry::VerticalAxis), PlaneRange { mc1: 1, mc2: 1, mc: 1 });
        assert_eq!(r(Symmetry::PlaneC0C180), PlaneRange { mc1: 1, mc2: 13, mc: 13 });
        assert_eq!(r(Symmetry::PlaneC90C270), PlaneRange { mc1: 19, mc2: 31, mc: 13 });
        assert_eq!(r(Symmetry::BothPlanes), PlaneRange { mc1: 1, mc2: 7, mc: 7 });
    }

    #[test]
    fn test_range_consistent_for_all_plane_counts() {
        for symmetry in ALL {
            for c_planes in 1..=72 {
                let range = symmetry.plane_range(c_planes);
                assert!(range.mc2 >= range.mc1, "{:?} {}", symmetry, c_planes);
                assert_eq!(range.mc2 - range.mc1 + 1, range.mc, "{:?} {}", symmetry, c_planes);
                for g in [0, 1, 19, 37] {
                    assert_eq!(range.raw_len(g), Some(range.mc * g));
                }
            }
        }
    }

    #[test]
    fn test_huge_plane_counts_do_not_overflow() {
        for symmetry in ALL {
            let range = symmetry.plane_range(usize::MAX);
            assert!(range.mc >= 1);
            assert_eq!(range.raw_len(0), Some(0));
            assert_eq!(range.raw_len(1), Some(range.mc));
            if range.mc > 1 {
                assert_eq!(range.raw_len(usize::MAX), None, "{:?}", symmetry);
            }
            assert!(range.c_index(0, usize::MAX).is_some());
        }

        let range = Symmetry::PlaneC90C270.plane_range(usize::MAX);
        assert_eq!(range.mc1, usize::MAX / 4 * 3 + 3);
        assert_eq!(range.mc2, usize::MAX);
    }

    #[test]
    fn test_codes_round_trip() {
        for symmetry in ALL {
            assert_eq!(Symmetry::from_code(symmetry.code() as i64).unwrap(), symmetry);
        }
        assert!(matches!(
            Symmetry::from_code(5),
            Err(LuxError::InvalidSymmetry { value: 5 })
        ));
    }

    #[test]
    fn test_c_index_wraps_for_c90_c270() {
        let range = Symmetry::PlaneC90C270.plane_range(24);
        assert_eq!(range.c_index(0, 24), Some(18));
        assert_eq!(range.c_index(6, 24), Some(0));
        assert_eq!(range.c_index(12, 24), Some(6));
        assert_eq!(range.c_index(13, 24), None);
    }
}
