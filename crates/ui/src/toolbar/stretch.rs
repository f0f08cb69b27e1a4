//! Directional-footprint stretch factors, optionally mass-weighted.

use analysis::track::Track;

use super::prefs::STRETCH_VALUES;

/// Mass totals over *independent* point masses only. Composite masses
/// (center of mass, dynamic system) are excluded to avoid double counting.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MassTotals {
    pub total_mass: f64,
    pub count: u32,
}

/// Sums the independent point masses in the given tracks.
pub fn independent_mass_totals<'a>(tracks: impl Iterator<Item = &'a Track>) -> MassTotals {
    let mut totals = MassTotals::default();
    for track in tracks {
        if track.kind.is_independent_point_mass() {
            totals.total_mass += track.mass;
            totals.count += 1;
        }
    }
    totals
}

/// Footprint stretch for one track.
///
/// Mass-weighted mode normalizes so a track of average mass keeps the base
/// stretch: `base * count * mass / total_mass`. With no independent point
/// masses the total is zero; we fall back to `base` rather than divide.
pub fn stretch_for(base: i32, mass: f64, totals: MassTotals, mass_weighted: bool) -> f64 {
    if !mass_weighted || totals.total_mass == 0.0 {
        return f64::from(base);
    }
    f64::from(base) * f64::from(totals.count) * mass / totals.total_mass
}

/// Index of the stretch-menu entry selected for `current`, if canonical.
/// Values are unique, so there is never a tie.
pub fn selected_stretch_index(current: i32) -> Option<usize> {
    STRETCH_VALUES.iter().position(|&v| v == current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis::track::{Track, TrackKind};

    fn mass(kind: TrackKind, m: f64, n: u32) -> Track {
        Track::new(kind, format!("m{n}"), n).with_mass(m)
    }

    #[test]
    fn totals_skip_composites_and_non_masses() {
        let tracks = [
            mass(TrackKind::PointMass, 1.0, 1),
            mass(TrackKind::PointMass, 3.0, 2),
            mass(TrackKind::CenterOfMass, 4.0, 3),
            mass(TrackKind::DynamicSystem, 9.0, 4),
            Track::new(TrackKind::Vector, "v", 5),
        ];
        let totals = independent_mass_totals(tracks.iter());
        assert_eq!(totals.count, 2);
        assert!((totals.total_mass - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mass_weighted_example_from_two_masses() {
        // masses 1 and 3, total 4, count 2, base 2 => stretches 1 and 3
        let totals = MassTotals {
            total_mass: 4.0,
            count: 2,
        };
        assert!((stretch_for(2, 1.0, totals, true) - 1.0).abs() < f64::EPSILON);
        assert!((stretch_for(2, 3.0, totals, true) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unweighted_mode_uses_base() {
        let totals = MassTotals {
            total_mass: 4.0,
            count: 2,
        };
        assert!((stretch_for(6, 3.0, totals, false) - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_total_mass_falls_back_to_base() {
        let totals = MassTotals::default();
        assert!((stretch_for(4, 2.0, totals, true) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn selected_stretch_index_finds_canonical_values() {
        assert_eq!(selected_stretch_index(1), Some(0));
        assert_eq!(selected_stretch_index(32), Some(STRETCH_VALUES.len() - 1));
        assert_eq!(selected_stretch_index(5), None);
    }
}
