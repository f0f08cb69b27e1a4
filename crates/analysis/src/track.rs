//! Track entities: point masses, vectors, and calibration tools.
//!
//! Tracks are ECS entities carrying a [`Track`] component. The toolbar never
//! owns tracks; it queries them and fans display flags out during
//! reconciliation. Geometry and physics live elsewhere -- the only spatial
//! data kept here is the per-frame [`Step`] map that calibration tools use.

use bevy::prelude::*;
use std::collections::BTreeMap;

/// Fixed alphabet used to disambiguate generated track names ("Stick A",
/// "Stick B", ...).
pub const NAME_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Track kind
// =============================================================================

/// Every track variant the document can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    /// An independent point mass.
    PointMass,
    /// Composite point mass derived from others; excluded from mass totals.
    CenterOfMass,
    /// Composite point mass modeling a dynamic system; excluded from mass totals.
    DynamicSystem,
    /// A free vector.
    Vector,
    /// Fixed-length calibration stick.
    CalibrationStick,
    /// Adjustable calibration tape.
    CalibrationTape,
    /// Two-point calibration.
    CalibrationPoints,
    /// Offset-origin tool.
    OffsetOrigin,
    /// The coordinate axes.
    Axes,
}

impl TrackKind {
    /// True for all point-mass variants, composite or not.
    pub fn is_point_mass(self) -> bool {
        matches!(
            self,
            TrackKind::PointMass | TrackKind::CenterOfMass | TrackKind::DynamicSystem
        )
    }

    /// True only for independent point masses; composites are excluded so
    /// mass totals never double count.
    pub fn is_independent_point_mass(self) -> bool {
        self == TrackKind::PointMass
    }

    /// True for the four calibration tool variants.
    pub fn is_calibration_tool(self) -> bool {
        matches!(
            self,
            TrackKind::CalibrationStick
                | TrackKind::CalibrationTape
                | TrackKind::CalibrationPoints
                | TrackKind::OffsetOrigin
        )
    }

    /// User tracks are the ones listed in track menus: point masses and
    /// vectors, but not axes or calibration tools.
    pub fn is_user_track(self) -> bool {
        self.is_point_mass() || self == TrackKind::Vector
    }

    /// Display name for new-track menus.
    pub fn label(self) -> &'static str {
        match self {
            TrackKind::PointMass => "Point Mass",
            TrackKind::CenterOfMass => "Center of Mass",
            TrackKind::DynamicSystem => "Dynamic System",
            TrackKind::Vector => "Vector",
            TrackKind::CalibrationStick => "Calibration Stick",
            TrackKind::CalibrationTape => "Calibration Tape",
            TrackKind::CalibrationPoints => "Calibration Points",
            TrackKind::OffsetOrigin => "Offset Origin",
            TrackKind::Axes => "Axes",
        }
    }
}

// =============================================================================
// Footprints and steps
// =============================================================================

/// Drawable representation of a direction vector. Reconciliation writes the
/// stretch factor and head style; rendering reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowFootprint {
    /// Integer base stretch, possibly mass-weighted into a fraction.
    pub stretch: f64,
    /// Acceleration arrows render solid-headed, velocity arrows open-headed.
    pub solid_head: bool,
}

impl Default for ArrowFootprint {
    fn default() -> Self {
        Self {
            stretch: 1.0,
            solid_head: false,
        }
    }
}

/// One frame's worth of marked points for a track. Calibration tools use up
/// to two points per step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Step {
    pub points: [Option<Vec2>; 2],
}

impl Step {
    /// A two-ended step, e.g. a stick laid between two points.
    pub fn two_ended(a: Vec2, b: Vec2) -> Self {
        Self {
            points: [Some(a), Some(b)],
        }
    }

    /// True when the second point has been placed.
    pub fn has_second_point(&self) -> bool {
        self.points[1].is_some()
    }
}

// =============================================================================
// Track component
// =============================================================================

/// A trackable entity in the analysis document.
///
/// The display-flag fields are owned by toolbar reconciliation: every full
/// refresh overwrites them wholesale from the current preferences.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Track {
    /// Monotonic per-document number, used for stable iteration order.
    pub number: u32,
    pub name: String,
    pub kind: TrackKind,
    /// Only meaningful for point-mass kinds.
    pub mass: f64,
    pub visible: bool,
    pub locked: bool,
    pub trail_length: i32,
    pub trail_visible: bool,
    pub trace_visible: bool,
    pub positions_visible: bool,
    pub velocities_visible: bool,
    pub accelerations_visible: bool,
    pub labels_visible: bool,
    pub velocity_footprint: ArrowFootprint,
    pub acceleration_footprint: ArrowFootprint,
    /// Set when stale rendering must be erased before the next repaint.
    pub dirty: bool,
    steps: BTreeMap<u32, Step>,
}

impl Track {
    pub fn new(kind: TrackKind, name: impl Into<String>, number: u32) -> Self {
        Self {
            number,
            name: name.into(),
            kind,
            mass: if kind.is_point_mass() { 1.0 } else { 0.0 },
            visible: true,
            locked: false,
            trail_length: 1,
            trail_visible: true,
            trace_visible: false,
            positions_visible: true,
            velocities_visible: false,
            accelerations_visible: false,
            labels_visible: true,
            velocity_footprint: ArrowFootprint::default(),
            acceleration_footprint: ArrowFootprint {
                stretch: 1.0,
                solid_head: true,
            },
            dirty: false,
            steps: BTreeMap::new(),
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn step(&self, frame: u32) -> Option<&Step> {
        self.steps.get(&frame)
    }

    pub fn set_step(&mut self, frame: u32, step: Step) {
        self.steps.insert(frame, step);
    }

    /// Marks stale rendering for erasure before the next repaint.
    pub fn erase(&mut self) {
        self.dirty = true;
    }
}

/// Source of per-document track numbers.
#[derive(Resource, Default)]
pub struct TrackCounter(u32);

impl TrackCounter {
    pub fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

/// Picks the first unused letter suffix for `base` against the existing
/// track names, so generated tools read "Stick A", "Stick B", ...
///
/// Falls back to 'Z' when the alphabet is exhausted.
pub fn next_letter_suffix<'a>(base: &str, existing: impl Iterator<Item = &'a str>) -> char {
    let taken: Vec<&str> = existing.collect();
    for letter in NAME_ALPHABET.chars() {
        let candidate = format!("{base} {letter}");
        if !taken.iter().any(|name| **name == candidate) {
            return letter;
        }
    }
    'Z'
}
