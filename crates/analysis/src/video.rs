//! Video clip, magnification, and viewport state.

use bevy::prelude::*;

/// Discrete zoom factors offered by the zoom popup, in ascending order.
pub const ZOOM_LEVELS: [f64; 7] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0];

/// Image-unit length of the default step materialized for new sticks and
/// tapes (50 units either side of the viewport center).
pub const DEFAULT_STICK_LENGTH: f32 = 100.0;

/// The loaded clip, if any, and the current frame number.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct VideoClip {
    pub loaded: bool,
    pub frame_number: u32,
}

/// Current zoom factor. `set_to_fit` is represented by whatever factor the
/// main view computes; the toolbar only formats it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Magnification {
    pub factor: f64,
}

impl Default for Magnification {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

impl Magnification {
    /// Zoom button label, e.g. "150%". No fraction digits.
    pub fn percent_label(&self) -> String {
        format!("{:.0}%", self.factor * 100.0)
    }
}

/// Center of the visible region in image units; used to place default steps
/// for newly created calibration sticks and tapes.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Viewport {
    pub center: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_label_rounds_to_whole_percent() {
        assert_eq!(Magnification { factor: 1.0 }.percent_label(), "100%");
        assert_eq!(Magnification { factor: 0.25 }.percent_label(), "25%");
        assert_eq!(Magnification { factor: 1.333 }.percent_label(), "133%");
    }

    #[test]
    fn zoom_levels_are_ascending() {
        for pair in ZOOM_LEVELS.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
