//! Shared two-region hit testing for split-zone buttons.
//!
//! A split-zone button toggles on a left-side press and opens a freshly
//! rebuilt popup on a right-side press. The threshold depends on the
//! rendered button width, which can change at runtime (display scaling),
//! so it is recomputed on every press.

/// Fixed offset added to the centered icon's left edge; presses inside the
/// icon up to this offset still count as the primary action.
pub const SPLIT_ZONE_OFFSET: f32 = 18.0;

/// Which region of a split-zone button a press landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressZone {
    /// Left region: the primary toggle action.
    Primary,
    /// Right region: open the popup.
    Popup,
}

/// Hit-test geometry for one split-zone button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitZone {
    pub icon_width: f32,
    pub offset: f32,
}

impl SplitZone {
    pub fn new(icon_width: f32) -> Self {
        Self {
            icon_width,
            offset: SPLIT_ZONE_OFFSET,
        }
    }

    /// Horizontal threshold in button-local coordinates: half the slack
    /// around the centered icon plus the fixed offset.
    pub fn threshold(&self, button_width: f32) -> f32 {
        (button_width - self.icon_width) / 2.0 + self.offset
    }

    /// Classifies a press at `press_x` (button-local) for the current
    /// rendered width. Presses at or right of the threshold open the popup.
    pub fn zone(&self, press_x: f32, button_width: f32) -> PressZone {
        if press_x < self.threshold(button_width) {
            PressZone::Primary
        } else {
            PressZone::Popup
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_centers_on_icon_slack() {
        let zone = SplitZone::new(28.0);
        // width 48 => slack 20, half 10, +18 = 28
        assert!((zone.threshold(48.0) - 28.0).abs() < f32::EPSILON);
    }

    #[test]
    fn press_left_of_threshold_is_primary() {
        let zone = SplitZone::new(28.0);
        assert_eq!(zone.zone(0.0, 48.0), PressZone::Primary);
        assert_eq!(zone.zone(27.9, 48.0), PressZone::Primary);
    }

    #[test]
    fn press_at_or_right_of_threshold_opens_popup() {
        let zone = SplitZone::new(28.0);
        assert_eq!(zone.zone(28.0, 48.0), PressZone::Popup);
        assert_eq!(zone.zone(47.0, 48.0), PressZone::Popup);
    }

    #[test]
    fn threshold_tracks_runtime_width_changes() {
        let zone = SplitZone::new(28.0);
        let narrow = zone.threshold(40.0);
        let wide = zone.threshold(80.0);
        assert!(wide > narrow);
        // a press that is primary on the narrow button is still primary on
        // the wide one (threshold only moves right)
        assert_eq!(zone.zone(narrow - 1.0, 80.0), PressZone::Primary);
    }
}
