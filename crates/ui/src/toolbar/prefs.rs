//! Persisted display preferences and the canonical option tables.

use analysis::Persistable;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Canonical trail lengths: 1 point (no trail), short, long, full.
/// The trail icon index is the position in this table.
pub const TRAIL_LENGTHS: [i32; 4] = [1, 4, 15, 0];

/// Display names matching [`TRAIL_LENGTHS`] positionally.
pub const TRAIL_NAMES: [&str; 4] = ["No Trail", "Short Trail", "Long Trail", "Full Trail"];

/// Discrete footprint stretch factors offered by the stretch menus.
pub const STRETCH_VALUES: [i32; 10] = [1, 2, 3, 4, 6, 8, 12, 16, 24, 32];

/// Largest relative font level the font-bigger button can reach.
pub const MAX_FONT_LEVEL: i32 = 6;

// =============================================================================
// Display preferences
// =============================================================================

/// User display preferences fanned out onto tracks by reconciliation.
///
/// Persisted under the documented keys; `trail_visible` is derived from the
/// trail length and not persisted.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayPreferences {
    pub trace: bool,
    pub position: bool,
    pub velocity: bool,
    pub acceleration: bool,
    pub labels: bool,
    pub multiply_by_mass: bool,
    pub trail_length: i32,
    pub stretch: i32,
    pub stretch_acceleration: i32,
    #[serde(skip)]
    pub trail_visible: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            trace: false,
            position: true,
            velocity: false,
            acceleration: false,
            labels: true,
            multiply_by_mass: false,
            trail_length: TRAIL_LENGTHS[1],
            stretch: 1,
            stretch_acceleration: 1,
            trail_visible: true,
        }
    }
}

impl DisplayPreferences {
    /// True when either stretch factor exceeds 1; drives the stretch toggle's
    /// selection and the reset item's enablement.
    pub fn stretch_active(&self) -> bool {
        self.stretch > 1 || self.stretch_acceleration > 1
    }

    /// Index of the trail icon for the current length, or `None` for a
    /// non-canonical value (self-heals to no icon change).
    pub fn trail_icon_index(&self) -> Option<usize> {
        TRAIL_LENGTHS.iter().position(|&n| n == self.trail_length)
    }

    /// Sets the trail length and the derived trail visibility (a length of
    /// one point means no visible trail).
    pub fn set_trail_length(&mut self, length: i32) {
        self.trail_length = length;
        self.trail_visible = length != 1;
    }

    /// Resets both stretch factors to 1.
    pub fn reset_stretch(&mut self) {
        self.stretch = 1;
        self.stretch_acceleration = 1;
    }
}

/// Load-side shape: `stretch_acceleration` was added later, so documents
/// written before it default that key to the velocity stretch.
#[derive(Deserialize)]
struct RawPreferences {
    trace: bool,
    position: bool,
    velocity: bool,
    acceleration: bool,
    labels: bool,
    multiply_by_mass: bool,
    trail_length: i32,
    stretch: i32,
    stretch_acceleration: Option<i32>,
}

impl From<RawPreferences> for DisplayPreferences {
    fn from(raw: RawPreferences) -> Self {
        Self {
            trace: raw.trace,
            position: raw.position,
            velocity: raw.velocity,
            acceleration: raw.acceleration,
            labels: raw.labels,
            multiply_by_mass: raw.multiply_by_mass,
            trail_length: raw.trail_length,
            stretch: raw.stretch,
            stretch_acceleration: raw.stretch_acceleration.unwrap_or(raw.stretch),
            trail_visible: raw.trail_length != 1,
        }
    }
}

impl Persistable for DisplayPreferences {
    const KEY: &'static str = "toolbar";

    fn save_value(&self) -> Option<serde_json::Value> {
        serde_json::to_value(self).ok()
    }

    fn load_value(value: &serde_json::Value) -> Self {
        match serde_json::from_value::<RawPreferences>(value.clone()) {
            Ok(raw) => raw.into(),
            Err(err) => {
                warn!("display preferences: malformed document entry, using defaults: {err}");
                Self::default()
            }
        }
    }
}

// =============================================================================
// Font level
// =============================================================================

/// Relative font size level, bounded to `0..=MAX_FONT_LEVEL`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FontLevel(pub i32);

impl FontLevel {
    pub fn can_shrink(&self) -> bool {
        self.0 > 0
    }

    pub fn can_grow(&self) -> bool {
        self.0 < MAX_FONT_LEVEL
    }

    pub fn shrink(&mut self) {
        if self.can_shrink() {
            self.0 -= 1;
        }
    }

    pub fn grow(&mut self) {
        if self.can_grow() {
            self.0 += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_trail_mapping() {
        let mut prefs = DisplayPreferences::default();
        for (index, &length) in TRAIL_LENGTHS.iter().enumerate() {
            prefs.set_trail_length(length);
            assert_eq!(prefs.trail_icon_index(), Some(index));
        }
        prefs.trail_length = 7;
        assert_eq!(prefs.trail_icon_index(), None);
    }

    #[test]
    fn trail_visibility_is_derived() {
        let mut prefs = DisplayPreferences::default();
        prefs.set_trail_length(1);
        assert!(!prefs.trail_visible);
        prefs.set_trail_length(0);
        assert!(prefs.trail_visible);
        prefs.set_trail_length(15);
        assert!(prefs.trail_visible);
    }

    #[test]
    fn saved_keys_match_the_document_contract() {
        let prefs = DisplayPreferences::default();
        let value = prefs.save_value().unwrap();
        let map = value.as_object().unwrap();
        for key in [
            "trace",
            "position",
            "velocity",
            "acceleration",
            "labels",
            "multiply_by_mass",
            "trail_length",
            "stretch",
            "stretch_acceleration",
        ] {
            assert!(map.contains_key(key), "missing key {key}");
        }
        assert!(!map.contains_key("trail_visible"));
    }

    #[test]
    fn load_defaults_missing_acceleration_stretch_to_velocity_stretch() {
        let value = json!({
            "trace": true,
            "position": false,
            "velocity": true,
            "acceleration": false,
            "labels": false,
            "multiply_by_mass": true,
            "trail_length": 15,
            "stretch": 8
        });
        let prefs = DisplayPreferences::load_value(&value);
        assert_eq!(prefs.stretch, 8);
        assert_eq!(prefs.stretch_acceleration, 8);
        assert!(prefs.trace);
        assert!(prefs.trail_visible);
    }

    #[test]
    fn load_keeps_explicit_acceleration_stretch() {
        let value = json!({
            "trace": false,
            "position": true,
            "velocity": false,
            "acceleration": false,
            "labels": true,
            "multiply_by_mass": false,
            "trail_length": 1,
            "stretch": 2,
            "stretch_acceleration": 12
        });
        let prefs = DisplayPreferences::load_value(&value);
        assert_eq!(prefs.stretch_acceleration, 12);
        assert!(!prefs.trail_visible);
    }

    #[test]
    fn malformed_load_falls_back_to_defaults() {
        let prefs = DisplayPreferences::load_value(&json!("not an object"));
        assert_eq!(prefs, DisplayPreferences::default());
    }

    #[test]
    fn stretch_active_and_reset() {
        let mut prefs = DisplayPreferences::default();
        assert!(!prefs.stretch_active());
        prefs.stretch_acceleration = 4;
        assert!(prefs.stretch_active());
        prefs.reset_stretch();
        assert!(!prefs.stretch_active());
    }

    #[test]
    fn font_level_bounds() {
        let mut level = FontLevel::default();
        assert!(!level.can_shrink());
        level.shrink();
        assert_eq!(level.0, 0);
        for _ in 0..20 {
            level.grow();
        }
        assert_eq!(level.0, MAX_FONT_LEVEL);
        assert!(!level.can_grow());
    }
}
