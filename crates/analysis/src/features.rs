//! Capability flags gating toolbar control inclusion.
//!
//! Flags are supplied externally (preferences, deployment profile) and only
//! ever read by the toolbar. Unlisted keys default to enabled, so a fresh
//! document shows the full control set.

use bevy::prelude::*;
use std::collections::BTreeMap;

/// Capability keys understood by the toolbar.
pub mod keys {
    pub const FILE_OPEN: &str = "file.open";
    pub const FILE_SAVE: &str = "file.save";
    pub const FILE_LIBRARY: &str = "file.library";
    pub const CLIP_SETTINGS: &str = "button.clipSettings";
    pub const CALIBRATION_STICK: &str = "calibration.stick";
    pub const CALIBRATION_TAPE: &str = "calibration.tape";
    pub const CALIBRATION_POINTS: &str = "calibration.points";
    pub const CALIBRATION_OFFSET_ORIGIN: &str = "calibration.offsetOrigin";
    pub const AXES: &str = "button.axes";
    pub const TRACK_CREATE: &str = "track.create";
    pub const AUTOTRACK: &str = "track.autotrack";
    pub const TRAILS: &str = "button.trails";
    pub const LABELS: &str = "button.labels";
    pub const TRACE: &str = "button.path";
    pub const POSITIONS: &str = "button.x";
    pub const VELOCITIES: &str = "button.v";
    pub const ACCELERATIONS: &str = "button.a";
    pub const STRETCH: &str = "button.stretch";
    pub const MULTIPLY_BY_MASS: &str = "button.xMass";
    pub const DRAWING: &str = "button.drawing";

    /// The four calibration-tool creation capabilities.
    pub const CALIBRATION_ALL: [&str; 4] = [
        CALIBRATION_STICK,
        CALIBRATION_TAPE,
        CALIBRATION_POINTS,
        CALIBRATION_OFFSET_ORIGIN,
    ];
}

/// Read-only capability map. Never mutated by the toolbar core.
#[derive(Resource, Debug, Clone, Default)]
pub struct FeatureFlags {
    overrides: BTreeMap<String, bool>,
}

impl FeatureFlags {
    /// Pure lookup; unlisted keys are enabled.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.overrides.get(key).copied().unwrap_or(true)
    }

    /// Host-side setter used when loading a capability profile.
    pub fn set(&mut self, key: impl Into<String>, enabled: bool) {
        self.overrides.insert(key.into(), enabled);
    }

    /// True if any of the given keys is enabled.
    pub fn any_enabled<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> bool {
        candidates.into_iter().any(|key| self.is_enabled(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_keys_default_to_enabled() {
        let flags = FeatureFlags::default();
        assert!(flags.is_enabled(keys::FILE_OPEN));
        assert!(flags.is_enabled("some.future.key"));
    }

    #[test]
    fn overrides_win() {
        let mut flags = FeatureFlags::default();
        flags.set(keys::STRETCH, false);
        assert!(!flags.is_enabled(keys::STRETCH));
        flags.set(keys::STRETCH, true);
        assert!(flags.is_enabled(keys::STRETCH));
    }

    #[test]
    fn any_enabled_over_calibration_group() {
        let mut flags = FeatureFlags::default();
        assert!(flags.any_enabled(keys::CALIBRATION_ALL));
        for key in keys::CALIBRATION_ALL {
            flags.set(key, false);
        }
        assert!(!flags.any_enabled(keys::CALIBRATION_ALL));
        flags.set(keys::CALIBRATION_TAPE, true);
        assert!(flags.any_enabled(keys::CALIBRATION_ALL));
    }
}
