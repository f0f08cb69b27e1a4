//! Document-owned calibration bookkeeping.
//!
//! `VisibleTools` remembers which calibration tools the user keeps in view;
//! the composite toolbar toggle shows and hides this set as a unit. The
//! invariant that the set only ever holds calibration tracks present in the
//! document is maintained by the toolbar's prune pass on track removal.

use bevy::prelude::*;
use std::collections::BTreeSet;

/// Set of calibration-tool entities currently shown.
#[derive(Resource, Debug, Default, Clone)]
pub struct VisibleTools {
    shown: BTreeSet<Entity>,
}

impl VisibleTools {
    pub fn insert(&mut self, entity: Entity) {
        self.shown.insert(entity);
    }

    pub fn remove(&mut self, entity: Entity) {
        self.shown.remove(&entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.shown.contains(&entity)
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.shown.iter().copied()
    }

    pub fn clear(&mut self) {
        self.shown.clear();
    }
}

/// One-shot "has this session ever shown a calibration tool" latch.
///
/// Flips false -> true exactly once, the first time any tool becomes
/// visible, and never reverts; there is deliberately no way to unset it.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct CalibrationLatch {
    calibrated: bool,
}

impl CalibrationLatch {
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Marks the session calibrated. Idempotent.
    pub fn mark_calibrated(&mut self) {
        self.calibrated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_tools_set_semantics() {
        let mut tools = VisibleTools::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        assert!(tools.is_empty());
        tools.insert(a);
        tools.insert(a);
        tools.insert(b);
        assert_eq!(tools.iter().count(), 2);
        assert!(tools.contains(a));
        tools.remove(a);
        assert!(!tools.contains(a));
        tools.clear();
        assert!(tools.is_empty());
    }

    #[test]
    fn latch_never_reverts() {
        let mut latch = CalibrationLatch::default();
        assert!(!latch.is_calibrated());
        latch.mark_calibrated();
        assert!(latch.is_calibrated());
        latch.mark_calibrated();
        assert!(latch.is_calibrated());
    }
}
