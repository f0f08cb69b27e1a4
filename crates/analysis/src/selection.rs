//! Selected track / point / steps.

use bevy::prelude::*;

/// Reference to one marked point of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRef {
    pub track: Entity,
    pub frame: u32,
    pub index: usize,
}

/// Reference to a whole step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRef {
    pub track: Entity,
    pub frame: u32,
}

/// The track currently selected for editing, if any.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SelectedTrack(pub Option<Entity>);

/// The point currently selected for editing, if any.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SelectedPoint(pub Option<PointRef>);

/// Multi-selected steps.
#[derive(Resource, Debug, Default, Clone)]
pub struct SelectedSteps(pub Vec<StepRef>);

/// Clears point and step selection; most toolbar actions do this before
/// mutating display state so stale handles never outlive a rebuild.
pub fn clear_point_selection(point: &mut SelectedPoint, steps: &mut SelectedSteps) {
    point.0 = None;
    steps.0.clear();
}
