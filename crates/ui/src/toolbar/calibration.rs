//! Calibration button controller.
//!
//! The composite toolbar toggle shows and hides the remembered set of
//! calibration tools as a unit; the popup toggles individual tools and
//! creates new ones. All mutations funnel through [`CalibrationTools`] so
//! the show/hide/select bookkeeping stays in one place.

use analysis::calibration::{CalibrationLatch, VisibleTools};
use analysis::events::{SelectedTrackChanged, ToolVisibilityChanged, TrackAdded, TrackRemoved, TracksCleared};
use analysis::selection::{clear_point_selection, SelectedPoint, SelectedSteps, SelectedTrack};
use analysis::track::{next_letter_suffix, Step, Track, TrackCounter, TrackKind};
use analysis::video::{VideoClip, Viewport, DEFAULT_STICK_LENGTH};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::reconcile::LockedSubscriptions;

/// Derived selection state of the composite calibration toggle. Pinned
/// selected by reconciliation once the session latch has flipped.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct CompositeSelected(pub bool);

/// Host configuration for tool creation.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CalibrationOptions {
    /// Materialize a default-length step, centered on the viewport, for
    /// newly created sticks and tapes.
    pub center_new_sticks: bool,
}

impl Default for CalibrationOptions {
    fn default() -> Self {
        Self {
            center_new_sticks: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Everything the calibration operations touch, bundled so callers (the
/// action system, tests) get the full controller as one parameter.
#[derive(SystemParam)]
pub struct CalibrationTools<'w, 's> {
    commands: Commands<'w, 's>,
    tracks: Query<'w, 's, (Entity, &'static mut Track)>,
    visible: ResMut<'w, VisibleTools>,
    latch: ResMut<'w, CalibrationLatch>,
    composite: ResMut<'w, CompositeSelected>,
    selected: ResMut<'w, SelectedTrack>,
    selected_point: ResMut<'w, SelectedPoint>,
    selected_steps: ResMut<'w, SelectedSteps>,
    counter: ResMut<'w, TrackCounter>,
    clip: Res<'w, VideoClip>,
    viewport: Res<'w, Viewport>,
    options: Res<'w, CalibrationOptions>,
    visibility_events: EventWriter<'w, ToolVisibilityChanged>,
    added_events: EventWriter<'w, TrackAdded>,
    selection_events: EventWriter<'w, SelectedTrackChanged>,
}

impl CalibrationTools<'_, '_> {
    fn any_tool_visible(&self) -> bool {
        self.tracks
            .iter()
            .any(|(_, track)| track.kind.is_calibration_tool() && track.visible)
    }

    /// The composite toggle: with nothing visible, show the remembered set
    /// and select; otherwise hide every calibration tool and deselect.
    pub fn toggle_composite(&mut self) {
        if !self.any_tool_visible() {
            let remembered: Vec<Entity> = self.visible.iter().collect();
            for entity in remembered {
                self.show_tool(entity);
            }
            self.composite.0 = true;
        } else {
            let all: Vec<Entity> = self
                .tracks
                .iter()
                .filter(|(_, track)| track.kind.is_calibration_tool())
                .map(|(entity, _)| entity)
                .collect();
            for entity in all {
                self.hide_tool(entity);
            }
            self.composite.0 = false;
        }
    }

    /// Flips one tool. Showing one adds it to the set and re-shows the whole
    /// set (idempotent); hiding one drops it from the set and recomputes the
    /// composite selection from what is still visible.
    pub fn toggle_one(&mut self, entity: Entity) {
        // only live calibration tracks may enter the set
        let Ok((_, track)) = self.tracks.get(entity) else {
            return;
        };
        if !track.kind.is_calibration_tool() {
            return;
        }
        let is_visible = track.visible;
        if !is_visible {
            self.visible.insert(entity);
            let remembered: Vec<Entity> = self.visible.iter().collect();
            for tool in remembered {
                self.show_tool(tool);
            }
            self.composite.0 = true;
        } else {
            self.visible.remove(entity);
            self.hide_tool(entity);
            self.composite.0 = self.any_tool_visible();
        }
    }

    /// Shows a calibration tool. Selects it when a 2-point calibration or
    /// offset-origin tool has no usable step on the current frame, inviting
    /// immediate placement.
    pub fn show_tool(&mut self, entity: Entity) {
        let Ok((_, mut track)) = self.tracks.get_mut(entity) else {
            return;
        };
        if !track.kind.is_calibration_tool() {
            return;
        }
        track.erase();
        track.visible = true;
        let invites_placement = matches!(
            track.kind,
            TrackKind::CalibrationPoints | TrackKind::OffsetOrigin
        ) && track
            .step(self.clip.frame_number)
            .is_none_or(|step| !step.has_second_point());
        self.visible.insert(entity);
        self.latch.mark_calibrated();
        if invites_placement && self.selected.0 != Some(entity) {
            self.selected.0 = Some(entity);
            clear_point_selection(&mut self.selected_point, &mut self.selected_steps);
            self.selection_events.send(SelectedTrackChanged(Some(entity)));
        }
        self.visibility_events.send(ToolVisibilityChanged(entity));
    }

    /// Hides a calibration tool; clears selection if it was selected.
    pub fn hide_tool(&mut self, entity: Entity) {
        let Ok((_, mut track)) = self.tracks.get_mut(entity) else {
            return;
        };
        if !track.kind.is_calibration_tool() {
            return;
        }
        track.erase();
        track.visible = false;
        if self.selected.0 == Some(entity) {
            self.selected.0 = None;
            clear_point_selection(&mut self.selected_point, &mut self.selected_steps);
            self.selection_events.send(SelectedTrackChanged(None));
        }
        self.visibility_events.send(ToolVisibilityChanged(entity));
    }

    /// Creates a track of any kind, names it with the next unused letter
    /// suffix, and selects it. Calibration kinds are additionally shown and
    /// remembered; sticks and tapes get a default step when configured, and
    /// the point/origin tools also bring the axes into view.
    pub fn create_track(&mut self, kind: TrackKind) -> Entity {
        let base = kind.label();
        let names: Vec<String> = self.tracks.iter().map(|(_, t)| t.name.clone()).collect();
        let letter = next_letter_suffix(base, names.iter().map(String::as_str));
        let number = self.counter.next();
        let mut track = Track::new(kind, format!("{base} {letter}"), number);
        if self.options.center_new_sticks
            && matches!(kind, TrackKind::CalibrationStick | TrackKind::CalibrationTape)
        {
            let half = Vec2::new(DEFAULT_STICK_LENGTH / 2.0, 0.0);
            let center = self.viewport.center;
            track.set_step(
                self.clip.frame_number,
                Step::two_ended(center - half, center + half),
            );
        }
        let entity = self.commands.spawn(track).id();
        if kind.is_calibration_tool() {
            self.visible.insert(entity);
            self.latch.mark_calibrated();
            self.composite.0 = true;
            self.visibility_events.send(ToolVisibilityChanged(entity));
            if matches!(kind, TrackKind::CalibrationPoints | TrackKind::OffsetOrigin) {
                self.show_axes();
            }
        }
        self.select(entity);
        self.added_events.send(TrackAdded(entity));
        entity
    }

    /// Creates a point mass named after pasted tabular data.
    pub fn create_imported_point_mass(&mut self, name: &str) -> Entity {
        let number = self.counter.next();
        let entity = self
            .commands
            .spawn(Track::new(TrackKind::PointMass, name, number))
            .id();
        self.select(entity);
        self.added_events.send(TrackAdded(entity));
        entity
    }

    /// Flips the axes track's visibility.
    pub fn toggle_axes(&mut self) {
        let axes: Vec<(Entity, bool)> = self
            .tracks
            .iter()
            .filter(|(_, track)| track.kind == TrackKind::Axes)
            .map(|(entity, track)| (entity, track.visible))
            .collect();
        for (entity, was_visible) in axes {
            if let Ok((_, mut track)) = self.tracks.get_mut(entity) {
                track.erase();
                track.visible = !was_visible;
            }
            self.visibility_events.send(ToolVisibilityChanged(entity));
        }
    }

    fn show_axes(&mut self) {
        let hidden: Vec<Entity> = self
            .tracks
            .iter()
            .filter(|(_, track)| track.kind == TrackKind::Axes && !track.visible)
            .map(|(entity, _)| entity)
            .collect();
        for entity in hidden {
            if let Ok((_, mut track)) = self.tracks.get_mut(entity) {
                track.erase();
                track.visible = true;
            }
            self.visibility_events.send(ToolVisibilityChanged(entity));
        }
    }

    fn select(&mut self, entity: Entity) {
        self.selected.0 = Some(entity);
        clear_point_selection(&mut self.selected_point, &mut self.selected_steps);
        self.selection_events.send(SelectedTrackChanged(Some(entity)));
    }
}

// ---------------------------------------------------------------------------
// Removal bookkeeping
// ---------------------------------------------------------------------------

/// Keeps the visible-tool set a subset of the document's calibration tracks
/// and drops stale selection and subscriptions when tracks go away.
pub fn prune_removed_tools(
    mut removed: EventReader<TrackRemoved>,
    mut cleared: EventReader<TracksCleared>,
    mut visible: ResMut<VisibleTools>,
    mut subscriptions: ResMut<LockedSubscriptions>,
    mut selected: ResMut<SelectedTrack>,
    mut selection_events: EventWriter<SelectedTrackChanged>,
) {
    for event in removed.read() {
        if event.kind.is_calibration_tool() {
            visible.remove(event.entity);
        }
        subscriptions.forget(event.entity);
        if selected.0 == Some(event.entity) {
            selected.0 = None;
            selection_events.send(SelectedTrackChanged(None));
        }
    }
    if !cleared.is_empty() {
        cleared.clear();
        visible.clear();
        subscriptions.clear();
        if selected.0.take().is_some() {
            selection_events.send(SelectedTrackChanged(None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::test_harness::TestWorkspace;

    #[test]
    fn composite_toggle_shows_and_hides_the_remembered_set() {
        let mut ws = TestWorkspace::new();
        let stick = ws.create_tool(TrackKind::CalibrationStick);
        let tape = ws.create_tool(TrackKind::CalibrationTape);
        ws.tick();
        assert!(ws.track(stick).visible);
        assert!(ws.track(tape).visible);

        ws.toggle_composite();
        ws.tick();
        assert!(!ws.track(stick).visible);
        assert!(!ws.track(tape).visible);
        // the set remembers both tools while they are hidden
        assert!(ws.visible_tools().contains(stick));
        assert!(ws.visible_tools().contains(tape));

        ws.toggle_composite();
        ws.tick();
        assert!(ws.track(stick).visible);
        assert!(ws.track(tape).visible);
    }

    #[test]
    fn toggle_one_reshows_the_set_and_recomputes_composite_on_hide() {
        let mut ws = TestWorkspace::new();
        let stick = ws.create_tool(TrackKind::CalibrationStick);
        let tape = ws.create_tool(TrackKind::CalibrationTape);
        ws.toggle_composite(); // hide all
        ws.tick();

        ws.toggle_tool(stick);
        ws.tick();
        // showing one re-shows everything remembered
        assert!(ws.track(stick).visible);
        assert!(ws.track(tape).visible);

        ws.toggle_tool(stick);
        ws.toggle_tool(tape);
        ws.tick();
        assert!(!ws.track(stick).visible);
        assert!(!ws.track(tape).visible);
        assert!(!ws.visible_tools().contains(stick));
    }

    #[test]
    fn toggle_one_ignores_non_calibration_tracks() {
        let mut ws = TestWorkspace::new();
        let mass = ws.add_point_mass("mass A", 1.0);
        ws.app.world_mut().get_mut::<Track>(mass).unwrap().visible = false;

        ws.toggle_tool(mass);
        ws.tick();
        // the set only ever holds calibration tracks
        assert!(ws.visible_tools().is_empty());
        assert!(!ws.track(mass).visible);
        assert!(!ws.composite_selected());
    }

    #[test]
    fn toggle_one_ignores_despawned_entities() {
        let mut ws = TestWorkspace::new();
        let stick = ws.create_tool(TrackKind::CalibrationStick);
        let ghost = ws.app.world_mut().spawn_empty().id();
        ws.app.world_mut().despawn(ghost);

        ws.toggle_tool(ghost);
        ws.tick();
        assert!(ws.visible_tools().contains(stick));
        assert_eq!(ws.visible_tools().iter().count(), 1);
    }

    #[test]
    fn latch_flips_once_and_never_reverts() {
        let mut ws = TestWorkspace::new();
        assert!(!ws.latch_calibrated());
        let stick = ws.create_tool(TrackKind::CalibrationStick);
        assert!(ws.latch_calibrated());

        ws.toggle_tool(stick);
        ws.toggle_composite();
        ws.tick();
        assert!(ws.latch_calibrated());
        // the composite toggle stays pinned selected after reconciliation
        assert!(ws.composite_selected());
    }

    #[test]
    fn new_stick_gets_a_centered_default_step() {
        let mut ws = TestWorkspace::new();
        ws.app
            .world_mut()
            .resource_mut::<Viewport>()
            .center = Vec2::new(320.0, 240.0);
        let stick = ws.create_tool(TrackKind::CalibrationStick);
        let track = ws.track(stick);
        let step = track.step(0).expect("default step");
        assert_eq!(step.points[0], Some(Vec2::new(270.0, 240.0)));
        assert_eq!(step.points[1], Some(Vec2::new(370.0, 240.0)));
        assert_eq!(track.name, "Calibration Stick A");
    }

    #[test]
    fn point_calibration_creation_selects_and_shows_axes() {
        let mut ws = TestWorkspace::new();
        let axes = ws.add_track(TrackKind::Axes, "Axes");
        ws.app.world_mut().get_mut::<Track>(axes).unwrap().visible = false;

        let points = ws.create_tool(TrackKind::CalibrationPoints);
        ws.tick();
        assert!(ws.track(axes).visible);
        assert_eq!(ws.selected_track(), Some(points));
    }

    #[test]
    fn removing_a_tool_prunes_it_from_the_visible_set() {
        let mut ws = TestWorkspace::new();
        let stick = ws.create_tool(TrackKind::CalibrationStick);
        ws.tick();
        assert!(ws.visible_tools().contains(stick));

        ws.remove_track(stick);
        ws.tick();
        assert!(ws.visible_tools().is_empty());
        assert_eq!(ws.selected_track(), None);
    }

    #[test]
    fn clearing_tracks_empties_all_bookkeeping() {
        let mut ws = TestWorkspace::new();
        ws.create_tool(TrackKind::CalibrationStick);
        ws.create_tool(TrackKind::CalibrationTape);
        ws.tick();

        ws.clear_tracks();
        ws.tick();
        assert!(ws.visible_tools().is_empty());
        assert_eq!(ws.selected_track(), None);
    }
}
