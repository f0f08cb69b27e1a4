//! Control presses as events.
//!
//! The render system never mutates the model; every press becomes a
//! [`ToolbarAction`] event and one system applies them. That keeps the
//! egui pass read-only and makes every user gesture drivable from tests.

use analysis::dialogs::{ClipInspectorState, DrawingControlState, NotesDialogState};
use analysis::events::{DialogClosed, MagnificationChanged, OpenExternalLink};
use analysis::track::TrackKind;
use analysis::video::Magnification;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::calibration::CalibrationTools;
use super::prefs::{DisplayPreferences, FontLevel};
use super::reconcile::RefreshRequest;

/// One user gesture on the toolbar.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    OpenFile,
    SaveFile,
    OpenLibrary,
    ToggleClipInspector,
    ToggleCalibrationComposite,
    ToggleCalibrationTool(Entity),
    CreateTrack(TrackKind),
    ImportClipboardData(String),
    ToggleAxes,
    OpenTrackControl,
    LaunchAutotracker,
    DeleteSelectedStep,
    HideTapeMeasurements,
    SetZoom(f64),
    SetTrailLength(i32),
    ToggleLabels,
    ToggleTrace,
    TogglePositions,
    ToggleVelocities,
    ToggleAccelerations,
    SetStretch(i32),
    SetAccelerationStretch(i32),
    ResetStretch,
    ToggleMultiplyByMass,
    ShrinkFont,
    GrowFont,
    ToggleDrawingControl,
    SetDrawingsVisible(bool),
    ToggleNotes,
    OpenPageLink(String),
    RefreshAll,
}

/// The collaborator-owned dialogs the toolbar toggles. Hiding one raises
/// [`DialogClosed`] so a light refresh follows.
#[derive(SystemParam)]
pub struct DialogControls<'w> {
    clip_inspector: ResMut<'w, ClipInspectorState>,
    drawing: ResMut<'w, DrawingControlState>,
    notes: ResMut<'w, NotesDialogState>,
    closed: EventWriter<'w, DialogClosed>,
}

impl DialogControls<'_> {
    fn toggle_clip_inspector(&mut self) {
        self.clip_inspector.visible = !self.clip_inspector.visible;
        if !self.clip_inspector.visible {
            self.closed.send(DialogClosed);
        }
    }

    fn toggle_drawing_control(&mut self) {
        self.drawing.control_visible = !self.drawing.control_visible;
        if !self.drawing.control_visible {
            self.closed.send(DialogClosed);
        }
    }

    fn set_drawings_visible(&mut self, visible: bool) {
        // the checkbox is disabled mid-gesture; guard against stale presses
        if !self.drawing.drawing_in_progress {
            self.drawing.drawings_visible = visible;
        }
    }

    fn toggle_notes(&mut self) {
        self.notes.visible = !self.notes.visible;
        if !self.notes.visible {
            self.closed.send(DialogClosed);
        }
    }
}

/// Applies queued toolbar actions to the model, queueing the refreshes the
/// mutations call for. File and track-dialog actions belong to shell
/// collaborators and are only logged here.
pub fn apply_toolbar_actions(
    mut actions: EventReader<ToolbarAction>,
    mut tools: CalibrationTools,
    mut prefs: ResMut<DisplayPreferences>,
    mut font: ResMut<FontLevel>,
    mut magnification: ResMut<Magnification>,
    mut dialogs: DialogControls,
    mut requests: ResMut<RefreshRequest>,
    mut magnification_events: EventWriter<MagnificationChanged>,
    mut links: EventWriter<OpenExternalLink>,
) {
    for action in actions.read() {
        match action {
            ToolbarAction::OpenFile
            | ToolbarAction::SaveFile
            | ToolbarAction::OpenLibrary
            | ToolbarAction::OpenTrackControl
            | ToolbarAction::LaunchAutotracker
            | ToolbarAction::DeleteSelectedStep
            | ToolbarAction::HideTapeMeasurements => {
                debug!("shell-owned action requested: {action:?}");
            }
            ToolbarAction::ToggleClipInspector => {
                dialogs.toggle_clip_inspector();
                requests.request_light();
            }
            ToolbarAction::ToggleCalibrationComposite => {
                tools.toggle_composite();
                requests.request_light();
            }
            ToolbarAction::ToggleCalibrationTool(entity) => {
                tools.toggle_one(*entity);
            }
            ToolbarAction::CreateTrack(kind) => {
                tools.create_track(*kind);
            }
            ToolbarAction::ImportClipboardData(name) => {
                tools.create_imported_point_mass(name);
            }
            ToolbarAction::ToggleAxes => {
                tools.toggle_axes();
            }
            ToolbarAction::SetZoom(factor) => {
                magnification.factor = *factor;
                magnification_events.send(MagnificationChanged);
            }
            ToolbarAction::SetTrailLength(length) => {
                prefs.set_trail_length(*length);
                requests.request_full();
            }
            ToolbarAction::ToggleLabels => {
                prefs.labels = !prefs.labels;
                requests.request_full();
            }
            ToolbarAction::ToggleTrace => {
                prefs.trace = !prefs.trace;
                requests.request_full();
            }
            ToolbarAction::TogglePositions => {
                prefs.position = !prefs.position;
                requests.request_full();
            }
            ToolbarAction::ToggleVelocities => {
                prefs.velocity = !prefs.velocity;
                requests.request_full();
            }
            ToolbarAction::ToggleAccelerations => {
                prefs.acceleration = !prefs.acceleration;
                requests.request_full();
            }
            ToolbarAction::SetStretch(value) => {
                prefs.stretch = *value;
                requests.request_full();
            }
            ToolbarAction::SetAccelerationStretch(value) => {
                prefs.stretch_acceleration = *value;
                requests.request_full();
            }
            ToolbarAction::ResetStretch => {
                prefs.reset_stretch();
                requests.request_full();
            }
            ToolbarAction::ToggleMultiplyByMass => {
                prefs.multiply_by_mass = !prefs.multiply_by_mass;
                requests.request_full();
            }
            ToolbarAction::ShrinkFont => {
                font.shrink();
                requests.request_light();
            }
            ToolbarAction::GrowFont => {
                font.grow();
                requests.request_light();
            }
            ToolbarAction::ToggleDrawingControl => {
                dialogs.toggle_drawing_control();
                requests.request_light();
            }
            ToolbarAction::SetDrawingsVisible(visible) => {
                dialogs.set_drawings_visible(*visible);
                requests.request_light();
            }
            ToolbarAction::ToggleNotes => {
                dialogs.toggle_notes();
                requests.request_light();
            }
            ToolbarAction::OpenPageLink(link) => {
                links.send(OpenExternalLink(link.clone()));
            }
            ToolbarAction::RefreshAll => {
                requests.request_full();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::catalog::ControlKey;
    use crate::toolbar::test_harness::TestWorkspace;

    #[test]
    fn velocity_toggle_fans_out_on_the_same_frame() {
        let mut ws = TestWorkspace::new();
        let mass = ws.add_point_mass("mass A", 1.0);
        ws.tick();
        assert!(!ws.track(mass).velocities_visible);

        ws.send_action(ToolbarAction::ToggleVelocities);
        ws.tick();
        assert!(ws.track(mass).velocities_visible);
        assert!(ws.controls().button(ControlKey::Velocities).unwrap().selected);
    }

    #[test]
    fn stretch_reset_clears_both_factors_and_deselects() {
        let mut ws = TestWorkspace::new();
        ws.send_action(ToolbarAction::SetStretch(8));
        ws.send_action(ToolbarAction::SetAccelerationStretch(4));
        ws.tick();
        assert!(ws.controls().button(ControlKey::Stretch).unwrap().selected);

        ws.send_action(ToolbarAction::ResetStretch);
        ws.tick();
        let prefs = ws.app.world().resource::<DisplayPreferences>();
        assert_eq!(prefs.stretch, 1);
        assert_eq!(prefs.stretch_acceleration, 1);
        assert!(!ws.controls().button(ControlKey::Stretch).unwrap().selected);
    }

    #[test]
    fn closing_the_notes_dialog_requests_a_light_refresh() {
        let mut ws = TestWorkspace::new();
        ws.send_action(ToolbarAction::ToggleNotes);
        ws.tick();
        assert!(ws.controls().button(ControlKey::Notes).unwrap().selected);

        ws.send_action(ToolbarAction::ToggleNotes);
        ws.tick();
        assert!(!ws.controls().button(ControlKey::Notes).unwrap().selected);
    }

    #[test]
    fn zoom_action_updates_magnification() {
        let mut ws = TestWorkspace::new();
        ws.send_action(ToolbarAction::SetZoom(2.0));
        ws.tick();
        let magnification = ws.app.world().resource::<Magnification>();
        assert_eq!(magnification.percent_label(), "200%");
    }

    #[test]
    fn font_actions_respect_bounds() {
        let mut ws = TestWorkspace::new();
        ws.send_action(ToolbarAction::ShrinkFont);
        ws.tick();
        assert_eq!(ws.app.world().resource::<FontLevel>().0, 0);
        assert!(!ws.controls().button(ControlKey::FontSmaller).unwrap().enabled);

        ws.send_action(ToolbarAction::GrowFont);
        ws.tick();
        assert_eq!(ws.app.world().resource::<FontLevel>().0, 1);
        assert!(ws.controls().button(ControlKey::FontSmaller).unwrap().enabled);
    }
}
