//! The egui render pass.
//!
//! Draws the reconciled control list into a top panel and turns presses
//! into [`ToolbarAction`] events. Popups are rebuilt from the model on
//! every frame they are open, so their contents can never go stale.

use analysis::clipboard::ClipboardProbe;
use analysis::dialogs::DrawingControlState;
use analysis::features::{keys, FeatureFlags};
use analysis::page_views::ViewRegistry;
use analysis::track::{Track, TrackKind};
use analysis::video::{Magnification, ZOOM_LEVELS};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::actions::ToolbarAction;
use super::catalog::{ControlItem, ControlKey, ControlKind, ControlList, ToolbarControl};
use super::page_tabs::PageTabList;
use super::prefs::{DisplayPreferences, STRETCH_VALUES, TRAIL_LENGTHS, TRAIL_NAMES};
use super::reconcile::TrailIcon;
use super::split_zone::{PressZone, SplitZone};
use super::stretch::selected_stretch_index;

/// Nominal icon width used for split-zone hit testing on text buttons.
const SPLIT_ICON_WIDTH: f32 = 24.0;

/// Which popup, if any, is open under the toolbar.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OpenPopup(pub Option<PopupKind>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    Calibration,
    NewTrack,
    Zoom,
    Trails,
    Stretch,
    Drawing,
    PageLinks,
}

impl PopupKind {
    fn title(self) -> &'static str {
        match self {
            PopupKind::Calibration => "Calibration Tools",
            PopupKind::NewTrack => "New Track",
            PopupKind::Zoom => "Zoom",
            PopupKind::Trails => "Trails",
            PopupKind::Stretch => "Stretch",
            PopupKind::Drawing => "Drawings",
            PopupKind::PageLinks => "Page Links",
        }
    }
}

/// Model inputs the popups are rebuilt from each frame.
#[derive(SystemParam)]
pub struct PopupInputs<'w, 's> {
    pub prefs: Res<'w, DisplayPreferences>,
    pub page_tabs: Res<'w, PageTabList>,
    pub views: Res<'w, ViewRegistry>,
    pub probe: Res<'w, ClipboardProbe>,
    pub flags: Res<'w, FeatureFlags>,
    pub drawing: Res<'w, DrawingControlState>,
    pub tracks: Query<'w, 's, (Entity, &'static Track)>,
}

pub fn render_toolbar(
    mut contexts: EguiContexts,
    controls: Res<ControlList>,
    mut popup: ResMut<OpenPopup>,
    mut actions: EventWriter<ToolbarAction>,
    magnification: Res<Magnification>,
    trail_icon: Res<TrailIcon>,
    inputs: PopupInputs,
) {
    let ctx = contexts.ctx_mut();

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let split = controls
                .items
                .iter()
                .position(|item| matches!(item, ControlItem::Spacer));
            let (left, right) = match split {
                Some(index) => (&controls.items[..index], &controls.items[index + 1..]),
                None => (&controls.items[..], &[][..]),
            };
            for item in left {
                draw_item(ui, item, &mut popup, &mut actions, &magnification, &trail_icon);
            }
            // everything after the spacer sits flush right
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                for item in right.iter().rev() {
                    draw_item(ui, item, &mut popup, &mut actions, &magnification, &trail_icon);
                }
            });
        });
    });

    if let Some(kind) = popup.0 {
        draw_popup(ctx, kind, &mut popup, &mut actions, &inputs);
    }
}

fn draw_item(
    ui: &mut egui::Ui,
    item: &ControlItem,
    popup: &mut OpenPopup,
    actions: &mut EventWriter<ToolbarAction>,
    magnification: &Magnification,
    trail_icon: &TrailIcon,
) {
    match item {
        ControlItem::Separator => {
            ui.separator();
        }
        ControlItem::Spacer => {}
        ControlItem::Button(control) => {
            if !control.visible {
                return;
            }
            let label = match control.key {
                ControlKey::Zoom => magnification.percent_label(),
                // a non-canonical length keeps the generic label
                ControlKey::Trails => match trail_icon.0 {
                    Some(index) => TRAIL_NAMES[index].to_string(),
                    None => control.key.label().to_string(),
                },
                key => key.label().to_string(),
            };
            let widget = egui::SelectableLabel::new(control.selected, label);
            let response = ui.add_enabled(control.enabled, widget);
            if response.clicked() {
                dispatch(control, &response, popup, actions);
            }
        }
    }
}

fn dispatch(
    control: &ToolbarControl,
    response: &egui::Response,
    popup: &mut OpenPopup,
    actions: &mut EventWriter<ToolbarAction>,
) {
    if control.kind == ControlKind::SplitZone {
        let zone = press_zone(response);
        match (control.key, zone) {
            (ControlKey::Calibration, PressZone::Primary) => {
                actions.send(ToolbarAction::ToggleCalibrationComposite);
            }
            (ControlKey::Calibration, PressZone::Popup) => {
                popup.0 = Some(PopupKind::Calibration);
            }
            // an active stretch resets on the primary zone; otherwise the
            // whole button just opens the menu
            (ControlKey::Stretch, PressZone::Primary) if control.selected => {
                actions.send(ToolbarAction::ResetStretch);
            }
            (ControlKey::Stretch, _) => {
                popup.0 = Some(PopupKind::Stretch);
            }
            (ControlKey::Drawing, PressZone::Primary) => {
                actions.send(ToolbarAction::ToggleDrawingControl);
            }
            (ControlKey::Drawing, PressZone::Popup) => {
                popup.0 = Some(PopupKind::Drawing);
            }
            _ => {}
        }
        return;
    }
    match control.key {
        ControlKey::Open => {
            actions.send(ToolbarAction::OpenFile);
        }
        ControlKey::Save => {
            actions.send(ToolbarAction::SaveFile);
        }
        ControlKey::Library => {
            actions.send(ToolbarAction::OpenLibrary);
        }
        ControlKey::ClipSettings => {
            actions.send(ToolbarAction::ToggleClipInspector);
        }
        ControlKey::Axes => {
            actions.send(ToolbarAction::ToggleAxes);
        }
        ControlKey::NewTrack => popup.0 = Some(PopupKind::NewTrack),
        ControlKey::TrackControl => {
            actions.send(ToolbarAction::OpenTrackControl);
        }
        ControlKey::Autotracker => {
            actions.send(ToolbarAction::LaunchAutotracker);
        }
        ControlKey::DeleteStep => {
            actions.send(ToolbarAction::DeleteSelectedStep);
        }
        ControlKey::HideTape => {
            actions.send(ToolbarAction::HideTapeMeasurements);
        }
        ControlKey::Zoom => popup.0 = Some(PopupKind::Zoom),
        ControlKey::Trails => popup.0 = Some(PopupKind::Trails),
        ControlKey::Labels => {
            actions.send(ToolbarAction::ToggleLabels);
        }
        ControlKey::Trace => {
            actions.send(ToolbarAction::ToggleTrace);
        }
        ControlKey::Positions => {
            actions.send(ToolbarAction::TogglePositions);
        }
        ControlKey::Velocities => {
            actions.send(ToolbarAction::ToggleVelocities);
        }
        ControlKey::Accelerations => {
            actions.send(ToolbarAction::ToggleAccelerations);
        }
        ControlKey::MultiplyByMass => {
            actions.send(ToolbarAction::ToggleMultiplyByMass);
        }
        ControlKey::FontSmaller => {
            actions.send(ToolbarAction::ShrinkFont);
        }
        ControlKey::FontBigger => {
            actions.send(ToolbarAction::GrowFont);
        }
        ControlKey::Notes => {
            actions.send(ToolbarAction::ToggleNotes);
        }
        ControlKey::PageLinks => popup.0 = Some(PopupKind::PageLinks),
        ControlKey::Refresh => {
            actions.send(ToolbarAction::RefreshAll);
        }
        ControlKey::Calibration | ControlKey::Stretch | ControlKey::Drawing => {}
    }
}

/// Classifies a press on a split-zone button; the threshold is recomputed
/// from the rendered width on every press.
fn press_zone(response: &egui::Response) -> PressZone {
    let Some(pos) = response.interact_pointer_pos() else {
        return PressZone::Primary;
    };
    SplitZone::new(SPLIT_ICON_WIDTH).zone(pos.x - response.rect.left(), response.rect.width())
}

fn draw_popup(
    ctx: &egui::Context,
    kind: PopupKind,
    popup: &mut OpenPopup,
    actions: &mut EventWriter<ToolbarAction>,
    inputs: &PopupInputs,
) {
    let mut open = true;
    let mut close = false;
    egui::Window::new(kind.title())
        .id(egui::Id::new("toolbar_popup"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| match kind {
            PopupKind::Trails => {
                for (index, name) in TRAIL_NAMES.iter().enumerate() {
                    let selected = inputs.prefs.trail_icon_index() == Some(index);
                    if ui.selectable_label(selected, *name).clicked() {
                        actions.send(ToolbarAction::SetTrailLength(TRAIL_LENGTHS[index]));
                        close = true;
                    }
                }
            }
            PopupKind::Stretch => {
                ui.label("Velocity");
                let velocity_index = selected_stretch_index(inputs.prefs.stretch);
                for (index, &value) in STRETCH_VALUES.iter().enumerate() {
                    if ui
                        .selectable_label(velocity_index == Some(index), format!("{value}x"))
                        .clicked()
                    {
                        actions.send(ToolbarAction::SetStretch(value));
                        close = true;
                    }
                }
                ui.separator();
                ui.label("Acceleration");
                let acceleration_index =
                    selected_stretch_index(inputs.prefs.stretch_acceleration);
                for (index, &value) in STRETCH_VALUES.iter().enumerate() {
                    if ui
                        .selectable_label(acceleration_index == Some(index), format!("{value}x"))
                        .clicked()
                    {
                        actions.send(ToolbarAction::SetAccelerationStretch(value));
                        close = true;
                    }
                }
                ui.separator();
                let reset = egui::Button::new("Reset");
                if ui.add_enabled(inputs.prefs.stretch_active(), reset).clicked() {
                    actions.send(ToolbarAction::ResetStretch);
                    close = true;
                }
            }
            PopupKind::Zoom => {
                for &factor in &ZOOM_LEVELS {
                    let label = format!("{:.0}%", factor * 100.0);
                    if ui.button(label).clicked() {
                        actions.send(ToolbarAction::SetZoom(factor));
                        close = true;
                    }
                }
            }
            PopupKind::Calibration => {
                let mut tools: Vec<(Entity, &Track)> = inputs
                    .tracks
                    .iter()
                    .filter(|(_, track)| track.kind.is_calibration_tool())
                    .collect();
                tools.sort_by_key(|(_, track)| track.number);
                for (entity, track) in &tools {
                    if ui.selectable_label(track.visible, &track.name).clicked() {
                        actions.send(ToolbarAction::ToggleCalibrationTool(*entity));
                        close = true;
                    }
                }
                if !tools.is_empty() {
                    ui.separator();
                }
                let creatable = [
                    (keys::CALIBRATION_STICK, TrackKind::CalibrationStick),
                    (keys::CALIBRATION_TAPE, TrackKind::CalibrationTape),
                    (keys::CALIBRATION_POINTS, TrackKind::CalibrationPoints),
                    (keys::CALIBRATION_OFFSET_ORIGIN, TrackKind::OffsetOrigin),
                ];
                for (key, tool_kind) in creatable {
                    if !inputs.flags.is_enabled(key) {
                        continue;
                    }
                    if ui.button(format!("New {}", tool_kind.label())).clicked() {
                        actions.send(ToolbarAction::CreateTrack(tool_kind));
                        close = true;
                    }
                }
            }
            PopupKind::NewTrack => {
                let creatable = [
                    TrackKind::PointMass,
                    TrackKind::CenterOfMass,
                    TrackKind::Vector,
                    TrackKind::DynamicSystem,
                ];
                for track_kind in creatable {
                    if ui.button(track_kind.label()).clicked() {
                        actions.send(ToolbarAction::CreateTrack(track_kind));
                        close = true;
                    }
                }
                ui.separator();
                // the probe swallows platform failures; absent data just
                // leaves the item disabled
                match inputs.probe.pastable_data_name() {
                    Some(name) => {
                        if ui.button(format!("Paste Data: {name}")).clicked() {
                            actions.send(ToolbarAction::ImportClipboardData(name));
                            close = true;
                        }
                    }
                    None => {
                        let _ = ui.add_enabled(false, egui::Button::new("Paste Data"));
                    }
                }
            }
            PopupKind::Drawing => {
                let mut visible = inputs.drawing.drawings_visible;
                let checkbox = egui::Checkbox::new(&mut visible, "Show drawings");
                if ui
                    .add_enabled(!inputs.drawing.drawing_in_progress, checkbox)
                    .changed()
                {
                    actions.send(ToolbarAction::SetDrawingsVisible(visible));
                }
            }
            PopupKind::PageLinks => {
                for tab in &inputs.page_tabs.entries {
                    if let Some(link) = &tab.link {
                        if ui.button(&tab.title).clicked() {
                            actions.send(ToolbarAction::OpenPageLink(link.clone()));
                            close = true;
                        }
                    }
                }
                if !inputs.views.supplemental_files.is_empty() {
                    if !inputs.page_tabs.is_empty() {
                        ui.separator();
                    }
                    for file in &inputs.views.supplemental_files {
                        if ui.button(file).clicked() {
                            actions.send(ToolbarAction::OpenPageLink(file.clone()));
                            close = true;
                        }
                    }
                }
            }
        });
    if close || !open {
        popup.0 = None;
    }
}
