//! The reconciliation engine.
//!
//! Model changes never patch the toolbar directly. Mutation sites raise
//! change events; `queue_model_refreshes` maps those onto a queued refresh
//! request, and `process_refresh` drains the queue on the main schedule,
//! rebuilding the control list wholesale and (on a full refresh) fanning the
//! display preferences out onto every track. Running on one schedule keeps
//! mutation single-writer without locks, and the wholesale rebuild makes
//! every pass idempotent: transient inconsistencies self-heal next pass.

use analysis::calibration::CalibrationLatch;
use analysis::dialogs::{ClipInspectorState, DrawingControlState, NotesDialogState};
use analysis::events::{
    DialogClosed, MagnificationChanged, SelectedPointChanged, SelectedTrackChanged,
    ToolVisibilityChanged, TrackAdded, TrackLockedChanged, TrackRemoved, TracksCleared,
    VideoChanged,
};
use analysis::features::FeatureFlags;
use analysis::page_views::ViewRegistry;
use analysis::track::{Track, TrackKind};
use analysis::video::VideoClip;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::calibration::CompositeSelected;
use super::catalog::{build_controls, ControlList, ControlStates};
use super::page_tabs::PageTabList;
use super::prefs::{DisplayPreferences, FontLevel};
use super::stretch::{independent_mass_totals, stretch_for, MassTotals};

// =============================================================================
// Refresh queue
// =============================================================================

/// How much of the toolbar a queued refresh rebuilds. A full refresh
/// additionally fans display flags out to every track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RefreshKind {
    Light,
    Full,
}

/// Pending refresh work. Requests coalesce: a full request absorbs any
/// number of light ones queued in the same frame.
#[derive(Resource, Debug, Default)]
pub struct RefreshRequest {
    pending: Option<RefreshKind>,
}

impl RefreshRequest {
    pub fn request(&mut self, kind: RefreshKind) {
        self.pending = Some(match self.pending {
            Some(previous) => previous.max(kind),
            None => kind,
        });
    }

    pub fn request_full(&mut self) {
        self.request(RefreshKind::Full);
    }

    pub fn request_light(&mut self) {
        self.request(RefreshKind::Light);
    }

    pub fn take(&mut self) -> Option<RefreshKind> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Tracks whose locked-state notifications the toolbar observes. Guarded
/// insertion keeps repeated full refreshes from duplicating subscriptions.
#[derive(Resource, Debug, Default)]
pub struct LockedSubscriptions {
    observed: BTreeSet<Entity>,
}

impl LockedSubscriptions {
    /// Subscribes once; returns whether the entity was newly observed.
    pub fn observe(&mut self, entity: Entity) -> bool {
        self.observed.insert(entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.observed.contains(&entity)
    }

    pub fn forget(&mut self, entity: Entity) {
        self.observed.remove(&entity);
    }

    pub fn clear(&mut self) {
        self.observed.clear();
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}

/// Index into the canonical trail set of the icon to show on the trail
/// button; `None` for a non-canonical length.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrailIcon(pub Option<usize>);

// =============================================================================
// Event -> refresh mapping
// =============================================================================

/// Maps model change events onto queued refreshes: structural track changes
/// force a full rebuild, everything else a light one. Locked-state changes
/// count only for tracks the toolbar has subscribed to.
pub fn queue_model_refreshes(
    mut requests: ResMut<RefreshRequest>,
    subscriptions: Res<LockedSubscriptions>,
    mut added: EventReader<TrackAdded>,
    mut removed: EventReader<TrackRemoved>,
    mut cleared: EventReader<TracksCleared>,
    mut locked: EventReader<TrackLockedChanged>,
    mut tool_visibility: EventReader<ToolVisibilityChanged>,
    mut video: EventReader<VideoChanged>,
    mut magnification: EventReader<MagnificationChanged>,
    mut selected_track: EventReader<SelectedTrackChanged>,
    mut selected_point: EventReader<SelectedPointChanged>,
    mut dialogs: EventReader<DialogClosed>,
) {
    if !added.is_empty() || !removed.is_empty() || !cleared.is_empty() {
        added.clear();
        removed.clear();
        cleared.clear();
        requests.request_full();
    }
    for TrackLockedChanged(entity) in locked.read() {
        if subscriptions.contains(*entity) {
            requests.request_light();
        }
    }
    let light = !tool_visibility.is_empty()
        || !video.is_empty()
        || !magnification.is_empty()
        || !selected_track.is_empty()
        || !selected_point.is_empty()
        || !dialogs.is_empty();
    tool_visibility.clear();
    video.clear();
    magnification.clear();
    selected_track.clear();
    selected_point.clear();
    dialogs.clear();
    if light {
        requests.request_light();
    }
}

/// The first pass after startup populates the control list.
pub fn request_initial_refresh(mut requests: ResMut<RefreshRequest>) {
    requests.request_full();
}

// =============================================================================
// The refresh pass
// =============================================================================

/// Read-only model inputs for control-state gathering.
#[derive(SystemParam)]
pub struct ControlInputs<'w> {
    pub flags: Res<'w, FeatureFlags>,
    pub latch: Res<'w, CalibrationLatch>,
    pub font: Res<'w, FontLevel>,
    pub clip: Res<'w, VideoClip>,
    pub views: Res<'w, ViewRegistry>,
    pub clip_inspector: Res<'w, ClipInspectorState>,
    pub drawing: Res<'w, DrawingControlState>,
    pub notes: Res<'w, NotesDialogState>,
}

/// Drains the refresh queue and rebuilds toolbar state from the model.
pub fn process_refresh(
    mut requests: ResMut<RefreshRequest>,
    prefs: Res<DisplayPreferences>,
    mut tracks: Query<(Entity, &mut Track)>,
    mut subscriptions: ResMut<LockedSubscriptions>,
    mut trail_icon: ResMut<TrailIcon>,
    mut page_tabs: ResMut<PageTabList>,
    mut composite: ResMut<CompositeSelected>,
    mut controls: ResMut<ControlList>,
    inputs: ControlInputs,
) {
    let Some(kind) = requests.take() else {
        return;
    };

    if kind == RefreshKind::Full {
        let totals = independent_mass_totals(tracks.iter().map(|(_, track)| track));
        for (entity, mut track) in &mut tracks {
            subscriptions.observe(entity);
            fan_out(&mut track, &prefs, totals);
        }
    }

    page_tabs.rebuild(&inputs.views);
    trail_icon.0 = prefs.trail_icon_index();

    // once the session has calibrated, the composite toggle stays selected
    if inputs.latch.is_calibrated() {
        composite.0 = true;
    }

    let states = gather_states(&prefs, &tracks, composite.0, &page_tabs, &inputs);
    controls.items = build_controls(&inputs.flags, &states);
}

/// Writes the current preferences onto one track. Point masses take the
/// full set of display flags plus both footprints; vectors take labels and
/// the velocity footprint; everything else only the trail fields.
fn fan_out(track: &mut Track, prefs: &DisplayPreferences, totals: MassTotals) {
    track.trail_length = prefs.trail_length;
    track.trail_visible = prefs.trail_visible;
    if track.kind.is_point_mass() {
        track.trace_visible = prefs.trace;
        track.positions_visible = prefs.position;
        track.velocities_visible = prefs.velocity;
        track.accelerations_visible = prefs.acceleration;
        track.labels_visible = prefs.labels;
        track.velocity_footprint.stretch =
            stretch_for(prefs.stretch, track.mass, totals, prefs.multiply_by_mass);
        track.velocity_footprint.solid_head = false;
        track.acceleration_footprint.stretch = stretch_for(
            prefs.stretch_acceleration,
            track.mass,
            totals,
            prefs.multiply_by_mass,
        );
        track.acceleration_footprint.solid_head = true;
    } else if track.kind == TrackKind::Vector {
        track.labels_visible = prefs.labels;
        track.velocity_footprint.stretch = f64::from(prefs.stretch);
        track.velocity_footprint.solid_head = false;
    }
}

fn gather_states(
    prefs: &DisplayPreferences,
    tracks: &Query<(Entity, &mut Track)>,
    composite_selected: bool,
    page_tabs: &PageTabList,
    inputs: &ControlInputs,
) -> ControlStates {
    let mut has_user_tracks = false;
    let mut axes_visible = false;
    for (_, track) in tracks.iter() {
        has_user_tracks |= track.kind.is_user_track();
        axes_visible |= track.kind == TrackKind::Axes && track.visible;
    }
    ControlStates {
        composite_selected,
        axes_visible,
        stretch_active: prefs.stretch_active(),
        trace: prefs.trace,
        position: prefs.position,
        velocity: prefs.velocity,
        acceleration: prefs.acceleration,
        labels: prefs.labels,
        multiply_by_mass: prefs.multiply_by_mass,
        has_user_tracks,
        video_loaded: inputs.clip.loaded,
        clip_inspector_visible: inputs.clip_inspector.visible,
        drawing_control_visible: inputs.drawing.control_visible,
        notes_visible: inputs.notes.visible,
        page_links_available: !page_tabs.is_empty()
            || !inputs.views.supplemental_files.is_empty(),
        can_shrink_font: inputs.font.can_shrink(),
        can_grow_font: inputs.font.can_grow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::catalog::ControlKey;
    use crate::toolbar::test_harness::TestWorkspace;
    use analysis::track::ArrowFootprint;

    #[test]
    fn refresh_requests_coalesce_to_the_stronger_kind() {
        let mut requests = RefreshRequest::default();
        requests.request_light();
        requests.request_full();
        requests.request_light();
        assert_eq!(requests.take(), Some(RefreshKind::Full));
        assert_eq!(requests.take(), None);
    }

    #[test]
    fn repeated_refreshes_are_idempotent() {
        let mut ws = TestWorkspace::new();
        ws.add_point_mass("mass A", 1.0);
        ws.add_point_mass("mass B", 3.0);
        ws.add_track(TrackKind::Vector, "vector A");
        ws.prefs_mut().velocity = true;
        ws.request_full_refresh();
        ws.tick();

        let first = ws.controls();
        let first_tracks = ws.all_tracks();

        ws.request_light_refresh();
        ws.tick();
        ws.request_light_refresh();
        ws.tick();

        assert_eq!(ws.controls(), first);
        assert_eq!(ws.all_tracks(), first_tracks);
    }

    #[test]
    fn full_refresh_fans_preferences_onto_tracks() {
        let mut ws = TestWorkspace::new();
        let mass = ws.add_point_mass("mass A", 1.0);
        let vector = ws.add_track(TrackKind::Vector, "vector A");
        {
            let mut prefs = ws.prefs_mut();
            prefs.trace = true;
            prefs.velocity = true;
            prefs.labels = false;
            prefs.set_trail_length(15);
        }
        ws.request_full_refresh();
        ws.tick();

        let mass_track = ws.track(mass);
        assert!(mass_track.trace_visible);
        assert!(mass_track.velocities_visible);
        assert!(!mass_track.labels_visible);
        assert_eq!(mass_track.trail_length, 15);
        assert!(mass_track.trail_visible);
        assert!(!mass_track.velocity_footprint.solid_head);
        assert!(mass_track.acceleration_footprint.solid_head);

        let vector_track = ws.track(vector);
        assert!(!vector_track.labels_visible);
        assert_eq!(vector_track.trail_length, 15);
        // vectors never take the point-mass flag set
        assert!(!vector_track.trace_visible);
    }

    #[test]
    fn mass_weighted_stretch_fan_out() {
        let mut ws = TestWorkspace::new();
        let light = ws.add_point_mass("mass A", 1.0);
        let heavy = ws.add_point_mass("mass B", 3.0);
        {
            let mut prefs = ws.prefs_mut();
            prefs.stretch = 2;
            prefs.multiply_by_mass = true;
        }
        ws.request_full_refresh();
        ws.tick();

        let expect = |footprint: ArrowFootprint, stretch: f64| {
            assert!((footprint.stretch - stretch).abs() < f64::EPSILON);
        };
        expect(ws.track(light).velocity_footprint, 1.0);
        expect(ws.track(heavy).velocity_footprint, 3.0);
    }

    #[test]
    fn subscriptions_never_duplicate_across_refreshes() {
        let mut ws = TestWorkspace::new();
        let a = ws.add_point_mass("mass A", 1.0);
        ws.add_point_mass("mass B", 1.0);
        ws.request_full_refresh();
        ws.tick();
        assert_eq!(ws.subscription_count(), 2);

        ws.request_full_refresh();
        ws.tick();
        ws.request_full_refresh();
        ws.tick();
        assert_eq!(ws.subscription_count(), 2);

        ws.remove_track(a);
        ws.tick();
        assert_eq!(ws.subscription_count(), 1);
    }

    #[test]
    fn structural_events_trigger_a_full_rebuild() {
        let mut ws = TestWorkspace::new();
        ws.tick();
        // the startup pass saw no user tracks
        assert!(!ws.controls().button(ControlKey::TrackControl).unwrap().enabled);
        assert!(!ws.controls().button(ControlKey::HideTape).unwrap().enabled);

        ws.add_point_mass("mass A", 1.0);
        ws.tick();
        assert!(ws.controls().button(ControlKey::TrackControl).unwrap().enabled);
        assert!(ws.controls().button(ControlKey::HideTape).unwrap().enabled);
    }

    #[test]
    fn trail_icon_follows_the_canonical_set() {
        let mut ws = TestWorkspace::new();
        ws.prefs_mut().set_trail_length(0);
        ws.request_light_refresh();
        ws.tick();
        assert_eq!(ws.app.world().resource::<TrailIcon>().0, Some(3));
    }

    #[test]
    fn magnification_event_queues_a_refresh() {
        let mut ws = TestWorkspace::new();
        ws.tick();
        ws.app.world_mut().send_event(MagnificationChanged);
        ws.tick();
        assert!(!ws
            .app
            .world()
            .resource::<RefreshRequest>()
            .is_pending());
        assert!(!ws.controls().items.is_empty());
    }
}
