//! Headless workspace harness for toolbar tests.
//!
//! Builds a minimal app with the document model and the state half of the
//! toolbar, then exposes the handful of operations tests drive: track
//! bookkeeping, calibration gestures, refresh requests, and snapshots of
//! the reconciled output.

use analysis::calibration::{CalibrationLatch, VisibleTools};
use analysis::events::{TrackAdded, TrackRemoved, TracksCleared};
use analysis::selection::SelectedTrack;
use analysis::track::{Track, TrackCounter, TrackKind};
use analysis::video::VideoClip;
use analysis::AnalysisPlugin;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use super::actions::ToolbarAction;
use super::calibration::{CalibrationTools, CompositeSelected};
use super::catalog::ControlList;
use super::prefs::DisplayPreferences;
use super::reconcile::{LockedSubscriptions, RefreshKind, RefreshRequest};
use super::ToolbarStatePlugin;

pub struct TestWorkspace {
    pub app: App,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(AnalysisPlugin)
            .add_plugins(ToolbarStatePlugin);
        Self { app }
    }

    pub fn with_video(mut self) -> Self {
        self.app.world_mut().resource_mut::<VideoClip>().loaded = true;
        self
    }

    pub fn tick(&mut self) {
        self.app.update();
    }

    // -- track bookkeeping --------------------------------------------------

    pub fn add_track(&mut self, kind: TrackKind, name: &str) -> Entity {
        let number = self
            .app
            .world_mut()
            .resource_mut::<TrackCounter>()
            .next();
        let entity = self
            .app
            .world_mut()
            .spawn(Track::new(kind, name, number))
            .id();
        self.app.world_mut().send_event(TrackAdded(entity));
        entity
    }

    pub fn add_point_mass(&mut self, name: &str, mass: f64) -> Entity {
        let entity = self.add_track(TrackKind::PointMass, name);
        self.app.world_mut().get_mut::<Track>(entity).unwrap().mass = mass;
        entity
    }

    pub fn remove_track(&mut self, entity: Entity) {
        let kind = self.app.world().get::<Track>(entity).unwrap().kind;
        self.app.world_mut().despawn(entity);
        self.app
            .world_mut()
            .send_event(TrackRemoved { entity, kind });
    }

    pub fn clear_tracks(&mut self) {
        let world = self.app.world_mut();
        let mut query = world.query_filtered::<Entity, With<Track>>();
        let all: Vec<Entity> = query.iter(world).collect();
        for entity in all {
            world.despawn(entity);
        }
        world.send_event(TracksCleared);
    }

    // -- calibration gestures -----------------------------------------------

    pub fn create_tool(&mut self, kind: TrackKind) -> Entity {
        self.app
            .world_mut()
            .run_system_once(move |mut tools: CalibrationTools| tools.create_track(kind))
            .expect("calibration system runs")
    }

    pub fn toggle_composite(&mut self) {
        self.app
            .world_mut()
            .run_system_once(|mut tools: CalibrationTools| tools.toggle_composite())
            .expect("calibration system runs");
    }

    pub fn toggle_tool(&mut self, entity: Entity) {
        self.app
            .world_mut()
            .run_system_once(move |mut tools: CalibrationTools| tools.toggle_one(entity))
            .expect("calibration system runs");
    }

    // -- refreshes and actions ----------------------------------------------

    pub fn request_full_refresh(&mut self) {
        self.app
            .world_mut()
            .resource_mut::<RefreshRequest>()
            .request(RefreshKind::Full);
    }

    pub fn request_light_refresh(&mut self) {
        self.app
            .world_mut()
            .resource_mut::<RefreshRequest>()
            .request(RefreshKind::Light);
    }

    pub fn send_action(&mut self, action: ToolbarAction) {
        self.app.world_mut().send_event(action);
    }

    // -- snapshots ----------------------------------------------------------

    pub fn controls(&self) -> ControlList {
        self.app.world().resource::<ControlList>().clone()
    }

    pub fn track(&self, entity: Entity) -> Track {
        self.app.world().get::<Track>(entity).unwrap().clone()
    }

    /// All tracks in stable document order.
    pub fn all_tracks(&mut self) -> Vec<Track> {
        let world = self.app.world_mut();
        let mut query = world.query::<&Track>();
        let mut tracks: Vec<Track> = query.iter(world).cloned().collect();
        tracks.sort_by_key(|track| track.number);
        tracks
    }

    pub fn prefs_mut(&mut self) -> Mut<'_, DisplayPreferences> {
        self.app.world_mut().resource_mut::<DisplayPreferences>()
    }

    pub fn visible_tools(&self) -> VisibleTools {
        self.app.world().resource::<VisibleTools>().clone()
    }

    pub fn latch_calibrated(&self) -> bool {
        self.app.world().resource::<CalibrationLatch>().is_calibrated()
    }

    pub fn composite_selected(&self) -> bool {
        self.app.world().resource::<CompositeSelected>().0
    }

    pub fn selected_track(&self) -> Option<Entity> {
        self.app.world().resource::<SelectedTrack>().0
    }

    pub fn subscription_count(&self) -> usize {
        self.app.world().resource::<LockedSubscriptions>().len()
    }
}
