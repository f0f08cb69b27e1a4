//! The workspace toolbar.
//!
//! Split into a headless state half and a render half: `ToolbarStatePlugin`
//! owns the model-facing logic (actions, calibration bookkeeping, the
//! reconciliation engine) and runs fine under `MinimalPlugins`, which is how
//! the tests drive it; `ToolbarPlugin` adds the egui pass on top. Both
//! expect [`analysis::AnalysisPlugin`] to be installed.

use analysis::PersistableAppExt;
use bevy::prelude::*;

pub mod actions;
pub mod calibration;
pub mod catalog;
pub mod page_tabs;
pub mod prefs;
pub mod reconcile;
pub mod split_zone;
pub mod stretch;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;
pub mod ui_system;

/// Toolbar state and reconciliation, no rendering.
pub struct ToolbarStatePlugin;

impl Plugin for ToolbarStatePlugin {
    fn build(&self, app: &mut App) {
        app.register_persistable::<prefs::DisplayPreferences>()
            .init_resource::<prefs::FontLevel>()
            .init_resource::<reconcile::RefreshRequest>()
            .init_resource::<reconcile::LockedSubscriptions>()
            .init_resource::<reconcile::TrailIcon>()
            .init_resource::<page_tabs::PageTabList>()
            .init_resource::<catalog::ControlList>()
            .init_resource::<calibration::CompositeSelected>()
            .init_resource::<calibration::CalibrationOptions>()
            .add_event::<actions::ToolbarAction>()
            .add_systems(Startup, reconcile::request_initial_refresh)
            .add_systems(
                Update,
                (
                    actions::apply_toolbar_actions,
                    calibration::prune_removed_tools,
                    reconcile::queue_model_refreshes,
                    reconcile::process_refresh,
                )
                    .chain(),
            );
    }
}

/// The full toolbar: state plus the egui render pass.
pub struct ToolbarPlugin;

impl Plugin for ToolbarPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ToolbarStatePlugin)
            .init_resource::<ui_system::OpenPopup>()
            .add_systems(
                Update,
                ui_system::render_toolbar.before(actions::apply_toolbar_actions),
            );
    }
}
