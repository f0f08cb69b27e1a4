use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod toolbar;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_plugins(toolbar::ToolbarPlugin);
    }
}
