//! Visibility mirrors for collaborator-owned dialogs.
//!
//! The clip inspector, drawing control, and notes dialog are owned by their
//! respective collaborators; the toolbar only toggles their visibility and
//! reflects it in control selection. Hiding one raises
//! [`crate::events::DialogClosed`] so the toolbar runs a light refresh.

use bevy::prelude::*;

/// The clip-settings inspector dialog.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ClipInspectorState {
    pub visible: bool,
}

/// The pencil-drawing control dialog and its scene visibility.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DrawingControlState {
    pub control_visible: bool,
    pub drawings_visible: bool,
    /// True while a drawing gesture is in progress; the visibility checkbox
    /// is disabled then.
    pub drawing_in_progress: bool,
}

impl Default for DrawingControlState {
    fn default() -> Self {
        Self {
            control_visible: false,
            drawings_visible: true,
            drawing_in_progress: false,
        }
    }
}

/// The notes dialog.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct NotesDialogState {
    pub visible: bool,
}
