//! Change notifications emitted by the document model.
//!
//! The toolbar maps these onto refresh requests: structural changes (track
//! added/removed/cleared) force a full rebuild with display-flag fan-out,
//! everything else a light rebuild. Emitters are the model mutation sites;
//! the toolbar only reads.

use bevy::prelude::*;

use crate::track::TrackKind;

/// A track was inserted into the document.
#[derive(Event, Debug, Clone, Copy)]
pub struct TrackAdded(pub Entity);

/// A track was removed. Carries what was removed so bookkeeping (visible
/// calibration tools, subscriptions) can be pruned after despawn.
#[derive(Event, Debug, Clone, Copy)]
pub struct TrackRemoved {
    pub entity: Entity,
    pub kind: TrackKind,
}

/// All tracks were removed at once.
#[derive(Event, Debug, Clone, Copy)]
pub struct TracksCleared;

/// A track's locked flag flipped.
#[derive(Event, Debug, Clone, Copy)]
pub struct TrackLockedChanged(pub Entity);

/// A calibration tool (or the axes) was shown or hidden.
#[derive(Event, Debug, Clone, Copy)]
pub struct ToolVisibilityChanged(pub Entity);

/// The video was replaced or unloaded.
#[derive(Event, Debug, Clone, Copy)]
pub struct VideoChanged;

/// The magnification factor changed.
#[derive(Event, Debug, Clone, Copy)]
pub struct MagnificationChanged;

/// The selected track changed.
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectedTrackChanged(pub Option<Entity>);

/// The selected point changed.
#[derive(Event, Debug, Clone, Copy)]
pub struct SelectedPointChanged;

/// A collaborator-owned dialog (clip inspector, drawing control, notes)
/// was hidden; triggers a light refresh.
#[derive(Event, Debug, Clone, Copy)]
pub struct DialogClosed;

/// Request to open an external link (page-view tab or supplemental file).
/// Actually launching a browser is the shell's concern.
#[derive(Event, Debug, Clone)]
pub struct OpenExternalLink(pub String);
