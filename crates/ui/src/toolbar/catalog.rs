//! Declarative control catalog and the list-assembly fold.
//!
//! Every toolbar control is described once in [`GROUPS`]: its key, its
//! interaction kind, and the capability gate that includes it. Both
//! construction and reconciliation fold over this one table, so there is no
//! per-control builder code to drift out of sync. The ordered control list
//! is rebuilt wholesale on every reconciliation pass, never patched.

use analysis::features::{keys, FeatureFlags};
use bevy::prelude::Resource;

// =============================================================================
// Control identity
// =============================================================================

/// Stable identity of each toolbar control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKey {
    Open,
    Save,
    Library,
    ClipSettings,
    Calibration,
    Axes,
    NewTrack,
    TrackControl,
    Autotracker,
    DeleteStep,
    HideTape,
    Zoom,
    Trails,
    Labels,
    Trace,
    Positions,
    Velocities,
    Accelerations,
    Stretch,
    MultiplyByMass,
    FontSmaller,
    FontBigger,
    Drawing,
    Notes,
    PageLinks,
    Refresh,
}

impl ControlKey {
    /// Short button label. Icon art is the shell's concern.
    pub fn label(self) -> &'static str {
        match self {
            ControlKey::Open => "Open",
            ControlKey::Save => "Save",
            ControlKey::Library => "Library",
            ControlKey::ClipSettings => "Clip",
            ControlKey::Calibration => "Calibrate",
            ControlKey::Axes => "Axes",
            ControlKey::NewTrack => "New",
            ControlKey::TrackControl => "Tracks",
            ControlKey::Autotracker => "Autotrack",
            ControlKey::DeleteStep => "Delete",
            ControlKey::HideTape => "Hide Tape",
            ControlKey::Zoom => "Zoom",
            ControlKey::Trails => "Trails",
            ControlKey::Labels => "Labels",
            ControlKey::Trace => "Trace",
            ControlKey::Positions => "x",
            ControlKey::Velocities => "v",
            ControlKey::Accelerations => "a",
            ControlKey::Stretch => "Stretch",
            ControlKey::MultiplyByMass => "xm",
            ControlKey::FontSmaller => "A-",
            ControlKey::FontBigger => "A+",
            ControlKey::Drawing => "Draw",
            ControlKey::Notes => "Notes",
            ControlKey::PageLinks => "Pages",
            ControlKey::Refresh => "Refresh",
        }
    }
}

/// How a control reacts to a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Press flips a selected state.
    Toggle,
    /// Press fires an action (possibly opening a popup).
    Momentary,
    /// Two press regions: primary action left, popup right.
    SplitZone,
}

/// Capability gate deciding whether a control is included at all.
#[derive(Debug, Clone, Copy)]
pub enum Gate {
    Always,
    Feature(&'static str),
    /// Included while any of the listed capabilities is enabled.
    AnyFeature(&'static [&'static str]),
}

impl Gate {
    pub fn allows(&self, flags: &FeatureFlags) -> bool {
        match self {
            Gate::Always => true,
            Gate::Feature(key) => flags.is_enabled(key),
            Gate::AnyFeature(candidates) => flags.any_enabled(candidates.iter().copied()),
        }
    }
}

/// One row of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ControlSpec {
    pub key: ControlKey,
    pub kind: ControlKind,
    pub gate: Gate,
}

/// A design-time group of controls, or the flexible spacer.
pub enum Group {
    Controls(&'static [ControlSpec]),
    Spacer,
}

/// The full catalog, in display order. Separators are inserted only between
/// adjacent non-empty groups during assembly.
pub const GROUPS: &[Group] = &[
    // file operations
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::Open,
            kind: ControlKind::Momentary,
            gate: Gate::Feature(keys::FILE_OPEN),
        },
        ControlSpec {
            key: ControlKey::Save,
            kind: ControlKind::Momentary,
            gate: Gate::Feature(keys::FILE_SAVE),
        },
        ControlSpec {
            key: ControlKey::Library,
            kind: ControlKind::Momentary,
            gate: Gate::Feature(keys::FILE_LIBRARY),
        },
    ]),
    // clip, calibration, axes
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::ClipSettings,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::CLIP_SETTINGS),
        },
        ControlSpec {
            key: ControlKey::Calibration,
            kind: ControlKind::SplitZone,
            gate: Gate::AnyFeature(&keys::CALIBRATION_ALL),
        },
        ControlSpec {
            key: ControlKey::Axes,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::AXES),
        },
    ]),
    // track creation, control, deletion
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::NewTrack,
            kind: ControlKind::Momentary,
            gate: Gate::Feature(keys::TRACK_CREATE),
        },
        ControlSpec {
            key: ControlKey::TrackControl,
            kind: ControlKind::Momentary,
            gate: Gate::Always,
        },
        ControlSpec {
            key: ControlKey::Autotracker,
            kind: ControlKind::Momentary,
            gate: Gate::Feature(keys::AUTOTRACK),
        },
        ControlSpec {
            key: ControlKey::DeleteStep,
            kind: ControlKind::Momentary,
            gate: Gate::Always,
        },
        ControlSpec {
            key: ControlKey::HideTape,
            kind: ControlKind::Momentary,
            gate: Gate::Always,
        },
    ]),
    // zoom
    Group::Controls(&[ControlSpec {
        key: ControlKey::Zoom,
        kind: ControlKind::Momentary,
        gate: Gate::Always,
    }]),
    // trail and labels
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::Trails,
            kind: ControlKind::Momentary,
            gate: Gate::Feature(keys::TRAILS),
        },
        ControlSpec {
            key: ControlKey::Labels,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::LABELS),
        },
    ]),
    // trace and the three kinematic toggles
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::Trace,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::TRACE),
        },
        ControlSpec {
            key: ControlKey::Positions,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::POSITIONS),
        },
        ControlSpec {
            key: ControlKey::Velocities,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::VELOCITIES),
        },
        ControlSpec {
            key: ControlKey::Accelerations,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::ACCELERATIONS),
        },
    ]),
    // stretch and mass weighting
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::Stretch,
            kind: ControlKind::SplitZone,
            gate: Gate::Feature(keys::STRETCH),
        },
        ControlSpec {
            key: ControlKey::MultiplyByMass,
            kind: ControlKind::Toggle,
            gate: Gate::Feature(keys::MULTIPLY_BY_MASS),
        },
    ]),
    // font size
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::FontSmaller,
            kind: ControlKind::Momentary,
            gate: Gate::Always,
        },
        ControlSpec {
            key: ControlKey::FontBigger,
            kind: ControlKind::Momentary,
            gate: Gate::Always,
        },
    ]),
    Group::Spacer,
    // drawing, notes, page links, refresh
    Group::Controls(&[
        ControlSpec {
            key: ControlKey::Drawing,
            kind: ControlKind::SplitZone,
            gate: Gate::Feature(keys::DRAWING),
        },
        ControlSpec {
            key: ControlKey::Notes,
            kind: ControlKind::Toggle,
            gate: Gate::Always,
        },
        ControlSpec {
            key: ControlKey::PageLinks,
            kind: ControlKind::Momentary,
            gate: Gate::Always,
        },
        ControlSpec {
            key: ControlKey::Refresh,
            kind: ControlKind::Momentary,
            gate: Gate::Always,
        },
    ]),
];

// =============================================================================
// Assembled control list
// =============================================================================

/// One toolbar control in its reconciled state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarControl {
    pub key: ControlKey,
    pub kind: ControlKind,
    pub visible: bool,
    pub enabled: bool,
    pub selected: bool,
}

/// One slot of the assembled toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlItem {
    Button(ToolbarControl),
    Separator,
    Spacer,
}

/// The ordered control list the render system draws from. Rebuilt wholesale
/// by every reconciliation pass.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct ControlList {
    pub items: Vec<ControlItem>,
}

impl ControlList {
    pub fn button(&self, key: ControlKey) -> Option<&ToolbarControl> {
        self.items.iter().find_map(|item| match item {
            ControlItem::Button(control) if control.key == key => Some(control),
            _ => None,
        })
    }
}

/// Model-derived enablement and selection inputs for the assembly fold.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControlStates {
    pub composite_selected: bool,
    pub axes_visible: bool,
    pub stretch_active: bool,
    pub trace: bool,
    pub position: bool,
    pub velocity: bool,
    pub acceleration: bool,
    pub labels: bool,
    pub multiply_by_mass: bool,
    pub has_user_tracks: bool,
    pub video_loaded: bool,
    pub clip_inspector_visible: bool,
    pub drawing_control_visible: bool,
    pub notes_visible: bool,
    pub page_links_available: bool,
    pub can_shrink_font: bool,
    pub can_grow_font: bool,
}

impl ControlStates {
    /// Reconciled state of one catalog row.
    fn control(&self, spec: &ControlSpec) -> ToolbarControl {
        let (enabled, selected) = match spec.key {
            ControlKey::Open
            | ControlKey::Save
            | ControlKey::Library
            | ControlKey::NewTrack
            | ControlKey::Trails
            | ControlKey::Refresh => (true, false),
            ControlKey::ClipSettings => (self.video_loaded, self.clip_inspector_visible),
            ControlKey::Calibration => (true, self.composite_selected),
            ControlKey::Axes => (true, self.axes_visible),
            ControlKey::TrackControl | ControlKey::DeleteStep | ControlKey::HideTape => {
                (self.has_user_tracks, false)
            }
            ControlKey::Autotracker => (self.video_loaded, false),
            ControlKey::Zoom => (self.video_loaded, false),
            ControlKey::Labels => (true, self.labels),
            ControlKey::Trace => (true, self.trace),
            ControlKey::Positions => (true, self.position),
            ControlKey::Velocities => (true, self.velocity),
            ControlKey::Accelerations => (true, self.acceleration),
            ControlKey::Stretch => (true, self.stretch_active),
            ControlKey::MultiplyByMass => (true, self.multiply_by_mass),
            ControlKey::FontSmaller => (self.can_shrink_font, false),
            ControlKey::FontBigger => (self.can_grow_font, false),
            ControlKey::Drawing => (true, self.drawing_control_visible),
            ControlKey::Notes => (true, self.notes_visible),
            ControlKey::PageLinks => (self.page_links_available, false),
        };
        ToolbarControl {
            key: spec.key,
            kind: spec.kind,
            visible: true,
            enabled,
            selected,
        }
    }
}

/// Folds the catalog into the ordered control list.
///
/// Separator rules: one separator between adjacent non-empty groups, never
/// leading, never doubled. The flexible spacer takes a separator before it
/// but suppresses the one after, so the trailing group sits flush right.
pub fn build_controls(flags: &FeatureFlags, states: &ControlStates) -> Vec<ControlItem> {
    let mut items = Vec::new();
    let mut after_spacer = false;
    for group in GROUPS {
        match group {
            Group::Spacer => {
                if !items.is_empty() {
                    items.push(ControlItem::Separator);
                }
                items.push(ControlItem::Spacer);
                after_spacer = true;
            }
            Group::Controls(specs) => {
                let included: Vec<&ControlSpec> =
                    specs.iter().filter(|spec| spec.gate.allows(flags)).collect();
                if included.is_empty() {
                    continue;
                }
                if !items.is_empty() && !after_spacer {
                    items.push(ControlItem::Separator);
                }
                for spec in included {
                    items.push(ControlItem::Button(states.control(spec)));
                }
                after_spacer = false;
            }
        }
    }
    items
}
