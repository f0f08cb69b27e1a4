use bevy::prelude::*;

pub mod calibration;
pub mod clipboard;
pub mod dialogs;
pub mod events;
pub mod features;
pub mod page_views;
pub mod selection;
pub mod track;
pub mod video;

// ---------------------------------------------------------------------------
// Persistable trait + registry for the keyed document-settings map
// ---------------------------------------------------------------------------

/// Trait for resources that are saved into / restored from the document's
/// keyed settings map.
///
/// Each implementing resource provides its own encoding, so adding a new
/// persisted setting requires no changes to the save path -- the owning
/// plugin just calls `app.register_persistable::<T>()` in its `build()`.
pub trait Persistable: Resource + Default + Send + Sync + 'static {
    /// Unique key for this resource in the document map. Must be stable
    /// across versions (used for lookup on load).
    const KEY: &'static str;

    /// Encode this resource. Return `None` to skip saving.
    fn save_value(&self) -> Option<serde_json::Value>;

    /// Decode from a stored value, returning the restored resource.
    /// Implementations fall back to `Default` on malformed input.
    fn load_value(value: &serde_json::Value) -> Self;
}

/// Type alias for the save function stored in a `PersistableEntry`.
pub type SaveFn = Box<dyn Fn(&World) -> Option<serde_json::Value> + Send + Sync>;
/// Type alias for the load function stored in a `PersistableEntry`.
pub type LoadFn = Box<dyn Fn(&mut World, &serde_json::Value) + Send + Sync>;

/// Type-erased save/load operations for a single registered resource.
pub struct PersistableEntry {
    pub key: String,
    pub save_fn: SaveFn,
    pub load_fn: LoadFn,
}

/// Registry of all persistable resources, populated during plugin setup.
#[derive(Resource, Default)]
pub struct PersistableRegistry {
    pub entries: Vec<PersistableEntry>,
}

impl PersistableRegistry {
    /// Register a resource type that implements `Persistable`.
    ///
    /// A duplicate key is ignored with a warning, preventing silent data
    /// loss from double registration.
    pub fn register<T: Persistable>(&mut self) {
        let key = T::KEY.to_string();
        if self.entries.iter().any(|e| e.key == key) {
            warn!("PersistableRegistry: duplicate key '{}' -- ignoring second registration", key);
            debug_assert!(false, "PersistableRegistry: duplicate key '{}'", key);
            return;
        }
        self.entries.push(PersistableEntry {
            key,
            save_fn: Box::new(|world: &World| {
                world.get_resource::<T>().and_then(Persistable::save_value)
            }),
            load_fn: Box::new(|world: &mut World, value: &serde_json::Value| {
                world.insert_resource(T::load_value(value));
            }),
        });
    }
}

/// Collects every registered resource into the document's keyed map.
pub fn save_document(world: &World) -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    let registry = world.resource::<PersistableRegistry>();
    for entry in &registry.entries {
        if let Some(value) = (entry.save_fn)(world) {
            match value {
                serde_json::Value::Object(fields) => {
                    // flatten so the persisted keys match the documented contract
                    for (k, v) in fields {
                        map.insert(k, v);
                    }
                }
                other => {
                    map.insert(entry.key.clone(), other);
                }
            }
        }
    }
    map
}

/// Restores every registered resource from the document's keyed map.
///
/// Every registered resource is restored; entries whose keys are absent
/// from the map come back as their defaults, and individual optional keys
/// are handled by each resource's `load_value`.
pub fn load_document(world: &mut World, map: &serde_json::Map<String, serde_json::Value>) {
    world.resource_scope(|world, registry: Mut<PersistableRegistry>| {
        let value = serde_json::Value::Object(map.clone());
        for entry in &registry.entries {
            (entry.load_fn)(world, &value);
        }
    });
}

/// App extension used by plugins to register their persisted resources.
pub trait PersistableAppExt {
    fn register_persistable<T: Persistable>(&mut self) -> &mut Self;
}

impl PersistableAppExt for App {
    fn register_persistable<T: Persistable>(&mut self) -> &mut Self {
        self.init_resource::<T>();
        self.init_resource::<PersistableRegistry>();
        self.world_mut()
            .resource_mut::<PersistableRegistry>()
            .register::<T>();
        self
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Registers the document model: track bookkeeping, video/clip state,
/// selection, feature flags, view registry, clipboard probe, calibration
/// tool bookkeeping, and all change-notification events.
pub struct AnalysisPlugin;

impl Plugin for AnalysisPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PersistableRegistry>()
            .init_resource::<track::TrackCounter>()
            .init_resource::<video::VideoClip>()
            .init_resource::<video::Magnification>()
            .init_resource::<video::Viewport>()
            .init_resource::<selection::SelectedTrack>()
            .init_resource::<selection::SelectedPoint>()
            .init_resource::<selection::SelectedSteps>()
            .init_resource::<features::FeatureFlags>()
            .init_resource::<page_views::ViewRegistry>()
            .init_resource::<clipboard::ClipboardProbe>()
            .init_resource::<calibration::VisibleTools>()
            .init_resource::<calibration::CalibrationLatch>()
            .init_resource::<dialogs::ClipInspectorState>()
            .init_resource::<dialogs::DrawingControlState>()
            .init_resource::<dialogs::NotesDialogState>()
            .add_event::<events::TrackAdded>()
            .add_event::<events::TrackRemoved>()
            .add_event::<events::TracksCleared>()
            .add_event::<events::TrackLockedChanged>()
            .add_event::<events::ToolVisibilityChanged>()
            .add_event::<events::VideoChanged>()
            .add_event::<events::MagnificationChanged>()
            .add_event::<events::SelectedTrackChanged>()
            .add_event::<events::SelectedPointChanged>()
            .add_event::<events::DialogClosed>()
            .add_event::<events::OpenExternalLink>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Resource, Default, Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct Marker {
        marker: i32,
    }

    impl Persistable for Marker {
        const KEY: &'static str = "marker";

        fn save_value(&self) -> Option<serde_json::Value> {
            serde_json::to_value(self).ok()
        }

        fn load_value(value: &serde_json::Value) -> Self {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }
    }

    #[test]
    fn registry_round_trips_registered_resources() {
        let mut app = App::new();
        app.register_persistable::<Marker>();
        app.world_mut().resource_mut::<Marker>().marker = 7;

        let map = save_document(app.world());
        assert_eq!(map.get("marker"), Some(&serde_json::json!(7)));

        app.world_mut().resource_mut::<Marker>().marker = 0;
        load_document(app.world_mut(), &map);
        assert_eq!(app.world().resource::<Marker>().marker, 7);
    }

    #[test]
    fn load_leaves_unknown_keys_alone() {
        let mut app = App::new();
        app.register_persistable::<Marker>();
        app.world_mut().resource_mut::<Marker>().marker = 3;

        // a map without the marker key restores the default, not a panic
        let map = serde_json::Map::new();
        load_document(app.world_mut(), &map);
        assert_eq!(app.world().resource::<Marker>().marker, 0);
    }
}
