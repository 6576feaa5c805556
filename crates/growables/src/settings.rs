//! User-facing toggles, persisted as JSON, and the change channel that
//! pushes them into each engine component's cached config.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::simulation_sets::SimulationSet;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowablesSettings {
    /// Drain both level queues without processing them.
    pub disable_levelling: bool,
    /// Put buildings back on the market instead of abandoning them.
    pub disable_abandonment: bool,
    /// Level-lock buildings placed directly by the player.
    pub lock_plopped_buildings: bool,
    /// Condemn spawned buildings whose zoning no longer matches.
    pub spawned_zone_despawn: bool,
}

/// One toggle changed to the carried value.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChanged {
    DisableLevelling(bool),
    DisableAbandonment(bool),
    LockPloppedBuildings(bool),
    SpawnedZoneDespawn(bool),
}

/// Where settings are written back when they change. `None` disables saving.
#[derive(Resource, Debug, Clone, Default)]
pub struct SettingsPath(pub Option<PathBuf>);

impl GrowablesSettings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Loads `path`, falling back to defaults when it is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Changes needed to go from `previous` to `self`, in field order.
    pub fn diff(&self, previous: &GrowablesSettings) -> Vec<SettingChanged> {
        let mut changes = Vec::new();
        if self.disable_levelling != previous.disable_levelling {
            changes.push(SettingChanged::DisableLevelling(self.disable_levelling));
        }
        if self.disable_abandonment != previous.disable_abandonment {
            changes.push(SettingChanged::DisableAbandonment(self.disable_abandonment));
        }
        if self.lock_plopped_buildings != previous.lock_plopped_buildings {
            changes.push(SettingChanged::LockPloppedBuildings(
                self.lock_plopped_buildings,
            ));
        }
        if self.spawned_zone_despawn != previous.spawned_zone_despawn {
            changes.push(SettingChanged::SpawnedZoneDespawn(self.spawned_zone_despawn));
        }
        changes
    }
}

/// Publishes one event per toggle that differs from what was last published.
/// The first run compares against defaults, which is what every cached
/// config starts from.
pub fn publish_setting_changes(
    settings: Res<GrowablesSettings>,
    mut published: Local<Option<GrowablesSettings>>,
    mut events: EventWriter<SettingChanged>,
) {
    if published.is_some() && !settings.is_changed() {
        return;
    }
    let previous = (*published).unwrap_or_default();
    for change in settings.diff(&previous) {
        info!("Setting changed: {:?}", change);
        events.send(change);
    }
    *published = Some(*settings);
}

fn persist_settings(settings: Res<GrowablesSettings>, path: Res<SettingsPath>) {
    if !settings.is_changed() || settings.is_added() {
        return;
    }
    let Some(path) = path.0.as_deref() else {
        return;
    };
    if let Err(e) = settings.save(path) {
        warn!("Failed to save settings to {}: {}", path.display(), e);
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GrowablesSettings>()
            .init_resource::<SettingsPath>()
            .add_event::<SettingChanged>()
            .add_systems(
                FixedUpdate,
                (publish_setting_changes, persist_settings).in_set(SimulationSet::Classify),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("growables_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_diff_lists_only_changed_fields() {
        let before = GrowablesSettings::default();
        let after = GrowablesSettings {
            disable_abandonment: true,
            spawned_zone_despawn: true,
            ..before
        };
        assert_eq!(
            after.diff(&before),
            vec![
                SettingChanged::DisableAbandonment(true),
                SettingChanged::SpawnedZoneDespawn(true)
            ]
        );
        assert!(after.diff(&after).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save_load");
        let settings = GrowablesSettings {
            lock_plopped_buildings: true,
            ..Default::default()
        };
        settings.save(&path).expect("save");
        assert_eq!(GrowablesSettings::load(&path).expect("load"), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let parsed: GrowablesSettings =
            serde_json::from_str(r#"{"disable_levelling": true}"#).expect("parse");
        assert!(parsed.disable_levelling);
        assert!(!parsed.spawned_zone_despawn);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            GrowablesSettings::load(&path),
            Err(SettingsError::Json(_))
        ));
        assert_eq!(
            GrowablesSettings::load_or_default(&path),
            GrowablesSettings::default()
        );
        let _ = fs::remove_file(&path);
    }
}
