//! Notification icons over buildings, driven by a command stream.

use bevy::ecs::entity::EntityHashMap;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IconId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IconPriority {
    Info,
    Problem,
    FatalProblem,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconCommand {
    Add {
        owner: Entity,
        icon: IconId,
        priority: IconPriority,
    },
    Remove {
        owner: Entity,
        icon: IconId,
    },
    /// Removes every icon of the given priority.
    RemovePriority {
        owner: Entity,
        priority: IconPriority,
    },
}

/// Icons currently shown over an entity.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Icons(pub Vec<(IconId, IconPriority)>);

impl Icons {
    pub fn contains(&self, icon: IconId) -> bool {
        self.0.iter().any(|(i, _)| *i == icon)
    }

    pub fn count_priority(&self, priority: IconPriority) -> usize {
        self.0.iter().filter(|(_, p)| *p == priority).count()
    }
}

pub fn apply_icon_commands(
    mut commands: Commands,
    mut events: EventReader<IconCommand>,
    mut icons: Query<&mut Icons>,
) {
    // Owners without an Icons component yet, collected so several commands
    // in one tick compose.
    let mut fresh: EntityHashMap<Icons> = EntityHashMap::default();
    for command in events.read() {
        let owner = match *command {
            IconCommand::Add { owner, .. }
            | IconCommand::Remove { owner, .. }
            | IconCommand::RemovePriority { owner, .. } => owner,
        };
        let mut existing = icons.get_mut(owner).ok();
        let target = match existing.as_deref_mut() {
            Some(existing) => existing,
            None => fresh.entry(owner).or_default(),
        };
        match *command {
            IconCommand::Add { icon, priority, .. } => {
                if !target.contains(icon) {
                    target.0.push((icon, priority));
                }
            }
            IconCommand::Remove { icon, .. } => target.0.retain(|(i, _)| *i != icon),
            IconCommand::RemovePriority { priority, .. } => {
                target.0.retain(|(_, p)| *p != priority)
            }
        }
    }
    for (owner, icons) in fresh {
        if icons.0.is_empty() {
            continue;
        }
        if let Some(mut entity) = commands.get_entity(owner) {
            entity.insert(icons);
        }
    }
}
