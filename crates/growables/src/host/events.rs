//! Outbound simulation events and the host consumers that tally them.

use bevy::prelude::*;
use bevy::utils::HashMap;

use super::components::Updated;
use super::prefabs::ZonePrefabId;

/// Land-use specific trigger raised when a building changes level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    LevelUpResidential,
    LevelUpCommercial,
    LevelUpIndustrial,
    LevelUpOffice,
    LevelDownResidential,
    LevelDownCommercial,
    LevelDownIndustrial,
    LevelDownOffice,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerAction {
    pub kind: TriggerKind,
    pub entity: Entity,
}

/// Change in built zone area per level.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneBuiltLevelUpdate {
    pub zone: ZonePrefabId,
    pub from_level: u8,
    pub to_level: u8,
    pub squares: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UtilityGraph {
    Electricity,
    WaterPipe,
}

/// Asks a utility connectivity graph to re-evaluate a road edge.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadEdgeRefresh {
    pub graph: UtilityGraph,
    pub edge: Entity,
}

/// A save game finished loading.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct SessionLoaded;

#[derive(Resource, Debug, Default)]
pub struct TriggerLog {
    pub counts: HashMap<TriggerKind, u32>,
}

impl TriggerLog {
    pub fn count(&self, kind: TriggerKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Built squares per (zone, level).
#[derive(Resource, Debug, Default)]
pub struct ZoneBuiltTally {
    pub squares: HashMap<(ZonePrefabId, u8), i32>,
}

impl ZoneBuiltTally {
    pub fn squares(&self, zone: ZonePrefabId, level: u8) -> i32 {
        self.squares.get(&(zone, level)).copied().unwrap_or(0)
    }
}

/// Pending edge refreshes per graph; the utility solvers drain these.
#[derive(Resource, Debug, Default)]
pub struct PendingEdgeRefresh {
    pub electricity: Vec<Entity>,
    pub water_pipe: Vec<Entity>,
}

pub fn record_triggers(mut events: EventReader<TriggerAction>, mut log: ResMut<TriggerLog>) {
    for action in events.read() {
        *log.counts.entry(action.kind).or_insert(0) += 1;
    }
}

pub fn apply_zone_built_updates(
    mut events: EventReader<ZoneBuiltLevelUpdate>,
    mut tally: ResMut<ZoneBuiltTally>,
) {
    for update in events.read() {
        *tally.squares.entry((update.zone, update.from_level)).or_insert(0) -= update.squares;
        *tally.squares.entry((update.zone, update.to_level)).or_insert(0) += update.squares;
    }
}

pub fn refresh_road_edges(
    mut commands: Commands,
    mut events: EventReader<RoadEdgeRefresh>,
    mut pending: ResMut<PendingEdgeRefresh>,
) {
    for refresh in events.read() {
        let queue = match refresh.graph {
            UtilityGraph::Electricity => &mut pending.electricity,
            UtilityGraph::WaterPipe => &mut pending.water_pipe,
        };
        if !queue.contains(&refresh.edge) {
            queue.push(refresh.edge);
        }
        if let Some(mut edge) = commands.get_entity(refresh.edge) {
            edge.insert(Updated);
        }
    }
}
