//! Battle snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::BattleEvent;
use crate::types::{Heading, Position, SimTime, TeamId};

/// Complete battle state after a tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub time: SimTime,
    pub phase: BattlePhase,
    pub map_name: String,
    pub teams: Vec<TeamView>,
    pub units: Vec<UnitView>,
    pub charges: Vec<ChargeView>,
    pub lanes: Vec<LaneView>,
    pub waves: WaveView,
    pub events: Vec<BattleEvent>,
    /// Set once the battle is finished and a team survived.
    pub winner: Option<TeamId>,
}

/// Team summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamView {
    pub id: TeamId,
    pub name: String,
    pub color: String,
    pub defeated: bool,
    pub bases: u32,
    pub towers: u32,
    pub bots: u32,
    pub charges: u32,
}

/// A combat unit as the renderer sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    pub entity: u64,
    pub kind: UnitKind,
    pub team: TeamId,
    pub position: Position,
    pub heading: Heading,
    pub health: f32,
    pub max_health: f32,
    /// Captured target, if any.
    pub target: Option<u64>,
    /// Only set for bots.
    pub bot_state: Option<BotState>,
}

/// A live charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeView {
    pub entity: u64,
    pub team: TeamId,
    pub position: Position,
    pub direction: Heading,
    pub traveled: f32,
}

/// Lane geometry and display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneView {
    pub name: String,
    pub color: String,
    pub points: Vec<Position>,
}

/// Wave timer status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub enabled: bool,
    pub accumulator_secs: f32,
    pub interval_secs: f32,
    pub waves_spawned: u32,
}
