//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Kind of a combat unit: anything with health and a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Base,
    Tower,
    Bot,
}

/// Kind of any simulated entity, combat units and charges alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Base,
    Tower,
    Bot,
    Charge,
}

/// Bot behaviour state. Drives both movement and the animation driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotState {
    /// Freshly spawned, or arrived with nothing left to do.
    #[default]
    Idle,
    /// Advancing along its lane.
    Walking,
    /// Halted, firing at a captured target.
    Shooting,
    /// Took lethal damage. Plays out once, then the bot is removed.
    Dying,
}

/// Battle phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// No map loaded.
    #[default]
    Setup,
    Active,
    Paused,
    /// At most one team is left standing.
    Finished,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Base, UnitKind::Tower, UnitKind::Bot];
}

impl EntityKind {
    /// The combat unit kind, or `None` for charges.
    pub fn unit_kind(self) -> Option<UnitKind> {
        match self {
            EntityKind::Base => Some(UnitKind::Base),
            EntityKind::Tower => Some(UnitKind::Tower),
            EntityKind::Bot => Some(UnitKind::Bot),
            EntityKind::Charge => None,
        }
    }
}

impl From<UnitKind> for EntityKind {
    fn from(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Base => EntityKind::Base,
            UnitKind::Tower => EntityKind::Tower,
            UnitKind::Bot => EntityKind::Bot,
        }
    }
}
