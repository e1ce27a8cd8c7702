//! Events emitted by the simulation for rendering, animation and UI feedback.
//!
//! Entities are referred to by their handle bits (`hecs::Entity::to_bits`),
//! which stay unique for the lifetime of a battle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, TeamId};

/// Everything observable that happened during a tick, in dispatch order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEvent {
    /// A unit's fire control decided to shoot.
    ShotFired {
        owner: u64,
        team: TeamId,
        position: Position,
        direction: Vec3,
    },
    /// A charge hit an enemy unit.
    ChargeHit {
        charge: u64,
        struck: u64,
        damage: f32,
    },
    /// A bot changed behaviour state. Consumed by the animation driver.
    BotStateChanged {
        bot: u64,
        from: BotState,
        to: BotState,
    },
    /// An entity was destroyed. Fires once per entity.
    Destroyed {
        entity: u64,
        kind: EntityKind,
        team: TeamId,
    },
    /// A wave of bots was spawned.
    WaveSpawned { wave: u32, bots: u32 },
    /// A team lost its last base.
    TeamDefeated { team: TeamId },
    /// One team is left standing (or none, if the last bases fell together).
    BattleWon { team: Option<TeamId> },
}
