//! Errors from direct engine operations.
//!
//! Per-tick systems never surface these; they skip the affected entity and log.

use glam::Vec3;
use hecs::Entity;
use thiserror::Error;

use lanebattle_core::types::TeamId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    #[error("entity {0:?} has already been destroyed")]
    AlreadyDestroyed(Entity),
    #[error("entity {0:?} is not a combat unit")]
    NotACombatUnit(Entity),
    #[error("unit {0:?} has no valid target")]
    NoTarget(Entity),
    #[error("{0} does not exist")]
    UnknownTeam(TeamId),
    #[error("{0} has been defeated")]
    TeamDefeated(TeamId),
    #[error("lane {0} does not exist")]
    UnknownLane(usize),
    #[error("charge direction {0} has no length")]
    NoDirection(Vec3),
}
