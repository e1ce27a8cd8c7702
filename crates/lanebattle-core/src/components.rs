//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Game logic lives in systems, not components. Components that hold
//! entity handles live in the sim crate, which owns the ECS.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, TeamId};

/// Which team an entity fights for. Charges carry their owner's team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub team: TeamId,
}

/// Identity and destroy latch shared by every entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Lifecycle {
    pub kind: EntityKind,
    /// Set exactly once, when the destroy event fires.
    pub destroyed: bool,
}

/// Hit points of a combat unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Weapon state of a combat unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FireControl {
    /// Seconds between shots.
    pub cooldown_secs: f32,
    /// Seconds until the next shot is allowed. Never negative.
    pub remaining_secs: f32,
    /// Maximum distance at which a target can be captured and engaged.
    pub range: f32,
}

/// Collidable sphere of a combat unit, centered `center_height` above its position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
    pub center_height: f32,
}

/// Lane a bot walks toward the enemy base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotPath {
    /// Waypoints, already oriented away from the bot's own base.
    pub waypoints: Vec<Position>,
    /// Index of the waypoint the bot is currently heading for.
    pub next_waypoint: usize,
    /// Enemy base position, approached directly after the last waypoint.
    pub destination: Position,
    /// Set once the destination has been reached.
    pub arrived: bool,
}

/// Behaviour state of a bot.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BotBehavior {
    pub state: BotState,
    /// Seconds of the dying sequence left. Only meaningful in `Dying`.
    pub dying_remaining_secs: f32,
    /// Movement speed along the path.
    pub speed: f32,
}

/// Projectile state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Charge {
    /// Unit vector of travel.
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub max_distance: f32,
    /// Distance covered so far, clamped to `max_distance`.
    pub traveled: f32,
    /// Position before the most recent step.
    pub prev_position: Position,
}
