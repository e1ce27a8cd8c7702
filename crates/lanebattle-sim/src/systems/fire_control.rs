//! Fire control system: cooldowns and shot decisions.
//!
//! A shot is only a decision here. The engine turns each `Shot` into a charge
//! in the same tick, so the charge moves before the tick ends.

use glam::Vec3;
use hecs::{Entity, World};

use lanebattle_ai::fsm;
use lanebattle_core::components::{BotBehavior, Collider, FireControl, TeamMember};
use lanebattle_core::events::BattleEvent;
use lanebattle_core::types::{Heading, Position, TeamId};

use crate::battle_map::BattleMap;
use crate::channels::EventHub;
use crate::collision::shape_center;
use crate::error::SimError;
use crate::lifecycle;
use crate::links::Target;

/// A charge to be spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub owner: Entity,
    pub team: TeamId,
    /// Muzzle position.
    pub position: Position,
    /// Unit vector towards the target's shape center.
    pub direction: Vec3,
}

/// Tick cooldowns and fire every unit that is ready and holds a target.
pub fn run(world: &mut World, map: &BattleMap, hub: &mut EventHub, dt: f32) -> Vec<Shot> {
    let mut shots = Vec::new();

    for team in map.teams() {
        for unit in team.units() {
            if !lifecycle::is_targetable(world, unit) {
                continue;
            }
            let ready = match world.get::<&mut FireControl>(unit) {
                Ok(mut fc) => {
                    fc.remaining_secs = (fc.remaining_secs - dt).max(0.0);
                    fc.remaining_secs <= 0.0
                }
                Err(_) => false,
            };
            let may_fire = world
                .get::<&BotBehavior>(unit)
                .map_or(true, |b| fsm::can_fire(b.state));
            if !ready || !may_fire {
                continue;
            }
            if let Ok(shot) = fire(world, hub, unit) {
                shots.push(shot);
            }
        }
    }

    shots
}

/// Fire `unit` at its current target and restart its cooldown.
///
/// Fails with `NoTarget` if the unit holds no target or the target is no
/// longer valid.
pub fn fire(world: &mut World, hub: &mut EventHub, unit: Entity) -> Result<Shot, SimError> {
    if !world.contains(unit) {
        return Err(SimError::NoSuchEntity(unit));
    }
    if !lifecycle::is_targetable(world, unit) {
        return Err(SimError::AlreadyDestroyed(unit));
    }
    let target = world
        .get::<&Target>(unit)
        .map_err(|_| SimError::NotACombatUnit(unit))?
        .0
        .filter(|&t| lifecycle::is_targetable(world, t))
        .ok_or(SimError::NoTarget(unit))?;

    let muzzle = aim_point(world, unit).ok_or(SimError::NotACombatUnit(unit))?;
    let aim = aim_point(world, target).ok_or(SimError::NoTarget(unit))?;
    let direction = (aim - muzzle).normalize_or_zero();
    if direction == Vec3::ZERO {
        return Err(SimError::NoTarget(unit));
    }
    let team = world
        .get::<&TeamMember>(unit)
        .map(|m| m.team)
        .map_err(|_| SimError::NotACombatUnit(unit))?;

    let (fc, heading) = world
        .query_one_mut::<(&mut FireControl, &mut Heading)>(unit)
        .map_err(|_| SimError::NotACombatUnit(unit))?;
    fc.remaining_secs = fc.cooldown_secs;
    *heading = Heading::towards(Vec3::new(direction.x, 0.0, direction.z));

    let shot = Shot {
        owner: unit,
        team,
        position: Position(muzzle),
        direction,
    };
    hub.emit(BattleEvent::ShotFired {
        owner: unit.to_bits().get(),
        team,
        position: shot.position,
        direction,
    });
    Ok(shot)
}

fn aim_point(world: &World, entity: Entity) -> Option<Vec3> {
    let position = world.get::<&Position>(entity).ok()?;
    let collider = world.get::<&Collider>(entity).ok()?;
    Some(shape_center(&position, &collider))
}
