//! Targeting system: every live unit of every active team tries to capture a target.

use hecs::{Entity, World};

use lanebattle_ai::targeting::{capture_target, Candidate};
use lanebattle_core::components::{FireControl, TeamMember};
use lanebattle_core::types::{Position, TeamId};

use crate::battle_map::BattleMap;
use crate::error::SimError;
use crate::lifecycle;
use crate::links::Target;

pub fn run(world: &mut World, map: &BattleMap) {
    let mut updates: Vec<(Entity, Option<Entity>)> = Vec::new();

    for team in map.teams() {
        let enemies = enemy_candidates(world, map, team.id);
        for unit in team.units() {
            if let Some(target) = select(world, unit, &enemies) {
                updates.push((unit, target));
            }
        }
    }

    for (unit, target) in updates {
        if let Ok(mut slot) = world.get::<&mut Target>(unit) {
            slot.0 = target;
        }
    }
}

/// Capture for a single unit outside the tick.
pub fn capture_for(
    world: &mut World,
    map: &BattleMap,
    unit: Entity,
) -> Result<Option<Entity>, SimError> {
    if !world.contains(unit) {
        return Err(SimError::NoSuchEntity(unit));
    }
    if !lifecycle::is_live(world, unit) {
        return Err(SimError::AlreadyDestroyed(unit));
    }
    if world.get::<&FireControl>(unit).is_err() {
        return Err(SimError::NotACombatUnit(unit));
    }
    let team = world
        .get::<&TeamMember>(unit)
        .map(|m| m.team)
        .map_err(|_| SimError::NotACombatUnit(unit))?;
    if !map.is_active(team) {
        return Err(SimError::TeamDefeated(team));
    }

    let enemies = enemy_candidates(world, map, team);
    // Dying units keep no target.
    let target = select(world, unit, &enemies).flatten();
    if let Ok(mut slot) = world.get::<&mut Target>(unit) {
        slot.0 = target;
    }
    Ok(target)
}

/// Targetable units of `team`'s enemies, in capture priority order.
fn enemy_candidates(world: &World, map: &BattleMap, team: TeamId) -> Vec<Candidate<Entity>> {
    map.enemy_units(team)
        .into_iter()
        .filter(|&e| lifecycle::is_targetable(world, e))
        .filter_map(|e| {
            world.get::<&Position>(e).ok().map(|p| Candidate {
                handle: e,
                position: *p,
            })
        })
        .collect()
}

/// New target for `unit`, or `None` if it cannot hold one.
fn select(
    world: &World,
    unit: Entity,
    enemies: &[Candidate<Entity>],
) -> Option<Option<Entity>> {
    if !lifecycle::is_targetable(world, unit) {
        return None;
    }
    let position = *world.get::<&Position>(unit).ok()?;
    let range = world.get::<&FireControl>(unit).ok()?.range;
    let current = world.get::<&Target>(unit).ok()?.0;
    Some(capture_target(current, &position, range, enemies))
}
