//! Entity spawn factories for setting up the battle world.
//!
//! Creates bases, towers, bots and charges with their component bundles and
//! registers them in the battle map.

use glam::Vec3;
use hecs::{Entity, World};
use tracing::warn;

use lanebattle_ai::profiles::get_profile;
use lanebattle_core::components::*;
use lanebattle_core::config::MapConfig;
use lanebattle_core::constants::CHARGE_DAMAGE;
use lanebattle_core::enums::*;
use lanebattle_core::error::ConfigError;
use lanebattle_core::types::{Heading, Position, TeamId};

use crate::battle_map::{BattleMap, Lane, Team};
use crate::error::SimError;
use crate::links::{ChargeOwner, Target};

/// Build the battle map from a config: teams, their bases and towers, lanes.
pub fn preset(world: &mut World, config: &MapConfig) -> Result<BattleMap, ConfigError> {
    config.validate()?;

    let mut map = BattleMap::new(config.kind.clone(), config.name.clone());
    for team in &config.teams {
        let damage = team.charge_damage.unwrap_or(CHARGE_DAMAGE);
        let id = map.add_team(team.name.clone(), team.color.clone(), damage);

        for base in config.bases_of(&team.name) {
            let entity = spawn_base(world, id, base.position.to_position());
            map.add_entity(id, EntityKind::Base, entity);
        }
        for tower in config.towers_of(&team.name) {
            let entity = spawn_tower(world, id, tower.position.to_position());
            map.add_entity(id, EntityKind::Tower, entity);
        }
    }

    for road in &config.roads {
        map.add_lane(Lane {
            name: road.name.clone(),
            color: road.color.clone(),
            points: road.points.iter().map(|p| p.to_position()).collect(),
        });
    }

    Ok(map)
}

pub fn spawn_base(world: &mut World, team: TeamId, position: Position) -> Entity {
    spawn_structure(world, team, UnitKind::Base, position)
}

pub fn spawn_tower(world: &mut World, team: TeamId, position: Position) -> Entity {
    spawn_structure(world, team, UnitKind::Tower, position)
}

fn spawn_structure(world: &mut World, team: TeamId, kind: UnitKind, position: Position) -> Entity {
    let profile = get_profile(kind);
    world.spawn((
        Lifecycle {
            kind: kind.into(),
            destroyed: false,
        },
        TeamMember { team },
        position,
        Heading::default(),
        Health {
            current: profile.max_health,
            max: profile.max_health,
        },
        FireControl {
            cooldown_secs: profile.fire_cooldown_secs,
            remaining_secs: 0.0,
            range: profile.range,
        },
        Collider {
            radius: profile.collider_radius,
            center_height: profile.collider_height,
        },
        Target::default(),
    ))
}

/// Spawn a bot at `position` walking `path`. The caller registers it in the map.
pub fn spawn_bot(world: &mut World, team: TeamId, position: Position, path: BotPath) -> Entity {
    let profile = get_profile(UnitKind::Bot);
    let heading = path
        .waypoints
        .first()
        .map(|wp| Heading::towards(wp.0 - position.0))
        .unwrap_or_default();
    world.spawn((
        Lifecycle {
            kind: EntityKind::Bot,
            destroyed: false,
        },
        TeamMember { team },
        position,
        heading,
        Health {
            current: profile.max_health,
            max: profile.max_health,
        },
        FireControl {
            cooldown_secs: profile.fire_cooldown_secs,
            remaining_secs: 0.0,
            range: profile.range,
        },
        Collider {
            radius: profile.collider_radius,
            center_height: profile.collider_height,
        },
        Target::default(),
        BotBehavior {
            state: BotState::Idle,
            dying_remaining_secs: 0.0,
            speed: profile.speed,
        },
        path,
    ))
}

/// Path along `lane` for a bot starting at `origin`: the lane is walked from
/// the end nearest `origin`, then the nearest enemy base is approached.
pub fn bot_path(
    world: &World,
    map: &BattleMap,
    team: TeamId,
    lane: &Lane,
    origin: &Position,
) -> BotPath {
    let waypoints = lane.oriented_from(origin);
    let end = waypoints.last().copied().unwrap_or(*origin);

    let destination = map
        .enemy_teams(team)
        .flat_map(|t| t.bases.iter().copied())
        .filter_map(|base| world.get::<&Position>(base).ok().map(|p| *p))
        .min_by(|a, b| a.distance_to(&end).total_cmp(&b.distance_to(&end)))
        .unwrap_or(end);

    BotPath {
        waypoints,
        next_waypoint: 0,
        destination,
        arrived: false,
    }
}

/// Spawn one bot for `team` on lane `lane`, at the team's first base.
pub fn spawn_lane_bot(
    world: &mut World,
    map: &mut BattleMap,
    team: TeamId,
    lane: usize,
) -> Result<Entity, SimError> {
    let home = active_team(map, team)?
        .bases
        .first()
        .copied()
        .ok_or(SimError::TeamDefeated(team))?;
    spawn_bot_at(world, map, team, lane, home)
}

/// Spawn one bot for `team` at `base`, walking lane `lane`.
pub fn spawn_bot_at(
    world: &mut World,
    map: &mut BattleMap,
    team: TeamId,
    lane: usize,
    base: Entity,
) -> Result<Entity, SimError> {
    active_team(map, team)?;
    let lane = map.lanes().get(lane).ok_or(SimError::UnknownLane(lane))?;
    let origin = world
        .get::<&Position>(base)
        .map(|p| *p)
        .map_err(|_| SimError::NoSuchEntity(base))?;

    let path = bot_path(world, map, team, lane, &origin);
    let bot = spawn_bot(world, team, origin, path);
    map.add_entity(team, EntityKind::Bot, bot);
    Ok(bot)
}

fn active_team(map: &BattleMap, team: TeamId) -> Result<&Team, SimError> {
    let t = map.team(team).ok_or(SimError::UnknownTeam(team))?;
    if t.defeat {
        return Err(SimError::TeamDefeated(team));
    }
    Ok(t)
}

/// One wave: for every active team, every lane and every base of that team,
/// one bot at the base.
pub fn spawn_wave(world: &mut World, map: &mut BattleMap) -> Vec<Entity> {
    let mut spawned = Vec::new();
    for team in map.team_ids() {
        let bases = map.team(team).map(|t| t.bases.clone()).unwrap_or_default();
        for lane in 0..map.lanes().len() {
            for &base in &bases {
                match spawn_bot_at(world, map, team, lane, base) {
                    Ok(bot) => spawned.push(bot),
                    Err(err) => warn!(%team, lane, %err, "skipped wave bot"),
                }
            }
        }
    }
    spawned
}

/// Spawn a charge fired by `owner` from `position` along `direction`.
/// Damage comes from the owner's team.
pub fn spawn_charge(
    world: &mut World,
    map: &mut BattleMap,
    owner: Entity,
    position: Position,
    direction: Vec3,
    speed: f32,
    max_distance: f32,
) -> Result<Entity, SimError> {
    let heading = direction.normalize_or_zero();
    if heading == Vec3::ZERO {
        return Err(SimError::NoDirection(direction));
    }
    let team = world
        .get::<&TeamMember>(owner)
        .map(|m| m.team)
        .map_err(|_| SimError::NoSuchEntity(owner))?;
    let damage = map
        .team(team)
        .map(|t| t.charge_damage)
        .ok_or(SimError::UnknownTeam(team))?;

    let direction = heading;
    let charge = world.spawn((
        Lifecycle {
            kind: EntityKind::Charge,
            destroyed: false,
        },
        TeamMember { team },
        position,
        Heading(direction),
        Charge {
            direction,
            speed,
            damage,
            max_distance,
            traveled: 0.0,
            prev_position: position,
        },
        ChargeOwner(owner),
    ));
    map.add_entity(team, EntityKind::Charge, charge);
    Ok(charge)
}
