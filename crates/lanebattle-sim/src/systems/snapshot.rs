//! Snapshot system: builds a `BattleSnapshot` from the world and the map.
//!
//! Read-only. Units of defeated teams are still reported so the renderer can
//! show what is left on the field.

use hecs::{Entity, World};

use lanebattle_core::components::*;
use lanebattle_core::enums::*;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::state::*;
use lanebattle_core::types::{Heading, Position, SimTime, TeamId};

use crate::battle_map::{BattleMap, Team};
use crate::links::Target;
use crate::systems::wave_spawner::WaveScheduler;

pub fn build_snapshot(
    world: &World,
    map: &BattleMap,
    time: &SimTime,
    phase: BattlePhase,
    waves: &WaveScheduler,
    events: Vec<BattleEvent>,
) -> BattleSnapshot {
    BattleSnapshot {
        time: *time,
        phase,
        map_name: map.name.clone(),
        teams: map.all_teams().iter().map(build_team).collect(),
        units: build_units(world, map),
        charges: build_charges(world, map),
        lanes: map
            .lanes()
            .iter()
            .map(|lane| LaneView {
                name: lane.name.clone(),
                color: lane.color.clone(),
                points: lane.points.clone(),
            })
            .collect(),
        waves: waves.view(),
        events,
        winner: winner(map, phase),
    }
}

fn winner(map: &BattleMap, phase: BattlePhase) -> Option<TeamId> {
    if phase == BattlePhase::Finished {
        map.winner()
    } else {
        None
    }
}

fn build_team(team: &Team) -> TeamView {
    TeamView {
        id: team.id,
        name: team.name.clone(),
        color: team.color.clone(),
        defeated: team.defeat,
        bases: team.bases.len() as u32,
        towers: team.towers.len() as u32,
        bots: team.bots.len() as u32,
        charges: team.charges.len() as u32,
    }
}

fn build_units(world: &World, map: &BattleMap) -> Vec<UnitView> {
    map.all_teams()
        .iter()
        .flat_map(|team| team.units().map(move |unit| (team.id, unit)))
        .filter_map(|(team, unit)| build_unit(world, team, unit))
        .collect()
}

fn build_unit(world: &World, team: TeamId, unit: Entity) -> Option<UnitView> {
    let life = world.get::<&Lifecycle>(unit).ok()?;
    let kind = life.kind.unit_kind()?;
    let position = *world.get::<&Position>(unit).ok()?;
    let heading = world
        .get::<&Heading>(unit)
        .map(|h| *h)
        .unwrap_or_default();
    let health = world.get::<&Health>(unit).ok()?;
    let target = world
        .get::<&Target>(unit)
        .ok()
        .and_then(|t| t.0)
        .map(|e| e.to_bits().get());
    let bot_state = world.get::<&BotBehavior>(unit).ok().map(|b| b.state);

    Some(UnitView {
        entity: unit.to_bits().get(),
        kind,
        team,
        position,
        heading,
        health: health.current,
        max_health: health.max,
        target,
        bot_state,
    })
}

fn build_charges(world: &World, map: &BattleMap) -> Vec<ChargeView> {
    let mut views = Vec::new();
    for team in map.all_teams() {
        for &charge in &team.charges {
            let (Ok(position), Ok(state)) =
                (world.get::<&Position>(charge), world.get::<&Charge>(charge))
            else {
                continue;
            };
            views.push(ChargeView {
                entity: charge.to_bits().get(),
                team: team.id,
                position: *position,
                direction: Heading(state.direction),
                traveled: state.traveled,
            });
        }
    }
    views
}
