//! Bot behaviour system: FSM transitions, lane walking and the dying timer.

use glam::Vec3;
use hecs::{Entity, World};

use lanebattle_ai::fsm::{self, BotContext, Movement};
use lanebattle_core::components::{BotBehavior, BotPath};
use lanebattle_core::constants::WAYPOINT_EPSILON;
use lanebattle_core::enums::BotState;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::types::{Heading, Position};

use crate::battle_map::BattleMap;
use crate::channels::EventHub;
use crate::lifecycle;
use crate::links::Target;

/// Evaluate every live bot of every active team and move the walkers.
pub fn run(world: &mut World, map: &BattleMap, hub: &mut EventHub, dt: f32) {
    for team in map.teams() {
        for &bot in &team.bots {
            update_bot(world, hub, bot, dt);
        }
    }
}

fn update_bot(world: &mut World, hub: &mut EventHub, bot: Entity, dt: f32) {
    if !lifecycle::is_live(world, bot) {
        return;
    }
    let target = world
        .get::<&Target>(bot)
        .ok()
        .and_then(|t| t.0)
        .filter(|&t| lifecycle::is_targetable(world, t));

    let Ok((position, heading, behavior, path)) = world
        .query_one_mut::<(&mut Position, &mut Heading, &mut BotBehavior, &mut BotPath)>(bot)
    else {
        return;
    };
    if behavior.state == BotState::Dying {
        return;
    }

    let update = fsm::evaluate(&BotContext {
        state: behavior.state,
        has_target: target.is_some(),
        path_complete: path.arrived,
        dying_remaining_secs: behavior.dying_remaining_secs,
    });

    let from = behavior.state;
    behavior.state = update.new_state;

    if update.movement == Movement::Advance {
        if let Some(direction) = advance_along_path(position, path, behavior.speed * dt) {
            *heading = Heading(direction);
        }
    }

    if update.state_changed {
        hub.emit(BattleEvent::BotStateChanged {
            bot: bot.to_bits().get(),
            from,
            to: update.new_state,
        });
    }
}

/// Count down dying bots and destroy those whose sequence has ended.
pub fn advance_dying(
    world: &mut World,
    map: &mut BattleMap,
    hub: &mut EventHub,
    despawn_buffer: &mut Vec<Entity>,
    dt: f32,
) {
    let mut finished = Vec::new();
    for team in map.teams() {
        for &bot in &team.bots {
            let Ok(mut behavior) = world.get::<&mut BotBehavior>(bot) else {
                continue;
            };
            if behavior.state != BotState::Dying {
                continue;
            }
            behavior.dying_remaining_secs = (behavior.dying_remaining_secs - dt).max(0.0);
            let update = fsm::evaluate(&BotContext {
                state: behavior.state,
                has_target: false,
                path_complete: false,
                dying_remaining_secs: behavior.dying_remaining_secs,
            });
            if update.remove {
                finished.push(bot);
            }
        }
    }

    for bot in finished {
        lifecycle::request_destroy(world, map, hub, despawn_buffer, bot);
    }
}

/// Move `position` up to `step` along the path, carrying leftover distance
/// past reached waypoints. Returns the last direction of travel, if it moved.
pub fn advance_along_path(position: &mut Position, path: &mut BotPath, step: f32) -> Option<Vec3> {
    let mut remaining = step;
    let mut direction = None;

    while remaining > 0.0 && !path.arrived {
        let goal = path
            .waypoints
            .get(path.next_waypoint)
            .copied()
            .unwrap_or(path.destination);
        let offset = goal.0 - position.0;
        let distance = offset.length();

        if distance > remaining {
            let dir = offset / distance;
            position.0 += dir * remaining;
            direction = Some(dir);
            break;
        }

        if distance > WAYPOINT_EPSILON {
            direction = Some(offset / distance);
        }
        position.0 = goal.0;
        remaining -= distance;
        if path.next_waypoint < path.waypoints.len() {
            path.next_waypoint += 1;
        } else {
            path.arrived = true;
        }
    }

    direction
}
