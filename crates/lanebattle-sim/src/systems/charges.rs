//! Charge system: moves charges, resolves hits, expires spent charges.

use glam::Vec3;
use hecs::{Entity, World};
use tracing::warn;

use lanebattle_core::components::Charge;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::types::Position;

use crate::battle_map::BattleMap;
use crate::channels::{CollisionEvent, EventHub};
use crate::collision::CollisionIndex;
use crate::lifecycle;
use crate::systems::damage;

/// One tick of charge movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub from: Vec3,
    pub to: Vec3,
    pub distance: f32,
    /// `traveled` reached `max_distance` on this step.
    pub spent: bool,
}

/// Move a charge by `speed * dt`. The position always moves the full step;
/// `traveled` is clamped to `max_distance`.
pub fn step(charge: &mut Charge, position: &mut Position, dt: f32) -> Step {
    let from = position.0;
    let distance = (charge.speed * dt).max(0.0);
    position.0 += charge.direction * distance;
    charge.prev_position = Position(from);
    charge.traveled = (charge.traveled + distance).min(charge.max_distance);
    Step {
        from,
        to: position.0,
        distance,
        spent: charge.traveled >= charge.max_distance,
    }
}

/// Advance the charges of every active team, in team order.
pub fn run(
    world: &mut World,
    map: &mut BattleMap,
    hub: &mut EventHub,
    despawn_buffer: &mut Vec<Entity>,
    index: &CollisionIndex,
    dt: f32,
    dying_secs: f32,
) {
    for team in map.team_ids() {
        let Some(charges) = map
            .team(team)
            .filter(|t| !t.defeat)
            .map(|t| t.charges.clone())
        else {
            continue;
        };

        for charge in charges {
            if !lifecycle::is_live(world, charge) {
                continue;
            }
            let Ok((state, position)) = world.query_one_mut::<(&mut Charge, &mut Position)>(charge)
            else {
                continue;
            };
            let moved = step(state, position, dt);
            let direction = state.direction;
            let dealt = state.damage;

            let hit = index.ray_cast(moved.from, direction, moved.distance, |shape| {
                shape.team != team
                    && map.is_active(shape.team)
                    && lifecycle::is_targetable(world, shape.owner)
            });

            if let Some(hit) = hit {
                hub.emit(BattleEvent::ChargeHit {
                    charge: charge.to_bits().get(),
                    struck: hit.owner.to_bits().get(),
                    damage: dealt,
                });
                hub.dispatch_collision(&CollisionEvent {
                    charge,
                    struck: hit.owner,
                    point: Position(hit.point),
                    damage: dealt,
                });
                let outcome = damage::apply_hit(
                    world,
                    map,
                    hub,
                    despawn_buffer,
                    hit.owner,
                    dealt,
                    dying_secs,
                );
                if let Err(err) = outcome {
                    warn!(?charge, %err, "charge hit could not be applied");
                }
                lifecycle::request_destroy(world, map, hub, despawn_buffer, charge);
            } else if moved.spent {
                lifecycle::request_destroy(world, map, hub, despawn_buffer, charge);
            }
        }
    }
}
