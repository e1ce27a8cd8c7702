//! Entity lifecycle: liveness checks and the single destroy path.

use hecs::{Entity, World};
use tracing::{debug, info};

use lanebattle_core::components::{Health, Lifecycle, TeamMember};
use lanebattle_core::enums::EntityKind;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::types::Position;

use crate::battle_map::BattleMap;
use crate::channels::{DestroyEvent, EventHub};
use crate::links::Target;

/// Exists in the world and has not been destroyed.
pub fn is_live(world: &World, entity: Entity) -> bool {
    world
        .get::<&Lifecycle>(entity)
        .is_ok_and(|life| !life.destroyed)
}

/// A live combat unit with health left. Dying bots are not targetable.
pub fn is_targetable(world: &World, entity: Entity) -> bool {
    is_live(world, entity)
        && world
            .get::<&Health>(entity)
            .is_ok_and(|health| health.current > 0.0)
}

/// Destroy `entity`: leave its team collection, drop every target pointing at
/// it, notify subscribers, and queue the despawn.
///
/// Returns false if the entity does not exist or was already destroyed; the
/// destroy event fires at most once per entity.
pub fn request_destroy(
    world: &mut World,
    map: &mut BattleMap,
    hub: &mut EventHub,
    despawn_buffer: &mut Vec<Entity>,
    entity: Entity,
) -> bool {
    let kind = match world.get::<&mut Lifecycle>(entity) {
        Ok(mut life) if !life.destroyed => {
            life.destroyed = true;
            life.kind
        }
        _ => return false,
    };
    let team = world.get::<&TeamMember>(entity).map(|m| m.team).ok();
    let position = world
        .get::<&Position>(entity)
        .map(|p| *p)
        .unwrap_or_default();

    for (_, target) in world.query_mut::<&mut Target>() {
        if target.0 == Some(entity) {
            target.0 = None;
        }
    }

    let Some(team) = team else {
        despawn_buffer.push(entity);
        return true;
    };
    map.remove_entity(team, kind, entity);
    debug!(?entity, ?kind, %team, "destroyed");

    hub.emit(BattleEvent::Destroyed {
        entity: entity.to_bits().get(),
        kind,
        team,
    });
    hub.dispatch_destroy(&DestroyEvent {
        entity,
        kind,
        team,
        position,
    });
    despawn_buffer.push(entity);

    if kind == EntityKind::Base && map.check_defeat(team) {
        info!(%team, "team lost its last base");
        hub.emit(BattleEvent::TeamDefeated { team });
    }
    true
}
