//! Damage resolution for combat units.
//!
//! Structures are destroyed as soon as their health reaches zero. Bots enter
//! `Dying` instead and are destroyed when the sequence has played out.

use hecs::{Entity, World};
use tracing::debug;

use lanebattle_ai::fsm;
use lanebattle_core::components::{BotBehavior, Health};
use lanebattle_core::events::BattleEvent;

use crate::battle_map::BattleMap;
use crate::channels::EventHub;
use crate::error::SimError;
use crate::lifecycle;
use crate::links::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// The unit did not take damage (already dying).
    Ignored,
    Damaged,
    /// Health reached zero on this hit.
    Killed,
}

/// Apply `damage` to `unit`. Health is clamped at zero.
pub fn apply_hit(
    world: &mut World,
    map: &mut BattleMap,
    hub: &mut EventHub,
    despawn_buffer: &mut Vec<Entity>,
    unit: Entity,
    damage: f32,
    dying_secs: f32,
) -> Result<HitOutcome, SimError> {
    if !world.contains(unit) {
        return Err(SimError::NoSuchEntity(unit));
    }
    if !lifecycle::is_live(world, unit) {
        return Err(SimError::AlreadyDestroyed(unit));
    }

    let bot_state = world.get::<&BotBehavior>(unit).ok().map(|b| b.state);
    if bot_state.is_some_and(|s| !fsm::accepts_damage(s)) {
        return Ok(HitOutcome::Ignored);
    }

    let remaining = {
        let mut health = world
            .get::<&mut Health>(unit)
            .map_err(|_| SimError::NotACombatUnit(unit))?;
        if health.current <= 0.0 {
            return Ok(HitOutcome::Ignored);
        }
        health.current = (health.current - damage.max(0.0)).max(0.0);
        health.current
    };
    if remaining > 0.0 {
        return Ok(HitOutcome::Damaged);
    }

    match bot_state {
        Some(from) => {
            if let Some(to) = fsm::on_lethal_damage(from) {
                if let Ok(mut behavior) = world.get::<&mut BotBehavior>(unit) {
                    behavior.state = to;
                    behavior.dying_remaining_secs = dying_secs;
                }
                if let Ok(mut target) = world.get::<&mut Target>(unit) {
                    target.0 = None;
                }
                debug!(bot = ?unit, "bot dying");
                hub.emit(BattleEvent::BotStateChanged {
                    bot: unit.to_bits().get(),
                    from,
                    to,
                });
            }
        }
        None => {
            lifecycle::request_destroy(world, map, hub, despawn_buffer, unit);
        }
    }
    Ok(HitOutcome::Killed)
}
