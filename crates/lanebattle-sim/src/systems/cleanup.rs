//! Cleanup system: despawns entities destroyed during the tick.

use hecs::{Entity, World};

/// Despawn everything queued in `despawn_buffer` and clear it.
/// Handles into the despawned entities go stale (`World::contains` is false).
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
