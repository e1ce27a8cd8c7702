//! ECS systems that operate on the battle world each tick.
//!
//! Systems are free functions over the world and the battle map. They hold no
//! state of their own; the wave scheduler is owned by the engine.

pub mod bot_behavior;
pub mod charges;
pub mod cleanup;
pub mod damage;
pub mod fire_control;
pub mod snapshot;
pub mod targeting;
pub mod wave_spawner;
