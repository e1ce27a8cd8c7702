//! Simulation engine for LANEBATTLE.
//!
//! Owns the hecs ECS world and the battle map, runs systems once per
//! `advance(dt)`, and produces `BattleSnapshot`s for the renderer.

pub mod battle_map;
pub mod channels;
pub mod collision;
pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod links;
pub mod systems;
pub mod world_setup;

pub use engine::{BattleEngine, SimConfig};
pub use error::SimError;
pub use lanebattle_core as core;

#[cfg(test)]
mod tests;
