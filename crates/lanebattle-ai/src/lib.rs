//! Unit decision logic for LANEBATTLE.
//!
//! Implements target capture, the bot behaviour state machine, and
//! per-kind unit profiles. Pure functions over plain data; no ECS.

pub mod fsm;
pub mod profiles;
pub mod targeting;

pub use lanebattle_core as core;
