//! Control commands sent from the host to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible host actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleCommand {
    // --- Waves ---
    /// Start the wave timer from zero.
    EnableWaves,
    /// Stop the wave timer. Bots already spawned are unaffected.
    DisableWaves,
    /// Spawn one wave right now, independent of the timer.
    SpawnWave,

    // --- Simulation control ---
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
