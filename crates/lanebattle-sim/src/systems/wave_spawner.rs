//! Wave spawning system: a bot per lane per active team on a fixed interval.

use hecs::{Entity, World};
use tracing::info;

use lanebattle_core::constants::WAVE_INTERVAL_SECS;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::state::WaveView;

use crate::battle_map::BattleMap;
use crate::channels::EventHub;
use crate::world_setup;

/// Wave timer. The accumulator restarts from zero whenever waves are
/// enabled or disabled, and after every wave.
#[derive(Debug, Clone)]
pub struct WaveScheduler {
    interval_secs: f32,
    accumulator_secs: f32,
    enabled: bool,
    waves_spawned: u32,
}

impl Default for WaveScheduler {
    fn default() -> Self {
        Self::new(WAVE_INTERVAL_SECS)
    }
}

impl WaveScheduler {
    /// A disabled scheduler.
    pub fn new(interval_secs: f32) -> Self {
        Self {
            interval_secs,
            accumulator_secs: 0.0,
            enabled: false,
            waves_spawned: 0,
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        self.accumulator_secs = 0.0;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.accumulator_secs = 0.0;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_secs(&self) -> f32 {
        self.interval_secs
    }

    pub fn accumulator_secs(&self) -> f32 {
        self.accumulator_secs
    }

    pub fn waves_spawned(&self) -> u32 {
        self.waves_spawned
    }

    /// Accumulate `dt`. Returns true when a wave is due, resetting the
    /// accumulator; at most one wave per call.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.enabled {
            return false;
        }
        self.accumulator_secs += dt;
        if self.accumulator_secs >= self.interval_secs {
            self.accumulator_secs = 0.0;
            true
        } else {
            false
        }
    }

    pub fn view(&self) -> WaveView {
        WaveView {
            enabled: self.enabled,
            accumulator_secs: self.accumulator_secs,
            interval_secs: self.interval_secs,
            waves_spawned: self.waves_spawned,
        }
    }
}

/// Spawn a wave if the timer says one is due.
pub fn run(
    world: &mut World,
    map: &mut BattleMap,
    hub: &mut EventHub,
    scheduler: &mut WaveScheduler,
    dt: f32,
) -> Vec<Entity> {
    if scheduler.tick(dt) {
        spawn(world, map, hub, scheduler)
    } else {
        Vec::new()
    }
}

/// Spawn a wave now, independent of the timer.
pub fn spawn(
    world: &mut World,
    map: &mut BattleMap,
    hub: &mut EventHub,
    scheduler: &mut WaveScheduler,
) -> Vec<Entity> {
    let bots = world_setup::spawn_wave(world, map);
    scheduler.waves_spawned += 1;
    info!(wave = scheduler.waves_spawned, bots = bots.len(), "wave spawned");
    hub.emit(BattleEvent::WaveSpawned {
        wave: scheduler.waves_spawned,
        bots: bots.len() as u32,
    });
    bots
}
