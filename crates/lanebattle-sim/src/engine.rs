//! Battle engine, the core of the simulation.
//!
//! `BattleEngine` owns the hecs ECS world and the battle map, processes host
//! commands, runs all systems once per `advance(dt)`, and produces
//! `BattleSnapshot`s. Headless and deterministic: the same map, config and
//! sequence of `dt`s always yields the same snapshots.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use lanebattle_core::commands::BattleCommand;
use lanebattle_core::config::MapConfig;
use lanebattle_core::constants::*;
use lanebattle_core::enums::BattlePhase;
use lanebattle_core::error::ConfigError;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::state::BattleSnapshot;
use lanebattle_core::types::{Position, SimTime, TeamId};

use crate::battle_map::BattleMap;
use crate::channels::{CollisionEvent, DestroyEvent, EventHub};
use crate::collision::CollisionIndex;
use crate::error::SimError;
use crate::lifecycle;
use crate::links::Target;
use crate::systems;
use crate::systems::damage::HitOutcome;
use crate::systems::wave_spawner::WaveScheduler;
use crate::world_setup;

/// Tuning for a battle. Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds between bot waves.
    pub wave_interval_secs: f32,
    /// Start the wave timer as soon as a map is loaded.
    pub waves_enabled: bool,
    pub charge_speed: f32,
    pub charge_max_distance: f32,
    /// Length of a bot's dying sequence.
    pub dying_duration_secs: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            wave_interval_secs: WAVE_INTERVAL_SECS,
            waves_enabled: true,
            charge_speed: CHARGE_SPEED,
            charge_max_distance: CHARGE_MAX_DISTANCE,
            dying_duration_secs: BOT_DYING_SECS,
        }
    }
}

impl SimConfig {
    /// Reject tunables that would stall charges or spin the wave timer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("wave_interval_secs", self.wave_interval_secs)?;
        positive("charge_speed", self.charge_speed)?;
        positive("charge_max_distance", self.charge_max_distance)?;
        if !self.dying_duration_secs.is_finite() || self.dying_duration_secs < 0.0 {
            return Err(ConfigError::InvalidTuning {
                field: "dying_duration_secs",
                expected: "finite and not negative",
                value: self.dying_duration_secs,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTuning {
            field,
            expected: "finite and positive",
            value,
        })
    }
}

/// The battle engine. Owns the ECS world and all battle state.
pub struct BattleEngine {
    world: World,
    map: BattleMap,
    config: SimConfig,
    time: SimTime,
    phase: BattlePhase,
    waves: WaveScheduler,
    command_queue: VecDeque<BattleCommand>,
    despawn_buffer: Vec<Entity>,
    hub: EventHub,
}

impl BattleEngine {
    /// An engine with no map loaded. Fails if `config` is out of range.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            map: BattleMap::default(),
            waves: WaveScheduler::new(config.wave_interval_secs),
            config,
            time: SimTime::default(),
            phase: BattlePhase::default(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            hub: EventHub::default(),
        })
    }

    /// An engine with `map` loaded and the battle active.
    pub fn from_map(map: &MapConfig, config: SimConfig) -> Result<Self, ConfigError> {
        let mut engine = Self::new(config)?;
        engine.load_map(map)?;
        Ok(engine)
    }

    /// Replace whatever battle is running with a fresh one on `map`.
    /// On error the engine is left torn down, in `Setup`.
    pub fn load_map(&mut self, map: &MapConfig) -> Result<(), ConfigError> {
        self.teardown();
        self.map = world_setup::preset(&mut self.world, map)?;
        self.phase = BattlePhase::Active;
        if self.config.waves_enabled {
            self.waves.enable();
        }
        info!(
            map = %self.map.name,
            teams = self.map.all_teams().len(),
            lanes = self.map.lanes().len(),
            "battle loaded"
        );
        Ok(())
    }

    /// Drop every entity, the map and all per-entity subscriptions.
    /// Battle-wide listeners survive.
    pub fn teardown(&mut self) {
        self.world.clear();
        self.map = BattleMap::default();
        self.time = SimTime::default();
        self.phase = BattlePhase::Setup;
        self.waves = WaveScheduler::new(self.config.wave_interval_secs);
        self.command_queue.clear();
        self.despawn_buffer.clear();
        self.hub.reset();
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: BattleCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = BattleCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the battle by `dt` seconds and return the resulting snapshot.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn advance(&mut self, dt: f32) -> BattleSnapshot {
        self.process_commands();

        if self.phase == BattlePhase::Active {
            self.check_outcome();
        }
        if self.phase == BattlePhase::Active {
            let dt = if dt.is_finite() && dt >= 0.0 {
                dt
            } else {
                warn!(dt, "invalid time step, using zero");
                0.0
            };
            self.run_systems(dt);
            self.time.advance(dt);
            self.check_outcome();
        }

        let events = self.hub.take_events();
        systems::snapshot::build_snapshot(
            &self.world,
            &self.map,
            &self.time,
            self.phase,
            &self.waves,
            events,
        )
    }

    /// The current state without advancing. Events pending since the last
    /// `advance` are included but not consumed.
    pub fn snapshot(&self) -> BattleSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.map,
            &self.time,
            self.phase,
            &self.waves,
            self.hub.events().to_vec(),
        )
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn waves(&self) -> &WaveScheduler {
        &self.waves
    }

    pub fn map(&self) -> &BattleMap {
        &self.map
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn position_of(&self, entity: Entity) -> Option<Position> {
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }

    pub fn target_of(&self, unit: Entity) -> Option<Entity> {
        self.world.get::<&Target>(unit).ok().and_then(|t| t.0)
    }

    pub fn is_live(&self, entity: Entity) -> bool {
        lifecycle::is_live(&self.world, entity)
    }

    // --- Subscriptions ---

    /// Listen to every battle event as it is emitted.
    pub fn subscribe(&mut self, listener: impl FnMut(&BattleEvent) + Send + 'static) {
        self.hub.subscribe(listener);
    }

    /// Subscribe to the destroy event of `entity`. Fires at most once.
    pub fn on_destroy(
        &mut self,
        entity: Entity,
        subscriber: impl FnMut(&DestroyEvent) + Send + 'static,
    ) -> Result<(), SimError> {
        self.ensure_live(entity)?;
        self.hub.on_destroy(entity, subscriber);
        Ok(())
    }

    /// Subscribe to hits of `charge`.
    pub fn on_collision(
        &mut self,
        charge: Entity,
        subscriber: impl FnMut(&CollisionEvent) + Send + 'static,
    ) -> Result<(), SimError> {
        self.ensure_live(charge)?;
        self.hub.on_collision(charge, subscriber);
        Ok(())
    }

    // --- Direct operations ---

    /// Apply `damage` to a combat unit.
    pub fn hit(&mut self, unit: Entity, damage: f32) -> Result<HitOutcome, SimError> {
        let outcome = systems::damage::apply_hit(
            &mut self.world,
            &mut self.map,
            &mut self.hub,
            &mut self.despawn_buffer,
            unit,
            damage,
            self.config.dying_duration_secs,
        )?;
        self.flush();
        Ok(outcome)
    }

    /// Destroy an entity. Returns false if it was already destroyed or never
    /// existed; the destroy event fires once regardless of how often this is
    /// called.
    pub fn request_destroy(&mut self, entity: Entity) -> bool {
        let destroyed = lifecycle::request_destroy(
            &mut self.world,
            &mut self.map,
            &mut self.hub,
            &mut self.despawn_buffer,
            entity,
        );
        self.flush();
        destroyed
    }

    /// Run target capture for one unit and return its target.
    pub fn capture_target(&mut self, unit: Entity) -> Result<Option<Entity>, SimError> {
        systems::targeting::capture_for(&mut self.world, &self.map, unit)
    }

    /// Fire `unit` at its target now, ignoring its cooldown. Returns the charge.
    pub fn fire(&mut self, unit: Entity) -> Result<Entity, SimError> {
        let shot = systems::fire_control::fire(&mut self.world, &mut self.hub, unit)?;
        self.spawn_charge(shot.owner, shot.position, shot.direction)
    }

    /// Spawn a charge for `owner`'s team with the configured speed and range.
    pub fn spawn_charge(
        &mut self,
        owner: Entity,
        position: Position,
        direction: Vec3,
    ) -> Result<Entity, SimError> {
        world_setup::spawn_charge(
            &mut self.world,
            &mut self.map,
            owner,
            position,
            direction,
            self.config.charge_speed,
            self.config.charge_max_distance,
        )
    }

    /// Spawn a bot for `team` on lane index `lane`.
    pub fn spawn_bot(&mut self, team: TeamId, lane: usize) -> Result<Entity, SimError> {
        world_setup::spawn_lane_bot(&mut self.world, &mut self.map, team, lane)
    }

    /// Spawn a wave now, independent of the timer.
    pub fn spawn_wave(&mut self) -> Vec<Entity> {
        systems::wave_spawner::spawn(
            &mut self.world,
            &mut self.map,
            &mut self.hub,
            &mut self.waves,
        )
    }

    // --- Internals ---

    fn ensure_live(&self, entity: Entity) -> Result<(), SimError> {
        if !self.world.contains(entity) {
            Err(SimError::NoSuchEntity(entity))
        } else if !lifecycle::is_live(&self.world, entity) {
            Err(SimError::AlreadyDestroyed(entity))
        } else {
            Ok(())
        }
    }

    fn flush(&mut self) {
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: BattleCommand) {
        debug!(?command, "command");
        match command {
            BattleCommand::EnableWaves => self.waves.enable(),
            BattleCommand::DisableWaves => self.waves.disable(),
            BattleCommand::SpawnWave => {
                if self.phase == BattlePhase::Active {
                    self.spawn_wave();
                } else {
                    warn!(phase = ?self.phase, "wave requested outside an active battle");
                }
            }
            BattleCommand::Pause => {
                if self.phase == BattlePhase::Active {
                    self.phase = BattlePhase::Paused;
                }
            }
            BattleCommand::Resume => {
                if self.phase == BattlePhase::Paused {
                    self.phase = BattlePhase::Active;
                }
            }
        }
    }

    fn run_systems(&mut self, dt: f32) {
        // 1. Target capture
        systems::targeting::run(&mut self.world, &self.map);

        // 2. Bot FSM and lane walking
        systems::bot_behavior::run(&mut self.world, &self.map, &mut self.hub, dt);

        // 3. Fire control, then the shots become charges
        let shots = systems::fire_control::run(&mut self.world, &self.map, &mut self.hub, dt);
        for shot in shots {
            if let Err(err) = self.spawn_charge(shot.owner, shot.position, shot.direction) {
                warn!(owner = ?shot.owner, %err, "shot dropped");
            }
        }

        // 4. Charges move and collide
        let index = CollisionIndex::build(&self.world, &self.map);
        systems::charges::run(
            &mut self.world,
            &mut self.map,
            &mut self.hub,
            &mut self.despawn_buffer,
            &index,
            dt,
            self.config.dying_duration_secs,
        );

        // 5. Dying timers
        systems::bot_behavior::advance_dying(
            &mut self.world,
            &mut self.map,
            &mut self.hub,
            &mut self.despawn_buffer,
            dt,
        );

        // 6. Cleanup
        self.flush();

        // 7. Waves
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.map,
            &mut self.hub,
            &mut self.waves,
            dt,
        );
    }

    fn check_outcome(&mut self) {
        if self.map.active_count() > 1 {
            return;
        }
        let winner = self.map.winner();
        self.phase = BattlePhase::Finished;
        self.waves.disable();
        match winner {
            Some(team) => info!(%team, tick = self.time.tick, "battle won"),
            None => info!(tick = self.time.tick, "battle ended with no survivor"),
        }
        self.hub.emit(BattleEvent::BattleWon { team: winner });
    }
}
