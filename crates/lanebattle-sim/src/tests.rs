//! Tests for the battle engine, map bookkeeping, collision and the systems.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use glam::Vec3;
use hecs::Entity;

use lanebattle_core::commands::BattleCommand;
use lanebattle_core::components::{BotBehavior, BotPath, Charge, FireControl, Health};
use lanebattle_core::config::*;
use lanebattle_core::enums::*;
use lanebattle_core::error::ConfigError;
use lanebattle_core::events::BattleEvent;
use lanebattle_core::types::{Position, TeamId};

use crate::battle_map::Lane;
use crate::channels::EventChannel;
use crate::collision::{ray_sphere, CollisionIndex};
use crate::engine::{BattleEngine, SimConfig};
use crate::error::SimError;
use crate::links::Target;
use crate::systems::bot_behavior::advance_along_path;
use crate::systems::charges;
use crate::systems::damage::HitOutcome;
use crate::systems::wave_spawner::WaveScheduler;

// ---- Fixtures ----

fn structure(kind: &str, name: &str, x: f32, z: f32) -> StructureConfig {
    StructureConfig {
        kind: kind.to_string(),
        name: name.to_string(),
        position: PointConfig::new(x, 0.0, z),
    }
}

fn team(name: &str, color: &str) -> TeamConfig {
    TeamConfig {
        name: name.to_string(),
        color: color.to_string(),
        charge_damage: None,
    }
}

/// Red base at x = -400, blue base at x = 400, one lane between them.
fn duel() -> MapConfig {
    let mut bases = BTreeMap::new();
    bases.insert(
        TEAM_RED.to_string(),
        BaseEntry::One(structure("base", "Base", -400.0, 0.0)),
    );
    bases.insert(
        TEAM_BLUE.to_string(),
        BaseEntry::One(structure("base", "Base", 400.0, 0.0)),
    );
    MapConfig {
        kind: "test".to_string(),
        name: "duel".to_string(),
        plane_size: 1000.0,
        point_size: 10.0,
        teams: vec![team(TEAM_RED, "#FF0000"), team(TEAM_BLUE, "#0000FF")],
        bases,
        towers: BTreeMap::new(),
        roads: vec![LaneConfig {
            name: "mid".to_string(),
            color: "#FFDD00".to_string(),
            points: vec![
                PointConfig::new(-380.0, 0.0, 0.0),
                PointConfig::new(380.0, 0.0, 0.0),
            ],
        }],
    }
}

fn with_towers(mut config: MapConfig, team: &str, towers: &[(&str, f32, f32)]) -> MapConfig {
    config.towers.insert(
        team.to_string(),
        towers
            .iter()
            .map(|&(name, x, z)| structure("tower", name, x, z))
            .collect(),
    );
    config
}

fn with_green(mut config: MapConfig) -> MapConfig {
    config.teams.push(team("green", "#00FF00"));
    config.bases.insert(
        "green".to_string(),
        BaseEntry::One(structure("base", "Base", 0.0, 400.0)),
    );
    config
}

fn quiet() -> SimConfig {
    SimConfig {
        waves_enabled: false,
        ..Default::default()
    }
}

fn engine(config: MapConfig) -> BattleEngine {
    BattleEngine::from_map(&config, quiet()).unwrap()
}

fn team_id(engine: &BattleEngine, name: &str) -> TeamId {
    engine.map().team_by_name(name).unwrap().id
}

fn base_of(engine: &BattleEngine, name: &str) -> Entity {
    engine.map().team_by_name(name).unwrap().bases[0]
}

fn tower_of(engine: &BattleEngine, name: &str, index: usize) -> Entity {
    engine.map().team_by_name(name).unwrap().towers[index]
}

fn health(engine: &BattleEngine, unit: Entity) -> f32 {
    engine.world().get::<&Health>(unit).unwrap().current
}

fn bot_state(engine: &BattleEngine, bot: Entity) -> BotState {
    engine.world().get::<&BotBehavior>(bot).unwrap().state
}

fn record_events(engine: &mut BattleEngine) -> Arc<Mutex<Vec<BattleEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    engine.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    log
}

fn bits(entity: Entity) -> u64 {
    entity.to_bits().get()
}

// ---- Setup ----

#[test]
fn test_preset_matches_configuration() {
    let config = MapConfig::square_5x5();
    let engine = engine(config.clone());

    assert_eq!(engine.phase(), BattlePhase::Active);
    assert_eq!(engine.map().all_teams().len(), 2);
    assert_eq!(engine.map().lanes().len(), 3);
    assert_eq!(engine.map().team_by_name(TEAM_RED).unwrap().charge_damage, 40.0);
    assert_eq!(engine.map().team_by_name(TEAM_BLUE).unwrap().charge_damage, 60.0);

    for team_config in &config.teams {
        let team = engine.map().team_by_name(&team_config.name).unwrap();
        assert_eq!(team.bases.len(), 1);
        assert_eq!(team.towers.len(), 6);
        assert!(team.bots.is_empty());
        assert!(!team.defeat);

        let base_pos = engine.position_of(team.bases[0]).unwrap();
        assert_eq!(base_pos, config.bases_of(&team.name)[0].position.to_position());

        for (tower, tower_config) in team.towers.iter().zip(config.towers_of(&team.name)) {
            assert_eq!(
                engine.position_of(*tower).unwrap(),
                tower_config.position.to_position()
            );
        }
    }
}

#[test]
fn test_from_map_rejects_invalid_config() {
    let mut config = duel();
    config.teams.truncate(1);
    config.bases.remove(TEAM_BLUE);
    let result = BattleEngine::from_map(&config, quiet());
    assert!(matches!(
        result,
        Err(ConfigError::TooFewTeams { min: 2, found: 1 })
    ));

    let mut config = duel();
    config.roads[0].points.truncate(1);
    let result = BattleEngine::from_map(&config, quiet());
    assert!(matches!(result, Err(ConfigError::LaneTooShort { .. })));
}

#[test]
fn test_team_charge_damage_from_config() {
    let mut config = duel();
    config.teams[1].charge_damage = Some(60.0);
    let engine = engine(config);
    assert_eq!(engine.map().team_by_name(TEAM_RED).unwrap().charge_damage, 40.0);
    assert_eq!(engine.map().team_by_name(TEAM_BLUE).unwrap().charge_damage, 60.0);
}

#[test]
fn test_snapshot_carries_map_metadata() {
    let mut engine = engine(MapConfig::square_5x5());
    let snap = engine.advance(0.0);

    assert_eq!(snap.map_name, "map 5*5");
    assert_eq!(snap.units.len(), 14);
    assert_eq!(snap.lanes.len(), 3);
    assert_eq!(snap.lanes[0].name, "mid");
    assert_eq!(snap.lanes[0].color, "#FFDD00");
    assert_eq!(snap.teams[0].color, "#FF0000");
    assert_eq!(snap.teams[1].towers, 6);
    assert!(snap.units.iter().all(|u| u.bot_state.is_none()));
}

#[test]
fn test_teardown_clears_battle() {
    let mut engine = engine(MapConfig::square_5x5());
    engine.advance(0.5);
    engine.teardown();

    assert_eq!(engine.phase(), BattlePhase::Setup);
    assert_eq!(engine.world().len(), 0);
    assert!(engine.map().all_teams().is_empty());

    let snap = engine.advance(1.0);
    assert!(snap.units.is_empty());
    assert_eq!(snap.time.tick, 0);
}

// ---- Charges ----

#[test]
fn test_charge_moves_full_step_and_expires() {
    let mut engine = BattleEngine::from_map(
        &duel(),
        SimConfig {
            waves_enabled: false,
            charge_speed: 300.0,
            charge_max_distance: 200.0,
            ..Default::default()
        },
    )
    .unwrap();
    let red_base = base_of(&engine, TEAM_RED);
    let charge = engine
        .spawn_charge(red_base, Position::new(0.0, 0.0, 0.0), Vec3::X)
        .unwrap();

    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&destroyed);
    engine
        .on_destroy(charge, move |event| sink.lock().unwrap().push(event.position))
        .unwrap();
    let collisions = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&collisions);
    engine
        .on_collision(charge, move |_| *sink.lock().unwrap() += 1)
        .unwrap();

    let snap = engine.advance(1.0);

    let destroyed = destroyed.lock().unwrap();
    assert_eq!(destroyed.len(), 1);
    assert!(destroyed[0].distance_to(&Position::new(300.0, 0.0, 0.0)) < 1e-3);
    assert_eq!(*collisions.lock().unwrap(), 0);
    assert!(snap.charges.is_empty());
    assert!(!engine.world().contains(charge));
    assert!(engine.map().charges().is_empty());
    assert!(!snap
        .events
        .iter()
        .any(|e| matches!(e, BattleEvent::ChargeHit { .. })));
}

#[test]
fn test_charge_traveled_is_clamped() {
    let mut charge = Charge {
        direction: Vec3::X,
        speed: 300.0,
        damage: 40.0,
        max_distance: 200.0,
        traveled: 0.0,
        prev_position: Position::default(),
    };
    let mut position = Position::default();

    let first = charges::step(&mut charge, &mut position, 0.25);
    assert!((charge.traveled - 75.0).abs() < 1e-4);
    assert!(!first.spent);

    charges::step(&mut charge, &mut position, 0.25);
    let third = charges::step(&mut charge, &mut position, 0.25);
    assert!(third.spent);
    assert_eq!(charge.traveled, 200.0);
    assert!((position.0.x - 225.0).abs() < 1e-3);
    assert!((charge.prev_position.0.x - 150.0).abs() < 1e-3);
}

#[test]
fn test_charge_hits_enemy_and_applies_damage() {
    let mut engine = engine(duel());
    let red_base = base_of(&engine, TEAM_RED);
    let blue_base = base_of(&engine, TEAM_BLUE);
    let log = record_events(&mut engine);

    let charge = engine
        .spawn_charge(red_base, Position::new(300.0, 15.0, 0.0), Vec3::X)
        .unwrap();
    let struck = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&struck);
    engine
        .on_collision(charge, move |event| sink.lock().unwrap().push(event.struck))
        .unwrap();

    engine.advance(1.0);

    assert_eq!(*struck.lock().unwrap(), vec![blue_base]);
    assert_eq!(health(&engine, blue_base), 3000.0 - 40.0);
    assert!(!engine.world().contains(charge));

    let log = log.lock().unwrap();
    let hit = log
        .iter()
        .position(|e| matches!(e, BattleEvent::ChargeHit { .. }))
        .unwrap();
    let destroyed = log
        .iter()
        .position(|e| matches!(e, BattleEvent::Destroyed { entity, .. } if *entity == bits(charge)))
        .unwrap();
    assert!(hit < destroyed);
}

#[test]
fn test_fast_charge_does_not_tunnel() {
    let mut engine = BattleEngine::from_map(
        &duel(),
        SimConfig {
            waves_enabled: false,
            charge_speed: 5000.0,
            charge_max_distance: 10_000.0,
            ..Default::default()
        },
    )
    .unwrap();
    let red_base = base_of(&engine, TEAM_RED);
    let blue_base = base_of(&engine, TEAM_BLUE);

    engine
        .spawn_charge(red_base, Position::new(0.0, 15.0, 0.0), Vec3::X)
        .unwrap();
    engine.advance(1.0);

    assert!(health(&engine, blue_base) < 3000.0);
}

#[test]
fn test_charge_strikes_nearest_shape() {
    // The far tower is registered first; the near one must still be struck.
    let config = with_towers(duel(), TEAM_BLUE, &[("far", 300.0, 0.0), ("near", 200.0, 0.0)]);
    let mut engine = engine(config);
    let red_base = base_of(&engine, TEAM_RED);
    let far = tower_of(&engine, TEAM_BLUE, 0);
    let near = tower_of(&engine, TEAM_BLUE, 1);

    engine
        .spawn_charge(red_base, Position::new(100.0, 12.0, 0.0), Vec3::X)
        .unwrap();
    engine.advance(1.0);

    assert!(health(&engine, near) < 1000.0);
    assert_eq!(health(&engine, far), 1000.0);
}

#[test]
fn test_charge_ignores_own_team() {
    let config = with_towers(duel(), TEAM_RED, &[("own", 100.0, 0.0)]);
    let mut engine = engine(config);
    let red_base = base_of(&engine, TEAM_RED);
    let own = tower_of(&engine, TEAM_RED, 0);

    engine
        .spawn_charge(red_base, Position::new(50.0, 12.0, 0.0), Vec3::X)
        .unwrap();
    engine.advance(0.5);

    assert_eq!(health(&engine, own), 1000.0);
}

#[test]
fn test_charge_needs_a_direction() {
    let mut engine = engine(duel());
    let red_base = base_of(&engine, TEAM_RED);
    let charges_before = engine.map().team_by_name(TEAM_RED).unwrap().charges.len();

    for direction in [Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::splat(f32::INFINITY)] {
        let result = engine.spawn_charge(red_base, Position::new(0.0, 50.0, 0.0), direction);
        assert!(matches!(result, Err(SimError::NoDirection(_))));
    }

    let team = engine.map().team_by_name(TEAM_RED).unwrap();
    assert_eq!(team.charges.len(), charges_before);
    assert!(engine.snapshot().charges.is_empty());
}

// ---- Collision index ----

#[test]
fn test_ray_sphere_entry_distance() {
    let t = ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(10.0, 0.0, 0.0), 2.0).unwrap();
    assert!((t - 8.0).abs() < 1e-5);

    // Origin inside the sphere.
    let t = ray_sphere(Vec3::ZERO, Vec3::X, Vec3::ZERO, 2.0).unwrap();
    assert_eq!(t, 0.0);

    // Sphere behind the origin.
    assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(-10.0, 0.0, 0.0), 2.0).is_none());
    // Passing beside.
    assert!(ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(10.0, 5.0, 0.0), 2.0).is_none());
}

#[test]
fn test_ray_cast_ties_and_limits() {
    let mut world = hecs::World::new();
    let a = world.spawn(());
    let b = world.spawn(());

    let mut index = CollisionIndex::new();
    let first = index.insert(a, TeamId(1), Vec3::new(10.0, 0.0, 0.0), 2.0);
    index.insert(b, TeamId(1), Vec3::new(10.0, 0.0, 0.0), 2.0);

    let hit = index.ray_cast(Vec3::ZERO, Vec3::X, 20.0, |_| true).unwrap();
    assert_eq!(hit.shape, first);
    assert_eq!(index.owner_of(hit.shape), Some(a));

    // Rejected shapes are skipped.
    let hit = index.ray_cast(Vec3::ZERO, Vec3::X, 20.0, |s| s.owner != a).unwrap();
    assert_eq!(hit.owner, b);

    // Too short, zero length, zero direction.
    assert!(index.ray_cast(Vec3::ZERO, Vec3::X, 7.9, |_| true).is_none());
    assert!(index.ray_cast(Vec3::ZERO, Vec3::X, 0.0, |_| true).is_none());
    assert!(index.ray_cast(Vec3::ZERO, Vec3::ZERO, 20.0, |_| true).is_none());
}

// ---- Lifecycle ----

#[test]
fn test_double_destroy_fires_once() {
    let config = with_towers(duel(), TEAM_BLUE, &[("t1", 100.0, 0.0)]);
    let mut engine = engine(config);
    let tower = tower_of(&engine, TEAM_BLUE, 0);
    let log = record_events(&mut engine);

    let count = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&count);
    engine
        .on_destroy(tower, move |_| *sink.lock().unwrap() += 1)
        .unwrap();

    assert!(engine.request_destroy(tower));
    assert!(!engine.request_destroy(tower));

    assert_eq!(*count.lock().unwrap(), 1);
    let destroyed = log
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, BattleEvent::Destroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
    assert!(engine.map().team_by_name(TEAM_BLUE).unwrap().towers.is_empty());
    assert!(!engine.world().contains(tower));
}

#[test]
fn test_stale_handles_are_rejected() {
    let config = with_towers(duel(), TEAM_BLUE, &[("t1", 100.0, 0.0)]);
    let mut engine = engine(config);
    let tower = tower_of(&engine, TEAM_BLUE, 0);
    engine.request_destroy(tower);

    assert_eq!(engine.hit(tower, 10.0), Err(SimError::NoSuchEntity(tower)));
    assert!(matches!(
        engine.on_destroy(tower, |_| {}),
        Err(SimError::NoSuchEntity(_))
    ));
    assert!(matches!(engine.fire(tower), Err(SimError::NoSuchEntity(_))));
}

#[test]
fn test_hit_on_charge_is_not_a_combat_unit() {
    let mut engine = engine(duel());
    let red_base = base_of(&engine, TEAM_RED);
    let charge = engine
        .spawn_charge(red_base, Position::new(0.0, 0.0, 0.0), Vec3::Z)
        .unwrap();
    assert_eq!(engine.hit(charge, 10.0), Err(SimError::NotACombatUnit(charge)));
}

#[test]
fn test_structure_destroyed_on_lethal_hit() {
    let config = with_towers(duel(), TEAM_BLUE, &[("t1", 100.0, 0.0)]);
    let mut engine = engine(config);
    let tower = tower_of(&engine, TEAM_BLUE, 0);

    assert_eq!(engine.hit(tower, 400.0), Ok(HitOutcome::Damaged));
    assert_eq!(health(&engine, tower), 600.0);
    assert_eq!(engine.hit(tower, 5000.0), Ok(HitOutcome::Killed));
    assert!(!engine.world().contains(tower));
}

// ---- Targeting ----

/// Red tower at the origin; blue tower and base both within its range.
fn skirmish() -> MapConfig {
    let mut config = with_towers(duel(), TEAM_RED, &[("guard", 0.0, 0.0)]);
    config.bases.insert(
        TEAM_BLUE.to_string(),
        BaseEntry::One(structure("base", "Base", 140.0, 0.0)),
    );
    with_towers(config, TEAM_BLUE, &[("front", 120.0, 0.0)])
}

#[test]
fn test_capture_prefers_towers_and_clears_on_destroy() {
    let mut engine = engine(skirmish());
    let guard = tower_of(&engine, TEAM_RED, 0);
    let front = tower_of(&engine, TEAM_BLUE, 0);
    let blue_base = base_of(&engine, TEAM_BLUE);

    assert_eq!(engine.capture_target(guard), Ok(Some(front)));

    // Sticky while valid.
    engine.world_mut().get::<&mut Target>(guard).unwrap().0 = Some(blue_base);
    assert_eq!(engine.capture_target(guard), Ok(Some(blue_base)));

    engine.world_mut().get::<&mut Target>(guard).unwrap().0 = Some(front);
    engine.request_destroy(front);
    assert_eq!(engine.target_of(guard), None);

    assert_eq!(engine.capture_target(guard), Ok(Some(blue_base)));
}

#[test]
fn test_no_enemy_in_range_clears_target() {
    let config = with_towers(duel(), TEAM_RED, &[("guard", 0.0, 0.0)]);
    let mut engine = engine(config);
    let guard = tower_of(&engine, TEAM_RED, 0);
    let blue_base = base_of(&engine, TEAM_BLUE);

    engine.world_mut().get::<&mut Target>(guard).unwrap().0 = Some(blue_base);
    assert_eq!(engine.capture_target(guard), Ok(None));
    assert_eq!(engine.target_of(guard), None);
}

#[test]
fn test_targeting_runs_each_tick() {
    let mut engine = engine(skirmish());
    let guard = tower_of(&engine, TEAM_RED, 0);
    let front = tower_of(&engine, TEAM_BLUE, 0);

    let snap = engine.advance(0.1);
    assert_eq!(engine.target_of(guard), Some(front));
    let view = snap.units.iter().find(|u| u.entity == bits(guard)).unwrap();
    assert_eq!(view.target, Some(bits(front)));
}

// ---- Fire control ----

#[test]
fn test_fire_without_target_fails() {
    let config = with_towers(duel(), TEAM_RED, &[("guard", 0.0, 0.0)]);
    let mut engine = engine(config);
    let guard = tower_of(&engine, TEAM_RED, 0);
    assert_eq!(engine.fire(guard), Err(SimError::NoTarget(guard)));
}

#[test]
fn test_fire_spawns_charge_and_resets_cooldown() {
    let mut engine = engine(skirmish());
    let guard = tower_of(&engine, TEAM_RED, 0);
    let front = tower_of(&engine, TEAM_BLUE, 0);
    let log = record_events(&mut engine);

    engine.capture_target(guard).unwrap();
    let charge = engine.fire(guard).unwrap();

    let state = *engine.world().get::<&Charge>(charge).unwrap();
    assert!((state.direction - Vec3::X).length() < 1e-4);
    assert_eq!(state.damage, 40.0);
    let fc = *engine.world().get::<&FireControl>(guard).unwrap();
    assert_eq!(fc.remaining_secs, fc.cooldown_secs);
    assert_eq!(engine.map().team_by_name(TEAM_RED).unwrap().charges, vec![charge]);

    let log = log.lock().unwrap();
    assert!(matches!(
        log.as_slice(),
        [BattleEvent::ShotFired { owner, .. }] if *owner == bits(guard)
    ));
    assert_eq!(engine.target_of(guard), Some(front));
}

#[test]
fn test_towers_trade_fire_over_time() {
    let mut engine = engine(skirmish());
    let guard = tower_of(&engine, TEAM_RED, 0);
    let front = tower_of(&engine, TEAM_BLUE, 0);

    for _ in 0..120 {
        engine.advance(1.0 / 60.0);
    }

    assert!(health(&engine, front) < 1000.0);
    assert!(health(&engine, guard) < 1000.0);
    let fc = *engine.world().get::<&FireControl>(guard).unwrap();
    assert!(fc.remaining_secs >= 0.0);
}

// ---- Bots ----

#[test]
fn test_bot_walks_lane_then_shoots() {
    let mut engine = engine(duel());
    let red = team_id(&engine, TEAM_RED);
    let log = record_events(&mut engine);

    let bot = engine.spawn_bot(red, 0).unwrap();
    assert_eq!(bot_state(&engine, bot), BotState::Idle);

    engine.advance(0.1);
    assert_eq!(bot_state(&engine, bot), BotState::Walking);
    let x = engine.position_of(bot).unwrap().0.x;
    assert!(x > -400.0);

    let mut shooting = false;
    for _ in 0..400 {
        engine.advance(0.1);
        if bot_state(&engine, bot) == BotState::Shooting {
            shooting = true;
            break;
        }
    }
    assert!(shooting, "bot never reached shooting range");

    let blue_base = base_of(&engine, TEAM_BLUE);
    let distance = engine
        .position_of(bot)
        .unwrap()
        .distance_to(&engine.position_of(blue_base).unwrap());
    assert!(distance <= 120.0 + 1e-3);
    assert_eq!(engine.target_of(bot), Some(blue_base));

    let transitions: Vec<(BotState, BotState)> = log
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::BotStateChanged { bot: b, from, to } if *b == bits(bot) => {
                Some((*from, *to))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (BotState::Idle, BotState::Walking),
            (BotState::Walking, BotState::Shooting)
        ]
    );
}

#[test]
fn test_bot_dying_sequence() {
    let mut engine = engine(duel());
    let red = team_id(&engine, TEAM_RED);
    let bot = engine.spawn_bot(red, 0).unwrap();

    let destroyed = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&destroyed);
    engine
        .on_destroy(bot, move |_| *sink.lock().unwrap() += 1)
        .unwrap();

    assert_eq!(engine.hit(bot, 500.0), Ok(HitOutcome::Killed));
    assert_eq!(bot_state(&engine, bot), BotState::Dying);
    assert_eq!(health(&engine, bot), 0.0);
    assert_eq!(engine.hit(bot, 10.0), Ok(HitOutcome::Ignored));

    let start = engine.position_of(bot).unwrap();
    engine.advance(1.0);
    assert!(engine.world().contains(bot));
    assert_eq!(bot_state(&engine, bot), BotState::Dying);
    assert_eq!(engine.position_of(bot).unwrap(), start);

    engine.advance(1.0);
    assert!(!engine.world().contains(bot));
    assert_eq!(*destroyed.lock().unwrap(), 1);
    assert!(engine.map().bots().is_empty());
}

#[test]
fn test_bot_path_starts_at_own_end() {
    let engine = engine(duel());
    let blue = team_id(&engine, TEAM_BLUE);
    let lane = &engine.map().lanes()[0];
    let origin = engine.position_of(base_of(&engine, TEAM_BLUE)).unwrap();

    let path =
        crate::world_setup::bot_path(engine.world(), engine.map(), blue, lane, &origin);
    assert_eq!(path.waypoints[0], Position::new(380.0, 0.0, 0.0));
    assert_eq!(path.destination, Position::new(-400.0, 0.0, 0.0));
}

#[test]
fn test_advance_along_path_carries_over() {
    let mut path = BotPath {
        waypoints: vec![Position::new(10.0, 0.0, 0.0), Position::new(10.0, 0.0, 10.0)],
        next_waypoint: 0,
        destination: Position::new(20.0, 0.0, 10.0),
        arrived: false,
    };
    let mut position = Position::default();

    let dir = advance_along_path(&mut position, &mut path, 15.0).unwrap();
    assert!(position.distance_to(&Position::new(10.0, 0.0, 5.0)) < 1e-4);
    assert!((dir - Vec3::Z).length() < 1e-4);
    assert_eq!(path.next_waypoint, 1);

    advance_along_path(&mut position, &mut path, 100.0);
    assert!(path.arrived);
    assert_eq!(position, Position::new(20.0, 0.0, 10.0));
    assert!(advance_along_path(&mut position, &mut path, 5.0).is_none());
}

#[test]
fn test_lane_orientation() {
    let lane = Lane {
        name: "mid".to_string(),
        color: String::new(),
        points: vec![Position::new(0.0, 0.0, 0.0), Position::new(100.0, 0.0, 0.0)],
    };
    let near_end = lane.oriented_from(&Position::new(120.0, 0.0, 0.0));
    assert_eq!(near_end[0], Position::new(100.0, 0.0, 0.0));
    let near_start = lane.oriented_from(&Position::new(-5.0, 0.0, 0.0));
    assert_eq!(near_start[0], Position::new(0.0, 0.0, 0.0));
}

// ---- Defeat ----

#[test]
fn test_defeated_team_leaves_active_set() {
    let config = with_towers(with_green(duel()), "green", &[("g1", 0.0, 300.0)]);
    let mut engine = engine(config);
    let red = team_id(&engine, TEAM_RED);
    let green = team_id(&engine, "green");
    let green_tower = tower_of(&engine, "green", 0);
    let log = record_events(&mut engine);

    engine.request_destroy(base_of(&engine, "green"));

    assert!(engine.map().team(green).unwrap().defeat);
    assert_eq!(engine.map().active_count(), 2);
    assert!(engine.map().teams().all(|t| t.id != green));
    assert!(!engine.map().enemy_units(red).contains(&green_tower));
    assert!(!engine.map().towers().contains(&green_tower));
    assert!(log
        .lock()
        .unwrap()
        .contains(&BattleEvent::TeamDefeated { team: green }));

    // Leftover units stay in the world but nothing updates them.
    let snap = engine.advance(1.0);
    assert_eq!(snap.phase, BattlePhase::Active);
    assert!(engine.world().contains(green_tower));
    assert_eq!(engine.target_of(green_tower), None);
    assert_eq!(health(&engine, green_tower), 1000.0);
    assert!(snap.teams.iter().any(|t| t.id == green && t.defeated));
}

#[test]
fn test_defeated_team_spawns_no_bots() {
    let mut engine = engine(with_green(duel()));
    let green = team_id(&engine, "green");
    engine.request_destroy(base_of(&engine, "green"));

    assert_eq!(engine.spawn_bot(green, 0), Err(SimError::TeamDefeated(green)));
    let bots = engine.spawn_wave();
    assert_eq!(bots.len(), 2);
    assert!(engine.map().team(green).unwrap().bots.is_empty());
}

#[test]
fn test_last_team_standing_wins() {
    let mut engine = engine(duel());
    let red = team_id(&engine, TEAM_RED);
    let blue = team_id(&engine, TEAM_BLUE);

    engine.request_destroy(base_of(&engine, TEAM_BLUE));
    let teams: Vec<TeamId> = engine.map().teams().map(|t| t.id).collect();
    assert_eq!(teams, vec![red]);

    let snap = engine.advance(0.1);
    assert_eq!(snap.phase, BattlePhase::Finished);
    assert_eq!(snap.winner, Some(red));
    assert!(snap
        .events
        .contains(&BattleEvent::TeamDefeated { team: blue }));
    assert!(snap
        .events
        .contains(&BattleEvent::BattleWon { team: Some(red) }));

    let tick = engine.time().tick;
    let snap = engine.advance(0.1);
    assert_eq!(engine.time().tick, tick);
    assert!(snap.events.is_empty());
}

// ---- Waves ----

#[test]
fn test_wave_scheduler_interval() {
    let mut waves = WaveScheduler::new(30.0);
    assert!(!waves.tick(30.0), "disabled scheduler must not fire");

    waves.enable();
    assert!(!waves.tick(29.0));
    assert_eq!(waves.accumulator_secs(), 29.0);
    assert!(waves.tick(1.0));
    assert_eq!(waves.accumulator_secs(), 0.0);
}

#[test]
fn test_wave_toggle_resets_accumulator() {
    let mut waves = WaveScheduler::new(30.0);
    waves.enable();
    waves.tick(20.0);
    waves.disable();
    assert_eq!(waves.accumulator_secs(), 0.0);
    waves.enable();
    assert!(!waves.tick(15.0));
    assert!(waves.tick(15.0));
}

#[test]
fn test_engine_spawns_wave_on_interval() {
    let mut engine = BattleEngine::from_map(&duel(), SimConfig::default()).unwrap();

    let snap = engine.advance(29.0);
    assert!(engine.map().bots().is_empty());
    assert_eq!(snap.waves.waves_spawned, 0);

    let snap = engine.advance(1.0);
    assert_eq!(engine.map().bots().len(), 2);
    assert_eq!(snap.waves.waves_spawned, 1);
    assert_eq!(snap.waves.accumulator_secs, 0.0);
    assert!(snap
        .events
        .contains(&BattleEvent::WaveSpawned { wave: 1, bots: 2 }));
}

#[test]
fn test_wave_commands() {
    let mut engine = engine(MapConfig::square_5x5());
    engine.queue_command(BattleCommand::SpawnWave);
    engine.advance(0.0);
    // Two teams, three lanes, one base each.
    assert_eq!(engine.map().bots().len(), 6);

    engine.queue_command(BattleCommand::EnableWaves);
    let snap = engine.advance(10.0);
    assert!(snap.waves.enabled);
    assert_eq!(snap.waves.accumulator_secs, 10.0);

    engine.queue_command(BattleCommand::DisableWaves);
    let snap = engine.advance(25.0);
    assert!(!snap.waves.enabled);
    assert_eq!(snap.waves.waves_spawned, 1);
}

// ---- Engine control ----

#[test]
fn test_pause_and_resume() {
    let mut engine = engine(duel());
    engine.queue_command(BattleCommand::Pause);
    let snap = engine.advance(1.0);
    assert_eq!(snap.phase, BattlePhase::Paused);
    assert_eq!(snap.time.tick, 0);

    engine.queue_command(BattleCommand::Resume);
    let snap = engine.advance(1.0);
    assert_eq!(snap.phase, BattlePhase::Active);
    assert_eq!(snap.time.tick, 1);
}

#[test]
fn test_invalid_dt_is_contained() {
    let mut engine = engine(duel());
    let snap = engine.advance(f32::NAN);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(snap.time.elapsed_secs, 0.0);
    let snap = engine.advance(-1.0);
    assert_eq!(snap.time.elapsed_secs, 0.0);
}

#[test]
fn test_subscribers_run_in_registration_order() {
    let mut channel = EventChannel::<u32>::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        let sink = Arc::clone(&order);
        channel.subscribe(move |value| sink.lock().unwrap().push((id, *value)));
    }
    channel.dispatch(&7);
    assert_eq!(channel.len(), 3);
    assert_eq!(*order.lock().unwrap(), vec![(0, 7), (1, 7), (2, 7)]);
}

#[test]
fn test_determinism_same_inputs() {
    let mut engine_a = BattleEngine::from_map(&MapConfig::square_5x5(), SimConfig::default())
        .unwrap();
    let mut engine_b = BattleEngine::from_map(&MapConfig::square_5x5(), SimConfig::default())
        .unwrap();
    engine_a.queue_command(BattleCommand::SpawnWave);
    engine_b.queue_command(BattleCommand::SpawnWave);

    for _ in 0..1200 {
        let snap_a = engine_a.advance(1.0 / 30.0);
        let snap_b = engine_b.advance(1.0 / 30.0);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same inputs");
    }
}

#[test]
fn test_sim_config_partial_json() {
    let config: SimConfig =
        serde_json::from_str(r#"{"wave_interval_secs": 10.0, "waves_enabled": false}"#).unwrap();
    assert_eq!(config.wave_interval_secs, 10.0);
    assert!(!config.waves_enabled);
    assert_eq!(config.charge_speed, 300.0);
    assert_eq!(config.dying_duration_secs, 2.0);
}

#[test]
fn test_sim_config_rejects_bad_tuning() {
    let cases = [
        SimConfig { charge_speed: -300.0, ..quiet() },
        SimConfig { charge_speed: 0.0, ..quiet() },
        SimConfig { charge_max_distance: f32::NAN, ..quiet() },
        SimConfig { charge_max_distance: 0.0, ..quiet() },
        SimConfig { wave_interval_secs: 0.0, ..quiet() },
        SimConfig { wave_interval_secs: f32::INFINITY, ..quiet() },
        SimConfig { dying_duration_secs: -1.0, ..quiet() },
        SimConfig { dying_duration_secs: f32::NAN, ..quiet() },
    ];
    for config in cases {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTuning { .. })
        ));
        assert!(matches!(
            BattleEngine::from_map(&duel(), config.clone()),
            Err(ConfigError::InvalidTuning { .. })
        ));
        assert!(BattleEngine::new(config).is_err());
    }

    let instant_dying = SimConfig { dying_duration_secs: 0.0, ..quiet() };
    assert!(instant_dying.validate().is_ok());
    assert!(BattleEngine::from_map(&duel(), instant_dying).is_ok());
}

#[test]
fn test_engine_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<BattleEngine>();
}
