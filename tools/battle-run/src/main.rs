//! battle-run: headless lane battle runner.
//!
//! Usage:
//!   battle-run --seconds 120
//!   battle-run --map arena.json --config tuning.json --seconds 300 --dt 0.05 --waves

use std::path::PathBuf;
use std::process;

use tracing::{info, Level};

use lanebattle_core::config::MapConfig;
use lanebattle_core::constants::DT;
use lanebattle_core::enums::BattlePhase;
use lanebattle_core::state::BattleSnapshot;
use lanebattle_sim::{BattleEngine, SimConfig};

struct Options {
    map: Option<PathBuf>,
    config: Option<PathBuf>,
    seconds: f32,
    dt: f32,
    waves: bool,
    verbose: bool,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if options.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .init();

    let map = match load_map(options.map.as_ref()) {
        Ok(map) => map,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    let mut config = match load_config(options.config.as_ref()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };
    config.waves_enabled |= options.waves;
    let waves = config.waves_enabled;
    let mut engine = match BattleEngine::from_map(&map, config) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("Cannot start battle: {err}");
            process::exit(1);
        }
    };
    if !waves {
        // One wave up front when the timer is off.
        engine.spawn_wave();
    }

    let ticks = (options.seconds / options.dt).ceil() as u64;
    info!(ticks, dt = options.dt, "running battle");

    let mut snapshot = engine.snapshot();
    for _ in 0..ticks {
        snapshot = engine.advance(options.dt);
        if snapshot.phase == BattlePhase::Finished {
            break;
        }
    }

    print_summary(&snapshot);
}

fn print_usage() {
    eprintln!(
        "battle-run: headless lane battle runner\n\
         \n\
           --map <path>      Map JSON file (default: built-in 5x5 map)\n\
           --config <path>   Engine tuning JSON (SimConfig fields, all optional)\n\
           --seconds <N>     Simulated seconds to run (default: 120)\n\
           --dt <secs>       Time step per tick (default: 1/60)\n\
           --waves           Spawn bot waves on the timer\n\
           --verbose         Log per-entity lifecycle\n"
    );
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        map: None,
        config: None,
        seconds: 120.0,
        dt: DT,
        waves: false,
        verbose: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--map" => options.map = Some(PathBuf::from(value(args, i)?)),
            "--config" => options.config = Some(PathBuf::from(value(args, i)?)),
            "--seconds" => options.seconds = parse_number(args, i)?,
            "--dt" => options.dt = parse_number(args, i)?,
            "--waves" => {
                options.waves = true;
                i += 1;
                continue;
            }
            "--verbose" => {
                options.verbose = true;
                i += 1;
                continue;
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 2;
    }

    if options.dt.is_nan() || options.dt <= 0.0 {
        return Err("--dt must be positive".to_string());
    }
    Ok(options)
}

fn value(args: &[String], i: usize) -> Result<&str, String> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} needs a value", args[i]))
}

fn parse_number(args: &[String], i: usize) -> Result<f32, String> {
    let raw = value(args, i)?;
    raw.parse()
        .map_err(|_| format!("{}: not a number: {raw}", args[i]))
}

fn load_map(path: Option<&PathBuf>) -> Result<MapConfig, String> {
    let Some(path) = path else {
        return Ok(MapConfig::square_5x5());
    };
    let json = std::fs::read_to_string(path)
        .map_err(|err| format!("Cannot read {}: {err}", path.display()))?;
    MapConfig::from_json(&json).map_err(|err| format!("Invalid map {}: {err}", path.display()))
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig, String> {
    let Some(path) = path else {
        return Ok(SimConfig {
            waves_enabled: false,
            ..Default::default()
        });
    };
    let json = std::fs::read_to_string(path)
        .map_err(|err| format!("Cannot read {}: {err}", path.display()))?;
    serde_json::from_str(&json).map_err(|err| format!("Invalid config {}: {err}", path.display()))
}

fn print_summary(snapshot: &BattleSnapshot) {
    println!(
        "{} after {:.1}s ({} ticks), phase {:?}, {} waves",
        snapshot.map_name,
        snapshot.time.elapsed_secs,
        snapshot.time.tick,
        snapshot.phase,
        snapshot.waves.waves_spawned,
    );
    for team in &snapshot.teams {
        println!(
            "  {:<8} bases {} towers {} bots {}{}",
            team.name,
            team.bases,
            team.towers,
            team.bots,
            if team.defeated { "  (defeated)" } else { "" },
        );
    }
    match snapshot
        .winner
        .and_then(|id| snapshot.teams.iter().find(|t| t.id == id))
    {
        Some(team) => println!("winner: {}", team.name),
        None => println!("no winner"),
    }
}
