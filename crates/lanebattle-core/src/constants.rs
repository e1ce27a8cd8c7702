//! Simulation constants and tuning parameters.

/// Nominal frame rate of a host driving `advance` (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the nominal frame rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Charges ---

/// Charge speed (units per second).
pub const CHARGE_SPEED: f32 = 300.0;

/// Distance after which a charge is spent.
pub const CHARGE_MAX_DISTANCE: f32 = 200.0;

/// Damage per charge unless the owning team overrides it.
pub const CHARGE_DAMAGE: f32 = 40.0;

/// Blue's charge damage in the 5x5 preset.
pub const HEAVY_CHARGE_DAMAGE: f32 = 60.0;

/// Radius of a charge, for display only. Collision treats charges as points.
pub const CHARGE_RADIUS: f32 = 0.6;

// --- Waves ---

/// Seconds between bot waves.
pub const WAVE_INTERVAL_SECS: f32 = 30.0;

// --- Bases ---

pub const BASE_MAX_HEALTH: f32 = 3000.0;

pub const BASE_RANGE: f32 = 150.0;

pub const BASE_FIRE_COOLDOWN_SECS: f32 = 1.0;

pub const BASE_COLLIDER_RADIUS: f32 = 25.0;

pub const BASE_COLLIDER_HEIGHT: f32 = 15.0;

// --- Towers ---

pub const TOWER_MAX_HEALTH: f32 = 1000.0;

pub const TOWER_RANGE: f32 = 150.0;

pub const TOWER_FIRE_COOLDOWN_SECS: f32 = 0.8;

pub const TOWER_COLLIDER_RADIUS: f32 = 8.0;

pub const TOWER_COLLIDER_HEIGHT: f32 = 12.0;

// --- Bots ---

pub const BOT_MAX_HEALTH: f32 = 200.0;

pub const BOT_RANGE: f32 = 120.0;

/// Matches the length of one shooting animation cycle.
pub const BOT_FIRE_COOLDOWN_SECS: f32 = 0.6;

/// Walking speed (units per second).
pub const BOT_SPEED: f32 = 25.0;

pub const BOT_COLLIDER_RADIUS: f32 = 3.0;

pub const BOT_COLLIDER_HEIGHT: f32 = 6.0;

/// Length of the one-shot dying sequence before the bot is removed.
pub const BOT_DYING_SECS: f32 = 2.0;

/// Distance at which a waypoint counts as reached.
pub const WAYPOINT_EPSILON: f32 = 0.01;

// --- Map ---

/// Minimum number of points a lane needs to form a path.
pub const MIN_LANE_POINTS: usize = 2;

/// Minimum number of teams for a battle.
pub const MIN_TEAMS: usize = 2;
