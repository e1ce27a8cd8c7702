//! Kind-specific unit profiles.
//!
//! Consolidates per-kind parameters for spawning and fire control.

use lanebattle_core::enums::UnitKind;

/// Combat profile for a unit kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitProfile {
    pub max_health: f32,
    /// Capture and engagement range.
    pub range: f32,
    /// Seconds between shots.
    pub fire_cooldown_secs: f32,
    /// Movement speed, zero for structures.
    pub speed: f32,
    /// Radius of the collidable sphere.
    pub collider_radius: f32,
    /// Height of the sphere's center above the unit's position.
    pub collider_height: f32,
}

/// Get the profile for a given unit kind.
pub fn get_profile(kind: UnitKind) -> UnitProfile {
    use lanebattle_core::constants::*;

    match kind {
        UnitKind::Base => UnitProfile {
            max_health: BASE_MAX_HEALTH,
            range: BASE_RANGE,
            fire_cooldown_secs: BASE_FIRE_COOLDOWN_SECS,
            speed: 0.0,
            collider_radius: BASE_COLLIDER_RADIUS,
            collider_height: BASE_COLLIDER_HEIGHT,
        },
        UnitKind::Tower => UnitProfile {
            max_health: TOWER_MAX_HEALTH,
            range: TOWER_RANGE,
            fire_cooldown_secs: TOWER_FIRE_COOLDOWN_SECS,
            speed: 0.0,
            collider_radius: TOWER_COLLIDER_RADIUS,
            collider_height: TOWER_COLLIDER_HEIGHT,
        },
        UnitKind::Bot => UnitProfile {
            max_health: BOT_MAX_HEALTH,
            range: BOT_RANGE,
            fire_cooldown_secs: BOT_FIRE_COOLDOWN_SECS,
            speed: BOT_SPEED,
            collider_radius: BOT_COLLIDER_RADIUS,
            collider_height: BOT_COLLIDER_HEIGHT,
        },
    }
}
