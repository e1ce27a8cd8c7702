//! Fundamental geometric and simulation types.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 3D position in map space. y = Up, the battle plane is x/z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec3);

/// Facing of an entity as a unit vector. Zero when the entity has never turned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Heading(pub Vec3);

/// Index of a team inside the battle map. Stable for the lifetime of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }

    /// Distance on the battle plane, ignoring height.
    pub fn ground_distance_to(&self, other: &Position) -> f32 {
        let dx = other.0.x - self.0.x;
        let dz = other.0.z - self.0.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Unit vector pointing at `other`, or zero if both positions coincide.
    pub fn direction_to(&self, other: &Position) -> Vec3 {
        (other.0 - self.0).normalize_or_zero()
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl From<Vec3> for Position {
    fn from(v: Vec3) -> Self {
        Self(v)
    }
}

impl Heading {
    /// Heading pointing along `direction`. Degenerate input yields a zero heading.
    pub fn towards(direction: Vec3) -> Self {
        Self(direction.normalize_or_zero())
    }

    /// Yaw around the up axis in radians (0 = +z, counter-clockwise towards +x).
    pub fn yaw(&self) -> f32 {
        self.0.x.atan2(self.0.z)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "team#{}", self.0)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}
