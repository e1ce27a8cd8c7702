//! Collision index: one sphere per live combat unit, queried by swept charges.
//!
//! Rebuilt every tick from the world. A charge's step from its previous to its
//! current position is cast as a segment, so fast charges cannot tunnel through
//! thin shapes.

use glam::Vec3;
use hecs::{Entity, World};

use lanebattle_core::components::Collider;
use lanebattle_core::types::{Position, TeamId};

use crate::battle_map::BattleMap;
use crate::lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(pub u32);

/// A registered sphere and the unit it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub id: ShapeId,
    pub owner: Entity,
    pub team: TeamId,
    pub center: Vec3,
    pub radius: f32,
}

/// Nearest intersection along a cast.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub shape: ShapeId,
    pub owner: Entity,
    /// Distance from the cast origin to the entry point.
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct CollisionIndex {
    shapes: Vec<Shape>,
}

impl CollisionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every targetable unit of every active team, in targeting order.
    pub fn build(world: &World, map: &BattleMap) -> Self {
        let mut index = Self::new();
        for team in map.teams() {
            for unit in team.units() {
                if !lifecycle::is_targetable(world, unit) {
                    continue;
                }
                let (Ok(position), Ok(collider)) =
                    (world.get::<&Position>(unit), world.get::<&Collider>(unit))
                else {
                    continue;
                };
                index.insert(unit, team.id, shape_center(&position, &collider), collider.radius);
            }
        }
        index
    }

    pub fn insert(&mut self, owner: Entity, team: TeamId, center: Vec3, radius: f32) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(Shape {
            id,
            owner,
            team,
            center,
            radius,
        });
        id
    }

    pub fn owner_of(&self, id: ShapeId) -> Option<Entity> {
        self.shapes.get(id.0 as usize).map(|s| s.owner)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Cast from `origin` along `direction` for `max_distance` and return the
    /// nearest accepted shape. Ties go to the shape registered first. A cast of
    /// zero length or with a zero direction never hits.
    pub fn ray_cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        accept: impl Fn(&Shape) -> bool,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance.is_nan() || max_distance <= 0.0 {
            return None;
        }

        let mut best: Option<RayHit> = None;
        for shape in &self.shapes {
            let Some(t) = ray_sphere(origin, dir, shape.center, shape.radius) else {
                continue;
            };
            if t > max_distance || best.is_some_and(|b| t >= b.distance) {
                continue;
            }
            if !accept(shape) {
                continue;
            }
            best = Some(RayHit {
                shape: shape.id,
                owner: shape.owner,
                distance: t,
                point: origin + dir * t,
            });
        }
        best
    }
}

/// World-space center of a unit's sphere.
pub fn shape_center(position: &Position, collider: &Collider) -> Vec3 {
    position.0 + Vec3::Y * collider.center_height
}

/// Entry distance of a ray (unit `dir`) into a sphere. Zero if the origin is
/// already inside.
pub fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let m = origin - center;
    let b = m.dot(dir);
    let c = m.dot(m) - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some((-b - disc.sqrt()).max(0.0))
}
