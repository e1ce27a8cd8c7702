//! Components holding handles to other entities.
//!
//! Handles are weak: the referenced entity may have been despawned, and hecs'
//! generation check makes that detectable (`World::contains`).

use hecs::Entity;

/// Captured target of a combat unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target(pub Option<Entity>);

/// Unit that fired a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeOwner(pub Entity);
