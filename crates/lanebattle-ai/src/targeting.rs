//! Target capture ("try capture target").
//!
//! The first enemy in range wins, in the order the caller enumerates
//! enemies. A current target is kept for as long as it stays valid.

use lanebattle_core::types::Position;

/// An enemy unit that may be captured.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<H> {
    pub handle: H,
    pub position: Position,
}

/// Whether `target` lies within `range` of `origin` (inclusive).
pub fn in_range(origin: &Position, target: &Position, range: f32) -> bool {
    origin.distance_to(target) <= range
}

/// Pick the target for a unit at `origin`.
///
/// Returns `current` if it is still among `enemies` and within `range`,
/// otherwise the first enemy within `range`, otherwise `None`.
pub fn capture_target<H: Copy + PartialEq>(
    current: Option<H>,
    origin: &Position,
    range: f32,
    enemies: &[Candidate<H>],
) -> Option<H> {
    if let Some(handle) = current {
        let still_valid = enemies
            .iter()
            .any(|c| c.handle == handle && in_range(origin, &c.position, range));
        if still_valid {
            return Some(handle);
        }
    }

    enemies
        .iter()
        .find(|c| in_range(origin, &c.position, range))
        .map(|c| c.handle)
}
