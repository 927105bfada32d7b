//! Collision helpers
//!
//! Everything in the arena is a circle, so overlap is a distance check against
//! the sum of radii.

use glam::Vec2;

use super::pool::{Pool, SlotHandle};

/// Strict overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

/// Unit vector from `from` toward `to`, or `None` when they coincide
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Option<Vec2> {
    (to - from).try_normalize()
}

/// Anything with a position that can be searched for
pub trait Located {
    fn pos(&self) -> Vec2;
}

/// Closest active entry to `from` by Euclidean distance (linear scan)
///
/// Ties resolve to the lowest slot.
pub fn nearest<T: Located>(pool: &Pool<T>, from: Vec2) -> Option<(SlotHandle, Vec2)> {
    let mut best: Option<(SlotHandle, Vec2, f32)> = None;
    for (handle, item) in pool.iter() {
        let pos = item.pos();
        let dist = pos.distance_squared(from);
        if best.is_none_or(|(_, _, d)| dist < d) {
            best = Some((handle, pos, dist));
        }
    }
    best.map(|(handle, pos, _)| (handle, pos))
}
