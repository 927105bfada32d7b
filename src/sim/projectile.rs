//! Player projectiles
//!
//! Aim is fixed at launch: the velocity points at where the target stood when
//! the shot was fired, and nothing re-aims in flight.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::direction;
use super::state::Arena;
use crate::Color;
use crate::consts::*;

/// Projectile-firing weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Antibody shot
    #[default]
    Bullet,
    /// T-cell bolt (leaves a trail)
    Magic,
    /// Interferon burst (short-lived, fast)
    Lightning,
}

impl ProjectileKind {
    pub fn speed(self) -> f32 {
        match self {
            ProjectileKind::Bullet => 8.0,
            ProjectileKind::Magic => 6.0,
            ProjectileKind::Lightning => 20.0,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            ProjectileKind::Bullet => 5.0,
            ProjectileKind::Magic => 8.0,
            ProjectileKind::Lightning => 15.0,
        }
    }

    /// Multiplier applied to the player's base damage
    pub fn damage_multiplier(self) -> f32 {
        match self {
            ProjectileKind::Bullet => 1.0,
            ProjectileKind::Magic => 1.5,
            ProjectileKind::Lightning => 2.0,
        }
    }

    pub fn color(self) -> Color {
        match self {
            ProjectileKind::Bullet => PLAYER_COLOR,
            ProjectileKind::Magic => 0xff88cc,
            ProjectileKind::Lightning => 0xffdd88,
        }
    }

    /// Frames before the projectile fizzles out (None = until off-screen)
    pub fn lifetime(self) -> Option<u32> {
        match self {
            ProjectileKind::Lightning => Some(LIGHTNING_LIFETIME),
            _ => None,
        }
    }

    fn has_trail(self) -> bool {
        self == ProjectileKind::Magic
    }
}

/// A pooled projectile
#[derive(Debug, Clone, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub kind: ProjectileKind,
    /// Recent positions, oldest first (magic only)
    pub trail: Vec<Vec2>,
    /// Frames left (lightning only)
    pub lifetime: Option<u32>,
}

impl Projectile {
    /// Reinitialise a pool slot as a shot from `from` toward `target`
    ///
    /// A target sitting exactly on the origin fires straight up.
    pub fn launch(&mut self, from: Vec2, target: Vec2, damage: f32, kind: ProjectileKind) {
        let dir = direction(from, target).unwrap_or(Vec2::NEG_Y);
        self.pos = from;
        self.vel = dir * kind.speed();
        self.damage = damage;
        self.radius = kind.radius();
        self.kind = kind;
        self.lifetime = kind.lifetime();
        // Keep the allocation, drop the previous occupant's points
        self.trail.clear();
        if kind.has_trail() && self.trail.capacity() < MAGIC_TRAIL_LENGTH {
            self.trail.reserve_exact(MAGIC_TRAIL_LENGTH + 1);
        }
    }

    /// Advance one frame; false once the projectile has left play
    pub fn update(&mut self, arena: Arena) -> bool {
        self.pos += self.vel;

        if self.kind.has_trail() {
            self.trail.push(self.pos);
            if self.trail.len() > MAGIC_TRAIL_LENGTH {
                self.trail.remove(0);
            }
        }

        if let Some(frames) = self.lifetime.as_mut() {
            *frames = frames.saturating_sub(1);
            if *frames == 0 {
                return false;
            }
        }

        arena.contains_with_margin(self.pos, OFFSCREEN_MARGIN)
    }
}
