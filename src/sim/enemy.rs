//! Pathogens and the XP orbs they leave behind

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Located, circles_overlap, direction};
use crate::Color;
use crate::consts::*;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Spherical virus
    #[default]
    Basic,
    /// Flagellated bacterium
    Fast,
    /// Encapsulated superbacterium
    Tank,
    /// Mutant virus, force-spawned on a fixed schedule
    Boss,
}

/// Fixed stat row for an enemy kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub xp_value: u32,
    pub color: Color,
}

impl EnemyKind {
    /// Kinds the regular spawn timer can pick
    pub const REGULAR: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Tank];

    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                health: 30.0,
                speed: 1.5,
                damage: 10.0,
                radius: 15.0,
                xp_value: 5,
                color: 0xff6b9d,
            },
            EnemyKind::Fast => EnemyStats {
                health: 15.0,
                speed: 3.0,
                damage: 5.0,
                radius: 12.0,
                xp_value: 8,
                color: 0xffaa44,
            },
            EnemyKind::Tank => EnemyStats {
                health: 100.0,
                speed: 0.8,
                damage: 20.0,
                radius: 25.0,
                xp_value: 15,
                color: 0x9966ff,
            },
            EnemyKind::Boss => EnemyStats {
                health: 500.0,
                speed: 1.0,
                damage: 30.0,
                radius: 40.0,
                xp_value: 100,
                color: 0xff3366,
            },
        }
    }

    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }
}

/// A pooled enemy
#[derive(Debug, Clone, Default)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    /// Contact damage dealt to the player (applied by the caller)
    pub damage: f32,
    pub radius: f32,
    pub xp_value: u32,
    pub color: Color,
    /// Cosmetic white flash after a hit (frames remaining)
    pub hit_flash: u32,
}

impl Enemy {
    /// Reinitialise a pool slot as a fresh enemy of `kind`
    pub fn reset(&mut self, pos: Vec2, kind: EnemyKind) {
        let stats = kind.stats();
        *self = Self {
            pos,
            kind,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            damage: stats.damage,
            radius: stats.radius,
            xp_value: stats.xp_value,
            color: stats.color,
            hit_flash: 0,
        };
    }

    /// Chase the player one step
    ///
    /// Returns true when the enemy was touching the player at the start of the
    /// step. The enemy never applies its own contact damage.
    pub fn update(&mut self, player_pos: Vec2, player_radius: f32) -> bool {
        let touching = circles_overlap(self.pos, self.radius, player_pos, player_radius);

        if let Some(dir) = direction(self.pos, player_pos) {
            self.pos += dir * self.speed;
        }

        self.hit_flash = self.hit_flash.saturating_sub(1);

        touching
    }

    /// Apply damage; true only on the hit that kills
    ///
    /// Health never reads below zero. Hits on an already-dead enemy are
    /// ignored so a death is reported exactly once.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health -= amount;
        self.hit_flash = HIT_FLASH_FRAMES;

        if self.health <= 0.0 {
            self.health = 0.0;
            return true;
        }
        false
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Remaining health in [0, 1] (health bar)
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Located for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }
}

/// Experience dropped by a dead enemy
#[derive(Debug, Clone, Default)]
pub struct XpOrb {
    pub pos: Vec2,
    pub value: u32,
    pub radius: f32,
    pub magnet_range: f32,
    /// Current attraction speed (ramps up while in range)
    pub speed: f32,
}

impl XpOrb {
    pub fn reset(&mut self, pos: Vec2, value: u32) {
        *self = Self {
            pos,
            value,
            radius: XP_ORB_RADIUS,
            magnet_range: XP_ORB_MAGNET_RANGE,
            speed: 0.0,
        };
    }

    /// Drift toward the player once inside the magnet range
    ///
    /// Returns true when collected.
    pub fn update(&mut self, player_pos: Vec2, player_radius: f32) -> bool {
        let distance = self.pos.distance(player_pos);
        if distance >= self.magnet_range {
            return false;
        }

        self.speed = (self.speed + XP_ORB_ACCEL).min(XP_ORB_MAX_SPEED);
        match direction(self.pos, player_pos) {
            Some(dir) => self.pos += dir * self.speed,
            // Sitting exactly on the player
            None => return true,
        }

        distance < player_radius + self.radius
    }
}

impl Located for XpOrb {
    fn pos(&self) -> Vec2 {
        self.pos
    }
}
