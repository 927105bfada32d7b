//! Immuno Survivor - a survivor-style arena arcade game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (pools, entities, combat, spawning, game phases)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `progression`: Meta-progression carried between runs
//! - `persistence`: Key-value storage for settings and progression

pub mod persistence;
pub mod progression;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use progression::{Progression, RunPerks};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Packed 0xRRGGBB color handed to the presentation layer
pub type Color = u32;

/// Game configuration constants
///
/// Every rate here is per simulation frame; the simulation assumes 60 frames
/// per second.
pub mod consts {
    use crate::Color;

    /// Nominal simulation rate
    pub const FRAMES_PER_SECOND: u32 = 60;

    /// Default arena size (resized by the host)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Pool capacities
    pub const MAX_ENEMIES: usize = 300;
    pub const MAX_XP_ORBS: usize = 300;
    pub const MAX_PROJECTILES: usize = 200;
    pub const MAX_PARTICLES: usize = 400;
    pub const MAX_FLOATING_TEXTS: usize = 50;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const PLAYER_DAMAGE: f32 = 10.0;
    /// Frames between automatic attacks
    pub const PLAYER_ATTACK_SPEED: f32 = 60.0;
    /// Attack cadence can never drop below this
    pub const MIN_ATTACK_SPEED: f32 = 10.0;
    /// Below this distance to the target the player stops
    pub const MOVE_DEAD_ZONE: f32 = 5.0;
    /// Invulnerability after taking a hit (frames)
    pub const INVULNERABLE_FRAMES: f32 = 60.0;
    pub const PLAYER_TRAIL_LENGTH: usize = 15;
    pub const PLAYER_COLOR: Color = 0xe8f0ff;

    /// XP curve
    pub const XP_FIRST_THRESHOLD: u32 = 100;
    /// Threshold growth per level, in percent (x1.2)
    pub const XP_GROWTH_PERCENT: u32 = 120;

    /// Projectiles leave play this far outside the arena
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
    pub const MAGIC_TRAIL_LENGTH: usize = 10;
    /// Max angular jitter of a magic shot (radians, either side)
    pub const MAGIC_SPREAD: f32 = 0.15;
    pub const LIGHTNING_LIFETIME: u32 = 10;
    pub const LIGHTNING_CHANCE: f64 = 0.3;
    pub const CRIT_CHANCE: f64 = 0.1;
    pub const CRIT_MULTIPLIER: f32 = 1.5;

    /// Orbital satellites
    pub const ORBITAL_RADIUS: f32 = 60.0;
    pub const ORBITAL_ORB_SIZE: f32 = 8.0;
    pub const ORBITAL_ANGULAR_SPEED: f32 = 0.05;
    pub const ORBITAL_START_COUNT: usize = 3;
    pub const ORBITAL_DAMAGE_FACTOR: f32 = 0.8;
    pub const ORBITAL_COLOR: Color = 0xffd700;

    /// XP orbs
    pub const XP_ORB_RADIUS: f32 = 6.0;
    pub const XP_ORB_MAGNET_RANGE: f32 = 100.0;
    pub const XP_ORB_ACCEL: f32 = 0.5;
    pub const XP_ORB_MAX_SPEED: f32 = 8.0;
    pub const XP_ORB_COLOR: Color = 0x00f0ff;

    /// Enemy hit flash duration (frames)
    pub const HIT_FLASH_FRAMES: u32 = 5;

    /// Camera shake
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const SHAKE_EPSILON: f32 = 0.1;
    pub const SHAKE_KILL: f32 = 2.0;
    pub const SHAKE_KILL_CAP: f32 = 10.0;
    pub const SHAKE_BOSS_KILL: f32 = 30.0;
    pub const SHAKE_LEVEL_UP: f32 = 20.0;
    pub const SHAKE_GAME_OVER: f32 = 40.0;

    /// Slow motion after a boss kill
    pub const BOSS_SLOW_MOTION_SCALE: f32 = 0.3;
    pub const BOSS_SLOW_MOTION_FRAMES: u32 = 90;

    /// Auto-revive restores this share of max health
    pub const REVIVE_HEALTH_FRACTION: f32 = 0.5;
    pub const REVIVE_INVULNERABLE_FRAMES: f32 = 120.0;
    /// Immortal start perk (30 seconds)
    pub const IMMORTAL_START_FRAMES: f32 = 30.0 * 60.0;

    /// Upgrade choices offered per level-up
    pub const UPGRADE_CHOICES: usize = 3;
}
