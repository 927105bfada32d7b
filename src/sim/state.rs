//! Game state and run/session types
//!
//! `GameState` owns every pool and the player; the tick function is the only
//! thing that mutates it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::particle::Effects;
use super::player::{CombatReport, Player};
use super::spawner::Spawner;
use super::upgrade::UpgradeKind;
use crate::Color;
use crate::consts::*;
use crate::progression::RunPerks;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Paused by the player
    Paused,
    /// Waiting for an upgrade choice
    LevelUp,
    /// Run ended
    GameOver,
}

/// Playable rectangle, origin top-left, y pointing down
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Keep a circle of `radius` fully inside the arena
    ///
    /// An arena smaller than the circle pins it to the center line.
    pub fn clamp_circle(&self, pos: Vec2, radius: f32) -> Vec2 {
        let max_x = (self.width - radius).max(radius);
        let max_y = (self.height - radius).max(radius);
        Vec2::new(pos.x.clamp(radius, max_x), pos.y.clamp(radius, max_y))
    }

    /// True while `pos` is within `margin` of the arena
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }
}

/// Screen shake magnitude (pixels), decays every frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    pub magnitude: f32,
    /// Ignore every request (screen shake off or reduced motion)
    pub muted: bool,
}

impl CameraShake {
    /// Raise the shake to at least `magnitude`
    pub fn set(&mut self, magnitude: f32) {
        if self.muted {
            return;
        }
        self.magnitude = self.magnitude.max(magnitude);
    }

    /// Add to the shake, never past `cap` and never below the current value
    pub fn bump(&mut self, amount: f32, cap: f32) {
        if self.muted {
            return;
        }
        self.magnitude = self.magnitude.max((self.magnitude + amount).min(cap));
    }

    pub fn decay(&mut self) {
        if self.magnitude > 0.0 {
            self.magnitude *= SHAKE_DECAY;
            if self.magnitude < SHAKE_EPSILON {
                self.magnitude = 0.0;
            }
        }
    }

    /// Random camera offset for this frame's draw
    pub fn offset(&self, rng: &mut impl Rng) -> Vec2 {
        if self.magnitude <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * self.magnitude
    }
}

/// Temporary global slow-down
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlowMotion {
    pub scale: f32,
    pub frames_left: u32,
}

impl SlowMotion {
    pub fn start(&mut self, scale: f32, frames: u32) {
        self.scale = scale.clamp(0.0, 1.0);
        self.frames_left = frames;
    }

    /// Count down one display frame
    pub fn tick(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
    }

    /// Current global timescale (1.0 = normal speed)
    pub fn timescale(&self) -> f32 {
        if self.frames_left > 0 { self.scale } else { 1.0 }
    }
}

/// Counters forwarded to the achievement/progression collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatCounter {
    /// Seconds survived (absolute)
    Time,
    Kills,
    /// Level reached (absolute)
    Level,
    Bosses,
    Xp,
    ShotsHit,
    ShotsMissed,
    UpgradesChosen,
    /// Weapons unlocked (absolute)
    WeaponsUsed,
    DamageTaken,
}

/// End-of-run statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub game_time: u32,
    pub kills: u32,
    pub level: u32,
    pub xp_earned: u32,
    pub bosses_killed: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub shots_missed: u32,
}

/// Fire-and-forget notifications for presentation, audio and stats
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemyKilled { pos: Vec2, kind: EnemyKind, color: Color },
    BossSpawned { pos: Vec2 },
    DamageNumber { pos: Vec2, amount: u32, crit: bool },
    PlayerHit { amount: f32, health: f32 },
    PlayerRevived { revives_left: u32 },
    LevelUp { pos: Vec2, level: u32 },
    UpgradeChosen { kind: UpgradeKind },
    PhaseChanged { from: GamePhase, to: GamePhase },
    Stat { counter: StatCounter, value: u32 },
    GameOver { summary: RunSummary },
}

/// Per-run bookkeeping owned by the loop
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Whole seconds survived
    pub game_time: u32,
    /// Simulation steps since the last whole second
    pub frame_accumulator: u32,
    pub kills: u32,
    pub bosses_killed: u32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub shots_missed: u32,
    /// Level-ups waiting for an upgrade choice
    pub pending_level_ups: u32,
    pub shake: CameraShake,
    pub slow_motion: SlowMotion,
}

impl RunState {
    pub fn timescale(&self) -> f32 {
        self.slow_motion.timescale()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Arena bounds cached at the start of each frame
    pub arena: Arena,
    pub tuning: Tuning,
    /// Permanent upgrades applied at the start of every run
    pub perks: RunPerks,
    pub run: RunState,
    pub player: Player,
    pub spawner: Spawner,
    pub effects: Effects,
    /// Upgrades on offer while in `LevelUp`
    pub offer: Vec<UpgradeKind>,
    /// Events raised during the last tick
    pub events: Vec<GameEvent>,
    /// Reused per-step combat buffer
    pub(crate) combat: CombatReport,
}

impl GameState {
    /// Create a game sitting at the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let arena = Arena::default();
        let pools = tuning.pools;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            arena,
            player: Player::new(arena.center(), &tuning.player, pools.projectiles),
            spawner: Spawner::new(tuning.spawn, pools.enemies, pools.xp_orbs),
            effects: Effects::new(pools.particles, pools.floating_texts),
            tuning,
            perks: RunPerks::default(),
            run: RunState::default(),
            offer: Vec::new(),
            events: Vec::new(),
            combat: CombatReport::default(),
        }
    }

    pub fn with_perks(mut self, perks: RunPerks) -> Self {
        self.perks = perks;
        self
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            game_time: self.run.game_time,
            kills: self.run.kills,
            level: self.player.level,
            xp_earned: self.player.xp_earned,
            bosses_killed: self.run.bosses_killed,
            shots_fired: self.run.shots_fired,
            shots_hit: self.run.shots_hit,
            shots_missed: self.run.shots_missed,
        }
    }

    /// Events raised during the last tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}
