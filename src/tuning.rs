//! Data-driven game balance
//!
//! Every field has a default, so a partial JSON file only overrides what it
//! names.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Pool capacities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSizes {
    pub enemies: usize,
    pub xp_orbs: usize,
    pub projectiles: usize,
    pub particles: usize,
    pub floating_texts: usize,
}

impl Default for PoolSizes {
    fn default() -> Self {
        Self {
            enemies: MAX_ENEMIES,
            xp_orbs: MAX_XP_ORBS,
            projectiles: MAX_PROJECTILES,
            particles: MAX_PARTICLES,
            floating_texts: MAX_FLOATING_TEXTS,
        }
    }
}

/// Spawn pacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Frames between spawns at t = 0
    pub base_interval: u32,
    /// Spawn interval floor (frames)
    pub min_interval: u32,
    /// The interval shrinks by one frame every this many seconds
    pub interval_step_secs: u32,
    /// Difficulty grows by 1.0 every this many seconds
    pub difficulty_period_secs: f32,
    /// Boss cadence in simulated frames (0 disables bosses)
    pub boss_interval_frames: u64,
    /// Distance outside the arena edge where enemies appear
    pub spawn_margin: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_interval: 120,
            min_interval: 30,
            interval_step_secs: 10,
            difficulty_period_secs: 30.0,
            boss_interval_frames: 1800,
            spawn_margin: 50.0,
        }
    }
}

impl SpawnTuning {
    /// Difficulty multiplier after `secs` seconds: `1 + t / period`
    pub fn difficulty_at(&self, secs: u32) -> f32 {
        if self.difficulty_period_secs <= 0.0 {
            return 1.0;
        }
        1.0 + secs as f32 / self.difficulty_period_secs
    }

    /// Spawn interval (frames) after `secs` seconds, never below the floor
    pub fn interval_at(&self, secs: u32) -> u32 {
        let shrink = secs.checked_div(self.interval_step_secs).unwrap_or(0);
        self.base_interval
            .saturating_sub(shrink)
            .max(self.min_interval)
    }

    /// True on every positive multiple of the boss cadence
    pub fn boss_due(&self, frame: u64) -> bool {
        self.boss_interval_frames > 0 && frame > 0 && frame % self.boss_interval_frames == 0
    }
}

/// Player base stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Frames between attacks
    pub attack_speed: f32,
    pub invulnerable_frames: f32,
    pub xp_first_threshold: u32,
    /// Threshold growth per level in percent (120 = x1.2, floored)
    pub xp_growth_percent: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: PLAYER_RADIUS,
            max_health: PLAYER_MAX_HEALTH,
            speed: PLAYER_SPEED,
            damage: PLAYER_DAMAGE,
            attack_speed: PLAYER_ATTACK_SPEED,
            invulnerable_frames: INVULNERABLE_FRAMES,
            xp_first_threshold: XP_FIRST_THRESHOLD,
            xp_growth_percent: XP_GROWTH_PERCENT,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub pools: PoolSizes,
    pub spawn: SpawnTuning,
    pub player: PlayerTuning,
    /// Camera shake on kills, level-ups and game over
    pub screen_shake: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pools: PoolSizes::default(),
            spawn: SpawnTuning::default(),
            player: PlayerTuning::default(),
            screen_shake: true,
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_difficulty_curve() {
        let spawn = SpawnTuning::default();
        assert_eq!(spawn.difficulty_at(0), 1.0);
        assert_eq!(spawn.difficulty_at(30), 2.0);
        assert_eq!(spawn.difficulty_at(45), 2.5);
    }

    #[test]
    fn test_interval_curve() {
        let spawn = SpawnTuning::default();
        assert_eq!(spawn.interval_at(0), 120);
        assert_eq!(spawn.interval_at(9), 120);
        assert_eq!(spawn.interval_at(10), 119);
        assert_eq!(spawn.interval_at(900), 30);
        assert_eq!(spawn.interval_at(u32::MAX), 30);
    }

    #[test]
    fn test_boss_schedule() {
        let spawn = SpawnTuning::default();
        let frames: Vec<u64> = (0..=6000).filter(|f| spawn.boss_due(*f)).collect();
        assert_eq!(frames, vec![1800, 3600, 5400]);

        let never = SpawnTuning {
            boss_interval_frames: 0,
            ..SpawnTuning::default()
        };
        assert!(!never.boss_due(1800));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "pools": { "enemies": 12 }, "spawn": { "min_interval": 45 } }"#)
            .unwrap();
        assert_eq!(tuning.pools.enemies, 12);
        assert_eq!(tuning.pools.xp_orbs, MAX_XP_ORBS);
        assert_eq!(tuning.spawn.min_interval, 45);
        assert_eq!(tuning.spawn.base_interval, 120);
        assert_eq!(tuning.player, PlayerTuning::default());
        assert!(tuning.screen_shake);

        let round = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(round, tuning);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ pools: nope").is_err());
    }

    proptest! {
        #[test]
        fn prop_interval_non_increasing(t in 0u32..100_000) {
            let spawn = SpawnTuning::default();
            let now = spawn.interval_at(t);
            prop_assert!(spawn.interval_at(t + 1) <= now);
            prop_assert!(now >= spawn.min_interval);
        }

        #[test]
        fn prop_difficulty_matches_formula(t in 0u32..100_000) {
            let spawn = SpawnTuning::default();
            let expected = 1.0 + t as f32 / 30.0;
            prop_assert!((spawn.difficulty_at(t) - expected).abs() < 1e-4);
        }
    }
}
