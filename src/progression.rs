//! Meta-progression carried between runs
//!
//! Lifetime totals are converted into DNA on a reset; XP buys permanent
//! upgrades, DNA buys premium ones. Both apply to every new run through
//! [`RunPerks`].

use serde::{Deserialize, Serialize};

use crate::consts::IMMORTAL_START_FRAMES;
use crate::persistence::{self, PersistError, Storage};
use crate::sim::RunSummary;

/// Upgrades bought with accumulated XP (no level cap, cost grows x1.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermanentUpgrade {
    StartingHealth,
    StartingDamage,
    StartingSpeed,
    XpMultiplier,
    /// Start every run with T-cells unlocked
    StartingWeapon,
}

impl PermanentUpgrade {
    pub const ALL: [PermanentUpgrade; 5] = [
        PermanentUpgrade::StartingHealth,
        PermanentUpgrade::StartingDamage,
        PermanentUpgrade::StartingSpeed,
        PermanentUpgrade::XpMultiplier,
        PermanentUpgrade::StartingWeapon,
    ];

    pub fn base_cost(self) -> u64 {
        match self {
            PermanentUpgrade::StartingHealth => 100,
            PermanentUpgrade::StartingDamage => 150,
            PermanentUpgrade::StartingSpeed => 200,
            PermanentUpgrade::XpMultiplier => 300,
            PermanentUpgrade::StartingWeapon => 500,
        }
    }

    /// XP price of the next level: `floor(base * 1.5^level)`
    pub fn cost(self, level: u32) -> u64 {
        let level = i32::try_from(level).unwrap_or(i32::MAX);
        let cost = self.base_cost() as f64 * 1.5f64.powi(level);
        if cost >= u64::MAX as f64 {
            u64::MAX
        } else {
            cost.floor() as u64
        }
    }
}

/// Upgrades bought with DNA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PremiumUpgrade {
    AutoRevive,
    PermanentOrbital,
    DoubleXp,
    BossReward,
    ImmortalStart,
}

impl PremiumUpgrade {
    pub const ALL: [PremiumUpgrade; 5] = [
        PremiumUpgrade::AutoRevive,
        PremiumUpgrade::PermanentOrbital,
        PremiumUpgrade::DoubleXp,
        PremiumUpgrade::BossReward,
        PremiumUpgrade::ImmortalStart,
    ];

    /// Flat DNA price per level
    pub fn cost(self) -> u32 {
        match self {
            PremiumUpgrade::AutoRevive => 5,
            PremiumUpgrade::PermanentOrbital => 10,
            PremiumUpgrade::DoubleXp => 15,
            PremiumUpgrade::BossReward => 8,
            PremiumUpgrade::ImmortalStart => 12,
        }
    }

    pub fn max_level(self) -> u32 {
        match self {
            PremiumUpgrade::AutoRevive => 3,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermanentLevels {
    pub starting_health: u32,
    pub starting_damage: u32,
    pub starting_speed: u32,
    pub xp_multiplier: u32,
    pub starting_weapon: u32,
}

impl PermanentLevels {
    pub fn get(&self, kind: PermanentUpgrade) -> u32 {
        match kind {
            PermanentUpgrade::StartingHealth => self.starting_health,
            PermanentUpgrade::StartingDamage => self.starting_damage,
            PermanentUpgrade::StartingSpeed => self.starting_speed,
            PermanentUpgrade::XpMultiplier => self.xp_multiplier,
            PermanentUpgrade::StartingWeapon => self.starting_weapon,
        }
    }

    fn get_mut(&mut self, kind: PermanentUpgrade) -> &mut u32 {
        match kind {
            PermanentUpgrade::StartingHealth => &mut self.starting_health,
            PermanentUpgrade::StartingDamage => &mut self.starting_damage,
            PermanentUpgrade::StartingSpeed => &mut self.starting_speed,
            PermanentUpgrade::XpMultiplier => &mut self.xp_multiplier,
            PermanentUpgrade::StartingWeapon => &mut self.starting_weapon,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PremiumLevels {
    pub auto_revive: u32,
    pub permanent_orbital: u32,
    pub double_xp: u32,
    pub boss_reward: u32,
    pub immortal_start: u32,
}

impl PremiumLevels {
    pub fn get(&self, kind: PremiumUpgrade) -> u32 {
        match kind {
            PremiumUpgrade::AutoRevive => self.auto_revive,
            PremiumUpgrade::PermanentOrbital => self.permanent_orbital,
            PremiumUpgrade::DoubleXp => self.double_xp,
            PremiumUpgrade::BossReward => self.boss_reward,
            PremiumUpgrade::ImmortalStart => self.immortal_start,
        }
    }

    fn get_mut(&mut self, kind: PremiumUpgrade) -> &mut u32 {
        match kind {
            PremiumUpgrade::AutoRevive => &mut self.auto_revive,
            PremiumUpgrade::PermanentOrbital => &mut self.permanent_orbital,
            PremiumUpgrade::DoubleXp => &mut self.double_xp,
            PremiumUpgrade::BossReward => &mut self.boss_reward,
            PremiumUpgrade::ImmortalStart => &mut self.immortal_start,
        }
    }
}

/// Modifiers applied to the player at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunPerks {
    pub bonus_health: f32,
    pub bonus_damage: f32,
    pub bonus_speed: f32,
    pub starting_magic: bool,
    pub starting_orbital: bool,
    /// Frames of invulnerability at run start
    pub invulnerable_frames: f32,
    pub xp_multiplier: f32,
    pub boss_reward_multiplier: f32,
    pub auto_revives: u32,
}

impl Default for RunPerks {
    fn default() -> Self {
        Self {
            bonus_health: 0.0,
            bonus_damage: 0.0,
            bonus_speed: 0.0,
            starting_magic: false,
            starting_orbital: false,
            invulnerable_frames: 0.0,
            xp_multiplier: 1.0,
            boss_reward_multiplier: 1.0,
            auto_revives: 0,
        }
    }
}

/// Lifetime progress
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    /// Spendable XP accumulated across runs
    pub total_xp: u64,
    pub dna_coins: u32,
    pub highest_level: u32,
    pub total_kills: u32,
    /// Longest survival (seconds)
    pub longest_time: u32,
    pub total_resets: u32,
    pub permanent: PermanentLevels,
    pub premium: PremiumLevels,
}

impl Progression {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "immuno_survivor_progress";

    /// Fold a finished run into the lifetime totals
    pub fn record_run(&mut self, summary: &RunSummary) {
        self.total_xp = self.total_xp.saturating_add(u64::from(summary.xp_earned));
        self.highest_level = self.highest_level.max(summary.level);
        self.total_kills = self.total_kills.saturating_add(summary.kills);
        self.longest_time = self.longest_time.max(summary.game_time);
    }

    /// DNA a reset would pay out right now
    pub fn dna_for_reset(&self) -> u32 {
        let earned = self.highest_level / 5 + self.total_kills / 100 + self.longest_time / 60;
        earned.max(1)
    }

    /// Trade lifetime stats for DNA, keeping upgrades and coins
    ///
    /// Returns the DNA credited.
    pub fn reset(&mut self) -> u32 {
        let dna = self.dna_for_reset();
        self.dna_coins = self.dna_coins.saturating_add(dna);
        self.total_xp = 0;
        self.highest_level = 0;
        self.total_kills = 0;
        self.longest_time = 0;
        self.total_resets += 1;
        log::info!("Progress reset for {dna} DNA ({} total)", self.dna_coins);
        dna
    }

    pub fn permanent_cost(&self, kind: PermanentUpgrade) -> u64 {
        kind.cost(self.permanent.get(kind))
    }

    pub fn can_afford_permanent(&self, kind: PermanentUpgrade) -> bool {
        self.total_xp >= self.permanent_cost(kind)
    }

    pub fn purchase_permanent(&mut self, kind: PermanentUpgrade) -> bool {
        if !self.can_afford_permanent(kind) {
            return false;
        }
        self.total_xp -= self.permanent_cost(kind);
        *self.permanent.get_mut(kind) += 1;
        true
    }

    pub fn can_afford_premium(&self, kind: PremiumUpgrade) -> bool {
        self.premium.get(kind) < kind.max_level() && self.dna_coins >= kind.cost()
    }

    pub fn purchase_premium(&mut self, kind: PremiumUpgrade) -> bool {
        if !self.can_afford_premium(kind) {
            return false;
        }
        self.dna_coins -= kind.cost();
        *self.premium.get_mut(kind) += 1;
        true
    }

    /// Run modifiers from everything bought so far
    pub fn perks(&self) -> RunPerks {
        let perm = &self.permanent;
        let prem = &self.premium;
        RunPerks {
            bonus_health: perm.starting_health as f32 * 10.0,
            bonus_damage: perm.starting_damage as f32 * 2.0,
            bonus_speed: perm.starting_speed as f32 * 0.2,
            starting_magic: perm.starting_weapon > 0,
            starting_orbital: prem.permanent_orbital > 0,
            invulnerable_frames: if prem.immortal_start > 0 {
                IMMORTAL_START_FRAMES
            } else {
                0.0
            },
            xp_multiplier: 1.0 + perm.xp_multiplier as f32 * 0.1 + prem.double_xp as f32,
            boss_reward_multiplier: 1.0 + prem.boss_reward as f32 * 0.5,
            auto_revives: prem.auto_revive,
        }
    }

    /// Load progress, falling back to a fresh profile when missing or unreadable
    pub fn load(storage: &dyn Storage) -> Self {
        persistence::load_or_default(storage, Self::STORAGE_KEY)
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistError> {
        persistence::save_json(storage, Self::STORAGE_KEY, self)
    }
}
