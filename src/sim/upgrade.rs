//! Level-up upgrade catalog and resolver

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::player::{Player, StatBoost, WeaponKind};
use crate::consts::*;

/// Everything a level-up can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Weapon(WeaponKind),
    Stat(StatBoost),
}

/// Static catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDef {
    pub kind: UpgradeKind,
    pub name: &'static str,
    pub description: &'static str,
    pub max_level: u32,
}

pub static CATALOG: [UpgradeDef; 8] = [
    UpgradeDef {
        kind: UpgradeKind::Weapon(WeaponKind::Bullet),
        name: "Antibodies",
        description: "Fire more antibodies",
        max_level: 5,
    },
    UpgradeDef {
        kind: UpgradeKind::Weapon(WeaponKind::Magic),
        name: "T-Cells",
        description: "Release killer T-cells",
        max_level: 4,
    },
    UpgradeDef {
        kind: UpgradeKind::Weapon(WeaponKind::Orbital),
        name: "Macrophages",
        description: "Macrophages orbit around you",
        max_level: 3,
    },
    UpgradeDef {
        kind: UpgradeKind::Weapon(WeaponKind::Lightning),
        name: "Interferon",
        description: "Bursts of interferon",
        max_level: 3,
    },
    UpgradeDef {
        kind: UpgradeKind::Stat(StatBoost::Health),
        name: "Cell Membrane",
        description: "+20 HP and regeneration",
        max_level: 10,
    },
    UpgradeDef {
        kind: UpgradeKind::Stat(StatBoost::Damage),
        name: "Immune Potency",
        description: "+5 damage",
        max_level: 10,
    },
    UpgradeDef {
        kind: UpgradeKind::Stat(StatBoost::Speed),
        name: "Cell Mobility",
        description: "Faster movement",
        max_level: 5,
    },
    UpgradeDef {
        kind: UpgradeKind::Stat(StatBoost::AttackSpeed),
        name: "Immune Response",
        description: "Faster attacks",
        max_level: 8,
    },
];

const HEALTH_BOOST: f32 = 20.0;
const DAMAGE_BOOST: f32 = 5.0;
const SPEED_BOOST: f32 = 0.5;
const ATTACK_SPEED_BOOST: f32 = 5.0;

impl UpgradeKind {
    pub fn def(self) -> &'static UpgradeDef {
        // Every variant has exactly one catalog row
        CATALOG
            .iter()
            .find(|d| d.kind == self)
            .unwrap_or(&CATALOG[0])
    }

    pub fn max_level(self) -> u32 {
        self.def().max_level
    }

    /// Label for the upgrade card; weapons show the level they would reach
    pub fn display_name(self, player: &Player) -> String {
        let def = self.def();
        match self {
            UpgradeKind::Weapon(_) => format!("{} (Lv. {})", def.name, current_level(player, self) + 1),
            UpgradeKind::Stat(_) => def.name.to_string(),
        }
    }
}

pub fn current_level(player: &Player, kind: UpgradeKind) -> u32 {
    match kind {
        UpgradeKind::Weapon(w) => player.weapons.get(w).level,
        UpgradeKind::Stat(s) => player.stat_levels.get(s),
    }
}

/// Upgrades the player can still take
pub fn eligible(player: &Player) -> Vec<UpgradeKind> {
    CATALOG
        .iter()
        .filter(|d| current_level(player, d.kind) < d.max_level)
        .map(|d| d.kind)
        .collect()
}

/// Pick up to `count` distinct eligible upgrades uniformly at random
pub fn offer(player: &Player, count: usize, rng: &mut impl Rng) -> Vec<UpgradeKind> {
    let pool = eligible(player);
    pool.choose_multiple(rng, count).copied().collect()
}

/// Apply an upgrade to the player; false (and no change) when already maxed
pub fn apply(player: &mut Player, kind: UpgradeKind) -> bool {
    if current_level(player, kind) >= kind.max_level() {
        return false;
    }

    match kind {
        UpgradeKind::Weapon(WeaponKind::Orbital) => {
            player.add_orbital();
            let slot = player.weapons.get_mut(WeaponKind::Orbital);
            slot.unlocked = true;
            slot.level += 1;
        }
        UpgradeKind::Weapon(weapon) => {
            let slot = player.weapons.get_mut(weapon);
            slot.unlocked = true;
            slot.level += 1;
        }
        UpgradeKind::Stat(stat) => {
            match stat {
                StatBoost::Health => {
                    player.max_health += HEALTH_BOOST;
                    player.health = (player.health + HEALTH_BOOST).min(player.max_health);
                }
                StatBoost::Damage => player.damage += DAMAGE_BOOST,
                StatBoost::Speed => player.speed += SPEED_BOOST,
                StatBoost::AttackSpeed => {
                    player.attack_speed = (player.attack_speed - ATTACK_SPEED_BOOST).max(MIN_ATTACK_SPEED);
                }
            }
            *player.stat_levels.get_mut(stat) += 1;
        }
    }
    true
}
