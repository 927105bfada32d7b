//! Frame-driven simulation
//!
//! All gameplay lives here. The module is single-threaded and synchronous:
//! - One step per simulated frame, rates are per frame
//! - Seeded RNG only
//! - Fixed-capacity pools, iterated in slot order
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod enemy;
pub mod orbital;
pub mod particle;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrade;

pub use collision::{Located, circles_overlap, nearest};
pub use enemy::{Enemy, EnemyKind, XpOrb};
pub use orbital::OrbitalWeapon;
pub use particle::{Effects, FloatingText, Particle};
pub use player::{CombatReport, Kill, Loadout, Player, StatBoost, WeaponKind, WeaponSlot};
pub use pool::{Pool, SlotHandle};
pub use projectile::{Projectile, ProjectileKind};
pub use spawner::{SpawnReport, Spawner};
pub use state::{
    Arena, CameraShake, GameEvent, GamePhase, GameState, RunState, RunSummary, SlowMotion,
    StatCounter,
};
pub use tick::{FrameInput, autopilot_target, choose_upgrade, start_run, tick};
pub use upgrade::{CATALOG, UpgradeDef, UpgradeKind};
