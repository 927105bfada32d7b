//! The player cell: movement, auto-attack and its weapons

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{circles_overlap, nearest};
use super::enemy::{Enemy, EnemyKind};
use super::orbital::OrbitalWeapon;
use super::particle::{Effects, HIT_PARTICLES, ORBITAL_HIT_PARTICLES};
use super::pool::Pool;
use super::projectile::{Projectile, ProjectileKind};
use super::state::Arena;
use crate::Color;
use crate::consts::*;
use crate::progression::RunPerks;
use crate::tuning::PlayerTuning;

/// Weapons that can be unlocked by upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Bullet,
    Magic,
    Orbital,
    Lightning,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Bullet,
        WeaponKind::Magic,
        WeaponKind::Orbital,
        WeaponKind::Lightning,
    ];
}

/// Flat stat upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatBoost {
    Health,
    Damage,
    Speed,
    AttackSpeed,
}

impl StatBoost {
    pub const ALL: [StatBoost; 4] = [
        StatBoost::Health,
        StatBoost::Damage,
        StatBoost::Speed,
        StatBoost::AttackSpeed,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeaponSlot {
    pub unlocked: bool,
    pub level: u32,
}

/// Per-weapon unlock state and level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loadout {
    pub bullet: WeaponSlot,
    pub magic: WeaponSlot,
    pub orbital: WeaponSlot,
    pub lightning: WeaponSlot,
}

impl Loadout {
    /// Bullet unlocked at level 1, everything else locked
    pub fn starting() -> Self {
        Self {
            bullet: WeaponSlot {
                unlocked: true,
                level: 1,
            },
            ..Self::default()
        }
    }

    pub fn get(&self, kind: WeaponKind) -> WeaponSlot {
        match kind {
            WeaponKind::Bullet => self.bullet,
            WeaponKind::Magic => self.magic,
            WeaponKind::Orbital => self.orbital,
            WeaponKind::Lightning => self.lightning,
        }
    }

    pub fn get_mut(&mut self, kind: WeaponKind) -> &mut WeaponSlot {
        match kind {
            WeaponKind::Bullet => &mut self.bullet,
            WeaponKind::Magic => &mut self.magic,
            WeaponKind::Orbital => &mut self.orbital,
            WeaponKind::Lightning => &mut self.lightning,
        }
    }

    pub fn unlocked_count(&self) -> u32 {
        WeaponKind::ALL
            .iter()
            .filter(|k| self.get(**k).unlocked)
            .count() as u32
    }
}

/// How many times each stat upgrade was taken this run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatLevels {
    pub health: u32,
    pub damage: u32,
    pub speed: u32,
    pub attack_speed: u32,
}

impl StatLevels {
    pub fn get(&self, stat: StatBoost) -> u32 {
        match stat {
            StatBoost::Health => self.health,
            StatBoost::Damage => self.damage,
            StatBoost::Speed => self.speed,
            StatBoost::AttackSpeed => self.attack_speed,
        }
    }

    pub fn get_mut(&mut self, stat: StatBoost) -> &mut u32 {
        match stat {
            StatBoost::Health => &mut self.health,
            StatBoost::Damage => &mut self.damage,
            StatBoost::Speed => &mut self.speed,
            StatBoost::AttackSpeed => &mut self.attack_speed,
        }
    }
}

/// Fading movement trail point (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// An enemy killed during the current step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub xp_value: u32,
    pub color: Color,
}

impl From<&Enemy> for Kill {
    fn from(enemy: &Enemy) -> Self {
        Self {
            pos: enemy.pos,
            kind: enemy.kind,
            xp_value: enemy.xp_value,
            color: enemy.color,
        }
    }
}

/// A projectile hit worth a damage popup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub pos: Vec2,
    pub amount: u32,
    pub crit: bool,
}

/// Outcome of one player step, drained by the game loop
///
/// Owned by the game state and cleared every step so the buffers are reused.
#[derive(Debug, Clone, Default)]
pub struct CombatReport {
    pub kills: Vec<Kill>,
    pub hits: Vec<Hit>,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub shots_missed: u32,
}

impl CombatReport {
    pub fn clear(&mut self) {
        self.kills.clear();
        self.hits.clear();
        self.shots_fired = 0;
        self.shots_hit = 0;
        self.shots_missed = 0;
    }
}

/// The player-controlled cell
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Point the player steers toward
    pub target: Vec2,
    /// Facing (radians)
    pub rotation: f32,
    pub radius: f32,

    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    /// Frames between attacks
    pub attack_speed: f32,
    pub attack_timer: f32,
    /// Frames of invulnerability left
    pub invulnerable: f32,
    invulnerable_frames: f32,

    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    xp_growth_percent: u32,
    /// Total XP credited this run (after multipliers)
    pub xp_earned: u32,

    pub weapons: Loadout,
    pub stat_levels: StatLevels,
    pub projectiles: Pool<Projectile>,
    pub orbitals: Vec<OrbitalWeapon>,
    /// Oldest first
    pub trail: Vec<TrailPoint>,

    pub xp_multiplier: f32,
    pub boss_reward_multiplier: f32,
    pub auto_revives: u32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &PlayerTuning, projectile_capacity: usize) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            target: pos,
            rotation: 0.0,
            radius: tuning.radius,
            health: tuning.max_health,
            max_health: tuning.max_health,
            speed: tuning.speed,
            damage: tuning.damage,
            attack_speed: tuning.attack_speed,
            attack_timer: 0.0,
            invulnerable: 0.0,
            invulnerable_frames: tuning.invulnerable_frames,
            level: 1,
            xp: 0,
            xp_to_next: tuning.xp_first_threshold,
            xp_growth_percent: tuning.xp_growth_percent,
            xp_earned: 0,
            weapons: Loadout::starting(),
            stat_levels: StatLevels::default(),
            projectiles: Pool::new(projectile_capacity),
            orbitals: Vec::new(),
            trail: Vec::with_capacity(PLAYER_TRAIL_LENGTH + 1),
            xp_multiplier: 1.0,
            boss_reward_multiplier: 1.0,
            auto_revives: 0,
        }
    }

    /// Apply permanent upgrades once at the start of a run
    pub fn apply_perks(&mut self, perks: &RunPerks) {
        self.max_health += perks.bonus_health;
        self.health = self.max_health;
        self.damage += perks.bonus_damage;
        self.speed += perks.bonus_speed;

        if perks.starting_magic && !self.weapons.magic.unlocked {
            self.weapons.magic = WeaponSlot {
                unlocked: true,
                level: 1,
            };
        }
        if perks.starting_orbital && self.orbitals.is_empty() {
            self.weapons.orbital = WeaponSlot {
                unlocked: true,
                level: 1,
            };
            self.add_orbital();
        }

        self.invulnerable = self.invulnerable.max(perks.invulnerable_frames);
        self.xp_multiplier = perks.xp_multiplier;
        self.boss_reward_multiplier = perks.boss_reward_multiplier;
        self.auto_revives = perks.auto_revives;
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    /// One simulation step of the player and everything it fires
    ///
    /// Projectiles and orbitals are resolved against start-of-step enemy
    /// positions; kills and hits are appended to `report`.
    pub fn update(
        &mut self,
        arena: Arena,
        timescale: f32,
        enemies: &mut Pool<Enemy>,
        effects: &mut Effects,
        rng: &mut impl Rng,
        report: &mut CombatReport,
    ) {
        self.steer(arena, timescale);

        if self.invulnerable > 0.0 {
            self.invulnerable = (self.invulnerable - timescale).max(0.0);
        }

        self.attack_timer += timescale;
        if self.attack_timer >= self.attack_speed {
            self.attack_timer = 0.0;
            self.attack(enemies, rng, report);
        }

        self.update_projectiles(arena, enemies, effects, rng, report);
        self.update_orbitals(enemies, effects, rng, report);
    }

    fn steer(&mut self, arena: Arena, timescale: f32) {
        let offset = self.target - self.pos;
        let distance = offset.length();

        if distance > MOVE_DEAD_ZONE {
            self.vel = offset / distance * self.speed * timescale;
            self.pos += self.vel;
            self.rotation = offset.y.atan2(offset.x);

            // Afterimages only when moving fast or in slow motion
            if self.speed > 5.0 || timescale < 1.0 {
                self.trail.push(TrailPoint {
                    pos: self.pos,
                    alpha: 1.0,
                });
                if self.trail.len() > PLAYER_TRAIL_LENGTH {
                    self.trail.remove(0);
                }
            }
        } else {
            self.vel = Vec2::ZERO;
        }

        for point in &mut self.trail {
            point.alpha -= 0.05 * timescale;
        }
        self.trail.retain(|p| p.alpha > 0.0);

        self.pos = arena.clamp_circle(self.pos, self.radius);
    }

    /// Fire every unlocked projectile weapon at the nearest enemy
    pub fn attack(&mut self, enemies: &Pool<Enemy>, rng: &mut impl Rng, report: &mut CombatReport) {
        let Some((_, target)) = nearest(enemies, self.pos) else {
            return;
        };

        if self.weapons.bullet.unlocked {
            self.fire(target, ProjectileKind::Bullet, report);
        }

        if self.weapons.magic.unlocked {
            let aim = target - self.pos;
            for _ in 0..self.weapons.magic.level {
                let jitter = rng.random_range(-MAGIC_SPREAD..=MAGIC_SPREAD);
                let spread = self.pos + Vec2::from_angle(jitter).rotate(aim);
                self.fire(spread, ProjectileKind::Magic, report);
            }
        }

        if self.weapons.lightning.unlocked && rng.random_bool(LIGHTNING_CHANCE) {
            self.fire(target, ProjectileKind::Lightning, report);
        }
    }

    fn fire(&mut self, target: Vec2, kind: ProjectileKind, report: &mut CombatReport) {
        let from = self.pos;
        let damage = self.damage * kind.damage_multiplier();
        if self
            .projectiles
            .spawn(|p| p.launch(from, target, damage, kind))
            .is_some()
        {
            report.shots_fired += 1;
        }
    }

    fn update_projectiles(
        &mut self,
        arena: Arena,
        enemies: &mut Pool<Enemy>,
        effects: &mut Effects,
        rng: &mut impl Rng,
        report: &mut CombatReport,
    ) {
        self.projectiles.retain_mut(|proj| {
            if !proj.update(arena) {
                report.shots_missed += 1;
                return false;
            }

            let hit = enemies
                .iter_mut()
                .find(|(_, e)| circles_overlap(proj.pos, proj.radius, e.pos, e.radius));
            let Some((handle, enemy)) = hit else {
                return true;
            };

            let died = enemy.take_damage(proj.damage);

            // Crits only inflate the displayed number
            let crit = rng.random_bool(CRIT_CHANCE);
            let shown = if crit {
                proj.damage * CRIT_MULTIPLIER
            } else {
                proj.damage
            };

            effects.explosion(enemy.pos, proj.kind.color(), HIT_PARTICLES, rng);
            report.hits.push(Hit {
                pos: enemy.pos,
                amount: shown.floor() as u32,
                crit,
            });
            report.shots_hit += 1;

            if died {
                report.kills.push(Kill::from(&*enemy));
                enemies.release(handle);
            }
            false
        });
    }

    fn update_orbitals(
        &mut self,
        enemies: &mut Pool<Enemy>,
        effects: &mut Effects,
        rng: &mut impl Rng,
        report: &mut CombatReport,
    ) {
        if self.orbitals.is_empty() {
            return;
        }

        let center = self.pos;
        let mut any_killed = false;
        for weapon in &mut self.orbitals {
            weapon.update();
            for (orb_pos, orb_size) in weapon.orb_positions(center) {
                for (_, enemy) in enemies.iter_mut() {
                    if enemy.is_dead() || !circles_overlap(orb_pos, orb_size, enemy.pos, enemy.radius) {
                        continue;
                    }
                    effects.explosion(enemy.pos, ORBITAL_COLOR, ORBITAL_HIT_PARTICLES, rng);
                    if enemy.take_damage(weapon.damage) {
                        report.kills.push(Kill::from(&*enemy));
                        any_killed = true;
                    }
                }
            }
        }

        if any_killed {
            enemies.retain_mut(|e| !e.is_dead());
        }
    }

    /// Add the first orbital group, or one more orb to it
    pub fn add_orbital(&mut self) {
        match self.orbitals.first_mut() {
            Some(group) => group.add_orb(),
            None => self.orbitals.push(OrbitalWeapon::new(
                self.damage * ORBITAL_DAMAGE_FACTOR,
                ORBITAL_START_COUNT,
            )),
        }
    }

    /// Apply contact damage; false while invulnerable
    ///
    /// Health floors at zero. Check [`Player::is_dead`] afterwards.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.invulnerable > 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.invulnerable = self.invulnerable_frames;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Credit XP (after the run multiplier) and return the levels gained
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        let credited = (amount as f32 * self.xp_multiplier).round() as u32;
        self.xp = self.xp.saturating_add(credited);
        self.xp_earned = self.xp_earned.saturating_add(credited);

        let mut levels = 0;
        while self.xp_to_next > 0 && self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = self.xp_to_next * self.xp_growth_percent / 100;
            levels += 1;
        }
        levels
    }

    /// Spend an auto-revive charge if dead and one is available
    pub fn try_revive(&mut self) -> bool {
        if !self.is_dead() || self.auto_revives == 0 {
            return false;
        }
        self.auto_revives -= 1;
        self.health = self.max_health * REVIVE_HEALTH_FRACTION;
        self.invulnerable = REVIVE_INVULNERABLE_FRAMES;
        true
    }

    /// Remaining health in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    fn player_at(pos: Vec2) -> Player {
        Player::new(pos, &PlayerTuning::default(), MAX_PROJECTILES)
    }

    fn spawn_enemy(pool: &mut Pool<Enemy>, pos: Vec2, kind: EnemyKind) {
        pool.spawn(|e| e.reset(pos, kind)).unwrap();
    }

    fn step(player: &mut Player, enemies: &mut Pool<Enemy>, rng: &mut Pcg32) -> CombatReport {
        let mut fx = Effects::new(MAX_PARTICLES, MAX_FLOATING_TEXTS);
        let mut report = CombatReport::default();
        player.update(arena(), 1.0, enemies, &mut fx, rng, &mut report);
        report
    }

    #[test]
    fn test_first_level_up() {
        let mut player = player_at(Vec2::ZERO);
        assert_eq!(player.gain_xp(100), 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 0);
        assert_eq!(player.xp_to_next, 120);
    }

    #[test]
    fn test_cascading_levels() {
        let mut player = player_at(Vec2::ZERO);
        // 100 + 120 + 144 = 364
        assert_eq!(player.gain_xp(370), 3);
        assert_eq!(player.level, 4);
        assert_eq!(player.xp, 6);
        assert_eq!(player.xp_to_next, 172);
        assert_eq!(player.xp_earned, 370);
    }

    #[test]
    fn test_xp_multiplier() {
        let mut player = player_at(Vec2::ZERO);
        player.xp_multiplier = 2.0;
        assert_eq!(player.gain_xp(50), 1);
        assert_eq!(player.xp_earned, 100);
    }

    #[test]
    fn test_movement_dead_zone_and_clamp() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = Pool::new(4);
        let mut player = player_at(Vec2::new(400.0, 300.0));

        player.set_target(Vec2::new(403.0, 300.0));
        step(&mut player, &mut enemies, &mut rng);
        assert_eq!(player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(player.vel, Vec2::ZERO);

        player.set_target(Vec2::new(500.0, 300.0));
        step(&mut player, &mut enemies, &mut rng);
        assert!((player.pos.x - 404.0).abs() < 1e-4);

        player.set_target(Vec2::new(-1000.0, -1000.0));
        for _ in 0..500 {
            step(&mut player, &mut enemies, &mut rng);
        }
        assert_eq!(player.pos, Vec2::new(PLAYER_RADIUS, PLAYER_RADIUS));
    }

    #[test]
    fn test_invulnerability_window() {
        let mut player = player_at(Vec2::ZERO);
        assert!(player.take_damage(30.0));
        assert!(!player.take_damage(30.0));
        assert_eq!(player.health, 70.0);
        assert_eq!(player.invulnerable, INVULNERABLE_FRAMES);

        player.invulnerable = 0.0;
        assert!(player.take_damage(500.0));
        assert_eq!(player.health, 0.0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_revive_consumes_charge() {
        let mut player = player_at(Vec2::ZERO);
        assert!(!player.try_revive());

        player.auto_revives = 1;
        player.take_damage(1000.0);
        assert!(player.try_revive());
        assert_eq!(player.health, 50.0);
        assert_eq!(player.invulnerable, REVIVE_INVULNERABLE_FRAMES);

        player.invulnerable = 0.0;
        player.take_damage(1000.0);
        assert!(!player.try_revive());
    }

    #[test]
    fn test_attack_needs_a_target() {
        let mut rng = Pcg32::seed_from_u64(3);
        let enemies: Pool<Enemy> = Pool::new(4);
        let mut player = player_at(Vec2::new(400.0, 300.0));
        let mut report = CombatReport::default();
        player.attack(&enemies, &mut rng, &mut report);
        assert_eq!(report.shots_fired, 0);
        assert!(player.projectiles.is_empty());
    }

    #[test]
    fn test_magic_fires_one_shot_per_level() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut enemies = Pool::new(4);
        spawn_enemy(&mut enemies, Vec2::new(600.0, 300.0), EnemyKind::Basic);

        let mut player = player_at(Vec2::new(400.0, 300.0));
        player.weapons.magic = WeaponSlot {
            unlocked: true,
            level: 3,
        };
        let mut report = CombatReport::default();
        player.attack(&enemies, &mut rng, &mut report);
        assert_eq!(report.shots_fired, 4);

        for (_, p) in player.projectiles.iter() {
            let angle = p.vel.y.atan2(p.vel.x);
            assert!(angle.abs() <= MAGIC_SPREAD + 1e-5);
        }
    }

    #[test]
    fn test_projectile_hits_one_enemy() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut enemies = Pool::new(8);
        for _ in 0..3 {
            spawn_enemy(&mut enemies, Vec2::new(500.0, 300.0), EnemyKind::Basic);
        }

        let mut player = player_at(Vec2::new(100.0, 100.0));
        player
            .projectiles
            .spawn(|p| p.launch(Vec2::new(492.0, 300.0), Vec2::new(600.0, 300.0), 10.0, ProjectileKind::Bullet));

        let report = step(&mut player, &mut enemies, &mut rng);
        let damaged = enemies.iter().filter(|(_, e)| e.health < e.max_health).count();
        assert_eq!(damaged, 1);
        assert_eq!(report.shots_hit, 1);
        assert_eq!(report.hits.len(), 1);
        assert!(player.projectiles.is_empty());
    }

    #[test]
    fn test_crit_only_changes_the_number() {
        let mut crits = 0;
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut enemies = Pool::new(4);
            spawn_enemy(&mut enemies, Vec2::new(500.0, 300.0), EnemyKind::Tank);
            let mut player = player_at(Vec2::new(100.0, 100.0));

            let mut amounts = Vec::new();
            for _ in 0..2 {
                player
                    .projectiles
                    .spawn(|p| p.launch(Vec2::new(492.0, 300.0), Vec2::new(600.0, 300.0), 40.0, ProjectileKind::Bullet));
                let report = step(&mut player, &mut enemies, &mut rng);
                assert_eq!(report.hits.len(), 1);
                assert!(report.kills.is_empty());
                amounts.extend(report.hits.iter().map(|h| (h.amount, h.crit)));
            }

            let (_, tank) = enemies.iter().next().unwrap();
            assert_eq!(tank.health, 20.0);
            for (amount, crit) in amounts {
                if crit {
                    crits += 1;
                    assert_eq!(amount, 60);
                } else {
                    assert_eq!(amount, 40);
                }
            }
        }
        assert!(crits > 0);
    }

    #[test]
    fn test_projectile_kill_is_reported() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut enemies = Pool::new(4);
        spawn_enemy(&mut enemies, Vec2::new(500.0, 300.0), EnemyKind::Fast);

        let mut player = player_at(Vec2::new(100.0, 100.0));
        player
            .projectiles
            .spawn(|p| p.launch(Vec2::new(492.0, 300.0), Vec2::new(600.0, 300.0), 20.0, ProjectileKind::Bullet));

        let report = step(&mut player, &mut enemies, &mut rng);
        assert_eq!(report.kills.len(), 1);
        assert_eq!(report.kills[0].kind, EnemyKind::Fast);
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_missed_shot_counted() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut enemies = Pool::new(4);
        let mut player = player_at(Vec2::new(100.0, 100.0));
        player
            .projectiles
            .spawn(|p| p.launch(Vec2::new(790.0, 300.0), Vec2::new(900.0, 300.0), 10.0, ProjectileKind::Bullet));

        let mut missed = 0;
        for _ in 0..10 {
            missed += step(&mut player, &mut enemies, &mut rng).shots_missed;
        }
        assert_eq!(missed, 1);
    }

    #[test]
    fn test_orbitals_report_every_kill() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut player = player_at(Vec2::new(400.0, 300.0));
        player.add_orbital();
        player.orbitals[0].damage = 100.0;

        // Put an enemy where each orb will be after this step's rotation
        let mut probe = player.orbitals[0].clone();
        probe.update();
        let mut enemies = Pool::new(8);
        for (pos, _) in probe.orb_positions(player.pos) {
            spawn_enemy(&mut enemies, pos, EnemyKind::Basic);
        }

        let report = step(&mut player, &mut enemies, &mut rng);
        assert_eq!(report.kills.len(), 3);
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_add_orbital_grows_group() {
        let mut player = player_at(Vec2::ZERO);
        player.add_orbital();
        assert_eq!(player.orbitals.len(), 1);
        assert_eq!(player.orbitals[0].orbs.len(), ORBITAL_START_COUNT);
        assert_eq!(player.orbitals[0].damage, PLAYER_DAMAGE * ORBITAL_DAMAGE_FACTOR);

        player.add_orbital();
        assert_eq!(player.orbitals.len(), 1);
        assert_eq!(player.orbitals[0].orbs.len(), ORBITAL_START_COUNT + 1);
    }

    #[test]
    fn test_apply_perks() {
        let mut player = player_at(Vec2::ZERO);
        let perks = RunPerks {
            bonus_health: 20.0,
            bonus_damage: 4.0,
            starting_magic: true,
            starting_orbital: true,
            invulnerable_frames: IMMORTAL_START_FRAMES,
            auto_revives: 2,
            ..RunPerks::default()
        };
        player.apply_perks(&perks);
        assert_eq!(player.max_health, 120.0);
        assert_eq!(player.health, 120.0);
        assert_eq!(player.damage, 14.0);
        assert!(player.weapons.magic.unlocked);
        assert_eq!(player.weapons.orbital.level, 1);
        assert_eq!(player.orbitals.len(), 1);
        assert_eq!(player.invulnerable, IMMORTAL_START_FRAMES);
        assert_eq!(player.auto_revives, 2);
        assert_eq!(player.weapons.unlocked_count(), 3);
    }
}
