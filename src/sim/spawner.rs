//! Enemy spawning, enemy AI pass and XP orb collection

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyKind, XpOrb};
use super::particle::Effects;
use super::player::Player;
use super::pool::{Pool, SlotHandle};
use super::state::Arena;
use crate::tuning::SpawnTuning;

/// What happened during one spawner step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub spawned: u32,
    /// Spawns dropped because the enemy pool was full
    pub dropped: u32,
    pub boss_spawned: Option<Vec2>,
    /// Contact damage that landed on the player
    pub damage_taken: f32,
    pub hits_taken: u32,
    /// Raw XP picked up (before the player's multiplier)
    pub xp_collected: u32,
    pub levels_gained: u32,
}

/// Owner of the enemy and XP orb pools
#[derive(Debug, Clone)]
pub struct Spawner {
    pub enemies: Pool<Enemy>,
    pub orbs: Pool<XpOrb>,
    pub tuning: SpawnTuning,
    pub spawn_timer: u32,
    pub spawn_interval: u32,
    pub difficulty: f32,
    /// Simulation frames this spawner has run (drives the boss schedule)
    pub frames: u64,
}

impl Spawner {
    pub fn new(tuning: SpawnTuning, enemy_capacity: usize, orb_capacity: usize) -> Self {
        Self {
            enemies: Pool::new(enemy_capacity),
            orbs: Pool::new(orb_capacity),
            spawn_interval: tuning.interval_at(0),
            difficulty: tuning.difficulty_at(0),
            tuning,
            spawn_timer: 0,
            frames: 0,
        }
    }

    /// One simulation step
    ///
    /// `game_time` is the run's elapsed whole seconds.
    pub fn update(
        &mut self,
        game_time: u32,
        arena: Arena,
        player: &mut Player,
        effects: &mut Effects,
        rng: &mut impl Rng,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();

        self.frames += 1;
        self.difficulty = self.tuning.difficulty_at(game_time);
        self.spawn_interval = self.tuning.interval_at(game_time);

        self.spawn_timer += 1;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0;
            let kind = self.pick_kind(rng);
            match self.spawn_enemy(kind, arena, rng) {
                Some(_) => report.spawned += 1,
                None => report.dropped += 1,
            }
        }

        if self.tuning.boss_due(self.frames) {
            match self.spawn_enemy(EnemyKind::Boss, arena, rng) {
                Some((_, pos)) => {
                    log::debug!("Boss spawned at frame {}", self.frames);
                    report.spawned += 1;
                    report.boss_spawned = Some(pos);
                }
                None => report.dropped += 1,
            }
        }

        let (player_pos, player_radius) = (player.pos, player.radius);
        for (_, enemy) in self.enemies.iter_mut() {
            if enemy.update(player_pos, player_radius) && player.take_damage(enemy.damage) {
                report.damage_taken += enemy.damage;
                report.hits_taken += 1;
            }
        }

        let mut collected = 0u32;
        self.orbs.retain_mut(|orb| {
            if orb.update(player_pos, player_radius) {
                collected = collected.saturating_add(orb.value);
                effects.pickup(orb.pos, rng);
                false
            } else {
                true
            }
        });
        if collected > 0 {
            report.xp_collected = collected;
            report.levels_gained = player.gain_xp(collected);
        }

        report
    }

    /// Draw a regular enemy kind weighted by the current difficulty
    pub fn pick_kind(&self, rng: &mut impl Rng) -> EnemyKind {
        let roll = rng.random::<f32>() * self.difficulty;
        if roll < 1.0 {
            EnemyKind::Basic
        } else if roll < 2.0 {
            if rng.random_bool(0.5) {
                EnemyKind::Basic
            } else {
                EnemyKind::Fast
            }
        } else {
            EnemyKind::REGULAR[rng.random_range(0..EnemyKind::REGULAR.len())]
        }
    }

    /// Place one enemy just outside a random arena edge
    ///
    /// Returns `None` when the pool is full.
    pub fn spawn_enemy(
        &mut self,
        kind: EnemyKind,
        arena: Arena,
        rng: &mut impl Rng,
    ) -> Option<(SlotHandle, Vec2)> {
        let pos = spawn_position(arena, self.tuning.spawn_margin, rng);
        let handle = self.enemies.spawn(|e| e.reset(pos, kind))?;
        Some((handle, pos))
    }

    /// Drop an XP orb; false when the orb pool is full
    pub fn drop_xp(&mut self, pos: Vec2, value: u32) -> bool {
        self.orbs.spawn(|o| o.reset(pos, value)).is_some()
    }

    /// Empty both pools and rewind the schedule
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.orbs.clear();
        self.spawn_timer = 0;
        self.frames = 0;
        self.spawn_interval = self.tuning.interval_at(0);
        self.difficulty = self.tuning.difficulty_at(0);
    }
}

/// Uniform point along a random edge, `margin` outside the arena
pub fn spawn_position(arena: Arena, margin: f32, rng: &mut impl Rng) -> Vec2 {
    let along = rng.random::<f32>();
    match rng.random_range(0..4) {
        0 => Vec2::new(along * arena.width, -margin),
        1 => Vec2::new(arena.width + margin, along * arena.height),
        2 => Vec2::new(along * arena.width, arena.height + margin),
        _ => Vec2::new(-margin, along * arena.height),
    }
}
