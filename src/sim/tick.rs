//! Per-frame game loop
//!
//! One call to [`tick`] per display frame. Commands from the input are applied
//! first, then cosmetics, then (while playing) one simulation step.

use glam::Vec2;
use rand::Rng;

use super::collision::nearest;
use super::particle::BLOOD_PARTICLES;
use super::player::Player;
use super::spawner::SpawnReport;
use super::state::{Arena, GameEvent, GamePhase, GameState, RunState, StatCounter};
use super::upgrade::{self, UpgradeKind};
use crate::consts::*;

/// Enemies closer than this (plus their radius) scare the autopilot
const AUTOPILOT_THREAT_RADIUS: f32 = 150.0;
const AUTOPILOT_CENTER_PULL: f32 = 0.35;
const AUTOPILOT_LOOKAHEAD: f32 = 100.0;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer/touch position the player steers toward
    pub target: Option<Vec2>,
    /// New arena bounds (window resize)
    pub arena: Option<Arena>,
    /// Start a run from the menu
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a new run from the game-over screen
    pub restart: bool,
    /// Back to the menu from the game-over screen
    pub menu: bool,
    /// Index into the current upgrade offer
    pub choose_upgrade: Option<usize>,
    /// Let the autopilot steer
    pub idle_mode: bool,
}

/// Advance the game by one display frame
pub fn tick(state: &mut GameState, input: &FrameInput) {
    state.events.clear();
    if let Some(arena) = input.arena {
        state.arena = arena;
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                start_run(state);
            }
        }
        GamePhase::Playing => {
            if input.pause {
                set_phase(state, GamePhase::Paused);
            }
        }
        GamePhase::Paused => {
            if input.pause {
                set_phase(state, GamePhase::Playing);
            }
        }
        GamePhase::LevelUp => {
            if let Some(index) = input.choose_upgrade {
                choose_upgrade(state, index);
            }
        }
        GamePhase::GameOver => {
            if input.restart {
                start_run(state);
            } else if input.menu {
                set_phase(state, GamePhase::Menu);
            }
        }
    }

    if state.phase == GamePhase::Playing {
        let target = if input.idle_mode {
            Some(autopilot_target(state))
        } else {
            input.target
        };
        if let Some(target) = target {
            state.player.set_target(target);
        }
    }

    state.run.shake.decay();
    state.run.slow_motion.tick();
    let timescale = state.run.timescale();
    state.effects.update_texts(timescale);

    // Slow motion skips whole steps at random rather than shrinking them
    if state.phase == GamePhase::Playing
        && (timescale >= 1.0 || state.rng.random::<f32>() < timescale)
    {
        step(state, timescale);
    }

    if matches!(state.phase, GamePhase::Playing | GamePhase::LevelUp) {
        state.effects.update_particles();
    }
}

/// Reset everything for a fresh run and enter `Playing`
pub fn start_run(state: &mut GameState) {
    let tuning = state.tuning;
    state.player = Player::new(state.arena.center(), &tuning.player, tuning.pools.projectiles);
    state.player.apply_perks(&state.perks);
    state.spawner.clear();
    state.effects.clear();
    state.run = RunState::default();
    state.run.shake.muted = !tuning.screen_shake;
    state.offer.clear();
    state.combat.clear();

    log::info!("Run started (seed {})", state.seed);
    set_phase(state, GamePhase::Playing);
}

/// Apply the offered upgrade at `index`
///
/// Only honoured in `LevelUp`; anything else is a logged no-op. Returns true
/// when an upgrade was applied.
pub fn choose_upgrade(state: &mut GameState, index: usize) -> bool {
    if state.phase != GamePhase::LevelUp {
        log::warn!("Upgrade choice {index} ignored outside level-up");
        return false;
    }
    let Some(&kind) = state.offer.get(index) else {
        log::warn!("Upgrade choice {index} out of range ({} offered)", state.offer.len());
        return false;
    };
    if !upgrade::apply(&mut state.player, kind) {
        log::warn!("Upgrade {kind:?} already at max level");
        return false;
    }

    log::debug!("Chose {} (level {})", kind.def().name, upgrade::current_level(&state.player, kind));
    state.events.push(GameEvent::UpgradeChosen { kind });
    push_stat(state, StatCounter::UpgradesChosen, 1);
    if let UpgradeKind::Weapon(_) = kind {
        let unlocked = state.player.weapons.unlocked_count();
        push_stat(state, StatCounter::WeaponsUsed, unlocked);
    }

    state.run.pending_level_ups = state.run.pending_level_ups.saturating_sub(1);
    state.offer.clear();
    if state.run.pending_level_ups > 0 && present_offer(state) {
        return true;
    }
    state.run.pending_level_ups = 0;
    set_phase(state, GamePhase::Playing);
    true
}

/// One simulation step
fn step(state: &mut GameState, timescale: f32) {
    state.run.frame_accumulator += 1;
    if state.run.frame_accumulator >= FRAMES_PER_SECOND {
        state.run.frame_accumulator = 0;
        state.run.game_time += 1;
        let secs = state.run.game_time;
        push_stat(state, StatCounter::Time, secs);
    }

    state.combat.clear();
    state.player.update(
        state.arena,
        timescale,
        &mut state.spawner.enemies,
        &mut state.effects,
        &mut state.rng,
        &mut state.combat,
    );
    resolve_combat(state);

    let xp_before = state.player.xp_earned;
    let spawn = state.spawner.update(
        state.run.game_time,
        state.arena,
        &mut state.player,
        &mut state.effects,
        &mut state.rng,
    );
    resolve_spawns(state, &spawn, xp_before);

    if state.player.is_dead() {
        if state.player.try_revive() {
            log::info!("Auto-revive used ({} left)", state.player.auto_revives);
            state.events.push(GameEvent::PlayerRevived {
                revives_left: state.player.auto_revives,
            });
        } else {
            finish_run(state);
            return;
        }
    }

    if state.run.pending_level_ups > 0 && !present_offer(state) {
        log::debug!(
            "Nothing left to offer, skipping {} level-up(s)",
            state.run.pending_level_ups
        );
        state.run.pending_level_ups = 0;
    }
}

/// Turn the player's combat report into kills, drops and events
fn resolve_combat(state: &mut GameState) {
    let combat = &mut state.combat;
    state.run.shots_fired += combat.shots_fired;
    state.run.shots_hit += combat.shots_hit;
    state.run.shots_missed += combat.shots_missed;
    if combat.shots_hit > 0 {
        state.events.push(GameEvent::Stat {
            counter: StatCounter::ShotsHit,
            value: combat.shots_hit,
        });
    }
    if combat.shots_missed > 0 {
        state.events.push(GameEvent::Stat {
            counter: StatCounter::ShotsMissed,
            value: combat.shots_missed,
        });
    }

    for hit in combat.hits.drain(..) {
        state.effects.damage_number(hit.pos, hit.amount, hit.crit);
        state.events.push(GameEvent::DamageNumber {
            pos: hit.pos,
            amount: hit.amount,
            crit: hit.crit,
        });
    }

    for kill in combat.kills.drain(..) {
        state.run.kills += 1;

        let xp = if kill.kind.is_boss() {
            (kill.xp_value as f32 * state.player.boss_reward_multiplier).round() as u32
        } else {
            kill.xp_value
        };
        state.spawner.drop_xp(kill.pos, xp);
        state.effects.blood(kill.pos, BLOOD_PARTICLES, &mut state.rng);

        state.events.push(GameEvent::EnemyKilled {
            pos: kill.pos,
            kind: kill.kind,
            color: kill.color,
        });
        state.events.push(GameEvent::Stat {
            counter: StatCounter::Kills,
            value: 1,
        });

        if kill.kind.is_boss() {
            state.run.bosses_killed += 1;
            state.run.shake.set(SHAKE_BOSS_KILL);
            state
                .run
                .slow_motion
                .start(BOSS_SLOW_MOTION_SCALE, BOSS_SLOW_MOTION_FRAMES);
            state.events.push(GameEvent::Stat {
                counter: StatCounter::Bosses,
                value: 1,
            });
            log::info!("Boss killed ({} this run)", state.run.bosses_killed);
        } else {
            state.run.shake.bump(SHAKE_KILL, SHAKE_KILL_CAP);
        }
    }
}

fn resolve_spawns(state: &mut GameState, spawn: &SpawnReport, xp_before: u32) {
    if let Some(pos) = spawn.boss_spawned {
        state.events.push(GameEvent::BossSpawned { pos });
    }

    if spawn.hits_taken > 0 {
        state.events.push(GameEvent::PlayerHit {
            amount: spawn.damage_taken,
            health: state.player.health,
        });
        push_stat(state, StatCounter::DamageTaken, spawn.damage_taken.round() as u32);
    }

    let credited = state.player.xp_earned.saturating_sub(xp_before);
    if credited > 0 {
        push_stat(state, StatCounter::Xp, credited);
    }

    if spawn.levels_gained > 0 {
        let level = state.player.level;
        let pos = state.player.pos;
        for reached in (level + 1 - spawn.levels_gained)..=level {
            state.events.push(GameEvent::LevelUp { pos, level: reached });
        }
        push_stat(state, StatCounter::Level, level);
        state.run.pending_level_ups += spawn.levels_gained;
        log::debug!("Level {level} reached ({} prompt(s) queued)", state.run.pending_level_ups);
    }
}

/// Roll a fresh offer and show it; false when nothing is eligible
fn present_offer(state: &mut GameState) -> bool {
    let offer = upgrade::offer(&state.player, UPGRADE_CHOICES, &mut state.rng);
    if offer.is_empty() {
        return false;
    }
    state.offer = offer;
    state.effects.level_up(state.player.pos, &mut state.rng);
    state.run.shake.set(SHAKE_LEVEL_UP);
    set_phase(state, GamePhase::LevelUp);
    true
}

fn finish_run(state: &mut GameState) {
    state.run.shake.set(SHAKE_GAME_OVER);
    state.run.pending_level_ups = 0;
    state.offer.clear();
    set_phase(state, GamePhase::GameOver);

    let summary = state.summary();
    log::info!(
        "Game over: {}s, level {}, {} kills, {} bosses",
        summary.game_time,
        summary.level,
        summary.kills,
        summary.bosses_killed
    );
    state.events.push(GameEvent::GameOver { summary });
}

fn set_phase(state: &mut GameState, phase: GamePhase) {
    if state.phase == phase {
        return;
    }
    let from = state.phase;
    state.phase = phase;
    log::debug!("Phase {from:?} -> {phase:?}");
    state.events.push(GameEvent::PhaseChanged { from, to: phase });
}

fn push_stat(state: &mut GameState, counter: StatCounter, value: u32) {
    state.events.push(GameEvent::Stat { counter, value });
}

/// Where the autopilot wants to go this frame
///
/// Kite away from nearby enemies, otherwise collect the nearest orb,
/// otherwise drift back to the middle.
pub fn autopilot_target(state: &GameState) -> Vec2 {
    let pos = state.player.pos;

    let mut flee = Vec2::ZERO;
    for (_, enemy) in state.spawner.enemies.iter() {
        let away = pos - enemy.pos;
        let reach = AUTOPILOT_THREAT_RADIUS + enemy.radius;
        let dist = away.length();
        if dist < reach {
            flee += away.normalize_or_zero() * (1.0 - dist / reach);
        }
    }

    if flee.length_squared() > 1e-6 {
        // Lean toward the center so the kite doesn't pin itself to a wall
        let pull = (state.arena.center() - pos).normalize_or_zero() * AUTOPILOT_CENTER_PULL;
        return pos + (flee.normalize_or_zero() + pull) * AUTOPILOT_LOOKAHEAD;
    }

    if let Some((_, orb)) = nearest(&state.spawner.orbs, pos) {
        return orb;
    }
    state.arena.center()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::RunPerks;
    use crate::sim::enemy::EnemyKind;
    use crate::tuning::Tuning;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        tick(
            &mut state,
            &FrameInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    fn choose(index: usize) -> FrameInput {
        FrameInput {
            choose_upgrade: Some(index),
            ..Default::default()
        }
    }

    fn has_event(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> bool {
        state.events().iter().any(pred)
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut state = GameState::new(1, Tuning::default());
        for _ in 0..10 {
            tick(&mut state, &FrameInput::default());
        }
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.spawner.frames, 0);

        tick(
            &mut state,
            &FrameInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(has_event(&state, |e| matches!(
            e,
            GameEvent::PhaseChanged {
                from: GamePhase::Menu,
                to: GamePhase::Playing
            }
        )));
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut state = playing(2);
        let pause = FrameInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        let frames = state.spawner.frames;
        for _ in 0..100 {
            tick(&mut state, &FrameInput::default());
        }
        assert_eq!(state.spawner.frames, frames);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.spawner.frames, frames + 1);
    }

    #[test]
    fn test_seconds_accumulate() {
        let mut state = playing(3);
        // The starting tick already stepped once
        for _ in 0..59 {
            tick(&mut state, &FrameInput::default());
        }
        assert_eq!(state.run.game_time, 1);
        assert!(has_event(&state, |e| *e
            == GameEvent::Stat {
                counter: StatCounter::Time,
                value: 1
            }));
    }

    #[test]
    fn test_level_up_waits_for_choice() {
        let mut state = playing(4);

        // A choice while playing is ignored
        tick(&mut state, &choose(0));
        assert!(!has_event(&state, |e| matches!(e, GameEvent::UpgradeChosen { .. })));

        let pos = state.player.pos;
        state.spawner.drop_xp(pos, 100);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.offer.len(), UPGRADE_CHOICES);
        assert!(has_event(&state, |e| matches!(e, GameEvent::LevelUp { level: 2, .. })));

        // Simulation is frozen while choosing
        let frames = state.spawner.frames;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.spawner.frames, frames);

        let picked = state.offer[0];
        tick(&mut state, &choose(0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(has_event(&state, |e| *e == GameEvent::UpgradeChosen { kind: picked }));
        assert_eq!(upgrade::current_level(&state.player, picked), match picked {
            UpgradeKind::Weapon(crate::sim::player::WeaponKind::Bullet) => 2,
            _ => 1,
        });
    }

    #[test]
    fn test_choice_in_raising_tick_is_deferred() {
        let mut state = playing(14);
        let pos = state.player.pos;
        state.spawner.drop_xp(pos, 100);

        tick(&mut state, &choose(0));
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.offer.len(), UPGRADE_CHOICES);
        assert_eq!(state.run.pending_level_ups, 1);
        assert!(!has_event(&state, |e| matches!(e, GameEvent::UpgradeChosen { .. })));
        assert_eq!(upgrade::eligible(&state.player).len(), upgrade::CATALOG.len());

        tick(&mut state, &choose(0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(has_event(&state, |e| matches!(e, GameEvent::UpgradeChosen { .. })));
    }

    #[test]
    fn test_invalid_choice_keeps_modal() {
        let mut state = playing(5);
        let pos = state.player.pos;
        state.spawner.drop_xp(pos, 100);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, GamePhase::LevelUp);

        tick(&mut state, &choose(7));
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert!(!choose_upgrade(&mut state, 9));
        assert_eq!(state.phase, GamePhase::LevelUp);
    }

    #[test]
    fn test_cascaded_levels_queue_prompts() {
        let mut state = playing(6);
        let pos = state.player.pos;
        // 100 + 120 = 220 -> two levels
        state.spawner.drop_xp(pos, 250);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.player.level, 3);
        assert_eq!(state.run.pending_level_ups, 2);
        assert_eq!(state.phase, GamePhase::LevelUp);

        tick(&mut state, &choose(1));
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.run.pending_level_ups, 1);
        assert_eq!(state.offer.len(), UPGRADE_CHOICES);

        tick(&mut state, &choose(2));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run.pending_level_ups, 0);
    }

    #[test]
    fn test_nothing_to_offer_keeps_playing() {
        let mut state = playing(7);
        for def in upgrade::CATALOG {
            while upgrade::apply(&mut state.player, def.kind) {}
        }
        let pos = state.player.pos;
        state.spawner.drop_xp(pos, 100);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.player.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run.pending_level_ups, 0);
    }

    #[test]
    fn test_death_ends_run() {
        let mut state = playing(8);
        state.player.health = 5.0;
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        state.spawner.enemies.spawn(|e| e.reset(pos, EnemyKind::Basic));

        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(has_event(&state, |e| matches!(e, GameEvent::GameOver { .. })));
        assert_eq!(state.run.shake.magnitude, SHAKE_GAME_OVER);

        // Frozen on the game-over screen
        let frames = state.spawner.frames;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.spawner.frames, frames);

        tick(
            &mut state,
            &FrameInput {
                menu: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_shake_off_keeps_camera_still() {
        let tuning = Tuning {
            screen_shake: false,
            ..Tuning::default()
        };
        let mut state = GameState::new(15, tuning);
        tick(
            &mut state,
            &FrameInput {
                start: true,
                ..Default::default()
            },
        );
        state.player.health = 5.0;
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        state.spawner.enemies.spawn(|e| e.reset(pos, EnemyKind::Basic));

        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.run.shake.magnitude, 0.0);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = playing(9);
        for _ in 0..200 {
            tick(&mut state, &FrameInput::default());
        }
        state.player.health = 0.0;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(
            &mut state,
            &FrameInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run.game_time, 0);
        assert_eq!(state.run.kills, 0);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert_eq!(state.spawner.frames, 1);
    }

    #[test]
    fn test_auto_revive() {
        let mut state = GameState::new(10, Tuning::default()).with_perks(RunPerks {
            auto_revives: 1,
            ..RunPerks::default()
        });
        tick(
            &mut state,
            &FrameInput {
                start: true,
                ..Default::default()
            },
        );
        state.player.health = 5.0;
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        state.spawner.enemies.spawn(|e| e.reset(pos, EnemyKind::Basic));

        tick(&mut state, &FrameInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH * REVIVE_HEALTH_FRACTION);
        assert_eq!(state.player.auto_revives, 0);
        assert!(has_event(&state, |e| matches!(e, GameEvent::PlayerRevived { revives_left: 0 })));
    }

    #[test]
    fn test_boss_kill_slows_time() {
        let mut state = playing(11);
        let pos = state.player.pos + Vec2::new(30.0, 0.0);
        state.spawner.enemies.spawn(|e| {
            e.reset(pos, EnemyKind::Boss);
            e.health = 5.0;
        });
        state.player.attack_timer = state.player.attack_speed - 1.0;

        tick(&mut state, &FrameInput::default());
        assert_eq!(state.run.bosses_killed, 1);
        assert_eq!(state.run.kills, 1);
        assert_eq!(state.run.timescale(), BOSS_SLOW_MOTION_SCALE);
        assert_eq!(state.run.shake.magnitude, SHAKE_BOSS_KILL);
        assert!(has_event(&state, |e| matches!(
            e,
            GameEvent::EnemyKilled {
                kind: EnemyKind::Boss,
                ..
            }
        )));
        assert!(has_event(&state, |e| matches!(e, GameEvent::DamageNumber { .. })));
        assert!(state.spawner.orbs.iter().any(|(_, o)| o.value == 100));
    }

    #[test]
    fn test_zero_timescale_skips_steps() {
        let mut state = playing(12);
        state.run.slow_motion.start(0.0, 1000);
        let frames = state.spawner.frames;
        for _ in 0..120 {
            tick(&mut state, &FrameInput::default());
        }
        assert_eq!(state.spawner.frames, frames);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_resize_updates_arena() {
        let mut state = playing(13);
        tick(
            &mut state,
            &FrameInput {
                arena: Some(Arena::new(400.0, 300.0)),
                target: Some(Vec2::new(5000.0, 5000.0)),
                ..Default::default()
            },
        );
        assert_eq!(state.arena, Arena::new(400.0, 300.0));
        assert!(state.player.pos.x <= 400.0 - PLAYER_RADIUS);
        assert!(state.player.pos.y <= 300.0 - PLAYER_RADIUS);
    }

    #[test]
    fn test_determinism() {
        let idle = FrameInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut a = playing(99999);
        let mut b = playing(99999);
        for _ in 0..900 {
            for state in [&mut a, &mut b] {
                let input = if state.phase == GamePhase::LevelUp {
                    choose(0)
                } else {
                    idle.clone()
                };
                tick(state, &input);
            }
        }
        assert_eq!(a.summary(), b.summary());
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.spawner.enemies.active_count(), b.spawner.enemies.active_count());
    }

    #[test]
    fn test_autopilot_flees_and_collects() {
        let mut state = playing(14);
        let center = state.arena.center();
        state.player.pos = center;
        assert_eq!(autopilot_target(&state), center);

        let orb = center + Vec2::new(200.0, 0.0);
        state.spawner.drop_xp(orb, 5);
        assert_eq!(autopilot_target(&state), orb);

        let threat = center + Vec2::new(-50.0, 0.0);
        state.spawner.enemies.spawn(|e| e.reset(threat, EnemyKind::Basic));
        assert!(autopilot_target(&state).x > center.x);
    }
}
