//! Cosmetic effects: particles and floating damage numbers
//!
//! Nothing here feeds back into gameplay. Both kinds live in fixed pools, so a
//! burst that finds the pool full is simply cut short.

use glam::Vec2;
use rand::Rng;

use super::pool::Pool;
use crate::Color;

/// Alpha lost per frame by a default particle
pub const PARTICLE_DECAY: f32 = 0.02;
/// Level-up sparks linger a little longer
pub const LEVEL_UP_DECAY: f32 = 0.015;
pub const PARTICLE_SHRINK: f32 = 0.98;
pub const PARTICLE_MIN_SIZE: f32 = 0.5;

pub const BLOOD_COLORS: [Color; 3] = [0xff3366, 0xff0044, 0xcc0033];
pub const LEVEL_UP_COLORS: [Color; 3] = [0x00f0ff, 0xff00ea, 0xffd700];
pub const XP_COLORS: [Color; 2] = [0x00f0ff, 0x00ccff];

/// Particle counts per effect
pub const HIT_PARTICLES: usize = 8;
pub const ORBITAL_HIT_PARTICLES: usize = 10;
pub const BLOOD_PARTICLES: usize = 8;
pub const PICKUP_PARTICLES: usize = 4;
pub const LEVEL_UP_PARTICLES: usize = 30;

/// Floating text rises this much per frame
pub const TEXT_RISE: f32 = 1.0;
/// Floating text alpha lost per (timescaled) frame
pub const TEXT_DECAY: f32 = 0.02;
pub const TEXT_SIZE: f32 = 20.0;
pub const CRIT_TEXT_SIZE: f32 = 30.0;
pub const TEXT_COLOR: Color = 0xffffff;
pub const CRIT_TEXT_COLOR: Color = 0xff0000;

/// A pooled spark
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    /// 1.0 = opaque, fades to 0
    pub alpha: f32,
    pub decay: f32,
}

impl Particle {
    pub fn reset(&mut self, pos: Vec2, vel: Vec2, color: Color, size: f32) {
        *self = Self {
            pos,
            vel,
            color,
            size,
            alpha: 1.0,
            decay: PARTICLE_DECAY,
        };
    }

    /// Advance one frame; false once faded or shrunk away
    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.alpha -= self.decay;
        self.size *= PARTICLE_SHRINK;
        self.alpha > 0.0 && self.size > PARTICLE_MIN_SIZE
    }
}

/// A pooled floating number (damage popups)
#[derive(Debug, Clone, Default)]
pub struct FloatingText {
    pub pos: Vec2,
    pub value: u32,
    pub color: Color,
    pub size: f32,
    pub alpha: f32,
}

impl FloatingText {
    pub fn reset(&mut self, pos: Vec2, value: u32, color: Color, size: f32) {
        *self = Self {
            pos,
            value,
            color,
            size,
            alpha: 1.0,
        };
    }

    /// Rise and fade, scaled by the current timescale
    pub fn update(&mut self, timescale: f32) -> bool {
        self.pos.y -= TEXT_RISE * timescale;
        self.alpha -= TEXT_DECAY * timescale;
        self.alpha > 0.0
    }
}

/// Owner of every cosmetic pool
#[derive(Debug, Clone)]
pub struct Effects {
    pub particles: Pool<Particle>,
    pub texts: Pool<FloatingText>,
}

impl Effects {
    pub fn new(particle_capacity: usize, text_capacity: usize) -> Self {
        Self {
            particles: Pool::new(particle_capacity),
            texts: Pool::new(text_capacity),
        }
    }

    /// Evenly spaced ring of sparks
    pub fn explosion(&mut self, pos: Vec2, color: Color, count: usize, rng: &mut impl Rng) {
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = 2.0 + rng.random::<f32>() * 3.0;
            let size = 2.0 + rng.random::<f32>() * 3.0;
            if self
                .particles
                .spawn(|p| p.reset(pos, Vec2::from_angle(angle) * speed, color, size))
                .is_none()
            {
                break;
            }
        }
    }

    /// Randomly scattered red sparks on a kill
    pub fn blood(&mut self, pos: Vec2, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 1.0 + rng.random::<f32>() * 4.0;
            let size = 2.0 + rng.random::<f32>() * 4.0;
            let color = BLOOD_COLORS[rng.random_range(0..BLOOD_COLORS.len())];
            if self
                .particles
                .spawn(|p| p.reset(pos, Vec2::from_angle(angle) * speed, color, size))
                .is_none()
            {
                break;
            }
        }
    }

    /// Upward-biased burst around the player
    pub fn level_up(&mut self, pos: Vec2, rng: &mut impl Rng) {
        for _ in 0..LEVEL_UP_PARTICLES {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 2.0 + rng.random::<f32>() * 5.0;
            let size = 3.0 + rng.random::<f32>() * 5.0;
            let color = LEVEL_UP_COLORS[rng.random_range(0..LEVEL_UP_COLORS.len())];
            let vel = Vec2::from_angle(angle) * speed - Vec2::new(0.0, 2.0);
            let spawned = self.particles.spawn(|p| {
                p.reset(pos, vel, color, size);
                p.decay = LEVEL_UP_DECAY;
            });
            if spawned.is_none() {
                break;
            }
        }
    }

    /// Small glint when an XP orb is collected
    pub fn pickup(&mut self, pos: Vec2, rng: &mut impl Rng) {
        for _ in 0..PICKUP_PARTICLES {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 0.5 + rng.random::<f32>();
            let size = 2.0 + rng.random::<f32>() * 2.0;
            let color = XP_COLORS[rng.random_range(0..XP_COLORS.len())];
            if self
                .particles
                .spawn(|p| p.reset(pos, Vec2::from_angle(angle) * speed, color, size))
                .is_none()
            {
                break;
            }
        }
    }

    /// Damage popup above a hit enemy
    pub fn damage_number(&mut self, pos: Vec2, amount: u32, crit: bool) {
        let (color, size) = if crit {
            (CRIT_TEXT_COLOR, CRIT_TEXT_SIZE)
        } else {
            (TEXT_COLOR, TEXT_SIZE)
        };
        let _ = self
            .texts
            .spawn(|t| t.reset(pos - Vec2::new(0.0, 20.0), amount, color, size));
    }

    pub fn update_particles(&mut self) {
        self.particles.retain_mut(Particle::update);
    }

    pub fn update_texts(&mut self, timescale: f32) {
        self.texts.retain_mut(|t| t.update(timescale));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.texts.clear();
    }
}
