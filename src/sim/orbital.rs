//! Orbital satellites (macrophages circling the player)

use glam::Vec2;

use crate::consts::*;

/// One satellite in an orbital group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orb {
    /// Offset from the group's rotation angle (radians)
    pub angle_offset: f32,
    pub size: f32,
}

/// A group of orbs sharing one radius and rotation rate
#[derive(Debug, Clone)]
pub struct OrbitalWeapon {
    pub damage: f32,
    /// Radians per frame
    pub angular_speed: f32,
    /// Distance from the owner
    pub radius: f32,
    /// Shared rotation angle
    pub angle: f32,
    pub orbs: Vec<Orb>,
}

impl OrbitalWeapon {
    pub fn new(damage: f32, count: usize) -> Self {
        let mut weapon = Self {
            damage,
            angular_speed: ORBITAL_ANGULAR_SPEED,
            radius: ORBITAL_RADIUS,
            angle: 0.0,
            orbs: Vec::with_capacity(count),
        };
        for _ in 0..count {
            weapon.orbs.push(Orb {
                angle_offset: 0.0,
                size: ORBITAL_ORB_SIZE,
            });
        }
        weapon.redistribute();
        weapon
    }

    /// Advance the shared rotation
    pub fn update(&mut self) {
        self.angle = (self.angle + self.angular_speed) % std::f32::consts::TAU;
    }

    /// Add one orb and respace the whole group evenly
    pub fn add_orb(&mut self) {
        self.orbs.push(Orb {
            angle_offset: 0.0,
            size: ORBITAL_ORB_SIZE,
        });
        self.redistribute();
    }

    fn redistribute(&mut self) {
        let count = self.orbs.len() as f32;
        for (i, orb) in self.orbs.iter_mut().enumerate() {
            orb.angle_offset = std::f32::consts::TAU * i as f32 / count;
        }
    }

    /// World positions and sizes of every orb around `center`
    pub fn orb_positions(&self, center: Vec2) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.orbs.iter().map(move |orb| {
            let theta = self.angle + orb.angle_offset;
            (center + Vec2::from_angle(theta) * self.radius, orb.size)
        })
    }
}
