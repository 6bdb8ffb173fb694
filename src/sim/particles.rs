//! Particle pool
//!
//! Visual feedback only. The pool never holds more than its capacity: new
//! particles evict the oldest ones first so recent effects stay visible.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entities::{Particle, ParticleKind};
use super::geom::random_range;
use crate::from_angle;

const PUFF_COLOR: u32 = 0xffffff;
const TRAIL_COLOR: u32 = 0xdfe6ee;
const GLOW_COLOR: u32 = 0xbbdefb;
const GLOW_HOT_COLOR: u32 = 0xffeb3b;

/// Capped, insertion-ordered particle storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    capacity: usize,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            particles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Add a particle, evicting the oldest if the pool is full
    pub fn spawn(&mut self, particle: Particle) {
        if self.capacity == 0 {
            return;
        }
        while self.particles.len() >= self.capacity {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Integrate, fade and cull
    pub fn update(&mut self, dt: f32, damping: f32, puff_shrink: f32) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt;
            p.vel *= damping;
            p.life -= dt;
            p.alpha = (p.life / p.max_life).max(0.0);
            if p.kind == ParticleKind::SnowPuff {
                p.size *= puff_shrink;
            }
        }
        self.particles.retain(|p| p.life > 0.0);

        let excess = self.particles.len().saturating_sub(self.capacity);
        self.particles.drain(..excess);
    }

    /// Radial burst of snow puffs
    pub fn burst<R: Rng>(&mut self, rng: &mut R, pos: Vec2, count: u32) {
        self.burst_of(rng, pos, count, ParticleKind::SnowPuff, PUFF_COLOR);
    }

    fn burst_of<R: Rng>(
        &mut self,
        rng: &mut R,
        pos: Vec2,
        count: u32,
        kind: ParticleKind,
        color: u32,
    ) {
        for _ in 0..count {
            let angle = random_range(rng, 0.0, std::f32::consts::TAU);
            let speed = random_range(rng, 30.0, 120.0);
            self.spawn(Particle {
                pos,
                vel: from_angle(angle, speed),
                life: random_range(rng, 0.2, 0.5),
                max_life: 0.5,
                size: random_range(rng, 2.0, 6.0),
                color,
                alpha: 1.0,
                kind,
            });
        }
    }

    /// Faint puff left behind a flying snowball
    pub fn trail<R: Rng>(&mut self, rng: &mut R, pos: Vec2) {
        let drift = from_angle(random_range(rng, 0.0, std::f32::consts::TAU), 8.0);
        self.spawn(Particle {
            pos,
            vel: drift,
            life: 0.25,
            max_life: 0.25,
            size: 2.0,
            color: TRAIL_COLOR,
            alpha: 0.6,
            kind: ParticleKind::SnowTrail,
        });
    }

    /// Glow spiralling into a charging unit; hotter color near full charge
    pub fn charge_glow<R: Rng>(&mut self, rng: &mut R, center: Vec2, charge: f32) {
        let angle = random_range(rng, 0.0, std::f32::consts::TAU);
        let dist = random_range(rng, 15.0, 25.0);
        let offset = from_angle(angle, dist);
        self.spawn(Particle {
            pos: center + offset,
            vel: -offset * 2.0,
            life: 0.3,
            max_life: 0.3,
            size: 2.0 + charge * 3.0,
            color: if charge > 0.7 { GLOW_HOT_COLOR } else { GLOW_COLOR },
            alpha: 0.8,
            kind: ParticleKind::ChargeGlow,
        });
    }
}
