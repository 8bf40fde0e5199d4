//! Debris particle emitters
//!
//! Each collapse burst is one self-contained point cloud that rises, falls
//! under gravity, fades out and is dropped when its lifetime runs out.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Point colour and size for debris clouds
pub const DEBRIS_COLOR: u32 = 0xaaaaaa;
pub const DEBRIS_POINT_SIZE: f32 = 0.2;

/// One burst of debris particles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleEmitter {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    /// Frames elapsed since emission
    pub lifetime: u32,
    pub max_lifetime: u32,
    pub opacity: f32,
}

impl ParticleEmitter {
    /// Scatter `count` particles in a box around `origin`
    pub fn new(origin: Vec3, count: usize, max_lifetime: u32, rng: &mut impl Rng) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(
                origin
                    + Vec3::new(
                        rng.random_range(-DEBRIS_SPREAD..DEBRIS_SPREAD),
                        rng.random_range(0.0..DEBRIS_RISE),
                        rng.random_range(-DEBRIS_SPREAD..DEBRIS_SPREAD),
                    ),
            );
        }
        for _ in 0..count {
            velocities.push(Vec3::new(
                rng.random_range(-DEBRIS_LATERAL_SPEED..DEBRIS_LATERAL_SPEED),
                rng.random_range(0.0..DEBRIS_UP_SPEED),
                rng.random_range(-DEBRIS_LATERAL_SPEED..DEBRIS_LATERAL_SPEED),
            ));
        }
        Self {
            positions,
            velocities,
            lifetime: 0,
            max_lifetime,
            opacity: 1.0,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Point buffer view for upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime >= self.max_lifetime
    }

    /// Integrate one frame: move, apply gravity, age and fade
    pub fn step(&mut self) {
        for (pos, vel) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *pos += *vel;
            vel.y -= DEBRIS_GRAVITY;
        }
        self.lifetime += 1;
        self.opacity = 1.0 - self.lifetime as f32 / self.max_lifetime as f32;
    }
}

/// All live debris emitters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebrisSystem {
    pub emitters: Vec<ParticleEmitter>,
    pub particles_per_emitter: usize,
    pub lifetime: u32,
}

impl DebrisSystem {
    pub fn new(particles_per_emitter: usize, lifetime: u32) -> Self {
        Self {
            emitters: Vec::new(),
            particles_per_emitter,
            lifetime,
        }
    }

    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Spawn a new burst at `origin`
    pub fn emit(&mut self, origin: Vec3, rng: &mut impl Rng) {
        log::trace!("Debris emitted at {origin}");
        self.emitters.push(ParticleEmitter::new(
            origin,
            self.particles_per_emitter,
            self.lifetime,
            rng,
        ));
    }

    /// Advance every emitter one frame and drop the expired ones
    pub fn tick(&mut self) {
        for emitter in &mut self.emitters {
            emitter.step();
        }
        self.emitters.retain(|e| !e.is_expired());
    }
}
