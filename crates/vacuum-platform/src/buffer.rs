//! Flat, index-addressed particle storage.

use glam::Vec3;
use tracing::trace;

use crate::{ParticleState, ParticleSystem};

/// Owned particle array with a shared lifetime. Particles move and age only
/// when [`ParticleBuffer::step`] is called; expired ones are dropped there.
#[derive(Debug, Clone)]
pub struct ParticleBuffer {
    particles: Vec<ParticleState>,
    lifetime: f32,
    origin: Vec3,
}

impl ParticleBuffer {
    pub fn new(origin: Vec3, lifetime: f32) -> Self {
        Self {
            particles: Vec::new(),
            lifetime,
            origin,
        }
    }

    /// Adds a particle and returns its current index. Indices shift when
    /// earlier particles expire.
    pub fn spawn(&mut self, offset: Vec3, velocity: Vec3) -> usize {
        self.particles.push(ParticleState::new(offset, velocity));
        self.particles.len() - 1
    }

    pub fn particles(&self) -> &[ParticleState] {
        &self.particles
    }

    pub fn get(&self, index: usize) -> Option<&ParticleState> {
        self.particles.get(index)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    /// Integrates positions, ages every particle by `dt` and removes those
    /// whose age reached the lifetime. Returns how many were removed.
    pub fn step(&mut self, dt: f32) -> usize {
        for particle in &mut self.particles {
            particle.offset += particle.velocity * dt;
            particle.age += dt;
        }
        let before = self.particles.len();
        let lifetime = self.lifetime;
        self.particles.retain(|p| p.age < lifetime);
        let expired = before - self.particles.len();
        if expired > 0 {
            trace!(expired, remaining = self.particles.len(), "particles expired");
        }
        expired
    }
}

impl ParticleSystem for ParticleBuffer {
    fn modify_all_particles(&mut self, mutator: &mut dyn FnMut(&mut ParticleState)) {
        for particle in &mut self.particles {
            mutator(particle);
        }
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn particle_lifetime(&self) -> f32 {
        self.lifetime
    }

    fn origin(&self) -> Vec3 {
        self.origin
    }
}
