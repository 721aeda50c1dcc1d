//! Massless particles drifting under a [`ForceField`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::gradient::ForceField;

/// Velocity multiplier applied once per tick, independent of `dt`.
pub const DAMPING: f32 = 0.98;

/// Default info line shown by hosts next to the particle controls.
pub const DEFAULT_INFO: &str = "Press 'Z' to spawn a particle at the current pointer position.";

/// A point with a velocity. Particles carry no id: nothing ever looks one up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Parameters shared by every particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleParams {
    /// Scale applied to the field gradient, nominally in [0, 1].
    pub force_effect: f32,
    pub info: String,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            force_effect: 0.5,
            info: DEFAULT_INFO.to_string(),
        }
    }
}

/// All live particles plus their shared parameters.
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    pub params: ParticleParams,
}

impl ParticleSystem {
    pub fn new(params: ParticleParams) -> Self {
        Self {
            particles: Vec::new(),
            params,
        }
    }

    /// Appends a particle at rest at `position`.
    pub fn spawn(&mut self, position: Vec2) {
        self.particles.push(Particle {
            position,
            velocity: Vec2::ZERO,
        });
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advances every particle by one tick of `dt` seconds.
    ///
    /// Semi-implicit Euler: force into velocity, damping, then velocity into
    /// position. Particles are never clamped or culled.
    pub fn advance<F: ForceField + ?Sized>(&mut self, dt: f32, field: &F) {
        let effect = self.params.force_effect;
        for p in &mut self.particles {
            let force = field.force(p.position);
            p.velocity += effect * force * dt;
            p.velocity *= DAMPING;
            p.position += p.velocity * dt;
        }
    }
}
