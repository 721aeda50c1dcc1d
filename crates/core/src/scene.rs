//! The scene: one owner for every piece of mutable state a host drives.
//!
//! A [`Scene`] holds the source registry, the active blend mode, the
//! presentation options, and the particle system. Hosts call [`Scene::run`]
//! for scripts, the pointer helpers for direct manipulation, and
//! [`Scene::tick`] once per frame.

use glam::Vec2;
use tracing::debug;

use crate::blend::{BlendMode, MapMode};
use crate::config::{SceneConfig, SourceConfig};
use crate::error::WaveError;
use crate::evaluate::{evaluate_with, FieldOptions};
use crate::field::Field;
use crate::gradient::{gradient, WaveGradient};
use crate::interpreter::{self, CommandContext};
use crate::particle::{ParticleParams, ParticleSystem};
use crate::registry::Registry;
use crate::shader::UniformBlock;
use crate::source::{Source, SourceId, SourceSpec};

/// Positions of the two sources a fresh scene starts with.
pub const INITIAL_POSITIONS: [Vec2; 2] = [Vec2::new(0.24, 0.27), Vec2::new(0.81, 0.51)];

/// Complete mutable state of a wave-field session.
#[derive(Debug, Clone)]
pub struct Scene {
    registry: Registry,
    pub blend_mode: BlendMode,
    pub options: FieldOptions,
    particles: ParticleSystem,
}

impl Default for Scene {
    /// Two pointer-default sources, additive blending, no remap.
    fn default() -> Self {
        Self::from_registry(Registry::from_specs(
            INITIAL_POSITIONS.map(SourceSpec::pointer_default),
        ))
    }
}

impl Scene {
    /// Wraps an existing registry with default modes and particle params.
    pub fn from_registry(registry: Registry) -> Self {
        Self {
            registry,
            blend_mode: BlendMode::default(),
            options: FieldOptions::default(),
            particles: ParticleSystem::default(),
        }
    }

    /// Rebuilds a scene from a persisted record. Ids are reassigned from 0.
    pub fn from_config(config: &SceneConfig) -> Result<Self, WaveError> {
        config.validate()?;
        let registry = Registry::from_specs(config.sources.iter().copied().map(SourceSpec::from));
        Ok(Self {
            registry,
            blend_mode: config.blend_mode,
            options: FieldOptions {
                envelope: false,
                map: config.map_mode,
            },
            particles: ParticleSystem::new(config.particle_params.clone()),
        })
    }

    /// Snapshot of the persistable state.
    pub fn to_config(&self) -> SceneConfig {
        SceneConfig {
            sources: self.registry.all().iter().map(SourceConfig::from).collect(),
            blend_mode: self.blend_mode,
            map_mode: self.options.map,
            particle_params: self.particles.params.clone(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// All sources in registry order.
    pub fn sources(&self) -> &[Source] {
        self.registry.all()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn particle_params(&self) -> &ParticleParams {
        &self.particles.params
    }

    pub fn set_map_mode(&mut self, map: MapMode) {
        self.options.map = map;
    }

    /// Runs a command script and returns its feedback lines.
    pub fn run(&mut self, script: &str) -> Vec<String> {
        let ctx = CommandContext {
            registry: &mut self.registry,
            blend_mode: &mut self.blend_mode,
            particle_params: &mut self.particles.params,
        };
        interpreter::run(script, ctx)
    }

    /// Advances one frame: source phases first, then particles against the
    /// updated sources.
    pub fn tick(&mut self, dt: f32) {
        self.registry.advance_phases(dt);
        let field = WaveGradient::new(self.registry.all());
        self.particles.advance(dt, &field);
    }

    /// Field value at `coord` under the scene's blend mode and options.
    pub fn evaluate(&self, coord: Vec2) -> f32 {
        evaluate_with(coord, self.registry.all(), self.blend_mode, self.options)
    }

    /// Gradient of the raw additive field at `coord`.
    pub fn gradient(&self, coord: Vec2) -> Vec2 {
        gradient(coord, self.registry.all())
    }

    /// Samples the field on a `width` x `height` grid of cell centers.
    pub fn sample(&self, width: usize, height: usize) -> Result<Field, WaveError> {
        Field::from_fn(width, height, |coord| self.evaluate(coord))
    }

    /// Uniform values for the fragment program.
    pub fn uniforms(&self) -> UniformBlock {
        UniformBlock::pack(self.registry.all(), self.blend_mode, self.options)
    }

    /// Spawns a particle at rest at `coord`.
    pub fn spawn_particle(&mut self, coord: Vec2) {
        self.particles.spawn(coord);
        debug!(x = coord.x, y = coord.y, count = self.particles.len(), "particle spawned");
    }

    /// Adds a source with pointer defaults at `coord`.
    pub fn add_at(&mut self, coord: Vec2) -> SourceId {
        self.registry.add(SourceSpec::pointer_default(coord))
    }

    /// First source within hit radius of `coord`.
    pub fn source_at(&self, coord: Vec2) -> Option<SourceId> {
        self.registry.hit_test(coord)
    }

    /// Drags a source to `coord`.
    pub fn move_source(&mut self, id: SourceId, coord: Vec2) -> Result<(), WaveError> {
        self.registry.move_source(id, coord)
    }

    /// Removes the source under `coord`.
    ///
    /// Returns `Ok(None)` when nothing is hit, and `LastSource` when the hit
    /// source is the only one left.
    pub fn remove_at(&mut self, coord: Vec2) -> Result<Option<Source>, WaveError> {
        match self.registry.hit_test(coord) {
            Some(id) => self.registry.try_remove(id).map(Some),
            None => Ok(None),
        }
    }
}
