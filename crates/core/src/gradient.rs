//! Gradient probe: central finite differences over the raw additive field.
//!
//! The probe always evaluates in [`BlendMode::Add`] with no envelope and no
//! remap, whatever the scene displays, so force magnitude does not jump when
//! the user switches blend modes.

use glam::Vec2;

use crate::blend::BlendMode;
use crate::evaluate::evaluate;
use crate::source::Source;

/// Finite-difference step in domain units.
pub const GRADIENT_EPSILON: f32 = 1e-3;

/// A source of 2D forcing vectors for particle integration.
///
/// Implementations must be deterministic: the same position always yields
/// the same force.
pub trait ForceField {
    /// Force acting at `position`.
    fn force(&self, position: Vec2) -> Vec2;
}

/// Estimates the spatial gradient of the additive field at `coord`.
///
/// Four evaluator calls, so cost is linear in the number of sources.
pub fn gradient(coord: Vec2, sources: &[Source]) -> Vec2 {
    let dx = Vec2::new(GRADIENT_EPSILON, 0.0);
    let dy = Vec2::new(0.0, GRADIENT_EPSILON);
    let f = |c: Vec2| evaluate(c, sources, BlendMode::Add);
    let gx = (f(coord + dx) - f(coord - dx)) / (2.0 * GRADIENT_EPSILON);
    let gy = (f(coord + dy) - f(coord - dy)) / (2.0 * GRADIENT_EPSILON);
    Vec2::new(gx, gy)
}

/// The wave field's gradient as a [`ForceField`] over a borrowed source list.
#[derive(Debug, Clone, Copy)]
pub struct WaveGradient<'a> {
    sources: &'a [Source],
}

impl<'a> WaveGradient<'a> {
    pub fn new(sources: &'a [Source]) -> Self {
        Self { sources }
    }
}

impl ForceField for WaveGradient<'_> {
    fn force(&self, position: Vec2) -> Vec2 {
        gradient(position, self.sources)
    }
}
