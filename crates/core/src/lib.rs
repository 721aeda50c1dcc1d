#![deny(unsafe_code)]
//! Core of the wavefield system: an interactive 2D field of sinusoidal wave
//! sources.
//!
//! Provides the source [`Registry`], the field evaluator with seven
//! [`BlendMode`]s, a finite-difference gradient probe, a damped
//! [`ParticleSystem`] driven by that gradient, and a small command language
//! for editing a scene from text. [`Scene`] bundles all of it behind one
//! owner.

pub mod blend;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod field;
pub mod gradient;
pub mod interpreter;
pub mod params;
pub mod particle;
pub mod registry;
pub mod scene;
pub mod shader;
pub mod source;

pub use blend::{BlendMode, MapMode};
pub use config::{SceneConfig, SourceConfig};
pub use error::WaveError;
pub use evaluate::{evaluate, evaluate_with, FieldOptions};
pub use field::Field;
pub use gradient::{gradient, ForceField, WaveGradient};
pub use interpreter::{ParseError, PointAction, Selector, Statement};
pub use params::RunSettings;
pub use particle::{Particle, ParticleParams, ParticleSystem};
pub use registry::Registry;
pub use scene::Scene;
pub use shader::UniformBlock;
pub use source::{total_amplitude, Source, SourceId, SourceSpec};
