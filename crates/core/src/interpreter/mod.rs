//! Command interpreter: runs a script against scene state and reports one
//! feedback line per notable outcome.
//!
//! Statements run in order. A statement that fails to parse yields its
//! error text as feedback and changes nothing; later statements still run.

mod parse;

pub use parse::{parse_statement, split_statements, ParseError, PointAction, Selector, Statement};

use std::f32::consts::TAU;

use glam::Vec2;
use tracing::debug;

use crate::blend::BlendMode;
use crate::error::WaveError;
use crate::particle::ParticleParams;
use crate::registry::Registry;

/// Center of the `circle` and `grid` layouts.
pub const LAYOUT_CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Radius of the `circle` layout.
pub const CIRCLE_RADIUS: f32 = 0.25;

/// Side length of the square the `grid` layout spans.
pub const GRID_SPAN: f32 = 0.5;

/// Mutable scene state a script may touch.
pub struct CommandContext<'a> {
    pub registry: &'a mut Registry,
    pub blend_mode: &'a mut BlendMode,
    pub particle_params: &'a mut ParticleParams,
}

/// Runs every statement of `script` and returns the feedback lines.
pub fn run(script: &str, mut ctx: CommandContext<'_>) -> Vec<String> {
    let mut feedback = Vec::new();
    for statement in split_statements(script) {
        match parse_statement(statement) {
            Ok(parsed) => execute(parsed, &mut ctx, &mut feedback),
            Err(err) => {
                debug!(statement, error = %err, "statement rejected");
                feedback.push(err.to_string());
            }
        }
    }
    feedback
}

/// Applies one parsed statement.
pub fn execute(statement: Statement, ctx: &mut CommandContext<'_>, feedback: &mut Vec<String>) {
    match statement {
        Statement::Point { selector, action } => {
            let targets = resolve(&selector, ctx.registry, feedback);
            debug!(action = action.name(), targets = targets.len(), "point action");
            apply_point_action(action, &targets, ctx.registry, feedback);
        }
        Statement::SetBlendMode(mode) => {
            debug!(from = %ctx.blend_mode, to = %mode, "blend mode set");
            *ctx.blend_mode = mode;
            feedback.push(format!("Blend mode set to \"{mode}\"."));
        }
        Statement::SetParticleForce(value) => {
            debug!(force_effect = value, "particle force set");
            ctx.particle_params.force_effect = value;
            feedback.push(format!("Particle forceEffect set to {value}."));
        }
        Statement::SetParticleInfo(text) => {
            debug!(info = %text, "particle info set");
            feedback.push(format!("Particle info set to \"{text}\"."));
            ctx.particle_params.info = text;
        }
    }
}

/// Turns a selector into ascending 0-based positions, first extending the
/// registry so every selected position exists.
fn resolve(selector: &Selector, registry: &mut Registry, feedback: &mut Vec<String>) -> Vec<usize> {
    match selector {
        Selector::All => (0..registry.len()).collect(),
        Selector::Positions(positions) => {
            if let Some(&highest) = positions.last() {
                let start = registry.len();
                for (offset, id) in registry.extend_to(highest + 1).into_iter().enumerate() {
                    feedback.push(format!(
                        "Created default source index {} (id {id}).",
                        start + offset + 1
                    ));
                }
            }
            positions.clone()
        }
    }
}

fn apply_point_action(
    action: PointAction,
    targets: &[usize],
    registry: &mut Registry,
    feedback: &mut Vec<String>,
) {
    match action {
        PointAction::Remove => remove_targets(targets, registry, feedback),
        PointAction::Circle => {
            let count = targets.len() as f32;
            for (rank, &index) in targets.iter().enumerate() {
                let angle = TAU * rank as f32 / count;
                if let Some(source) = registry.at_mut(index) {
                    source.position = LAYOUT_CENTER + CIRCLE_RADIUS * Vec2::new(angle.cos(), angle.sin());
                }
            }
            feedback.push(format!("Arranged {} in a circle.", describe(targets)));
        }
        PointAction::Grid => {
            let positions = grid_positions(targets.len());
            for (&index, position) in targets.iter().zip(positions) {
                if let Some(source) = registry.at_mut(index) {
                    source.position = position;
                }
            }
            feedback.push(format!("Arranged {} in a grid.", describe(targets)));
        }
        PointAction::SetXy(x, y) => {
            for &index in targets {
                if let Some(source) = registry.at_mut(index) {
                    source.position = Vec2::new(x, y);
                }
            }
            feedback.push(format!("Set xy=({x}, {y}) on {}.", describe(targets)));
        }
        PointAction::SetFrequency(v)
        | PointAction::SetAmplitude(v)
        | PointAction::SetPhase(v)
        | PointAction::SetPhaseSpeed(v) => {
            for &index in targets {
                if let Some(source) = registry.at_mut(index) {
                    let field = match action {
                        PointAction::SetFrequency(_) => &mut source.frequency,
                        PointAction::SetAmplitude(_) => &mut source.amplitude,
                        PointAction::SetPhase(_) => &mut source.phase,
                        _ => &mut source.phase_speed,
                    };
                    *field = v;
                }
            }
            feedback.push(format!("Set {}={v} on {}.", action.name(), describe(targets)));
        }
    }
}

/// Removes targets from the highest position down so lower positions stay
/// valid. Stops at the first refusal.
fn remove_targets(targets: &[usize], registry: &mut Registry, feedback: &mut Vec<String>) {
    for &index in targets.iter().rev() {
        match registry.remove_index(index) {
            Ok(source) => {
                feedback.push(format!("Removed source id {} at index {}.", source.id(), index + 1));
            }
            Err(WaveError::LastSource) => {
                feedback.push("Cannot remove last source.".to_string());
                break;
            }
            Err(err) => {
                feedback.push(err.to_string());
                break;
            }
        }
    }
}

/// Row-major grid layout for `count` sources inside the centered
/// [`GRID_SPAN`] square. The side is `ceil(sqrt(count))`; a side of one puts
/// the single cell at the square's lower-left corner.
pub fn grid_positions(count: usize) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let side = (count as f32).sqrt().ceil() as usize;
    let step = if side > 1 {
        GRID_SPAN / (side - 1) as f32
    } else {
        0.0
    };
    let origin = LAYOUT_CENTER - Vec2::splat(GRID_SPAN / 2.0);
    (0..count)
        .map(|i| origin + Vec2::new((i % side) as f32, (i / side) as f32) * step)
        .collect()
}

/// `"sources 1,2,5"` with 1-based positions, or `"no sources"`.
fn describe(targets: &[usize]) -> String {
    if targets.is_empty() {
        return "no sources".to_string();
    }
    let list: Vec<String> = targets.iter().map(|i| (i + 1).to_string()).collect();
    format!("sources {}", list.join(","))
}
