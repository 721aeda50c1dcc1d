//! Wave sources: point emitters with a position, frequency, amplitude, and phase.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier of a [`Source`].
///
/// Ids are handed out by a [`Registry`](crate::registry::Registry) from a
/// counter that only increases; an id is never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceId(pub u64);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wave-emitting point.
///
/// Position is in normalized domain coordinates (unit square, origin at the
/// bottom-left corner). No field is clamped: commands may deliberately push
/// a source outside the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    id: SourceId,
    pub position: Vec2,
    pub frequency: f32,
    pub amplitude: f32,
    /// Phase offset in radians.
    pub phase: f32,
    /// Phase velocity in radians per second.
    pub phase_speed: f32,
}

impl Source {
    pub(crate) fn from_spec(id: SourceId, spec: SourceSpec) -> Self {
        Self {
            id,
            position: spec.position,
            frequency: spec.frequency,
            amplitude: spec.amplitude,
            phase: spec.phase,
            phase_speed: spec.phase_speed,
        }
    }

    /// The registry-assigned id.
    pub fn id(&self) -> SourceId {
        self.id
    }

    /// The field values of this source without its id.
    pub fn spec(&self) -> SourceSpec {
        SourceSpec {
            position: self.position,
            frequency: self.frequency,
            amplitude: self.amplitude,
            phase: self.phase,
            phase_speed: self.phase_speed,
        }
    }

    /// Raw wave contribution at `distance` from the center.
    pub fn wave(&self, distance: f32) -> f32 {
        self.amplitude * (distance * self.frequency + self.phase).sin()
    }
}

/// Everything needed to create a [`Source`] except its id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceSpec {
    pub position: Vec2,
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
    pub phase_speed: f32,
}

impl SourceSpec {
    /// Default used when a command selector references a position past the
    /// end of the registry: centered, frequency 10, unit amplitude, at rest.
    pub fn command_default() -> Self {
        Self {
            position: Vec2::new(0.5, 0.5),
            frequency: 10.0,
            amplitude: 1.0,
            phase: 0.0,
            phase_speed: 0.0,
        }
    }

    /// Default used for sources placed by pointer interaction at `position`.
    pub fn pointer_default(position: Vec2) -> Self {
        Self {
            position,
            frequency: 100.0,
            amplitude: 1.0,
            phase: 0.0,
            phase_speed: 3.0,
        }
    }
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self::command_default()
    }
}

/// Sum of the amplitudes of `sources`.
pub fn total_amplitude(sources: &[Source]) -> f32 {
    sources.iter().map(|s| s.amplitude).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_default_matches_auto_extension_values() {
        let s = SourceSpec::command_default();
        assert_eq!(s.position, Vec2::new(0.5, 0.5));
        assert_eq!(s.frequency, 10.0);
        assert_eq!(s.amplitude, 1.0);
        assert_eq!(s.phase, 0.0);
        assert_eq!(s.phase_speed, 0.0);
    }

    #[test]
    fn pointer_default_uses_given_position() {
        let s = SourceSpec::pointer_default(Vec2::new(0.1, 0.9));
        assert_eq!(s.position, Vec2::new(0.1, 0.9));
        assert_eq!(s.frequency, 100.0);
        assert_eq!(s.phase_speed, 3.0);
    }

    #[test]
    fn spec_round_trips_through_source() {
        let spec = SourceSpec {
            position: Vec2::new(0.2, 0.3),
            frequency: 12.0,
            amplitude: 0.5,
            phase: 1.0,
            phase_speed: -2.0,
        };
        let source = Source::from_spec(SourceId(4), spec);
        assert_eq!(source.id(), SourceId(4));
        assert_eq!(source.spec(), spec);
    }

    #[test]
    fn wave_at_zero_distance_is_amplitude_times_sin_phase() {
        let source = Source::from_spec(
            SourceId(0),
            SourceSpec {
                phase: std::f32::consts::FRAC_PI_2,
                amplitude: 0.7,
                ..SourceSpec::command_default()
            },
        );
        assert!((source.wave(0.0) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn total_amplitude_sums_every_source() {
        let sources: Vec<_> = [0.25, 2.0, -0.5]
            .into_iter()
            .enumerate()
            .map(|(i, amplitude)| {
                Source::from_spec(
                    SourceId(i as u64),
                    SourceSpec {
                        amplitude,
                        ..SourceSpec::command_default()
                    },
                )
            })
            .collect();
        assert!((total_amplitude(&sources) - 1.75).abs() < 1e-6);
        assert_eq!(total_amplitude(&[]), 0.0);
    }

    #[test]
    fn source_id_displays_as_number() {
        assert_eq!(SourceId(42).to_string(), "42");
    }
}
