//! The field evaluator: maps a domain coordinate and a source list to one
//! scalar under a [`BlendMode`].
//!
//! This is the single definition of the field. The gradient probe calls it
//! on the CPU, and [`crate::shader`] generates the fragment program from the
//! same constants and branch layout.
//!
//! Every source also draws a proximity marker at its own center. The marker
//! is composited onto the running value *inside* the loop, for every mode, so
//! a later source's marker can overwrite what earlier sources accumulated.
//! That ordering is observable and kept as is.

use glam::Vec2;

use crate::blend::{BlendMode, MapMode};
use crate::source::{total_amplitude, Source};

/// Distance at which a source's marker starts to fade in.
pub const MARKER_OUTER: f32 = 0.02;
/// Distance inside which a source's marker is fully opaque.
pub const MARKER_INNER: f32 = 0.015;

/// Post-blend stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    /// Compress add/subtract/average results into a roughly [-1, 1] envelope
    /// by dividing by the (floored) amplitude sum or mean.
    pub envelope: bool,
    pub map: MapMode,
}

/// Falling linear step: 1 at or below `inner`, 0 at or above `outer`,
/// linear in between.
pub fn smoothstep_falling(outer: f32, inner: f32, x: f32) -> f32 {
    if x <= inner {
        1.0
    } else if x >= outer {
        0.0
    } else {
        (outer - x) / (outer - inner)
    }
}

/// Linear interpolation from `a` to `b` by `t`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Raw field value: no envelope, no remap.
pub fn evaluate(coord: Vec2, sources: &[Source], mode: BlendMode) -> f32 {
    evaluate_with(coord, sources, mode, FieldOptions::default())
}

/// Field value with optional envelope normalization and remap.
///
/// An empty source list yields 0 for every mode and option.
pub fn evaluate_with(coord: Vec2, sources: &[Source], mode: BlendMode, options: FieldOptions) -> f32 {
    if sources.is_empty() {
        return 0.0;
    }

    let mut acc = Accumulator::default();
    for source in sources {
        let distance = coord.distance(source.position);
        acc.combine(mode, source.wave(distance));
        let marker = smoothstep_falling(MARKER_OUTER, MARKER_INNER, distance);
        acc.value = lerp(acc.value, 1.0, marker);
    }

    let count = sources.len() as f32;
    let mut value = acc.finish(mode, count);

    if options.envelope {
        value = apply_envelope(value, mode, total_amplitude(sources), count);
    }

    options.map.apply(value)
}

/// Divides by the amplitude envelope for the modes that have one.
///
/// The amplitude sum is floored at 1.0, so a zero or tiny total never
/// inflates the result or divides by zero.
fn apply_envelope(value: f32, mode: BlendMode, amplitude_sum: f32, count: f32) -> f32 {
    let total = amplitude_sum.max(1.0);
    match mode {
        BlendMode::Add | BlendMode::Subtract => value / total,
        BlendMode::Average if count > 0.0 => value / (total / count),
        _ => value,
    }
}

/// Running state for every blend mode at once.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    value: f32,
    sum: f32,
    product: f32,
    min: f32,
    max: f32,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            value: 0.0,
            sum: 0.0,
            product: 1.0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }
}

impl Accumulator {
    fn combine(&mut self, mode: BlendMode, wave: f32) {
        match mode {
            BlendMode::Add => self.value += wave,
            BlendMode::Subtract => self.value -= wave,
            BlendMode::Multiply => self.product *= wave,
            BlendMode::Normalize | BlendMode::Average => self.sum += wave,
            BlendMode::Min => self.min = self.min.min(wave),
            BlendMode::Max => self.max = self.max.max(wave),
        }
    }

    fn finish(self, mode: BlendMode, count: f32) -> f32 {
        match mode {
            BlendMode::Add | BlendMode::Subtract => self.value,
            BlendMode::Multiply => self.product,
            BlendMode::Min => self.min,
            BlendMode::Max => self.max,
            BlendMode::Normalize | BlendMode::Average if count > 0.0 => self.sum / count,
            BlendMode::Normalize | BlendMode::Average => self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::source::SourceSpec;

    const TOL: f32 = 1e-5;

    fn spec(x: f32, y: f32, frequency: f32, amplitude: f32, phase: f32) -> SourceSpec {
        SourceSpec {
            position: Vec2::new(x, y),
            frequency,
            amplitude,
            phase,
            phase_speed: 0.0,
        }
    }

    fn wave_at(coord: Vec2, s: &SourceSpec) -> f32 {
        s.amplitude * (coord.distance(s.position) * s.frequency + s.phase).sin()
    }

    #[test]
    fn empty_source_list_is_zero_for_every_mode_and_option() {
        let coord = Vec2::new(0.3, 0.7);
        for mode in BlendMode::ALL {
            for envelope in [false, true] {
                for map in [MapMode::Clip, MapMode::Remap] {
                    let v = evaluate_with(coord, &[], mode, FieldOptions { envelope, map });
                    assert_eq!(v, 0.0, "{mode} envelope={envelope} map={map}");
                }
            }
        }
    }

    #[test]
    fn source_at_coord_is_overwritten_by_marker() {
        let reg = Registry::from_specs([spec(0.5, 0.5, 10.0, 0.3, 0.2)]);
        let v = evaluate(Vec2::new(0.5, 0.5), reg.all(), BlendMode::Add);
        assert!((v - 1.0).abs() < TOL, "expected marker value 1.0, got {v}");
    }

    #[test]
    fn add_far_from_source_is_raw_wave() {
        let s = spec(0.2, 0.2, 10.0, 0.8, 0.4);
        let reg = Registry::from_specs([s]);
        let coord = Vec2::new(0.7, 0.6);
        let v = evaluate(coord, reg.all(), BlendMode::Add);
        assert!((v - wave_at(coord, &s)).abs() < TOL);
    }

    #[test]
    fn subtract_negates_add_away_from_markers() {
        let reg = Registry::from_specs([spec(0.2, 0.2, 7.0, 1.0, 0.0), spec(0.8, 0.3, 11.0, 0.5, 1.0)]);
        let coord = Vec2::new(0.5, 0.9);
        let add = evaluate(coord, reg.all(), BlendMode::Add);
        let sub = evaluate(coord, reg.all(), BlendMode::Subtract);
        assert!((add + sub).abs() < TOL, "add={add} sub={sub}");
    }

    #[test]
    fn multiply_min_max_use_their_accumulators() {
        let a = spec(0.1, 0.1, 9.0, 1.0, 0.3);
        let b = spec(0.9, 0.2, 13.0, 0.6, 2.0);
        let reg = Registry::from_specs([a, b]);
        let coord = Vec2::new(0.4, 0.8);
        let (wa, wb) = (wave_at(coord, &a), wave_at(coord, &b));

        let product = evaluate(coord, reg.all(), BlendMode::Multiply);
        let min = evaluate(coord, reg.all(), BlendMode::Min);
        let max = evaluate(coord, reg.all(), BlendMode::Max);

        assert!((product - wa * wb).abs() < TOL);
        assert!((min - wa.min(wb)).abs() < TOL);
        assert!((max - wa.max(wb)).abs() < TOL);
    }

    #[test]
    fn normalize_and_average_are_mean_without_envelope() {
        let a = spec(0.1, 0.1, 9.0, 1.0, 0.3);
        let b = spec(0.9, 0.2, 13.0, 0.6, 2.0);
        let reg = Registry::from_specs([a, b]);
        let coord = Vec2::new(0.4, 0.8);
        let mean = (wave_at(coord, &a) + wave_at(coord, &b)) / 2.0;
        for mode in [BlendMode::Normalize, BlendMode::Average] {
            let v = evaluate(coord, reg.all(), mode);
            assert!((v - mean).abs() < TOL, "{mode}: {v} vs {mean}");
        }
    }

    #[test]
    fn envelope_divides_add_by_amplitude_sum() {
        let reg = Registry::from_specs([spec(0.1, 0.1, 9.0, 2.0, 0.3), spec(0.9, 0.2, 13.0, 1.0, 2.0)]);
        let coord = Vec2::new(0.4, 0.8);
        let raw = evaluate(coord, reg.all(), BlendMode::Add);
        let opts = FieldOptions {
            envelope: true,
            ..FieldOptions::default()
        };
        let enveloped = evaluate_with(coord, reg.all(), BlendMode::Add, opts);
        assert!((enveloped - raw / 3.0).abs() < TOL);
    }

    #[test]
    fn envelope_floors_small_amplitude_sum_at_one() {
        let reg = Registry::from_specs([spec(0.1, 0.1, 9.0, 0.25, 0.3)]);
        let coord = Vec2::new(0.4, 0.8);
        let raw = evaluate(coord, reg.all(), BlendMode::Add);
        let opts = FieldOptions {
            envelope: true,
            ..FieldOptions::default()
        };
        assert_eq!(evaluate_with(coord, reg.all(), BlendMode::Add, opts), raw);
    }

    #[test]
    fn envelope_with_zero_amplitudes_stays_finite() {
        let reg = Registry::from_specs([spec(0.1, 0.1, 9.0, 0.0, 0.3), spec(0.3, 0.1, 9.0, 0.0, 0.3)]);
        let opts = FieldOptions {
            envelope: true,
            ..FieldOptions::default()
        };
        for mode in BlendMode::ALL {
            let v = evaluate_with(Vec2::new(0.8, 0.8), reg.all(), mode, opts);
            assert!(v.is_finite(), "{mode} produced {v}");
        }
    }

    #[test]
    fn envelope_divides_average_by_mean_amplitude() {
        let reg = Registry::from_specs([spec(0.1, 0.1, 9.0, 3.0, 0.3), spec(0.9, 0.2, 13.0, 1.0, 2.0)]);
        let coord = Vec2::new(0.4, 0.8);
        let raw = evaluate(coord, reg.all(), BlendMode::Average);
        let opts = FieldOptions {
            envelope: true,
            ..FieldOptions::default()
        };
        let v = evaluate_with(coord, reg.all(), BlendMode::Average, opts);
        assert!((v - raw / 2.0).abs() < TOL);
    }

    #[test]
    fn envelope_leaves_multiply_untouched() {
        let reg = Registry::from_specs([spec(0.1, 0.1, 9.0, 3.0, 0.3), spec(0.9, 0.2, 13.0, 1.0, 2.0)]);
        let coord = Vec2::new(0.4, 0.8);
        let opts = FieldOptions {
            envelope: true,
            ..FieldOptions::default()
        };
        assert_eq!(
            evaluate_with(coord, reg.all(), BlendMode::Multiply, opts),
            evaluate(coord, reg.all(), BlendMode::Multiply)
        );
    }

    #[test]
    fn remap_applies_after_blend() {
        let reg = Registry::from_specs([spec(0.1, 0.1, 9.0, 1.0, 0.3)]);
        let coord = Vec2::new(0.4, 0.8);
        let raw = evaluate(coord, reg.all(), BlendMode::Add);
        let opts = FieldOptions {
            envelope: false,
            map: MapMode::Remap,
        };
        let v = evaluate_with(coord, reg.all(), BlendMode::Add, opts);
        assert!((v - (raw * 0.5 + 0.5)).abs() < TOL);
    }

    #[test]
    fn marker_is_linear_between_radii() {
        assert_eq!(smoothstep_falling(MARKER_OUTER, MARKER_INNER, 0.0), 1.0);
        assert_eq!(smoothstep_falling(MARKER_OUTER, MARKER_INNER, 0.015), 1.0);
        assert_eq!(smoothstep_falling(MARKER_OUTER, MARKER_INNER, 0.02), 0.0);
        assert_eq!(smoothstep_falling(MARKER_OUTER, MARKER_INNER, 0.5), 0.0);
        let mid = smoothstep_falling(MARKER_OUTER, MARKER_INNER, 0.0175);
        assert!((mid - 0.5).abs() < 1e-4, "midpoint marker = {mid}");
    }

    #[test]
    fn min_mode_discards_marker_overlay() {
        // Marker composites into `value`, which min mode replaces at the end.
        let s = spec(0.5, 0.5, 10.0, 1.0, -std::f32::consts::FRAC_PI_2);
        let reg = Registry::from_specs([s]);
        let v = evaluate(Vec2::new(0.5, 0.5), reg.all(), BlendMode::Min);
        assert!((v + 1.0).abs() < TOL, "expected raw wave -1.0, got {v}");
    }

    /// Known quirk: the marker overwrites the running value in registry
    /// order, so swapping two sources changes the field at a source center.
    #[test]
    fn marker_compositing_depends_on_source_order() {
        let at_coord = spec(0.5, 0.5, 10.0, 1.0, 0.0);
        let elsewhere = spec(0.1, 0.2, 10.0, 1.0, 0.7);
        let coord = Vec2::new(0.5, 0.5);

        let first = Registry::from_specs([at_coord, elsewhere]);
        let last = Registry::from_specs([elsewhere, at_coord]);

        let v_first = evaluate(coord, first.all(), BlendMode::Add);
        let v_last = evaluate(coord, last.all(), BlendMode::Add);

        assert!((v_last - 1.0).abs() < TOL, "marker last should pin to 1.0");
        assert!(
            (v_first - (1.0 + wave_at(coord, &elsewhere))).abs() < TOL,
            "marker first is followed by the other wave"
        );
        assert!((v_first - v_last).abs() > 1e-3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_spec() -> impl Strategy<Value = SourceSpec> {
            (
                -0.5_f32..1.5,
                -0.5_f32..1.5,
                0.1_f32..200.0,
                0.0_f32..3.0,
                -10.0_f32..10.0,
            )
                .prop_map(|(x, y, f, a, p)| spec(x, y, f, a, p))
        }

        fn any_mode() -> impl Strategy<Value = BlendMode> {
            prop::sample::select(BlendMode::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn evaluate_is_finite(
                specs in prop::collection::vec(any_spec(), 0..12),
                x in -1.0_f32..2.0,
                y in -1.0_f32..2.0,
                mode in any_mode(),
                envelope in any::<bool>(),
            ) {
                let reg = Registry::from_specs(specs);
                let opts = FieldOptions { envelope, map: MapMode::Remap };
                let v = evaluate_with(Vec2::new(x, y), reg.all(), mode, opts);
                prop_assert!(v.is_finite(), "non-finite {v} for {mode}");
            }

            #[test]
            fn evaluate_is_deterministic_across_rebuilt_registries(
                specs in prop::collection::vec(any_spec(), 1..8),
                x in 0.0_f32..1.0,
                y in 0.0_f32..1.0,
                mode in any_mode(),
            ) {
                let a = Registry::from_specs(specs.clone());
                let b = Registry::from_specs(specs);
                let coord = Vec2::new(x, y);
                let va = evaluate(coord, a.all(), mode);
                let vb = evaluate(coord, b.all(), mode);
                prop_assert_eq!(va.to_bits(), vb.to_bits());
            }
        }
    }
}
