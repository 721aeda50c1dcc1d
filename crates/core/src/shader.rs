//! GPU-side twin of the field evaluator.
//!
//! The fragment program is generated from [`BlendMode::ALL`] and the marker
//! constants in [`crate::evaluate`], so the GPU branches exactly where the
//! CPU evaluator does. [`UniformBlock`] packs a source list into the fixed
//! arrays the program reads.
//!
//! Nothing here touches a GPU context; hosts compile [`fragment_shader`]
//! with [`FIELD_VERTEX_SHADER`] and upload a [`UniformBlock`] each frame.

use std::fmt::Write as _;

use tracing::warn;

use crate::blend::BlendMode;
use crate::evaluate::{FieldOptions, MARKER_INNER, MARKER_OUTER};
use crate::source::{total_amplitude, Source};

/// Number of sources the fragment program can hold.
pub const MAX_SOURCES: usize = 100;

/// GLSL ES 3.0 vertex shader for a fullscreen triangle.
///
/// Emits `v_uv` in domain coordinates: origin at the bottom-left, y up.
/// Draw three vertices with an empty VAO bound.
pub const FIELD_VERTEX_SHADER: &str = r#"#version 300 es
out vec2 v_uv;
void main() {
    v_uv = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    gl_Position = vec4(v_uv * 2.0 - 1.0, 0.0, 1.0);
}
"#;

/// Uniform values for one frame, padded to [`MAX_SOURCES`].
#[derive(Debug, Clone, PartialEq)]
pub struct UniformBlock {
    /// `(x, y, frequency, amplitude)` per source, zero past `point_count`.
    pub points: [[f32; 4]; MAX_SOURCES],
    /// Phase per source, zero past `point_count`.
    pub phases: [f32; MAX_SOURCES],
    pub point_count: i32,
    pub blend_mode: i32,
    /// Sum of packed amplitudes, floored at 1.0.
    pub sum_amp: f32,
    pub envelope: i32,
    pub map_mode: i32,
}

impl UniformBlock {
    /// Packs `sources` for upload. Sources past [`MAX_SOURCES`] are dropped
    /// with a warning.
    pub fn pack(sources: &[Source], mode: BlendMode, options: FieldOptions) -> Self {
        if sources.len() > MAX_SOURCES {
            warn!(
                count = sources.len(),
                capacity = MAX_SOURCES,
                "source count exceeds uniform capacity; extra sources are not rendered"
            );
        }
        let packed = &sources[..sources.len().min(MAX_SOURCES)];

        let mut points = [[0.0; 4]; MAX_SOURCES];
        let mut phases = [0.0; MAX_SOURCES];
        for (i, s) in packed.iter().enumerate() {
            points[i] = [s.position.x, s.position.y, s.frequency, s.amplitude];
            phases[i] = s.phase;
        }

        Self {
            points,
            phases,
            point_count: packed.len() as i32,
            blend_mode: mode.code(),
            sum_amp: total_amplitude(packed).max(1.0),
            envelope: i32::from(options.envelope),
            map_mode: options.map.code(),
        }
    }
}

/// GLSL statement accumulating `wave` for `mode`.
fn combine_statement(mode: BlendMode) -> &'static str {
    match mode {
        BlendMode::Add => "value += wave;",
        BlendMode::Subtract => "value -= wave;",
        BlendMode::Multiply => "prod *= wave;",
        BlendMode::Normalize | BlendMode::Average => "sum += wave;",
        BlendMode::Min => "min_val = min(min_val, wave);",
        BlendMode::Max => "max_val = max(max_val, wave);",
    }
}

/// GLSL statement producing the blended value for `mode`, if it replaces
/// the running value.
fn finish_statement(mode: BlendMode) -> Option<&'static str> {
    match mode {
        BlendMode::Add | BlendMode::Subtract => None,
        BlendMode::Multiply => Some("value = prod;"),
        BlendMode::Normalize | BlendMode::Average => Some("value = sum / count;"),
        BlendMode::Min => Some("value = min_val;"),
        BlendMode::Max => Some("value = max_val;"),
    }
}

/// Writes an `if / else if` chain over every mode that has a statement.
fn write_branches(
    out: &mut String,
    indent: &str,
    statement: impl Fn(BlendMode) -> Option<&'static str>,
) {
    let mut first = true;
    for mode in BlendMode::ALL {
        let Some(body) = statement(mode) else {
            continue;
        };
        let keyword = if first { "if" } else { "} else if" };
        let _ = writeln!(out, "{indent}{keyword} (u_blend_mode == {}) {{ // {mode}", mode.code());
        let _ = writeln!(out, "{indent}    {body}");
        first = false;
    }
    if !first {
        let _ = writeln!(out, "{indent}}}");
    }
}

/// GLSL ES 3.0 fragment program evaluating the field per pixel.
pub fn fragment_shader() -> String {
    let mut src = String::new();
    let _ = write!(
        src,
        r#"#version 300 es
precision highp float;
precision highp int;

#define MAX_SOURCES {MAX_SOURCES}
#define MARKER_OUTER {MARKER_OUTER:?}
#define MARKER_INNER {MARKER_INNER:?}

uniform vec4  u_points[MAX_SOURCES];
uniform float u_phases[MAX_SOURCES];
uniform int   u_point_count;
uniform int   u_blend_mode;
uniform float u_sum_amp;
uniform int   u_envelope;
uniform int   u_map_mode;

in vec2 v_uv;
out vec4 frag_color;

float marker(float dist) {{
    return clamp((MARKER_OUTER - dist) / (MARKER_OUTER - MARKER_INNER), 0.0, 1.0);
}}

void main() {{
    if (u_point_count == 0) {{
        frag_color = vec4(vec3(0.0), 1.0);
        return;
    }}
    float count   = float(u_point_count);
    float value   = 0.0;
    float sum     = 0.0;
    float prod    = 1.0;
    float min_val = 1e30;
    float max_val = -1e30;

    for (int i = 0; i < u_point_count; i++) {{
        float dist = distance(v_uv, u_points[i].xy);
        float wave = u_points[i].w * sin(dist * u_points[i].z + u_phases[i]);
"#
    );
    write_branches(&mut src, "        ", |m| Some(combine_statement(m)));
    src.push_str("        value = mix(value, 1.0, marker(dist));\n    }\n\n");
    write_branches(&mut src, "    ", finish_statement);
    src.push_str(
        r#"
    if (u_envelope == 1) {
        if (u_blend_mode == 0 || u_blend_mode == 1) {
            value /= u_sum_amp;
        } else if (u_blend_mode == 6) {
            value /= u_sum_amp / count;
        }
    }
    if (u_map_mode == 1) {
        value = value * 0.5 + 0.5;
    }
    frag_color = vec4(vec3(value), 1.0);
}
"#,
    );
    src
}
