//! Pure-computation RGBA conversion of a [`Field`].
//!
//! Values are clipped to [0, 1] and written as equal R, G and B bytes. A
//! non-finite value renders black.

use wavefield_core::field::Field;

/// Gray level for one field value.
pub fn to_gray(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts a field to an RGBA8 buffer of length `width * height * 4`,
/// row 0 first.
pub fn field_to_rgba(field: &Field) -> Vec<u8> {
    field
        .data()
        .iter()
        .flat_map(|&v| {
            let g = to_gray(v);
            [g, g, g, 255u8]
        })
        .collect()
}
