//! PNG snapshots of a [`Field`].
//!
//! Feature-gated behind `png` (default on). The pixel conversion itself lives
//! in [`crate::pixel`].

use std::path::Path;

use wavefield_core::error::WaveError;
use wavefield_core::field::Field;

use crate::pixel::field_to_rgba;

/// Writes a field as a grayscale PNG.
///
/// Returns `WaveError::InvalidDimensions` if the field dimensions overflow
/// `u32`, or `WaveError::Io` on encode or write failure.
pub fn write_png(field: &Field, path: &Path) -> Result<(), WaveError> {
    let rgba = field_to_rgba(field);
    let w = u32::try_from(field.width()).map_err(|_| WaveError::InvalidDimensions)?;
    let h = u32::try_from(field.height()).map_err(|_| WaveError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| WaveError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| WaveError::Io(format!("{}: {e}", path.display())))
}
