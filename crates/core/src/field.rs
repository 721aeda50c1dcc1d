//! Two-dimensional grid of sampled field values.
//!
//! A `Field` stores `width * height` f32 values in row-major order, row 0 at
//! the top of the image. Values are stored as evaluated: a clip-mode field
//! may hold anything in roughly [-1, 1] or beyond, and clipping happens only
//! when the field is turned into pixels.

use glam::Vec2;

use crate::error::WaveError;

/// A sampled scalar field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Field {
    /// Creates a zero-filled field.
    ///
    /// Returns `WaveError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, WaveError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Builds a field by calling `f` with the domain coordinate of each cell
    /// center.
    ///
    /// Cell `(col, row)` maps to `u = (col + 0.5) / width` and
    /// `v = 1 - (row + 0.5) / height`, so the domain's y axis points up the
    /// image.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(Vec2) -> f32,
    ) -> Result<Self, WaveError> {
        let len = checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for row in 0..height {
            let v = 1.0 - (row as f32 + 0.5) / height as f32;
            for col in 0..width {
                let u = (col as f32 + 0.5) / width as f32;
                data.push(f(Vec2::new(u, v)));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Smallest and largest stored value.
    pub fn range(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, WaveError> {
    if width == 0 || height == 0 {
        return Err(WaveError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(WaveError::InvalidDimensions)
}
