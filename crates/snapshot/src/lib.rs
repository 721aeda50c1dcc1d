#![deny(unsafe_code)]
//! Turns sampled wave fields into pixels.
//!
//! [`pixel`] is pure and always available. [`snapshot`] writes PNG files and
//! sits behind the default `png` feature so embedders that only need the
//! RGBA buffer can skip the `image` crate.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{field_to_rgba, to_gray};

#[cfg(feature = "png")]
pub use snapshot::write_png;
