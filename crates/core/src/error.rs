//! Error types for the wavefield core.

use thiserror::Error;

use crate::source::SourceId;

/// Errors produced by registry, scene, and sampling operations.
///
/// The interpreter never surfaces these directly: it turns them into
/// feedback lines. They exist for the host-facing API.
#[derive(Debug, Error, PartialEq)]
pub enum WaveError {
    /// Removing the source would leave the registry empty.
    #[error("cannot remove the last remaining source")]
    LastSource,

    /// No source with this id exists in the registry.
    #[error("no source with id {0}")]
    UnknownSource(SourceId),

    /// A registry position past the end of the source list.
    #[error("source index {index} out of range for {len} sources")]
    IndexOutOfRange { index: usize, len: usize },

    /// Width or height was zero when sampling a field.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A blend mode name was not one of the seven known modes.
    #[error("unknown blend mode: {0}")]
    UnknownBlendMode(String),

    /// A map mode name was neither `clip` nor `remap`.
    #[error("unknown map mode: {0}")]
    UnknownMapMode(String),

    /// A scene config could not be decoded or holds no sources.
    #[error("invalid scene config: {0}")]
    InvalidConfig(String),

    /// Filesystem or encoder failure while persisting or snapshotting.
    #[error("i/o error: {0}")]
    Io(String),
}
