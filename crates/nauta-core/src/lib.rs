//! Shared types for the NAUTA workspace.
//!
//! This crate contains the LTSA parameter model, the spectral matrix type,
//! the viewport, the error taxonomy, and the audio-source contract used
//! across the NAUTA workspace.

pub mod error;
pub mod matrix;
pub mod params;
pub mod traits;
pub mod viewport;

pub use error::{LtsaError, SourceError};
pub use matrix::{LtsaMatrix, MatrixData};
pub use params::{DerivedSizes, LtsaParams, ParamOverrides};
pub use traits::AudioSource;
pub use viewport::Viewport;
