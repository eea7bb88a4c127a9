// Long-Term Spectral Average computation for NAUTA.

pub mod engine;
pub mod fft;
pub mod resize;

pub use engine::{CropIndices, CropRequest, Ltsa, PipelineState, ProcessTag, SilencePolicy};
pub use fft::SubdivFft;
pub use resize::resample_rows;
