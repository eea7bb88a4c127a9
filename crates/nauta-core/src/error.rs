use thiserror::Error;

/// Errors originating from the LTSA engine.
#[derive(Error, Debug)]
pub enum LtsaError {
    /// Invalid or contradictory analysis parameters.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Crop or resize request outside valid bounds.
    #[error("out of range: {0}")]
    Range(String),

    /// Operation requires a computed matrix.
    #[error("LTSA matrix has not been computed yet")]
    NotComputed,
}

/// Errors originating from audio sources.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Input path is not a .wav file.
    #[error("input is not a path to a .wav file: {path}")]
    NotWav {
        /// Offending path.
        path: String,
    },

    /// Filename does not carry the expected metadata pattern.
    #[error("filename '{filename}' does not match the DEVICEID_YYYYMMDD_HHMMSS pattern")]
    FilenamePattern {
        /// Offending filename.
        filename: String,
    },

    /// Requested channel does not exist in the file.
    #[error("channel {channel} out of range ({channels} channels available)")]
    ChannelOutOfRange {
        /// Requested channel index.
        channel: usize,
        /// Number of channels in the file.
        channels: usize,
    },

    /// Audio decode error.
    #[error("audio decode error: {0}")]
    Decode(String),
}
