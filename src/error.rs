use thiserror::Error;

/// All errors produced by pitch-psola.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported channel count {0}, expected a mono stream")]
    UnsupportedChannels(u16),

    #[error("unsupported sample width of {0} bits, expected 16")]
    UnsupportedSampleWidth(u16),

    #[error("invalid pitch range: {min} Hz to {max} Hz")]
    InvalidPitchRange { min: f64, max: f64 },

    #[error("frame rate must be positive")]
    InvalidFrameRate,

    #[error("segment needs at least two breakpoints with increasing positions")]
    DegenerateSegment,

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
