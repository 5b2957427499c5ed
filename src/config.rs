//! Detection and transposition parameters.
use crate::error::{Error, Result};

/// Pitch range and voicing threshold used to build a
/// [PitchContour][crate::contour::PitchContour].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContourParams {
    /// Lowest detectable pitch in Hz. Sets the longest lag searched.
    pub pitch_min: f64,
    /// Highest detectable pitch in Hz. Sets the shortest lag searched.
    pub pitch_max: f64,
    /// Correlation score above which a position counts as voiced.
    pub threshold: f64,
}

impl Default for ContourParams {
    fn default() -> Self {
        ContourParams {
            pitch_min: 70.0,
            pitch_max: 400.0,
            threshold: 0.7,
        }
    }
}

impl ContourParams {
    /// Range suited to adult male voices.
    pub fn male() -> Self {
        Self::default().with_range(75.0, 200.0)
    }

    /// Range suited to adult female voices.
    pub fn female() -> Self {
        Self::default().with_range(150.0, 300.0)
    }

    pub fn with_range(self, pitch_min: f64, pitch_max: f64) -> Self {
        ContourParams {
            pitch_min,
            pitch_max,
            ..self
        }
    }

    pub fn with_threshold(self, threshold: f64) -> Self {
        ContourParams { threshold, ..self }
    }

    /// Shortest and longest lag in samples, `(frame_rate / pitch_max,
    /// frame_rate / pitch_min)` rounded down.
    pub fn windows(&self, frame_rate: usize) -> Result<(usize, usize)> {
        if frame_rate == 0 {
            return Err(Error::InvalidFrameRate);
        }
        let invalid = Error::InvalidPitchRange {
            min: self.pitch_min,
            max: self.pitch_max,
        };
        if !(self.pitch_min.is_finite() && self.pitch_max.is_finite())
            || self.pitch_min <= 0.0
            || self.pitch_min >= self.pitch_max
        {
            return Err(invalid);
        }
        let wmin = (frame_rate as f64 / self.pitch_max).floor() as usize;
        let wmax = (frame_rate as f64 / self.pitch_min).floor() as usize;
        if wmin == 0 {
            return Err(invalid);
        }
        Ok((wmin, wmax))
    }
}

/// Settings for a [Transposer][crate::transpose::Transposer].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransposeConfig {
    pub params: ContourParams,
    /// Shift in semitones, positive to raise the pitch.
    pub semitones: i32,
    /// Grain half-length used where no pitch is available. Defaults to the
    /// shortest detection lag.
    pub default_window: Option<usize>,
}

impl Default for TransposeConfig {
    fn default() -> Self {
        TransposeConfig {
            params: ContourParams::default(),
            semitones: 8,
            default_window: None,
        }
    }
}

impl TransposeConfig {
    /// Frequency ratio of the shift, `2^(semitones / 12)`.
    pub fn ratio(&self) -> f64 {
        2f64.powf(self.semitones as f64 / 12.0)
    }
}
