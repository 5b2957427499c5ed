//! Transposing whole recordings.
use std::io::{Read, Seek, Write};
use std::path::Path;

use tracing::info;

use crate::config::TransposeConfig;
use crate::contour::PitchContour;
use crate::error::Result;
use crate::float::{from_f64, Float};
use crate::io::{PcmReader, PcmWriter, WavInfo};
use crate::pitch::{Pitch, PitchSource};
use crate::psola::Resynthesizer;

/// A [PitchSource] with every voiced pitch multiplied by a constant ratio.
pub struct Transposed<S, T>
where
    T: Float,
{
    inner: S,
    ratio: T,
}

impl<S, T> Transposed<S, T>
where
    S: PitchSource<T>,
    T: Float,
{
    pub fn new(inner: S, ratio: T) -> Self {
        Transposed { inner, ratio }
    }

    /// Shift by `semitones`, a ratio of `2^(semitones / 12)`.
    pub fn semitones(inner: S, semitones: i32) -> Self {
        Self::new(inner, from_f64(2f64.powf(semitones as f64 / 12.0)))
    }

    pub fn ratio(&self) -> T {
        self.ratio
    }
}

impl<S, T> PitchSource<T> for Transposed<S, T>
where
    S: PitchSource<T>,
    T: Float,
{
    fn exact_at(&self, pos: usize) -> Pitch<T> {
        self.inner.exact_at(pos).map(|hz| hz * self.ratio)
    }

    fn average_at(&self, pos: usize) -> Pitch<T> {
        self.inner.average_at(pos).map(|hz| hz * self.ratio)
    }
}

/// Contour analysis followed by resynthesis at the shifted pitch.
///
/// ```
/// use pitch_psola::config::TransposeConfig;
/// use pitch_psola::transpose::Transposer;
///
/// let signal: Vec<f32> = (0..8000)
///     .map(|i| (std::f32::consts::TAU * i as f32 / 80.0).sin())
///     .collect();
///
/// let config = TransposeConfig {
///     semitones: 12,
///     ..TransposeConfig::default()
/// };
/// let shifted = Transposer::new(config).process(8000, &signal).unwrap();
/// assert_eq!(shifted.len(), signal.len());
/// ```
pub struct Transposer {
    config: TransposeConfig,
}

impl Transposer {
    pub fn new(config: TransposeConfig) -> Self {
        Transposer { config }
    }

    pub fn config(&self) -> &TransposeConfig {
        &self.config
    }

    pub fn process<T: Float>(&self, frame_rate: usize, samples: &[T]) -> Result<Vec<T>> {
        let mut contour = PitchContour::new(frame_rate, &self.config.params)?;
        contour.load(samples);
        info!(
            frames = samples.len(),
            segments = contour.segments().len(),
            "pitch contour built"
        );

        let target = Transposed::new(&contour, from_f64::<T>(self.config.ratio()));
        let default_window = self.config.default_window.unwrap_or(contour.wmin());
        let resynth = Resynthesizer::new(frame_rate, default_window);
        Ok(resynth.resynthesize(samples, &contour, target))
    }

    /// Transpose a WAV stream. The input format is checked before anything is
    /// written to `output`.
    pub fn transpose_pcm<R, W>(&self, input: R, output: W) -> Result<WavInfo>
    where
        R: Read,
        W: Write + Seek,
    {
        let mut reader = PcmReader::from_reader(input)?;
        let info = reader.info();
        let samples: Vec<f64> = reader.read_frames(None)?;
        reader.close();

        let shifted = self.process(info.frame_rate, &samples)?;

        let mut writer = PcmWriter::new(output, info.frame_rate)?;
        writer.write_frames(&shifted)?;
        writer.close()?;
        Ok(info)
    }

    pub fn transpose_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<WavInfo> {
        let mut reader = PcmReader::open(input)?;
        let info = reader.info();
        let samples: Vec<f64> = reader.read_frames(None)?;
        reader.close();

        let shifted = self.process(info.frame_rate, &samples)?;

        let mut writer = PcmWriter::create(output, info.frame_rate)?;
        writer.write_frames(&shifted)?;
        writer.close()?;
        Ok(info)
    }
}
