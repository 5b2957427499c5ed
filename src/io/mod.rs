//! Mono 16-bit PCM WAV streams.
//!
//! Samples are exchanged as [Float]s in `[-1, 1)`. Anything other than one
//! channel of 16-bit integer samples is rejected when the stream is opened,
//! before any output is produced.
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::float::{from_pcm, to_pcm, Float};

/// Format of a PCM stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_width_bytes: u16,
    pub frame_rate: usize,
    pub frame_count: usize,
}

pub struct PcmReader<R>
where
    R: Read,
{
    reader: hound::WavReader<R>,
    info: WavInfo,
}

impl PcmReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening wav");
        Self::validate(hound::WavReader::open(path)?)
    }
}

impl<R> PcmReader<R>
where
    R: Read,
{
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::validate(hound::WavReader::new(reader)?)
    }

    fn validate(reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        if spec.channels != 1 {
            return Err(Error::UnsupportedChannels(spec.channels));
        }
        if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
            return Err(Error::UnsupportedSampleWidth(spec.bits_per_sample));
        }
        let info = WavInfo {
            channels: spec.channels,
            sample_width_bytes: spec.bits_per_sample / 8,
            frame_rate: spec.sample_rate as usize,
            frame_count: reader.duration() as usize,
        };
        Ok(PcmReader { reader, info })
    }

    pub fn info(&self) -> WavInfo {
        self.info
    }

    /// Read up to `count` frames from the current position, or all remaining
    /// frames when `count` is `None`.
    pub fn read_frames<T: Float>(&mut self, count: Option<usize>) -> Result<Vec<T>> {
        let samples = self.reader.samples::<i16>();
        let samples: std::result::Result<Vec<T>, hound::Error> = match count {
            Some(count) => samples.take(count).map(|s| s.map(from_pcm)).collect(),
            None => samples.map(|s| s.map(from_pcm)).collect(),
        };
        Ok(samples?)
    }

    pub fn close(self) {}
}

impl<R> PcmReader<R>
where
    R: Read + Seek,
{
    /// Move to `frame`, counted from the first frame.
    pub fn seek(&mut self, frame: usize) -> Result<()> {
        let frame = u32::try_from(frame).unwrap_or(u32::MAX);
        self.reader.seek(frame)?;
        Ok(())
    }
}

pub struct PcmWriter<W>
where
    W: Write + Seek,
{
    writer: hound::WavWriter<W>,
}

impl PcmWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>, frame_rate: usize) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), frame_rate, "creating wav");
        Ok(PcmWriter {
            writer: hound::WavWriter::create(path, spec(frame_rate)?)?,
        })
    }
}

impl<W> PcmWriter<W>
where
    W: Write + Seek,
{
    pub fn new(writer: W, frame_rate: usize) -> Result<Self> {
        Ok(PcmWriter {
            writer: hound::WavWriter::new(writer, spec(frame_rate)?)?,
        })
    }

    pub fn write_frames<T: Float>(&mut self, frames: &[T]) -> Result<()> {
        for &frame in frames {
            self.writer.write_sample(to_pcm(frame))?;
        }
        Ok(())
    }

    /// Finish the header. Dropping the writer finishes it too, but silently
    /// discards any error.
    pub fn close(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

fn spec(frame_rate: usize) -> Result<hound::WavSpec> {
    let sample_rate = u32::try_from(frame_rate)
        .ok()
        .filter(|&rate| rate > 0)
        .ok_or(Error::InvalidFrameRate)?;
    Ok(hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn wav_bytes(spec: hound::WavSpec, frames: usize) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..frames * spec.channels as usize {
                match spec.bits_per_sample {
                    8 => writer.write_sample(i as i8).unwrap(),
                    _ => writer.write_sample(i as i16).unwrap(),
                }
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn round_trip() {
        let frames: Vec<f64> = vec![0.0, 0.5, -0.5, 0.999, -1.0];
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = PcmWriter::new(&mut cursor, 16000).unwrap();
        writer.write_frames(&frames).unwrap();
        writer.close().unwrap();

        cursor.set_position(0);
        let mut reader = PcmReader::from_reader(cursor).unwrap();
        assert_eq!(
            reader.info(),
            WavInfo {
                channels: 1,
                sample_width_bytes: 2,
                frame_rate: 16000,
                frame_count: 5
            }
        );
        let read: Vec<f64> = reader.read_frames(None).unwrap();
        for (a, b) in frames.iter().zip(&read) {
            assert!((a - b).abs() <= 1.0 / 32768.0);
        }
    }

    #[test]
    fn partial_reads_and_seek() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut reader = PcmReader::from_reader(Cursor::new(wav_bytes(spec, 10))).unwrap();
        let first: Vec<f32> = reader.read_frames(Some(4)).unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first[3], 3.0 / 32768.0);

        reader.seek(8).unwrap();
        let rest: Vec<f32> = reader.read_frames(Some(100)).unwrap();
        assert_eq!(rest, vec![8.0 / 32768.0, 9.0 / 32768.0]);
    }

    #[test]
    fn rejects_stereo() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let result = PcmReader::from_reader(Cursor::new(wav_bytes(spec, 10)));
        assert!(matches!(result, Err(Error::UnsupportedChannels(2))));
    }

    #[test]
    fn rejects_eight_bit() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let result = PcmReader::from_reader(Cursor::new(wav_bytes(spec, 10)));
        assert!(matches!(result, Err(Error::UnsupportedSampleWidth(8))));
    }

    #[test]
    fn rejects_zero_frame_rate() {
        let mut cursor = Cursor::new(Vec::new());
        assert!(matches!(
            PcmWriter::new(&mut cursor, 0),
            Err(Error::InvalidFrameRate)
        ));
    }
}
