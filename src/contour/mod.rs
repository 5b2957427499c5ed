//! Pitch contour estimation.
//!
//! A [PitchContour] slides an [Autocorrelator] over a recording every
//! `wmin / 2` samples. Consecutive positions scoring above the threshold are
//! grouped into [Segment]s, which answer the exact and average pitch queries
//! of [PitchSource]. Segments are stored in increasing position order and
//! never overlap.
//!
//! ```
//! use pitch_psola::config::ContourParams;
//! use pitch_psola::contour::PitchContour;
//! use pitch_psola::{Pitch, PitchSource};
//!
//! const FRAME_RATE: usize = 8000;
//! // 100 Hz tone, one period every 80 samples.
//! let signal: Vec<f64> = (0..FRAME_RATE)
//!     .map(|i| (std::f64::consts::TAU * i as f64 / 80.0).sin())
//!     .collect();
//!
//! let mut contour = PitchContour::new(FRAME_RATE, &ContourParams::default()).unwrap();
//! contour.load(&signal);
//!
//! assert!(contour.segments()[0].contains(4000));
//! assert_eq!(contour.exact_at(4000), Pitch::Voiced(100.0));
//! ```
use tracing::{debug, warn};

use crate::config::ContourParams;
use crate::detector::autocorrelation::NormalizedAutocorrelator;
use crate::detector::{Autocorrelator, Correlation};
use crate::error::Result;
use crate::float::{from_f64, from_usize, Float};
use crate::pitch::{Pitch, PitchSource};

pub mod segment;
pub mod stream;

pub use segment::Segment;
pub use stream::{ContourStream, Detection};

use segment::OpenSegment;

pub struct PitchContour<T, A = NormalizedAutocorrelator>
where
    T: Float,
{
    frame_rate: usize,
    wmin: usize,
    wmax: usize,
    threshold: T,
    detector: A,
    segments: Vec<Segment<T>>,
    open: Option<OpenSegment<T>>,
    offset: usize,
}

impl<T> PitchContour<T, NormalizedAutocorrelator>
where
    T: Float,
{
    /// Empty contour using the time-domain [NormalizedAutocorrelator].
    pub fn new(frame_rate: usize, params: &ContourParams) -> Result<Self> {
        Self::with_detector(frame_rate, params, NormalizedAutocorrelator::new())
    }
}

impl<T, A> PitchContour<T, A>
where
    T: Float,
    A: Autocorrelator<T>,
{
    pub fn with_detector(frame_rate: usize, params: &ContourParams, detector: A) -> Result<Self> {
        let (wmin, wmax) = params.windows(frame_rate)?;
        Ok(PitchContour {
            frame_rate,
            wmin,
            wmax,
            threshold: from_f64(params.threshold),
            detector,
            segments: Vec::new(),
            open: None,
            offset: 0,
        })
    }

    pub fn frame_rate(&self) -> usize {
        self.frame_rate
    }

    /// Shortest lag searched, in samples.
    pub fn wmin(&self) -> usize {
        self.wmin
    }

    /// Longest lag searched, in samples.
    pub fn wmax(&self) -> usize {
        self.wmax
    }

    pub fn threshold(&self) -> T {
        self.threshold
    }

    /// Distance between two detections.
    pub fn hop(&self) -> usize {
        (self.wmin / 2).max(1)
    }

    /// Number of frames consumed so far. Positions of later input start here.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    /// Analyse a buffer that follows everything loaded before. A segment still
    /// open at the end of the buffer is closed on its last frame.
    pub fn load(&mut self, samples: &[T]) {
        let hop = self.hop();
        let segments_before = self.segments.len();

        let mut i = 0;
        while i + self.wmax < samples.len() {
            self.detect(samples, i, self.offset + i);
            i += hop;
        }
        self.offset += samples.len();
        if let Some(last) = self.offset.checked_sub(1) {
            self.close_open(last);
        }

        debug!(
            frames = samples.len(),
            segments = self.segments.len() - segments_before,
            "loaded buffer"
        );
    }

    /// Turn the contour into a [ContourStream] that continues at [offset][Self::offset].
    pub fn into_stream(self) -> ContourStream<T, A> {
        ContourStream::new(self)
    }

    /// Run the detector at `index` of `signal`, recorded at global `position`.
    pub(crate) fn detect(
        &mut self,
        signal: &[T],
        index: usize,
        position: usize,
    ) -> (Correlation<T>, Pitch<T>) {
        let correlation = self
            .detector
            .autocorrelate(self.wmin, self.wmax, signal, index);
        let pitch = if correlation.lag > 0 && self.threshold < correlation.score {
            Pitch::Voiced(from_usize::<T>(self.frame_rate) / from_usize::<T>(correlation.lag))
        } else {
            Pitch::Unvoiced
        };

        match pitch {
            Pitch::Voiced(hz) => self
                .open
                .get_or_insert_with(|| {
                    debug!(position, "segment opened");
                    OpenSegment::new()
                })
                .push(position, hz),
            Pitch::Unvoiced => self.close_open(position),
        }
        (correlation, pitch)
    }

    pub(crate) fn close_open(&mut self, position: usize) {
        if let Some(open) = self.open.take() {
            match open.close(position) {
                Ok(segment) => {
                    debug!(
                        start = segment.start(),
                        end = segment.end(),
                        average = %segment.average(),
                        "segment closed"
                    );
                    self.segments.push(segment);
                }
                Err(err) => warn!(position, "dropping segment: {}", err),
            }
        }
    }

    pub(crate) fn add_offset(&mut self, frames: usize) {
        self.offset += frames;
    }
}

impl<T, A> PitchContour<T, A>
where
    T: Float,
{
    fn segment_at(&self, pos: usize) -> Option<&Segment<T>> {
        let idx = self.segments.partition_point(|s| s.start() <= pos);
        idx.checked_sub(1)
            .map(|i| &self.segments[i])
            .filter(|s| s.contains(pos))
    }

    /// Pitch changes in position order, starting with `(0, Unvoiced)`. Each
    /// segment ends with an unvoiced entry at its last position.
    pub fn breakpoints(&self) -> Vec<(usize, Pitch<T>)> {
        let mut changes = vec![(0, Pitch::Unvoiced)];
        let mut current = Pitch::Unvoiced;
        for segment in &self.segments {
            for &(pos, hz) in segment.breakpoints() {
                if current != Pitch::Voiced(hz) {
                    current = Pitch::Voiced(hz);
                    changes.push((pos, current));
                }
            }
            current = Pitch::Unvoiced;
            changes.push((segment.end(), current));
        }
        changes
    }
}

impl<T, A> PitchSource<T> for PitchContour<T, A>
where
    T: Float,
{
    fn exact_at(&self, pos: usize) -> Pitch<T> {
        self.segment_at(pos)
            .map_or(Pitch::Unvoiced, |segment| segment.exact_at(pos))
    }

    fn average_at(&self, pos: usize) -> Pitch<T> {
        self.segment_at(pos)
            .map_or(Pitch::Unvoiced, |segment| segment.average_at(pos))
    }
}
