use crate::contour::PitchContour;
use crate::detector::Autocorrelator;
use crate::float::Float;
use crate::pitch::Pitch;

/// One analysis step of a [ContourStream].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection<T>
where
    T: Float,
{
    /// Global sample position analysed.
    pub position: usize,
    /// Distance to the next analysed position.
    pub hop: usize,
    pub score: T,
    pub pitch: Pitch<T>,
    /// Frames fed to the stream so far.
    pub consumed: usize,
}

/// Incremental contour builder fed with consecutive chunks of one recording.
///
/// Detections are pulled with [Iterator::next] once enough samples past the
/// cursor are buffered for every lag to be evaluated, so feeding a recording
/// in chunks builds the same contour as loading it at once. Samples behind the
/// cursor are released as the cursor advances.
///
/// ```
/// use pitch_psola::config::ContourParams;
/// use pitch_psola::contour::PitchContour;
///
/// let signal: Vec<f64> = (0..8000)
///     .map(|i| (std::f64::consts::TAU * i as f64 / 80.0).sin())
///     .collect();
///
/// let mut stream = PitchContour::new(8000, &ContourParams::default())
///     .unwrap()
///     .into_stream();
/// for chunk in signal.chunks(1000) {
///     stream.feed(chunk);
///     for detection in &mut stream {
///         assert!(detection.position + detection.hop <= detection.consumed);
///     }
/// }
/// let contour = stream.finish();
/// assert_eq!(contour.offset(), 8000);
/// ```
pub struct ContourStream<T, A>
where
    T: Float,
{
    contour: PitchContour<T, A>,
    tail: Vec<T>,
    tail_start: usize,
    cursor: usize,
}

impl<T, A> ContourStream<T, A>
where
    T: Float,
    A: Autocorrelator<T>,
{
    pub(crate) fn new(contour: PitchContour<T, A>) -> Self {
        let start = contour.offset();
        ContourStream {
            contour,
            tail: Vec::new(),
            tail_start: start,
            cursor: start,
        }
    }

    /// Append the next chunk of samples.
    pub fn feed(&mut self, chunk: &[T]) {
        self.tail.extend_from_slice(chunk);
        self.contour.add_offset(chunk.len());
    }

    /// The contour built so far. The segment under the cursor is not listed
    /// until voicing ends or the stream is finished.
    pub fn contour(&self) -> &PitchContour<T, A> {
        &self.contour
    }

    pub fn consumed(&self) -> usize {
        self.contour.offset()
    }

    /// Number of samples currently retained.
    pub fn buffered(&self) -> usize {
        self.tail.len()
    }

    /// Analyse what is left with the samples available and close the open
    /// segment on the last frame fed.
    pub fn finish(mut self) -> PitchContour<T, A> {
        while self.cursor + self.contour.wmax() < self.end() {
            self.step();
        }
        if let Some(last) = self.consumed().checked_sub(1) {
            self.contour.close_open(last);
        }
        self.contour
    }

    fn end(&self) -> usize {
        self.tail_start + self.tail.len()
    }

    /// Samples needed past the cursor before every lag can be evaluated.
    fn lookahead(&self) -> usize {
        2 * (self.contour.wmax() + 1)
    }

    fn step(&mut self) -> Detection<T> {
        let index = self.cursor - self.tail_start;
        let (correlation, pitch) = self.contour.detect(&self.tail, index, self.cursor);
        let detection = Detection {
            position: self.cursor,
            hop: self.contour.hop(),
            score: correlation.score,
            pitch,
            consumed: self.consumed(),
        };
        self.cursor += detection.hop;

        let stale = self.cursor - self.tail_start;
        if stale >= self.tail.len() / 2 {
            self.tail.drain(..stale);
            self.tail_start = self.cursor;
        }
        detection
    }
}

impl<T, A> Iterator for ContourStream<T, A>
where
    T: Float,
    A: Autocorrelator<T>,
{
    type Item = Detection<T>;

    fn next(&mut self) -> Option<Detection<T>> {
        if self.cursor + self.lookahead() > self.end() {
            return None;
        }
        Some(self.step())
    }
}
