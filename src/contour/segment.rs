use crate::error::{Error, Result};
use crate::float::{from_f64, from_usize, Float};
use crate::pitch::Pitch;

/// One continuous voiced region: `(position, hz)` breakpoints with strictly
/// increasing positions, and the duration-weighted mean pitch across them.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment<T>
where
    T: Float,
{
    breakpoints: Vec<(usize, T)>,
    average: T,
}

impl<T> Segment<T>
where
    T: Float,
{
    /// Finish a segment from its breakpoints. The average is the trapezoidal
    /// integral of pitch over position divided by the segment length.
    pub fn from_breakpoints(breakpoints: Vec<(usize, T)>) -> Result<Self> {
        if breakpoints.len() < 2 || breakpoints.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::DegenerateSegment);
        }

        let half = from_f64::<T>(0.5);
        let area = breakpoints
            .windows(2)
            .map(|w| (w[0].1 + w[1].1) * from_usize::<T>(w[1].0 - w[0].0) * half)
            .sum::<T>();
        let (pos0, pos1) = (breakpoints[0].0, breakpoints[breakpoints.len() - 1].0);
        let average = area / from_usize::<T>(pos1 - pos0);

        Ok(Segment {
            breakpoints,
            average,
        })
    }

    /// First position covered, inclusive.
    pub fn start(&self) -> usize {
        self.breakpoints[0].0
    }

    /// Last position covered, inclusive.
    pub fn end(&self) -> usize {
        self.breakpoints[self.breakpoints.len() - 1].0
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start() <= pos && pos <= self.end()
    }

    pub fn average(&self) -> T {
        self.average
    }

    pub fn breakpoints(&self) -> &[(usize, T)] {
        &self.breakpoints
    }

    /// Pitch linearly interpolated between the breakpoints around `pos`.
    pub fn exact_at(&self, pos: usize) -> Pitch<T> {
        if !self.contains(pos) {
            return Pitch::Unvoiced;
        }
        match self.breakpoints.binary_search_by_key(&pos, |&(p, _)| p) {
            Ok(i) => Pitch::Voiced(self.breakpoints[i].1),
            Err(i) => {
                let (pos0, pitch0) = self.breakpoints[i - 1];
                let (pos1, pitch1) = self.breakpoints[i];
                let t = from_usize::<T>(pos - pos0) / from_usize::<T>(pos1 - pos0);
                Pitch::Voiced(pitch0 + (pitch1 - pitch0) * t)
            }
        }
    }

    /// The segment average anywhere inside the segment.
    pub fn average_at(&self, pos: usize) -> Pitch<T> {
        if self.contains(pos) {
            Pitch::Voiced(self.average)
        } else {
            Pitch::Unvoiced
        }
    }
}

/// A segment still receiving detections.
#[derive(Debug)]
pub(crate) struct OpenSegment<T>
where
    T: Float,
{
    breakpoints: Vec<(usize, T)>,
}

impl<T> OpenSegment<T>
where
    T: Float,
{
    pub fn new() -> Self {
        OpenSegment {
            breakpoints: Vec::new(),
        }
    }

    pub fn push(&mut self, pos: usize, hz: T) {
        self.breakpoints.push((pos, hz));
    }

    /// Voicing ended at `pos`: the closing breakpoint repeats the last
    /// detected pitch.
    pub fn close(mut self, pos: usize) -> Result<Segment<T>> {
        if let Some(&(last_pos, last_hz)) = self.breakpoints.last() {
            if last_pos < pos {
                self.breakpoints.push((pos, last_hz));
            }
        }
        Segment::from_breakpoints(self.breakpoints)
    }
}
