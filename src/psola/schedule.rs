use std::marker::PhantomData;

use crate::float::Float;
use crate::pitch::{Pitch, PitchSource};

/// One grain: a source pitch mark and where it lands in the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grain {
    /// Pitch mark in the source.
    pub source: usize,
    /// Source samples read on each side of the mark.
    pub source_half: usize,
    /// Destination position the mark is placed at.
    pub center: usize,
    /// Destination samples before the center, matching the previous grain's
    /// right side so the two cross-fade over the same span.
    pub left: usize,
    /// Destination samples after the center.
    pub right: usize,
}

#[derive(Clone, Copy, Debug)]
struct Step {
    half: usize,
    /// Source period, `None` where the source is unvoiced.
    source: Option<usize>,
}

/// Walks the source and destination timelines and yields the [Grain]s to
/// render, in destination order.
///
/// Each source step reads the exact source pitch at the source cursor for the
/// source hop, and every grain reads the average target pitch at the
/// destination cursor for its spacing. Where either is unvoiced both fall back
/// to the default window, as does a period longer than the whole signal, which
/// is what a near-zero pitch produces. A step emits grains while the destination
/// cursor is nearer to its mark than to the next one. Raising the pitch
/// therefore repeats periods and lowering it skips some, and the output keeps
/// the source timing. The destination cursor never runs more than one grain
/// ahead of the source cursor.
pub struct GrainSchedule<T, S, D>
where
    T: Float,
{
    source: S,
    target: D,
    frame_rate: usize,
    default_window: usize,
    len: usize,
    psrc: usize,
    pdst: usize,
    window0: usize,
    step: Option<Step>,
    done: bool,
    _marker: PhantomData<T>,
}

impl<T, S, D> GrainSchedule<T, S, D>
where
    T: Float,
    S: PitchSource<T>,
    D: PitchSource<T>,
{
    pub(crate) fn new(
        len: usize,
        frame_rate: usize,
        default_window: usize,
        source: S,
        target: D,
    ) -> Self {
        let default_window = default_window.max(1);
        GrainSchedule {
            source,
            target,
            frame_rate,
            default_window,
            len,
            psrc: 0,
            pdst: 0,
            window0: default_window,
            step: None,
            done: false,
            _marker: PhantomData,
        }
    }

    /// Current source cursor.
    pub fn source_position(&self) -> usize {
        self.psrc
    }

    /// Current destination cursor.
    pub fn destination_position(&self) -> usize {
        self.pdst
    }

    /// Period in samples of a pitch, or `None` when it is unvoiced or its
    /// period would not fit in the signal.
    fn period_of(&self, pitch: Pitch<T>) -> Option<usize> {
        pitch.period(self.frame_rate).filter(|&period| period <= self.len)
    }

    /// Destination half-length of the grain placed at the destination cursor.
    fn window_at(&self, source: Option<usize>) -> usize {
        match (source, self.period_of(self.target.average_at(self.pdst))) {
            (Some(_), Some(window)) => window,
            _ => self.default_window,
        }
    }

    fn plan(&mut self) -> Option<Step> {
        if self.done {
            return None;
        }
        let source = self.period_of(self.source.exact_at(self.psrc));
        let half = match (source, self.period_of(self.target.average_at(self.pdst))) {
            (Some(half), Some(_)) => half,
            _ => self.default_window,
        };
        if self.psrc + half > self.len {
            self.done = true;
            return None;
        }
        Some(Step { half, source })
    }
}

impl<T, S, D> Iterator for GrainSchedule<T, S, D>
where
    T: Float,
    S: PitchSource<T>,
    D: PitchSource<T>,
{
    type Item = Grain;

    fn next(&mut self) -> Option<Grain> {
        loop {
            let step = match self.step {
                Some(step) => step,
                None => {
                    let step = self.plan()?;
                    self.step = Some(step);
                    step
                }
            };

            if 2 * self.pdst < 2 * self.psrc + step.half {
                let window = self.window_at(step.source);
                let grain = Grain {
                    source: self.psrc,
                    source_half: step.half,
                    center: self.pdst,
                    left: self.window0,
                    right: window,
                };
                self.pdst += window;
                self.window0 = window;
                return Some(grain);
            }

            self.psrc += step.half;
            self.step = None;
        }
    }
}
