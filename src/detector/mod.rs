//! Periodicity primitives consumed by the [contour builder][crate::contour].
//!
//! An [Autocorrelator] searches the lags `wmin..=wmax` at a position of a
//! signal and reports the most self-similar one. Callers guarantee
//! `offset + wmax < signal.len()`; implementations never read past the end of
//! the signal and skip or zero-pad lags that would.
use crate::float::{from_f64, Float};

pub mod autocorrelation;
pub mod fft;
pub mod internals;

/// Best lag found by an [Autocorrelator] and its normalized score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correlation<T>
where
    T: Float,
{
    /// Period candidate in samples. Zero when no lag could be evaluated.
    pub lag: usize,
    /// Self-similarity at `lag`, at most one.
    pub score: T,
}

impl<T> Correlation<T>
where
    T: Float,
{
    /// Result for a position where no lag fits in the signal.
    pub fn none() -> Self {
        Correlation {
            lag: 0,
            score: from_f64(-1.0),
        }
    }
}

pub trait Autocorrelator<T>
where
    T: Float,
{
    fn autocorrelate(
        &mut self,
        wmin: usize,
        wmax: usize,
        signal: &[T],
        offset: usize,
    ) -> Correlation<T>;
}

impl<T, F> Autocorrelator<T> for F
where
    T: Float,
    F: FnMut(usize, usize, &[T], usize) -> Correlation<T>,
{
    fn autocorrelate(
        &mut self,
        wmin: usize,
        wmax: usize,
        signal: &[T],
        offset: usize,
    ) -> Correlation<T> {
        self(wmin, wmax, signal, offset)
    }
}

/// Put a lag range in ascending order and keep it away from zero.
pub(crate) fn lag_range(wmin: usize, wmax: usize) -> (usize, usize) {
    let (lo, hi) = if wmax < wmin { (wmax, wmin) } else { (wmin, wmax) };
    (lo.max(1), hi.max(1))
}
