use rustfft::FftPlanner;

use crate::detector::internals::windowed_autocorrelation;
use crate::detector::{lag_range, Autocorrelator, Correlation};
use crate::float::{from_f64, Float};
use crate::utils::buffer::{new_real_buffer, read_window};
use crate::utils::vector::{ScalarOps, VectorOps};

/// Frequency-domain primitive.
///
/// The autocorrelation of a `wmax + 1` sample window is computed for every lag
/// with a single FFT round trip, then each lag is normalized by the energy of
/// the window and of the shifted window. Samples past the end of the signal
/// read as zero. Among the lags scoring within `tolerance` of the best one the
/// shortest is reported.
pub struct FftAutocorrelator<T, V = ScalarOps>
where
    T: Float,
{
    planner: FftPlanner<T>,
    ops: V,
    tolerance: T,
}

impl<T> FftAutocorrelator<T, ScalarOps>
where
    T: Float,
{
    pub fn new() -> Self {
        Self::with_ops(ScalarOps)
    }
}

impl<T> Default for FftAutocorrelator<T, ScalarOps>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V> FftAutocorrelator<T, V>
where
    T: Float,
    V: VectorOps<T>,
{
    pub fn with_ops(ops: V) -> Self {
        FftAutocorrelator {
            planner: FftPlanner::new(),
            ops,
            tolerance: from_f64(1e-6),
        }
    }
}

impl<T, V> Autocorrelator<T> for FftAutocorrelator<T, V>
where
    T: Float,
    V: VectorOps<T>,
{
    fn autocorrelate(
        &mut self,
        wmin: usize,
        wmax: usize,
        signal: &[T],
        offset: usize,
    ) -> Correlation<T> {
        let (wmin, wmax) = lag_range(wmin, wmax);
        if offset >= signal.len() {
            return Correlation::none();
        }

        let window = wmax + 1;
        let frame = read_window(signal, offset as isize, 2 * window);
        let mut autocorr = new_real_buffer(window);
        windowed_autocorrelation(&frame, window, &mut self.planner, &mut autocorr);

        let reference = self.ops.dot(&frame[..window], &frame[..window]);
        let mut shifted = reference;
        let mut scores = Vec::with_capacity(wmax - wmin + 1);
        for tau in 0..=wmax {
            if tau >= wmin {
                let norm = reference * shifted;
                let score = if norm > T::zero() {
                    autocorr[tau] / norm.sqrt()
                } else {
                    T::zero()
                };
                scores.push((tau, score));
            }
            // Slide the shifted window's energy one sample forward.
            shifted = shifted - frame[tau] * frame[tau] + frame[tau + window] * frame[tau + window];
        }

        let best = scores
            .iter()
            .fold(from_f64::<T>(-1.0), |best, &(_, score)| best.max(score));
        scores
            .into_iter()
            .find(|&(_, score)| score >= best - self.tolerance)
            .map(|(lag, score)| Correlation { lag, score })
            .unwrap_or_else(Correlation::none)
    }
}
