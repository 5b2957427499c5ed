use crate::detector::internals::similarity;
use crate::detector::{lag_range, Autocorrelator, Correlation};
use crate::float::{from_f64, Float};
use crate::utils::vector::{ScalarOps, VectorOps};

/// Time-domain reference primitive.
///
/// For every lag `w` the run of `w1 = wmax - wmax % w` samples at the offset is
/// compared with the same run shifted by `w`. Using a whole number of periods
/// keeps the comparison length close to `wmax` for every candidate. The score
/// is the cosine similarity of the two runs. A longer lag only replaces the
/// current best when it scores higher by more than rounding noise, so
/// multiples of the true period are not reported.
#[derive(Clone, Copy, Debug)]
pub struct NormalizedAutocorrelator<V = ScalarOps> {
    ops: V,
    tolerance: f64,
}

impl NormalizedAutocorrelator<ScalarOps> {
    pub fn new() -> Self {
        Self::with_ops(ScalarOps)
    }
}

impl Default for NormalizedAutocorrelator<ScalarOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NormalizedAutocorrelator<V> {
    pub fn with_ops(ops: V) -> Self {
        NormalizedAutocorrelator {
            ops,
            tolerance: 1e-9,
        }
    }
}

impl<T, V> Autocorrelator<T> for NormalizedAutocorrelator<V>
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
        let seq = &signal[offset.min(signal.len())..];
        let tolerance = from_f64::<T>(self.tolerance);

        let mut best = Correlation::none();
        for w in wmin..=wmax {
            let w1 = wmax - (wmax % w);
            if w1 + w <= seq.len() {
                let score = similarity(&self.ops, &seq[..w1], &seq[w..w + w1]);
                if best.score + tolerance < score {
                    best = Correlation { lag: w, score };
                }
            }
        }
        best
    }
}
