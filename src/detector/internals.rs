use rustfft::FftPlanner;

use crate::float::{from_usize, Float};
use crate::utils::buffer::{copy_complex_to_real, copy_real_to_complex, new_complex_buffer};
use crate::utils::vector::VectorOps;

/// Cosine similarity of two runs of equal length, `dot / sqrt(n1 * n2)`.
/// A silent run has no direction, so the similarity is zero.
pub fn similarity<T, V>(ops: &V, a: &[T], b: &[T]) -> T
where
    T: Float,
    V: VectorOps<T>,
{
    let norm = ops.dot(a, a) * ops.dot(b, b);
    if norm > T::zero() {
        ops.dot(a, b) / norm.sqrt()
    } else {
        T::zero()
    }
}

/// Compute the windowed autocorrelation of `signal` and put the result in `result`.
/// For a signal _x=(x_0,x_1,...)_, the windowed autocorrelation with window size _w_ is
/// the function
///
/// > r(t) = sum_{i=0}^{w-1} x_i*x_{i+t}
///
/// This function assumes `window_size` is at most half of the length of `signal`.
pub fn windowed_autocorrelation<T>(
    signal: &[T],
    window_size: usize,
    planner: &mut FftPlanner<T>,
    result: &mut [T],
) where
    T: Float,
{
    assert!(
        2 * window_size <= signal.len(),
        "The window size cannot be more than half the signal length"
    );

    let fft = planner.plan_fft_forward(signal.len());
    let inv_fft = planner.plan_fft_inverse(signal.len());

    let mut signal_complex = new_complex_buffer(signal.len());
    let mut truncated_signal_complex = new_complex_buffer(signal.len());
    let mut scratch = new_complex_buffer(
        fft.get_inplace_scratch_len()
            .max(inv_fft.get_inplace_scratch_len()),
    );

    // Cross correlate the signal with itself truncated to `0..window_size`.
    copy_real_to_complex(signal, &mut signal_complex);
    copy_real_to_complex(&signal[..window_size], &mut truncated_signal_complex);
    fft.process_with_scratch(&mut signal_complex, &mut scratch);
    fft.process_with_scratch(&mut truncated_signal_complex, &mut scratch);
    // rustfft doesn't normalize, and fft -> inverse fft scales by `signal.len()`.
    let normalization_const = T::one() / from_usize::<T>(signal.len());
    signal_complex
        .iter_mut()
        .zip(truncated_signal_complex.iter())
        .for_each(|(a, b)| {
            *a = *a * normalization_const * b.conj();
        });
    inv_fft.process_with_scratch(&mut signal_complex, &mut scratch);

    // The result is valid only for `0..window_size`
    copy_complex_to_real(&signal_complex[..window_size], result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::vector::ScalarOps;
    use approx::assert_abs_diff_eq;

    #[test]
    fn windowed_autocorrelation_test() {
        let signal: Vec<f64> = vec![0., 1., 2., 0., -1., -2.];
        let window_size: usize = 3;

        let result: Vec<f64> = (0..window_size)
            .map(|i| {
                signal[..window_size]
                    .iter()
                    .zip(signal[i..(i + window_size)].iter())
                    .map(|(a, b)| *a * *b)
                    .sum()
            })
            .collect();

        let mut computed_result = vec![0.; window_size];
        windowed_autocorrelation(
            &signal,
            window_size,
            &mut FftPlanner::new(),
            &mut computed_result,
        );
        // Using an FFT loses precision; we don't care that much, so round generously.
        computed_result
            .iter_mut()
            .for_each(|x| *x = (*x * 100.).round() / 100.);

        assert_eq!(result, computed_result);
    }

    #[test]
    fn similarity_of_scaled_and_inverted_runs() {
        let a = [1.0, -2.0, 3.0];
        let b = [2.0, -4.0, 6.0];
        let c = [-1.0, 2.0, -3.0];
        assert_abs_diff_eq!(similarity(&ScalarOps, &a, &b), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(similarity(&ScalarOps, &a, &c), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn similarity_with_silence_is_zero() {
        assert_eq!(similarity(&ScalarOps, &[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
