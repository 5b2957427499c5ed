use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output`, zeroing the imaginary parts
/// and everything past `input.len()`.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

pub fn copy_complex_to_real<T: Float>(input: &[Complex<T>], output: &mut [T]) {
    input
        .iter()
        .map(|c| c.re)
        .zip(output.iter_mut())
        .for_each(|(i, o)| *o = i);
}

/// Copy `len` samples of `signal` starting at `start`, which may lie before the
/// first sample. Positions outside the signal read as zero.
pub fn read_window<T: Float>(signal: &[T], start: isize, len: usize) -> Vec<T> {
    let mut out = new_real_buffer(len);
    for (k, o) in out.iter_mut().enumerate() {
        let idx = start + k as isize;
        if idx >= 0 {
            if let Some(&s) = signal.get(idx as usize) {
                *o = s;
            }
        }
    }
    out
}
