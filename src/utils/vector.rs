//! Element-wise arithmetic used by the detectors and the resynthesizer.
//!
//! Everything numeric goes through [VectorOps] so a vectorized backend can be
//! substituted for [ScalarOps] without touching the algorithms.
use crate::float::{from_usize, Float};

pub trait VectorOps<T: Float> {
    /// `acc[i] += x[i]` over the common length.
    fn add(&self, acc: &mut [T], x: &[T]);

    /// `a[i] *= b[i]` over the common length.
    fn multiply(&self, a: &mut [T], b: &[T]);

    fn dot(&self, a: &[T], b: &[T]) -> T;

    /// Periodic raised-cosine window, `0.5 * (1 - cos(2πk / size))`.
    fn hanning_window(&self, size: usize) -> Vec<T>;

    /// First half of a `2 * half`-sample Hanning window, rising from zero.
    fn rising_half(&self, half: usize) -> Vec<T> {
        let mut window = self.hanning_window(2 * half);
        window.truncate(half);
        window
    }

    /// Second half of a `2 * half`-sample Hanning window, falling from one.
    /// Adding it to [VectorOps::rising_half] of the same length gives exactly one.
    fn falling_half(&self, half: usize) -> Vec<T> {
        self.hanning_window(2 * half).split_off(half)
    }
}

/// Plain loop implementation of [VectorOps].
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarOps;

impl<T: Float> VectorOps<T> for ScalarOps {
    fn add(&self, acc: &mut [T], x: &[T]) {
        acc.iter_mut().zip(x).for_each(|(a, &b)| *a = *a + b);
    }

    fn multiply(&self, a: &mut [T], b: &[T]) {
        a.iter_mut().zip(b).for_each(|(a, &b)| *a = *a * b);
    }

    fn dot(&self, a: &[T], b: &[T]) -> T {
        a.iter().zip(b).map(|(&a, &b)| a * b).sum()
    }

    fn hanning_window(&self, size: usize) -> Vec<T> {
        let half = from_usize::<T>(1) / from_usize::<T>(2);
        let size_t = from_usize::<T>(size);
        (0..size)
            .map(|i| half * (T::one() - (from_usize::<T>(i) * T::TAU() / size_t).cos()))
            .collect()
    }
}
