//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::float::{Float as NumFloat, FloatConst};
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float: Display + Debug + NumFloat + FloatConst + FftNum + Sum {}

impl Float for f64 {}
impl Float for f32 {}

/// Convert a sample count to a [Float].
pub fn from_usize<T: Float>(n: usize) -> T {
    T::from_usize(n).unwrap_or_else(T::max_value)
}

/// Convert an `f64` constant or parameter to a [Float].
pub fn from_f64<T: Float>(x: f64) -> T {
    T::from_f64(x).unwrap_or_else(T::nan)
}

/// Scale a 16-bit PCM sample into `[-1, 1)`.
pub fn from_pcm<T: Float>(sample: i16) -> T {
    from_f64::<T>(sample as f64 / 32768.0)
}

/// Convert back to 16-bit PCM, rounding and saturating.
pub fn to_pcm<T: Float>(sample: T) -> i16 {
    let scaled = (sample * from_f64(32768.0)).round();
    match scaled.to_f64() {
        Some(x) if x >= i16::MAX as f64 => i16::MAX,
        Some(x) if x <= i16::MIN as f64 => i16::MIN,
        Some(x) => x as i16,
        None => 0,
    }
}
