use crate::float::{from_f64, Float};

/// The outcome of a pitch query at one sample position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pitch<T>
where
    T: Float,
{
    /// Periodic signal with the given fundamental frequency in Hz.
    Voiced(T),
    /// No periodicity was detected here.
    Unvoiced,
}

impl<T> Pitch<T>
where
    T: Float,
{
    pub fn hz(self) -> Option<T> {
        match self {
            Pitch::Voiced(hz) => Some(hz),
            Pitch::Unvoiced => None,
        }
    }

    pub fn is_voiced(self) -> bool {
        matches!(self, Pitch::Voiced(_))
    }

    pub fn map(self, f: impl FnOnce(T) -> T) -> Self {
        match self {
            Pitch::Voiced(hz) => Pitch::Voiced(f(hz)),
            Pitch::Unvoiced => Pitch::Unvoiced,
        }
    }

    /// Length of one period in samples, rounded to the nearest sample and
    /// never shorter than one. Zero, negative and non-finite frequencies have
    /// no usable period and yield `None`, so callers fall back to their
    /// default window.
    pub fn period(self, frame_rate: usize) -> Option<usize> {
        let hz = self.hz()?;
        if !hz.is_finite() || hz <= from_f64::<T>(1e-9) {
            return None;
        }
        let samples = (from_f64::<T>(frame_rate as f64) / hz).round();
        samples.to_usize().map(|n| n.max(1))
    }
}

/// Anything that can report a pitch at a sample position.
///
/// `exact_at` follows local periodicity and is used to size the grains read
/// from the source. `average_at` is flat across a voiced region and is used
/// to schedule the destination, which keeps frame-to-frame detection noise out
/// of the output hop sizes.
pub trait PitchSource<T>
where
    T: Float,
{
    fn exact_at(&self, pos: usize) -> Pitch<T>;

    fn average_at(&self, pos: usize) -> Pitch<T>;
}

impl<T, S> PitchSource<T> for &S
where
    T: Float,
    S: PitchSource<T> + ?Sized,
{
    fn exact_at(&self, pos: usize) -> Pitch<T> {
        (**self).exact_at(pos)
    }

    fn average_at(&self, pos: usize) -> Pitch<T> {
        (**self).average_at(pos)
    }
}
