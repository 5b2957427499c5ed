//! # Pitch PSOLA
//! *pitch_psola* shifts the pitch of recorded voice without changing its
//! duration, using pitch-synchronous overlap-add (PSOLA).
//!
//! # Pipeline
//! A transposition runs in three stages:
//!
//!   * [PitchContour][contour::PitchContour] scans the recording with an
//!     [Autocorrelator][detector::Autocorrelator] and groups voiced stretches
//!     into [Segment][contour::Segment]s.
//!   * The target pitch is any [PitchSource], typically the contour itself
//!     wrapped in a [Transposed][transpose::Transposed] ratio.
//!   * [Resynthesizer][psola::Resynthesizer] cuts one grain per source period
//!     and lays the grains out at the target period.
//!
//! Two autocorrelation primitives are provided: a direct time-domain search
//! ([NormalizedAutocorrelator][detector::autocorrelation::NormalizedAutocorrelator])
//! and an FFT based one ([FftAutocorrelator][detector::fft::FftAutocorrelator]).
//!
//! # Examples
//! ```
//! use pitch_psola::config::ContourParams;
//! use pitch_psola::contour::PitchContour;
//! use pitch_psola::psola::Resynthesizer;
//! use pitch_psola::transpose::Transposed;
//!
//! fn main() {
//!     const FRAME_RATE: usize = 8000;
//!
//!     // Signal coming from some source (microphone, WAV file, etc...)
//!     let signal: Vec<f64> = (0..FRAME_RATE)
//!         .map(|i| (std::f64::consts::TAU * i as f64 / 80.0).sin())
//!         .collect();
//!
//!     let mut contour = PitchContour::new(FRAME_RATE, &ContourParams::default()).unwrap();
//!     contour.load(&signal);
//!
//!     // Up a fifth.
//!     let target = Transposed::semitones(&contour, 7);
//!     let resynth = Resynthesizer::new(FRAME_RATE, contour.wmin());
//!     let shifted = resynth.resynthesize(&signal, &contour, target);
//!
//!     assert_eq!(shifted.len(), signal.len());
//! }
//! ```

pub use error::{Error, Result};
pub use pitch::{Pitch, PitchSource};

pub mod cli;
pub mod config;
pub mod contour;
pub mod detector;
pub mod error;
pub mod float;
pub mod io;
pub mod pitch;
pub mod psola;
pub mod transpose;
pub mod utils;
