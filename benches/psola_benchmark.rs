use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pitch_psola::{
    config::ContourParams,
    contour::PitchContour,
    detector::{autocorrelation::NormalizedAutocorrelator, fft::FftAutocorrelator, Autocorrelator},
    psola::Resynthesizer,
    transpose::Transposed,
};

const FRAME_RATE: usize = 44100;

fn voice_like(size: usize) -> Vec<f64> {
    // 147 Hz with a couple of harmonics.
    let dx = 2.0 * std::f64::consts::PI * 147.0 / FRAME_RATE as f64;
    (0..size)
        .map(|i| {
            let x = i as f64 * dx;
            x.sin() + 0.5 * (2.0 * x).sin() + 0.25 * (3.0 * x).sin()
        })
        .collect()
}

pub fn autocorrelation_benchmark(c: &mut Criterion) {
    let signal = voice_like(4096);
    let (wmin, wmax) = ContourParams::default().windows(FRAME_RATE).unwrap();

    let mut normalized = NormalizedAutocorrelator::new();
    let mut fft = FftAutocorrelator::new();

    c.bench_function("Normalized autocorrelate", |b| {
        b.iter(|| normalized.autocorrelate(wmin, wmax, black_box(&signal[..]), 512))
    });

    c.bench_function("FFT autocorrelate", |b| {
        b.iter(|| fft.autocorrelate(wmin, wmax, black_box(&signal[..]), 512))
    });
}

pub fn psola_benchmark(c: &mut Criterion) {
    let signal = voice_like(FRAME_RATE);
    let params = ContourParams::default();

    c.bench_function("PitchContour load", |b| {
        b.iter(|| {
            let detector = FftAutocorrelator::new();
            let mut contour = PitchContour::with_detector(FRAME_RATE, &params, detector).unwrap();
            contour.load(black_box(&signal[..]));
            contour
        })
    });

    let mut contour = PitchContour::new(FRAME_RATE, &params).unwrap();
    contour.load(&signal);
    let resynth = Resynthesizer::new(FRAME_RATE, contour.wmin());

    c.bench_function("Resynthesizer resynthesize", |b| {
        b.iter(|| {
            let target = Transposed::semitones(&contour, 8);
            resynth.resynthesize(black_box(&signal[..]), &contour, target)
        })
    });
}

criterion_group!(benches, autocorrelation_benchmark, psola_benchmark);
criterion_main!(benches);
