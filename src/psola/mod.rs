//! Pitch-synchronous overlap-add resynthesis.
//!
//! Grains two source periods long are cut around each source pitch mark,
//! stretched to the destination spacing, tapered with the halves of a Hanning
//! window and summed into the output. Neighbouring grains overlap over exactly
//! one half each, where the rising and falling halves add up to one.
use tracing::{info, trace};

use crate::float::Float;
use crate::pitch::PitchSource;
use crate::utils::buffer::{new_real_buffer, read_window};
use crate::utils::resample::stretch_nearest;
use crate::utils::vector::{ScalarOps, VectorOps};

pub mod schedule;

pub use schedule::{Grain, GrainSchedule};

pub struct Resynthesizer<V = ScalarOps> {
    frame_rate: usize,
    default_window: usize,
    ops: V,
}

impl Resynthesizer<ScalarOps> {
    /// `default_window` is the grain half-length used wherever the source or
    /// the target is unvoiced.
    pub fn new(frame_rate: usize, default_window: usize) -> Self {
        Self::with_ops(frame_rate, default_window, ScalarOps)
    }
}

impl<V> Resynthesizer<V> {
    pub fn with_ops(frame_rate: usize, default_window: usize, ops: V) -> Self {
        Resynthesizer {
            frame_rate,
            default_window: default_window.max(1),
            ops,
        }
    }

    pub fn default_window(&self) -> usize {
        self.default_window
    }

    /// The grains a signal of `len` samples is rebuilt from.
    pub fn schedule<T, S, D>(&self, len: usize, source: S, target: D) -> GrainSchedule<T, S, D>
    where
        T: Float,
        S: PitchSource<T>,
        D: PitchSource<T>,
    {
        GrainSchedule::new(len, self.frame_rate, self.default_window, source, target)
    }

    /// Rebuild `src` so its pitch follows `target`. `source` describes the
    /// pitch of `src` itself. The output has the length of `src`.
    pub fn resynthesize<T, S, D>(&self, src: &[T], source: S, target: D) -> Vec<T>
    where
        T: Float,
        S: PitchSource<T>,
        D: PitchSource<T>,
        V: VectorOps<T>,
    {
        let mut out = new_real_buffer(src.len());
        let mut grains = 0;
        for grain in self.schedule(src.len(), source, target) {
            trace!(?grain, "placing grain");
            self.render(src, &grain, &mut out);
            grains += 1;
        }
        info!(frames = src.len(), grains, "resynthesized");
        out
    }

    /// Add one grain to `out`. Samples falling outside `out` are dropped.
    pub fn render<T>(&self, src: &[T], grain: &Grain, out: &mut [T])
    where
        T: Float,
        V: VectorOps<T>,
    {
        let mark = grain.source as isize;
        let half = grain.source_half;

        let mut left = stretch_nearest(&read_window(src, mark - half as isize, half), grain.left);
        self.ops.multiply(&mut left, &self.ops.rising_half(grain.left));
        self.place(out, grain.center as isize - grain.left as isize, &left);

        let mut right = stretch_nearest(&read_window(src, mark, half), grain.right);
        self.ops.multiply(&mut right, &self.ops.falling_half(grain.right));
        self.place(out, grain.center as isize, &right);
    }

    fn place<T>(&self, out: &mut [T], start: isize, piece: &[T])
    where
        T: Float,
        V: VectorOps<T>,
    {
        let skip = (-start).max(0) as usize;
        let begin = start.max(0) as usize;
        if skip >= piece.len() || begin >= out.len() {
            return;
        }
        let count = (piece.len() - skip).min(out.len() - begin);
        self.ops
            .add(&mut out[begin..begin + count], &piece[skip..skip + count]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::Pitch;
    use approx::assert_abs_diff_eq;

    const FRAME_RATE: usize = 8000;

    /// The same pitch everywhere.
    struct Constant(Pitch<f64>);

    impl PitchSource<f64> for Constant {
        fn exact_at(&self, _pos: usize) -> Pitch<f64> {
            self.0
        }

        fn average_at(&self, _pos: usize) -> Pitch<f64> {
            self.0
        }
    }

    /// Voiced only inside a range.
    struct Window(std::ops::Range<usize>, f64);

    impl PitchSource<f64> for Window {
        fn exact_at(&self, pos: usize) -> Pitch<f64> {
            if self.0.contains(&pos) {
                Pitch::Voiced(self.1)
            } else {
                Pitch::Unvoiced
            }
        }

        fn average_at(&self, pos: usize) -> Pitch<f64> {
            self.exact_at(pos)
        }
    }

    #[test]
    fn unvoiced_schedule_steps_by_default_window() {
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let unvoiced = Constant(Pitch::Unvoiced);
        let grains: Vec<Grain> = resynth.schedule(1000, &unvoiced, &unvoiced).collect();

        assert_eq!(grains.len(), 50);
        for (k, grain) in grains.iter().enumerate() {
            assert_eq!(
                *grain,
                Grain {
                    source: 20 * k,
                    source_half: 20,
                    center: 20 * k,
                    left: 20,
                    right: 20
                }
            );
        }
    }

    #[test]
    fn cursors_end_past_the_last_grain() {
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let unvoiced = Constant(Pitch::Unvoiced);
        let mut schedule = resynth.schedule(1000, &unvoiced, &unvoiced);

        schedule.next();
        assert_eq!(schedule.source_position(), 0);
        assert_eq!(schedule.destination_position(), 20);

        assert_eq!(schedule.by_ref().count(), 49);
        assert_eq!(schedule.source_position(), 1000);
        assert_eq!(schedule.destination_position(), 1000);
        assert!(schedule.next().is_none());
    }

    #[test]
    fn target_is_read_for_every_grain() {
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let source = Constant(Pitch::Voiced(100.0));
        let target = Window(0..60, 200.0);
        let grains: Vec<Grain> = resynth.schedule(1000, &source, &target).collect();

        // The second source step places two grains; the target is unvoiced
        // by the time the second one lands.
        assert_eq!(
            grains[1],
            Grain {
                source: 80,
                source_half: 80,
                center: 40,
                left: 40,
                right: 40
            }
        );
        assert_eq!(
            grains[2],
            Grain {
                source: 80,
                source_half: 80,
                center: 80,
                left: 40,
                right: 20
            }
        );
    }

    #[test]
    fn near_zero_target_falls_back_to_default_window() {
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let source = Constant(Pitch::Voiced(100.0));
        let target = Constant(Pitch::Voiced(3e-6));
        let grains: Vec<Grain> = resynth.schedule(8000, &source, &target).collect();

        assert_eq!(grains.len(), 400);
        assert!(grains
            .iter()
            .all(|g| g.source_half == 20 && g.left == 20 && g.right == 20));

        let src: Vec<f64> = (0..8000).map(|i| (i % 80) as f64 / 80.0).collect();
        let out = resynth.resynthesize(&src, &source, &target);
        assert_eq!(out.len(), src.len());
    }

    #[test]
    fn raised_pitch_repeats_periods() {
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let source = Constant(Pitch::Voiced(100.0));
        let target = Constant(Pitch::Voiced(200.0));
        let grains: Vec<Grain> = resynth.schedule(8000, &source, &target).collect();

        // Twice as many grains as source periods, spaced one target period apart.
        assert_eq!(grains.len(), 2 * 8000 / 80 - 1);
        assert!(grains.windows(2).all(|g| g[1].center - g[0].center == 40));
        assert!(grains.iter().all(|g| g.source_half == 80 && g.right == 40));
    }

    #[test]
    fn lowered_pitch_skips_periods() {
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let source = Constant(Pitch::Voiced(100.0));
        let target = Constant(Pitch::Voiced(50.0));
        let grains: Vec<Grain> = resynth.schedule(8000, &source, &target).collect();

        assert_eq!(grains.len(), 50);
        assert!(grains.windows(2).all(|g| g[1].source - g[0].source == 160));
        assert!(grains.iter().all(|g| g.center == g.source));
    }

    #[test]
    fn destination_stays_within_a_grain_of_the_source() {
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        for target_hz in [60.0, 90.0, 100.0, 133.0, 310.0] {
            let source = Window(1000..6000, 100.0);
            let target = Window(1500..7000, target_hz);
            for grain in resynth.schedule(8000, &source, &target) {
                assert!(2 * grain.center < 2 * grain.source + grain.source_half);
                assert!(grain.source + grain.source_half <= 8000);
            }
        }
    }

    #[test]
    fn unvoiced_source_forces_default_window() {
        let resynth = Resynthesizer::new(FRAME_RATE, 25);
        let source = Window(0..100, 100.0);
        let target = Constant(Pitch::Voiced(200.0));
        let grains: Vec<Grain> = resynth.schedule(1000, &source, &target).collect();
        let after: Vec<&Grain> = grains.iter().filter(|g| g.source >= 100).collect();
        assert!(!after.is_empty());
        assert!(after
            .iter()
            .all(|g| g.source_half == 25 && g.right == 25));
    }

    #[test]
    fn unvoiced_resynthesis_is_identity_until_the_last_grain() {
        let src: Vec<f64> = (0..1000).map(|i| ((i * 7919) % 201) as f64 / 100.0 - 1.0).collect();
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let unvoiced = Constant(Pitch::Unvoiced);
        let out = resynth.resynthesize(&src, &unvoiced, &unvoiced);

        assert_eq!(out.len(), src.len());
        // The last grain is centered on 980 and fades out without a partner.
        for i in 0..980 {
            assert_abs_diff_eq!(out[i], src[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn render_clips_to_output() {
        let src = vec![1.0; 100];
        let resynth = Resynthesizer::new(FRAME_RATE, 20);
        let mut out = vec![0.0; 30];
        let grain = Grain {
            source: 50,
            source_half: 20,
            center: 10,
            left: 20,
            right: 30,
        };
        resynth.render(&src, &grain, &mut out);

        let rising: Vec<f64> = ScalarOps.rising_half(20);
        let falling: Vec<f64> = ScalarOps.falling_half(30);
        for i in 0..10 {
            assert_abs_diff_eq!(out[i], rising[i + 10], epsilon = 1e-12);
        }
        for i in 10..30 {
            assert_abs_diff_eq!(out[i], falling[i - 10], epsilon = 1e-12);
        }
    }
}
