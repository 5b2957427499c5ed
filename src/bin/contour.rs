use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use pitch_psola::cli::{self, USAGE_EXIT_CODE};
use pitch_psola::config::ContourParams;
use pitch_psola::contour::PitchContour;
use pitch_psola::io::PcmReader;
use pitch_psola::Pitch;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "contour".to_string());
    let male = ContourParams::default().with_range(75.0, 150.0);

    let options = match cli::parse(args, ContourParams::default(), male, false) {
        Some(options) if !options.paths.is_empty() => options,
        _ => {
            eprintln!(
                "usage: {program} [-M|-F] [-n pitchmin] [-m pitchmax] [-t threshold] wav ..."
            );
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("contour failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn read(path: &Path) -> anyhow::Result<(usize, Vec<f64>)> {
    let mut reader =
        PcmReader::open(path).with_context(|| format!("reading {}", path.display()))?;
    let frame_rate = reader.info().frame_rate;
    let samples = reader
        .read_frames(None)
        .with_context(|| format!("reading {}", path.display()))?;
    reader.close();
    Ok((frame_rate, samples))
}

/// Load every file into one contour, one after the other, and print its
/// pitch changes as `position hz` lines, `0` marking unvoiced stretches.
fn run(options: &cli::Options) -> anyhow::Result<()> {
    let mut paths = options.paths.iter();
    let Some(first) = paths.next() else {
        bail!("no input files");
    };

    let (frame_rate, samples) = read(first)?;
    let mut contour = PitchContour::new(frame_rate, &options.params)?;
    contour.load(&samples);

    for path in paths {
        let (rate, samples) = read(path)?;
        if rate != frame_rate {
            bail!(
                "{} has a frame rate of {rate}, expected {frame_rate}",
                path.display()
            );
        }
        contour.load(&samples);
    }

    for (pos, pitch) in contour.breakpoints() {
        match pitch {
            Pitch::Voiced(hz) => println!("{pos} {hz:.1}"),
            Pitch::Unvoiced => println!("{pos} 0"),
        }
    }
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
