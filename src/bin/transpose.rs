use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use pitch_psola::cli::{self, USAGE_EXIT_CODE};
use pitch_psola::config::{ContourParams, TransposeConfig};
use pitch_psola::transpose::Transposer;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "transpose".to_string());
    let defaults = ContourParams::default().with_threshold(0.9);

    let Some(options) = cli::parse(args, defaults, ContourParams::male(), true) else {
        return usage(&program);
    };
    let [input, output]: [PathBuf; 2] = match options.paths.try_into() {
        Ok(paths) => paths,
        Err(_) => return usage(&program),
    };

    let config = TransposeConfig {
        params: options.params,
        semitones: options.semitones.unwrap_or(TransposeConfig::default().semitones),
        default_window: None,
    };
    match run(config, &input, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("transpose failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: TransposeConfig, input: &Path, output: &Path) -> anyhow::Result<()> {
    let info = Transposer::new(config)
        .transpose_file(input, output)
        .with_context(|| format!("transposing {}", input.display()))?;
    tracing::info!(
        frames = info.frame_count,
        frame_rate = info.frame_rate,
        semitones = config.semitones,
        "wrote {}",
        output.display()
    );
    Ok(())
}

fn usage(program: &str) -> ExitCode {
    eprintln!(
        "usage: {program} [-M|-F] [-n pitchmin] [-m pitchmax] [-t threshold] [-d delta] \
         input.wav output.wav"
    );
    ExitCode::from(USAGE_EXIT_CODE)
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
