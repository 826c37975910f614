use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gaze_core::{GazeOutput, RawMeasurement, Real};
use gaze_linear::{CalibrationPair, FitStats, PolynomialCalibrator};
use gaze_pipeline::{GazeEvent, GazeMapper, MapperConfig};
use log::info;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Gaze calibration and replay tool.
#[derive(Debug, Parser)]
#[command(author, version, about = "Gaze calibration fitting and replay")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fit a polynomial calibration from averaged (raw, target) pairs.
    Fit {
        /// JSON array of `{"raw": [x, y], "target": [x, y]}`.
        #[arg(long)]
        pairs: PathBuf,
        /// Where to write the calibration blob.
        #[arg(long)]
        output: PathBuf,
        /// Ridge regularization strength.
        #[arg(long)]
        alpha: Option<Real>,
    },
    /// Run recorded frames through the mapping pipeline.
    Replay {
        /// JSON array of `{"timestamp": t, "raw": [x, y], "valid": true}`.
        #[arg(long)]
        recording: PathBuf,
        /// Optional MapperConfig JSON. Defaults are used if omitted.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Optional calibration blob loaded before the first frame.
        #[arg(long)]
        calibration: Option<PathBuf>,
        /// Start a calibration session before the first frame.
        #[arg(long)]
        calibrate: bool,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct FitReport {
    pairs: usize,
    alpha: Real,
    stats: FitStats,
    output: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReplayReport {
    frames: usize,
    valid_outputs: usize,
    calibrated: bool,
    quality: Option<Real>,
    outputs: Vec<GazeOutput>,
    events: Vec<GazeEvent>,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

fn run_fit(pairs_path: &Path, output: &Path, alpha: Option<Real>) -> Result<FitReport> {
    let pairs: Vec<CalibrationPair> = load_json_file(pairs_path)?;
    let mut calibrator = PolynomialCalibrator::default();
    if let Some(alpha) = alpha {
        calibrator.set_alpha(alpha);
    }
    let stats = calibrator.fit_pairs(&pairs)?;
    calibrator
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(FitReport {
        pairs: pairs.len(),
        alpha: calibrator.alpha(),
        stats,
        output: output.to_path_buf(),
    })
}

fn run_replay(
    recording: &Path,
    config_path: Option<&Path>,
    calibration: Option<&Path>,
    calibrate: bool,
) -> Result<ReplayReport> {
    let frames: Vec<RawMeasurement> = load_json_file(recording)?;
    let config = match config_path {
        Some(path) => MapperConfig::from_json_file(path)?,
        None => MapperConfig::default(),
    };

    let mut mapper = GazeMapper::new(config)?;
    if let Some(path) = calibration {
        mapper.load_calibration(path)?;
    }
    if calibrate && !mapper.start_calibration() {
        bail!("could not start calibration");
    }

    let outputs: Vec<GazeOutput> = frames.iter().map(|m| mapper.process(m)).collect();
    let valid_outputs = outputs.iter().filter(|o| o.valid).count();
    info!(
        "replayed {} frames, {} valid outputs",
        frames.len(),
        valid_outputs
    );

    Ok(ReplayReport {
        frames: frames.len(),
        valid_outputs,
        calibrated: mapper.is_calibrated(),
        quality: mapper.calibration_quality(),
        outputs,
        events: mapper.drain_events(),
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gaze=info"));
    // Logs go to stderr so stdout stays valid JSON.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let json = match args.command {
        Command::Fit {
            pairs,
            output,
            alpha,
        } => serde_json::to_string_pretty(&run_fit(&pairs, &output, alpha)?)?,
        Command::Replay {
            recording,
            config,
            calibration,
            calibrate,
        } => serde_json::to_string_pretty(&run_replay(
            &recording,
            config.as_deref(),
            calibration.as_deref(),
            calibrate,
        )?)?,
    };
    println!("{json}");
    Ok(())
}
