use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use imu_calibrator::pipeline::DEFAULT_SAMPLE_SIZE;
use imu_calibrator::reader::{open_input, read_samples};
use imu_calibrator::report::{progress_line, CalibrationReport};
use imu_calibrator::{Calibrator, CalibratorConfig, EstimatorConfig, RankRounding, TunerConfig};

#[derive(Parser, Debug)]
#[command(name = "imu_calibrator")]
#[command(about = "Fit per-axis offset and scale so raw sensor readings land on the unit sphere", long_about = None)]
struct Args {
    /// Raw readings, one "x y z" per line (.gz accepted). Reads stdin when omitted
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Target subsample size for the fast tuning pass
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: usize,

    /// Percentile used for the initial per-axis minimum
    #[arg(long, default_value = "1.0")]
    low_percentile: f64,

    /// Percentile used for the initial per-axis maximum
    #[arg(long, default_value = "99.0")]
    high_percentile: f64,

    /// Round percentile ranks to the nearest index instead of flooring
    #[arg(long, default_value_t = false)]
    nearest_rank: bool,

    /// Drop repeated readings before fitting
    #[arg(long, default_value_t = false)]
    unique: bool,

    /// Maximum sweeps per tuning pass (0 = unbounded)
    #[arg(long, default_value = "1000")]
    max_sweeps: usize,

    /// Maximum steps along one parameter per search (0 = unbounded)
    #[arg(long, default_value = "100000")]
    max_steps: usize,

    /// Write a JSON report of the fit to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Prefix progress lines with the tuning phase
    #[arg(long, short)]
    verbose: bool,

    /// Suppress progress lines
    #[arg(long, short)]
    quiet: bool,
}

impl Args {
    fn calibrator_config(&self) -> CalibratorConfig {
        let cap = |n: usize| if n == 0 { None } else { Some(n) };
        CalibratorConfig {
            sample_size: self.sample_size,
            unique: self.unique,
            estimator: EstimatorConfig {
                low_percentile: self.low_percentile,
                high_percentile: self.high_percentile,
                rounding: if self.nearest_rank {
                    RankRounding::Nearest
                } else {
                    RankRounding::Floor
                },
            },
            tuner: TunerConfig {
                max_sweeps: cap(self.max_sweeps),
                max_steps: cap(self.max_steps),
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = args.calibrator_config();

    let source = args
        .input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    let reader = open_input(args.input.as_deref()).with_context(|| format!("opening {}", source))?;
    let samples = read_samples(reader).with_context(|| format!("reading samples from {}", source))?;
    log::info!("loaded {} samples from {}", samples.len(), source);

    let outcome = Calibrator::new(config)
        .run(&samples, |phase, model| {
            if !args.quiet {
                eprintln!("{}", progress_line(phase, model, args.verbose));
            }
        })
        .context("calibration failed")?;

    if !outcome.full_pass.converged {
        log::warn!("full pass hit the sweep cap; result may not be a fixed point");
    }

    println!("{}", outcome.params());

    if let Some(path) = args.report.as_ref() {
        let report = CalibrationReport::new(&outcome, &config);
        report
            .save(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        log::info!("report written to {}", path.display());
    }

    Ok(())
}
