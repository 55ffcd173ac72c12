//! AirGuard station: sample, score and export the live air-quality window.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use airguard_core::{
    time::SystemClock, Algorithm, Calibrator, LoopSettings, SamplingLoop, Sink, StopSignal,
    TemperatureUnit,
};
use airguard_station::{
    settings, ConsoleSink, JsonLinesSink, Overrides, SimulatedBme680, WatchdogSensor,
};
use anyhow::Context;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "airguard-station")]
#[command(about = "Sample a BME680, score air quality and export the live window")]
#[command(version = airguard_core::VERSION)]
struct Cli {
    /// JSON config file; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Establish the gas baseline with a burn-in of this many seconds
    #[arg(long, value_name = "SECS")]
    burn_in: Option<u64>,

    /// Use a pre-measured gas baseline instead of burning in
    #[arg(long, value_name = "OHMS", conflicts_with = "burn_in")]
    baseline: Option<f64>,

    /// Exit if burn-in sees no heat-stable reading
    #[arg(long)]
    no_fallback: bool,

    /// Scoring policy
    #[arg(long, value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// Report temperatures in Fahrenheit
    #[arg(long)]
    fahrenheit: bool,

    /// Samples kept per channel
    #[arg(long)]
    capacity: Option<usize>,

    /// Sampling period in milliseconds
    #[arg(long, value_name = "MS")]
    interval: Option<u64>,

    /// Append one JSON snapshot per tick to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Don't print a line per sample
    #[arg(long)]
    quiet: bool,

    /// Seed for the simulated sensor
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    /// Continuous distance from the humidity and gas baselines
    Weighted,
    /// Clipped piecewise thresholds
    Piecewise,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Weighted => Algorithm::WeightedBaseline,
            AlgorithmArg::Piecewise => Algorithm::PiecewiseThreshold,
        }
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            tick_interval_ms: self.interval,
            window_capacity: self.capacity,
            algorithm: self.algorithm.map(Algorithm::from),
            temperature_unit: self.fahrenheit.then_some(TemperatureUnit::Fahrenheit),
            burn_in_secs: self.burn_in,
            baseline_ohms: self.baseline,
            no_fallback: self.no_fallback,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = settings::resolve(cli.config.as_deref(), &cli.overrides())
        .context("loading configuration")?;

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.stop()).context("installing Ctrl+C handler")?;

    let clock = SystemClock::new();
    let sensor = SimulatedBme680::open(config.sensor, clock.clone(), cli.seed)
        .context("opening sensor")?;
    let mut sensor = WatchdogSensor::spawn(sensor, config.sensor_read_timeout_ms)
        .context("starting sensor worker")?;

    let baseline = Calibrator::new(&clock)
        .calibrate_or_fallback(config.calibration, config.calibration_fallback_ohms, &mut sensor)
        .context("calibrating gas baseline")?;

    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
    if !cli.quiet {
        sinks.push(Box::new(ConsoleSink::stdout()));
    }
    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("creating output file {}", path.display()))?;
        sinks.push(Box::new(JsonLinesSink::new(BufWriter::new(file))));
    }

    let mut sampler =
        SamplingLoop::new(baseline, sensor, sinks, &clock, LoopSettings::from(&config))
            .context("building sampling loop")?;

    let stats = sampler.run(&stop);
    log::info!(
        "{} ticks: {} appended, {} without data, {} unstable, {} sensor errors, {} sink errors",
        stats.ticks,
        stats.appended,
        stats.no_data,
        stats.unstable,
        stats.sensor_errors,
        stats.sink_errors
    );

    Ok(())
}
