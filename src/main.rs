//! Protostellar Accretion Simulation
//!
//! Headless runner: steps the disk for a fixed number of frames and logs the
//! active particle count that a renderer would display.

use std::process::ExitCode;
use std::time::Instant;

use accretion_simulation::{Simulation, SimulationError, SimulationParams};

const DEFAULT_FRAMES: u64 = 600;
const REPORT_INTERVAL: u64 = 60;

struct Args {
    config_path: Option<String>,
    frames: u64,
    seed: Option<u64>,
}

fn usage() -> &'static str {
    "usage: accretion [CONFIG.json] [--frames N] [--seed S]"
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: None,
        frames: DEFAULT_FRAMES,
        seed: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--frames" => {
                let value = iter.next().ok_or("--frames needs a value")?;
                args.frames = value
                    .parse()
                    .map_err(|e| format!("invalid --frames {value:?}: {e}"))?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = Some(
                    value
                        .parse()
                        .map_err(|e| format!("invalid --seed {value:?}: {e}"))?,
                );
            }
            "-h" | "--help" => return Err(usage().to_string()),
            other if other.starts_with('-') => {
                return Err(format!("unknown option {other}\n{}", usage()));
            }
            path => args.config_path = Some(path.to_string()),
        }
    }

    Ok(args)
}

fn load_params(args: &Args) -> Result<SimulationParams, SimulationError> {
    let mut params = match &args.config_path {
        Some(path) => {
            log::info!("Loading parameters from {}", path);
            SimulationParams::from_json_file(path)?
        }
        None => SimulationParams::default(),
    };
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    Ok(params)
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let params = load_params(args)?;
    log::debug!("Effective parameters:\n{}", params.to_json_string()?);
    let mut simulation = Simulation::new(params)?;

    let started = Instant::now();
    let mut total_merges = 0usize;
    for _ in 0..args.frames {
        let report = simulation.step();
        total_merges += report.merges.len();

        if report.frame % REPORT_INTERVAL == 0 {
            log::info!(
                "frame {:>5}: {} active particles",
                report.frame,
                report.active_count
            );
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    log::info!("✓ Finished {} frames in {:.2}s", simulation.frame(), elapsed);
    log::info!("  Active particles: {}", simulation.active_count());
    log::info!("  Merges: {}", total_merges);
    log::info!("  Mass units: {}", simulation.total_mass_units());
    if let Some((index, merge_count)) = simulation.largest_body() {
        log::info!("  Largest body: slot {} with {} mass units", index, merge_count);
    }
    log::info!("  Disk kinetic energy: {:.3e}", simulation.kinetic_energy());

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting protostellar accretion simulation...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
