//! Headless orbital simulation
//!
//! Loads a scenario (or generates a random disk), advances it frame by frame
//! with time acceleration and logs conservation diagnostics along the way.

mod scenario;

use anyhow::{Context, Result};
use clap::Parser;
use orbits_simulation::{
    velocity_residual, Diagnose, Dynamics, Report, Simulation, SimulationParams, State, Trail,
};
use scenario::{Initial, Scenario, ScenarioConfig};
use std::path::PathBuf;

/// Scale applied to trail points (1 render unit = 1 Gm)
const TRAIL_SCALE: f64 = 1e-9;

#[derive(Parser, Debug)]
#[command(version, about = "Fixed-step RK4 N-body and softbody simulation")]
struct Args {
    /// Scenario file (YAML)
    #[arg(default_value = "scenarios/solar_system.yaml")]
    scenario: PathBuf,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Log a diagnostics report every N frames
    #[arg(short, long, default_value_t = 60)]
    report_every: u64,

    /// Override the scenario's simulated seconds per wall-clock second
    #[arg(short, long)]
    time_scale: Option<f64>,

    /// Override the scenario's longest integration step
    #[arg(long)]
    max_step: Option<f64>,

    /// Ignore the scenario file and generate a disk of N bodies
    #[arg(long)]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long)]
    seed: Option<u64>,

    /// Body to follow and trace
    #[arg(long)]
    follow: Option<usize>,

    /// Number of points kept in the followed body's trail
    #[arg(long, default_value_t = 200)]
    trail: usize,
}

fn load(args: &Args) -> Result<Scenario> {
    let mut scenario = match args.random {
        Some(count) => scenario::random_disk(count, args.seed)
            .context("Failed to generate random disk")?,
        None => ScenarioConfig::load(&args.scenario)
            .and_then(ScenarioConfig::build)
            .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?,
    };

    if let Some(time_scale) = args.time_scale {
        scenario.params.time_scale = time_scale;
    }
    if let Some(max_step) = args.max_step {
        scenario.params.max_step = Some(max_step);
    }
    Ok(scenario)
}

fn log_report(frame: u64, sim_time: f64, report: &Report, initial_energy: f64) {
    let energy = report.total_energy();
    let drift = if initial_energy != 0.0 {
        (energy - initial_energy) / initial_energy.abs()
    } else {
        energy
    };
    log::info!(
        "frame {:>6} t={:.4e}s |p|={:.4e} E={:.6e} drift={:+.3e} com=({:.3e}, {:.3e}, {:.3e})",
        frame,
        sim_time,
        report.momentum.length(),
        energy,
        drift,
        report.center_of_mass.x,
        report.center_of_mass.y,
        report.center_of_mass.z,
    );
    if !report.finite {
        log::warn!("State is no longer finite at frame {}", frame);
    }
}

fn run<S, D>(
    mut sim: Simulation<S, D>,
    names: &[String],
    params: &SimulationParams,
    frame_dt: f64,
    args: &Args,
) where
    S: State + Diagnose,
    D: Dynamics<S>,
{
    let mut trail = args.follow.map(|i| Trail::new(i, args.trail, TRAIL_SCALE));
    if let Some(i) = args.follow {
        match names.get(i) {
            Some(name) => log::info!("Following {} (body {})", name, i),
            None => log::warn!("Follow index {} out of range ({} bodies)", i, names.len()),
        }
    }

    let initial = sim.state().report();
    log_report(0, 0.0, &initial, initial.total_energy());

    for frame in 1..=args.frames {
        let previous = args
            .follow
            .and_then(|i| sim.state().bodies().get(i))
            .map(|b| b.position);
        let substeps = sim.advance(frame_dt, params);

        if let Some(trail) = trail.as_mut() {
            trail.record_from(sim.state().bodies());
        }

        if frame % args.report_every.max(1) == 0 {
            let report = sim.state().report();
            log_report(frame, sim.elapsed(), &report, initial.total_energy());

            if let (Some(previous), Some(body)) = (
                previous,
                args.follow.and_then(|i| sim.state().bodies().get(i)),
            ) {
                let residual = velocity_residual(previous, body, frame_dt * params.time_scale);
                log::debug!(
                    "velocity residual {:.3e} m/s over {} substeps",
                    residual.length(),
                    substeps
                );
            }
        }
    }

    log::info!(
        "✓ Simulated {:.4e}s in {} steps",
        sim.elapsed(),
        sim.steps()
    );
    for (name, body) in names.iter().zip(sim.state().bodies()) {
        log::info!(
            "  {:<12} pos=({:.4e}, {:.4e}, {:.4e}) |v|={:.4e}",
            name,
            body.position.x,
            body.position.y,
            body.position.z,
            body.velocity.length()
        );
    }
    if let Some(trail) = trail {
        if let Some(latest) = trail.latest() {
            log::info!(
                "  trail of body {}: {} points, latest ({:.3}, {:.3}, {:.3})",
                trail.body(),
                trail.len(),
                latest.x,
                latest.y,
                latest.z
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let scenario = load(&args)?;

    log::info!(
        "✓ Loaded {} bodies (time scale {}, max step {:?})",
        scenario.names.len(),
        scenario.params.time_scale,
        scenario.params.max_step
    );

    match scenario.initial {
        Initial::Particles(system) => {
            #[cfg(feature = "parallel")]
            let sim = Simulation::with_model(system, orbits_simulation::Gravitation::parallel());
            #[cfg(not(feature = "parallel"))]
            let sim = Simulation::new(system);
            run(sim, &scenario.names, &scenario.params, scenario.frame_dt, &args);
        }
        Initial::Softbody(softbody) => {
            log::info!("✓ {} links", softbody.links().len());
            run(
                Simulation::new(softbody),
                &scenario.names,
                &scenario.params,
                scenario.frame_dt,
                &args,
            );
        }
    }

    Ok(())
}
