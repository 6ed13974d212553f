use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use freefall_sim::analysis::FlightSummary;
use freefall_sim::config::{self, ScenarioConfig};
use freefall_sim::io::{csv, json};
use freefall_sim::io::json::NamedSummary;
use freefall_sim::projectile::presets;
use freefall_sim::sim::{run_batch, Flight, Method};
use freefall_sim::Projectile;

#[derive(Parser, Debug)]
#[command(version, about = "Free-fall of cylindrical bodies with drag, buoyancy and Coriolis")]
struct Args {
    /// JSON scenario file. Without one, drops the reference cylinder from 100 m in air.
    config: Option<PathBuf>,

    /// Override the integration method of the scenario.
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Write one CSV trajectory per projectile into this directory.
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Write the JSON summary of every run to this file.
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MethodArg {
    Euler,
    Rk4,
    Adaptive,
}

impl From<MethodArg> for Method {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Euler => Method::Euler,
            MethodArg::Rk4 => Method::Rk4,
            MethodArg::Adaptive => Method::Adaptive,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // -----------------------------------------------------------------------
    // Scenario
    // -----------------------------------------------------------------------
    let mut scenario = match &args.config {
        Some(path) => {
            info!("loading scenario {}", path.display());
            config::load(path)?.build()?
        }
        None => {
            let mut s = ScenarioConfig::default().build()?;
            s.projectiles.push(presets::reference_drop()?);
            s
        }
    };
    if let Some(m) = args.method {
        scenario.config.method = m.into();
    }
    if args.csv_dir.is_some() {
        scenario.output.csv_dir = args.csv_dir.clone();
    }
    if args.summary.is_some() {
        scenario.output.summary_json = args.summary.clone();
    }
    if scenario.projectiles.is_empty() {
        bail!("scenario defines no projectiles");
    }

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------
    let batch = run_batch(&scenario.projectiles, &scenario.environment, &scenario.config);

    let mut summaries = Vec::new();
    for (projectile, run) in scenario.projectiles.iter().zip(&batch.runs) {
        let flight = match &run.outcome {
            Ok(f) => f,
            Err(e) => {
                warn!("{}: {e}", run.name);
                continue;
            }
        };
        let summary = match FlightSummary::compute(
            &flight.trajectory,
            flight.valid_samples,
            &projectile.geometry,
            &scenario.environment,
        ) {
            Ok(s) => s,
            Err(e) => {
                warn!("{}: {e}", run.name);
                continue;
            }
        };
        if scenario.output.show_numerical_info {
            print_report(projectile, flight, &summary);
        }
        if let Some(dir) = &scenario.output.csv_dir {
            write_csv(dir, &run.name, flight)?;
        }
        summaries.push(NamedSummary {
            name: run.name.clone(),
            method: flight.method,
            summary,
        });
    }

    if summaries.is_empty() {
        bail!("every run failed");
    }

    if let Some(path) = &scenario.output.summary_json {
        json::write_summary_file(path, &summaries)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("summary written to {}", path.display());
    }

    println!("====================================================================");
    println!(
        "  Environment: {}  g={} m/s^2  rho={} kg/m^3  omega={:.3e} rad/s  lat={:.1} deg",
        scenario.preset.label(),
        scenario.environment.g(),
        scenario.environment.rho(),
        scenario.environment.omega(),
        scenario.environment.lat().to_degrees(),
    );
    println!(
        "  Simulation: {}, dt={} s, Tmax={} s, longest run {} samples",
        scenario.config.method.label(),
        scenario.config.dt,
        scenario.config.max_time,
        batch.max_valid_samples(),
    );
    println!("====================================================================");
    println!();
    Ok(())
}

fn print_report(projectile: &Projectile, flight: &Flight, s: &FlightSummary) {
    let geo = &projectile.geometry;
    println!();
    println!("====================================================================");
    println!("  FREE FALL: {}", projectile.name);
    println!("====================================================================");
    println!();
    println!("  Body");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Mass:          {:>10.3} kg    Volume:       {:>10.3e} m^3",
        geo.mass(),
        geo.volume()
    );
    println!(
        "  Section:       {:>10.3e} m^2   Cx:           {:>10.3}",
        geo.cross_section(),
        geo.drag_coefficient()
    );
    println!(
        "  Release alt:   {:>10.2} m     Release vel:  {:>10.2} m/s",
        projectile.initial.pos.z,
        projectile.initial.vel.norm()
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    let states = flight.trajectory.states();
    for e in flight.events() {
        let st = &states[e.index];
        println!(
            "  {:<9} t={:>8.3}s   alt={:>9.2}m   vel={:>8.2}m/s",
            format!("{:?}", e.kind).to_uppercase(),
            e.time,
            st.pos.z,
            st.vel.norm()
        );
    }
    match flight.impact {
        Some(imp) => println!(
            "  IMPACT    t={:>8.3}s   (interpolated)  vel={:>8.2}m/s",
            imp.time,
            imp.state.vel.norm()
        ),
        None => println!("  no ground contact before cutoff"),
    }
    println!();

    println!("  Numerical Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Samples:       {:>10}", s.samples);
    println!("  Fall time:     {:>10.3} s", s.flight_time);
    println!("  Apogee:        {:>10.2} m", s.apogee);
    println!("  Range:         {:>10.2} m", s.range);
    println!("  Final speed:   {:>10.2} m/s", s.impact_speed);
    println!("  Final KE:      {:>10.2} J", s.final_kinetic_energy);
    println!(
        "  Dissipated:    {:>10.2} J   (mechanical energy change {:+.2} J)",
        s.dissipated_work, s.mechanical_energy_change
    );
    println!();
}

fn write_csv(dir: &Path, name: &str, flight: &Flight) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let file: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let path = dir.join(format!("{file}.csv"));
    csv::write_trajectory_file(&path, &flight.trajectory, flight.valid_samples)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("{name}: trajectory written to {}", path.display());
    Ok(())
}
