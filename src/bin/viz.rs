use anyhow::{anyhow, Result};
use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use freefall_sim::analysis::{extract, space_curve, FlightSummary, Quantity};
use freefall_sim::config::{self, Scenario, ScenarioConfig};
use freefall_sim::projectile::presets;
use freefall_sim::sim::run_batch;

/// Plot-ready data of one successful run.
struct RunPlot {
    name: String,
    summary: FlightSummary,
    panels: Vec<(Quantity, Vec<[f64; 2]>)>,
    /// Horizontal distance versus altitude, for the overview panel.
    profile: Vec<[f64; 2]>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => config::load(path)?.build()?,
        None => {
            let mut s = ScenarioConfig::default().build()?;
            s.projectiles.push(presets::reference_drop()?);
            s
        }
    };
    let runs = prepare(&scenario);
    if runs.is_empty() {
        return Err(anyhow!("no run succeeded, nothing to plot"));
    }

    let app = FreefallViz {
        runs,
        selected: Quantity::ALL[2],
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Free Fall Simulator", options, Box::new(|_| Ok(Box::new(app))))
        .map_err(|e| anyhow!("viewer failed: {e}"))
}

fn prepare(scenario: &Scenario) -> Vec<RunPlot> {
    let batch = run_batch(&scenario.projectiles, &scenario.environment, &scenario.config);
    let env = &scenario.environment;

    scenario
        .projectiles
        .iter()
        .zip(&batch.runs)
        .filter_map(|(p, run)| {
            let flight = run.outcome.as_ref().ok()?;
            let n = flight.valid_samples;
            let step = (n / 2000).max(1);
            let summary = FlightSummary::compute(&flight.trajectory, n, &p.geometry, env).ok()?;
            let panels = Quantity::ALL
                .iter()
                .map(|&q| {
                    let series = extract(q, &flight.trajectory, n, &p.geometry, env);
                    (q, series.points().into_iter().step_by(step).collect())
                })
                .collect();
            let curve = space_curve(&flight.trajectory, n);
            let profile = curve
                .x
                .iter()
                .zip(&curve.y)
                .zip(&curve.z)
                .map(|((x, y), z)| [x.hypot(*y), *z])
                .step_by(step)
                .collect();
            Some(RunPlot {
                name: run.name.clone(),
                summary,
                panels,
                profile,
            })
        })
        .collect()
}

struct FreefallViz {
    runs: Vec<RunPlot>,
    selected: Quantity,
}

impl eframe::App for FreefallViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            for run in &self.runs {
                let s = &run.summary;
                ui.label(format!(
                    "{}:  apogee {:.2} m  |  fall {:.3} s  |  final speed {:.2} m/s  |  dissipated {:.2} J",
                    run.name, s.apogee, s.flight_time, s.impact_speed, s.dissipated_work,
                ));
            }
        });

        egui::SidePanel::left("quantities").show(ctx, |ui| {
            ui.heading("Quantity");
            for q in Quantity::ALL {
                ui.selectable_value(&mut self.selected, q, q.labels().title);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let labels = self.selected.labels();
            let selected = self.selected;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(&labels.title);
                    Plot::new("selected")
                        .width(available.x * 0.6)
                        .height(available.y - 24.0)
                        .x_axis_label(labels.x.clone())
                        .y_axis_label(labels.y.clone())
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for run in &self.runs {
                                if let Some((_, pts)) = run.panels.iter().find(|(q, _)| *q == selected) {
                                    plot_ui.line(Line::new(run.name.clone(), PlotPoints::from(pts.clone())));
                                }
                            }
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Altitude versus horizontal distance");
                    Plot::new("profile")
                        .width(available.x * 0.4 - 16.0)
                        .height(available.y - 24.0)
                        .x_axis_label("horizontal distance (m)")
                        .y_axis_label("z (m)")
                        .data_aspect(1.0)
                        .legend(Legend::default())
                        .show(ui, |plot_ui| {
                            for run in &self.runs {
                                plot_ui.line(Line::new(run.name.clone(), PlotPoints::from(run.profile.clone())));
                            }
                        });
                });
            });
        });
    }
}
