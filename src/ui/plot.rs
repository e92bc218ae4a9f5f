use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, MarkerShape, Plot, Points};

use crate::analysis::aggregate::{StationComparison, Statistic};
use crate::analysis::outliers::FilteredComparison;
use crate::color::ColorMap;
use crate::data::model::Pollutant;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;
const BOXPLOT_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render the title, comparison charts, boxplot and caption.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            let text = match &state.status_message {
                Some(msg) => RichText::new(msg).color(Color32::RED),
                None => RichText::new("No dataset loaded  (File → Reload source / Open…)"),
            };
            ui.heading(text);
        });
        return;
    }

    let fallback = ColorMap::new(&state.config.stations);
    let colors = state.color_map.as_ref().unwrap_or(&fallback);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(&state.config.title).size(28.0).strong());
            ui.add_space(8.0);

            match &state.report {
                None => {
                    let msg = state
                        .status_message
                        .as_deref()
                        .unwrap_or("Pick a date range in the sidebar.");
                    ui.label(RichText::new(msg).color(Color32::RED));
                }
                Some(report) => {
                    ui.label(format!("Selected period: {}", report.interval));
                    ui.add_space(8.0);

                    for (i, statistic) in report.comparison.statistics.iter().enumerate() {
                        comparison_chart(ui, i, *statistic, &report.comparison, colors);
                    }
                    reading_counts(ui, &report.comparison, &state.config.pollutants);

                    ui.separator();
                    ui.heading(format!(
                        "Highest {} air pollution levels per year",
                        state.config.outlier_pollutant
                    ));
                    match &report.pollution {
                        Some(pollution) => pollution_boxplot(ui, pollution, colors),
                        None => {
                            ui.label("No readings in the selected period.");
                        }
                    }

                    if !report.notices.is_empty() {
                        ui.separator();
                        for notice in &report.notices {
                            ui.label(
                                RichText::new(format!("⚠ {notice}")).color(Color32::ORANGE),
                            );
                        }
                    }
                }
            }

            ui.add_space(12.0);
            ui.label(RichText::new(&state.config.caption).small().weak());
        });
}

// ---------------------------------------------------------------------------
// Station comparison line charts
// ---------------------------------------------------------------------------

fn comparison_chart(
    ui: &mut Ui,
    index: usize,
    statistic: Statistic,
    comparison: &StationComparison,
    colors: &ColorMap,
) {
    ui.add_space(6.0);
    ui.strong(format!("{statistic} per year"));

    Plot::new(("comparison", index))
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(statistic.to_string())
        .x_axis_formatter(|mark, _range| whole_number(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (k, result) in comparison.results.iter().enumerate() {
                let points = comparison.series(statistic, result);
                if points.is_empty() {
                    continue;
                }
                let color = colors.color_for(&result.station);
                let shape = if k == 0 {
                    MarkerShape::Circle
                } else {
                    MarkerShape::Square
                };

                plot_ui.line(
                    Line::new(points.clone())
                        .name(&result.station)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(points)
                        .name(&result.station)
                        .color(color)
                        .shape(shape)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

/// Rows and non-missing readings behind every charted point.
fn reading_counts(ui: &mut Ui, comparison: &StationComparison, pollutants: &[Pollutant]) {
    egui::CollapsingHeader::new("Readings per year")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("reading_counts")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("Station");
                    ui.strong("Year");
                    ui.strong("Rows");
                    for pollutant in pollutants {
                        ui.strong(pollutant.to_string());
                    }
                    ui.end_row();

                    for result in &comparison.results {
                        for stats in result.years.values() {
                            ui.label(&result.station);
                            ui.label(stats.year.to_string());
                            ui.label(stats.rows.to_string());
                            for pollutant in pollutants {
                                let samples =
                                    stats.pollutants.get(pollutant).map_or(0, |p| p.samples);
                                ui.label(samples.to_string());
                            }
                            ui.end_row();
                        }
                    }
                });
        });
}

fn whole_number(value: f64) -> String {
    if (value - value.round()).abs() < 1e-6 {
        format!("{:.0}", value)
    } else {
        String::new()
    }
}

// ---------------------------------------------------------------------------
// Boxplot: one box per (year, station), dodged within each year
// ---------------------------------------------------------------------------

fn pollution_boxplot(ui: &mut Ui, pollution: &FilteredComparison, colors: &ColorMap) {
    ui.label(format!(
        "{} readings kept, {} removed as anomalies, {} missing",
        pollution.retained.len(),
        pollution.flagged.len(),
        pollution.missing
    ));

    let years = pollution.years();
    let mut stations: Vec<&String> = pollution.groups.keys().map(|(_, s)| s).collect();
    stations.sort();
    stations.dedup();

    let slot = 0.8 / stations.len().max(1) as f64;
    let axis_years = years.clone();

    Plot::new("pollution_boxplot")
        .height(BOXPLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(pollution.pollutant.to_string())
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            axis_years
                .get(i as usize)
                .map(|y| y.to_string())
                .unwrap_or_default()
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (j, station) in stations.iter().enumerate() {
                let color = colors.color_for(station);
                let offset = (j as f64 - (stations.len() as f64 - 1.0) / 2.0) * slot;

                let mut boxes = Vec::new();
                let mut outliers = Vec::new();
                for (x, year) in years.iter().enumerate() {
                    let Some(summary) = pollution.groups.get(&(*year, (*station).clone())) else {
                        continue;
                    };
                    let at = x as f64 + offset;
                    boxes.push(
                        BoxElem::new(
                            at,
                            BoxSpread::new(
                                summary.lower_whisker,
                                summary.q1,
                                summary.median,
                                summary.q3,
                                summary.upper_whisker,
                            ),
                        )
                        .name(format!("{station} {year} (n = {})", summary.count))
                        .box_width(slot * 0.9)
                        .whisker_width(slot * 0.5)
                        .fill(color.gamma_multiply(0.4))
                        .stroke(Stroke::new(1.0, color)),
                    );
                    outliers.extend(summary.outliers.iter().map(|v| [at, *v]));
                }

                plot_ui.box_plot(BoxPlot::new(boxes).name(station.as_str()).color(color));
                if !outliers.is_empty() {
                    plot_ui.points(Points::new(outliers).color(color).radius(1.5));
                }
            }
        });
}
