use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

/// How many rejected rows are listed before the rest is summarised.
const MAX_LISTED_REJECTS: usize = 20;

// ---------------------------------------------------------------------------
// Left side panel – date range selection
// ---------------------------------------------------------------------------

/// Render the left panel: logo, date pickers and data-quality warnings.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered) ----
    let logo = egui::include_image!("../../assets/logo.png");
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add(
            egui::Image::new(logo)
                .max_width(ui.available_width() * 0.8)
                .max_height(120.0)
                .rounding(4.0),
        );
    });
    ui.add_space(4.0);

    ui.heading("Air Quality");
    ui.separator();

    let Some(selector) = state.selector else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.strong("Time range");
    let mut changed = false;
    egui::Grid::new("date_range")
        .num_columns(2)
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            changed |= ui
                .add(DatePickerButton::new(&mut state.start_date).id_salt("start_date"))
                .changed();
            ui.end_row();

            ui.label("To");
            changed |= ui
                .add(DatePickerButton::new(&mut state.end_date).id_salt("end_date"))
                .changed();
            ui.end_row();
        });
    ui.label(
        RichText::new(format!(
            "Available: {} – {}",
            selector.min_date, selector.max_date
        ))
        .small()
        .weak(),
    );

    if ui.button("Reset range").clicked() {
        state.reset_range();
    } else if changed {
        state.apply_range();
    }

    ui.separator();

    let Some(dataset) = &state.dataset else {
        return;
    };
    ui.label(format!(
        "{} hourly records from {} stations",
        dataset.len(),
        dataset.stations.len()
    ));

    if !dataset.rejected.is_empty() {
        ui.label(
            RichText::new(format!(
                "⚠ {} rows skipped: invalid date fields",
                dataset.rejected.len()
            ))
            .color(Color32::ORANGE),
        );
        egui::CollapsingHeader::new("Skipped rows")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                for issue in dataset.rejected.iter().take(MAX_LISTED_REJECTS) {
                    ui.label(RichText::new(issue.to_string()).small());
                }
                let rest = dataset.rejected.len().saturating_sub(MAX_LISTED_REJECTS);
                if rest > 0 {
                    ui.label(RichText::new(format!("… and {rest} more")).small().weak());
                }
            });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload source").clicked() {
                state.load_configured_source();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} records loaded", ds.len()));
            if let Some(pollution) = state.report.as_ref().and_then(|r| r.pollution.as_ref()) {
                ui.label(format!(
                    "{} {} readings after outlier removal",
                    pollution.retained.len(),
                    pollution.pollutant
                ));
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open air-quality data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.load_path(&path);
    }
}
