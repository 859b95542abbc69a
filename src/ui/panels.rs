use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, banner: Option<&str>) {
    // ---- Banner (centered) ----
    if let Some(uri) = banner {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(ui.available_width())
                    .max_height(140.0)
                    .rounding(4.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading("Filter Options");
    ui.separator();

    // Copy out what we need so we can mutate state while drawing.
    let (Some(dataset), Some(criteria)) = (state.dataset.clone(), state.criteria.clone()) else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date window ----
            ui.strong("Start Date");
            let mut start = criteria.start_date;
            if ui
                .add(DatePickerButton::new(&mut start).id_salt("start_date"))
                .changed()
            {
                state.set_start_date(start);
            }

            ui.strong("End Date");
            let mut end = criteria.end_date;
            if ui
                .add(DatePickerButton::new(&mut end).id_salt("end_date"))
                .changed()
            {
                state.set_end_date(end);
            }

            if let Some((lo, hi)) = dataset.date_bounds {
                ui.small(format!("Data covers {lo} to {hi}"));
            }
            if let Some(warning) = state.range_warning() {
                ui.label(RichText::new(warning).color(Color32::from_rgb(230, 160, 40)));
            }
            ui.separator();

            // ---- City multi-select ----
            let n_selected = criteria.cities.len();
            let header_text = if n_selected == 0 {
                format!("Select City  (all {})", dataset.cities.len())
            } else {
                format!("Select City  ({n_selected}/{})", dataset.cities.len())
            };

            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("city_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_cities();
                    }
                    for city in &dataset.cities {
                        let mut checked = criteria.cities.contains(city);
                        if ui.checkbox(&mut checked, city.as_str()).changed() {
                            state.toggle_city(city);
                        }
                    }
                });

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });
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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} shown",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.small("© 2024 AFRA Fashion | Built with egui");
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_path(path);
    }
}
