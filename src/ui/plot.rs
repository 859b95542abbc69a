use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::ColorMap;
use crate::format::format_thousands;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Sales charts (central panel)
// ---------------------------------------------------------------------------

/// Render "Sales by City" and "Sales by Item" side by side.
pub fn sales_charts(ui: &mut Ui, state: &AppState) {
    ui.columns(2, |cols| {
        cols[0].heading("Sales by City");
        ranked_bar_chart(
            &mut cols[0],
            "sales_by_city",
            &state.summary.sales_by_city,
            &state.city_colors,
        );

        cols[1].heading("Sales by Item");
        ranked_bar_chart(
            &mut cols[1],
            "sales_by_item",
            &state.summary.sales_by_item,
            &state.item_colors,
        );
    });
}

/// One bar per group, in the order given (largest first).
fn ranked_bar_chart(ui: &mut Ui, id: &str, groups: &[(String, f64)], colors: &ColorMap) {
    if groups.is_empty() {
        ui.label("No sales in the selected range.");
    }

    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, (name, total))| {
            Bar::new(i as f64, *total)
                .name(name)
                .fill(colors.color_for(name))
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = groups.iter().map(|(name, _)| name.clone()).collect();

    Plot::new(id)
        .height(280.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .y_axis_formatter(|mark: GridMark, _range| format_thousands(mark.value))
        .include_y(0.0)
        .show(ui, |plot_ui| {
            let chart = BarChart::new(bars).element_formatter(Box::new(
                |bar: &Bar, _chart: &BarChart| {
                    format!("{}\n{}", bar.name, format_thousands(bar.value))
                },
            ));
            plot_ui.bar_chart(chart);
        });

    ui.add_space(8.0);
}

/// Axis label for a grid mark: the category name on whole positions only.
fn category_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}
