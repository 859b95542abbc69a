use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::loader::REQUIRED_COLUMNS;
use crate::format::{format_amount, format_timestamp};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Render the filtered rows with every column of the source file.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        return;
    };
    let dataset = view.dataset();

    if view.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    let headers: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .chain(dataset.extra_columns.iter().map(String::as_str))
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(70.0), headers.len())
        .max_scroll_height(420.0)
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for name in &headers {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            let indices = view.indices();
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let tx = &dataset.rows[indices[row.index()]];
                row.col(|ui| {
                    ui.label(tx.invoice_id.as_str());
                });
                row.col(|ui| {
                    ui.label(format_timestamp(tx.date));
                });
                row.col(|ui| {
                    ui.label(tx.city.as_str());
                });
                row.col(|ui| {
                    ui.label(tx.item.as_str());
                });
                row.col(|ui| {
                    ui.label(tx.quantity.to_string());
                });
                row.col(|ui| {
                    ui.label(format_amount(tx.total_price));
                });
                for value in &tx.extra {
                    row.col(|ui| {
                        ui.label(value.to_string());
                    });
                }
            });
        });
}
