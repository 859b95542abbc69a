use eframe::egui::{RichText, Ui};

use crate::data::aggregate::Summary;
use crate::format::{format_currency, format_thousands};

/// Four metric cards: sales, orders, quantity, average order value.
pub fn kpi_row(ui: &mut Ui, summary: &Summary, currency: &str) {
    let cards = [
        ("💰 Total Sales", format_currency(currency, summary.total_sales)),
        ("🧾 Total Orders", format_thousands(summary.total_orders as f64)),
        ("📦 Total Quantity", format_thousands(summary.total_quantity as f64)),
        ("📊 Avg Order Value", format_currency(currency, summary.avg_order_value)),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            col.group(|ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(title);
                ui.label(RichText::new(value).size(26.0).strong());
            });
        }
    });
}
