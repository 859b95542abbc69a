use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{kpi, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    /// `file://` URI of the banner, if the image exists.
    banner: Option<String>,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        let banner = if config.banner_path.exists() {
            let path = std::fs::canonicalize(&config.banner_path)
                .unwrap_or_else(|_| config.banner_path.clone());
            Some(format!("file://{}", path.display()))
        } else {
            log::warn!("Banner {} not found, skipping", config.banner_path.display());
            None
        };

        Self {
            state: AppState::new(config),
            banner,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, self.banner.as_deref());
            });

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    report(ui, &self.state);
                });
        });
    }
}

fn report(ui: &mut Ui, state: &AppState) {
    ui.heading(state.config.title.as_str());
    ui.label("Professional & Interactive Business Intelligence Report");
    ui.separator();

    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No sales data loaded  (File → Open…)");
        });
        return;
    }

    kpi::kpi_row(ui, &state.summary, &state.config.currency_symbol);
    ui.separator();

    ui.heading("📈 Sales Insights");
    plot::sales_charts(ui, state);
    ui.separator();

    ui.heading("📋 Filtered Sales Data");
    table::data_table(ui, state);
}
