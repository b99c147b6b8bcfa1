use eframe::egui::{self, ScrollArea};

use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HousingDashboardApp {
    pub state: AppState,
}

impl HousingDashboardApp {
    pub fn new() -> Self {
        Self {
            state: AppState::with_default_file(),
        }
    }
}

impl eframe::App for HousingDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: income filter ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map, scatter, statistics ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("California Housing Dashboard");

            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to view housing data  (File → Open…)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    map::map_view(ui, &mut self.state);

                    ui.add_space(8.0);
                    ui.heading("Median Income vs Median House Value");
                    plot::scatter_plot(ui, &self.state);

                    ui.add_space(8.0);
                    ui.heading("Summary Statistics for Filtered Data");
                    table::summary_table(ui, &self.state.summary);
                });
        });
    }
}
