use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::state::{AppState, Message, ViewMode};
use crate::ui::{charts, map, metrics, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    /// Build the app and perform the first (blocking) fetch.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        let first_load = panels::reload_from_url(&state.config);
        state.handle(first_load);
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut outbox: Vec<Message> = Vec::new();
        let state = &self.state;

        // ---- Top panel: menu bar + banner ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, state, &mut outbox);
        });

        // ---- Left side panel: selections ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, state, &mut outbox);
            });

        // ---- Central panel: cards, charts, map, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, state, &mut outbox);
        });

        if !outbox.is_empty() {
            for msg in outbox {
                self.state.handle(msg);
            }
            ctx.request_repaint();
        }
    }
}

fn dashboard(ui: &mut Ui, state: &AppState, outbox: &mut Vec<Message>) {
    if let Some(err) = &state.error {
        panels::error_banner(ui, err);
        return;
    }
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Geen data. Laad opnieuw via Bestand → Opnieuw laden van URL");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match (state.mode, state.comparison_pair()) {
                (ViewMode::Comparison, Some((first, second))) => {
                    metrics::comparison_cards(ui, view, first, second);
                    ui.separator();
                    charts::comparison_bars(ui, view, first, second);
                }
                _ => {
                    metrics::single_cards(ui, state, view);
                    ui.separator();
                    charts::metric_bars(ui, state, view);
                    ui.separator();
                    charts::metric_histogram(ui, state, view);
                }
            }
            ui.separator();
            map::scatter_map(ui, state, view);
            ui.separator();
            table::data_table(ui, state, view, outbox);
        });
}
