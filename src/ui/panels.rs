use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::data::filter::{Selection, ALL_LABEL};
use crate::data::stats::Metric;
use crate::data::{export, loader};
use crate::error::DashboardError;
use crate::state::{AppState, Message, Slot, ViewMode};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState, outbox: &mut Vec<Message>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Bestand", |ui: &mut Ui| {
            if ui.button("Opnieuw laden van URL").clicked() {
                outbox.push(reload_from_url(&state.config));
                ui.close_menu();
            }
            if ui.button("Lokaal bestand openen…").clicked() {
                outbox.extend(open_file_dialog());
                ui.close_menu();
            }
        });

        ui.separator();

        let can_download = state.view.as_ref().is_some_and(|v| !v.is_empty());
        if ui
            .add_enabled(can_download, egui::Button::new("📥 Download CSV"))
            .clicked()
        {
            outbox.extend(save_file_dialog(state));
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state.view.as_ref().map_or(0, |v| v.len());
            ui.label(format!("{} rijen geladen, {visible} zichtbaar", ds.len()));
        }
    });

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(format!("✅ {msg}")).color(Color32::from_rgb(40, 160, 70)));
    }
}

/// The single banner shown when a load, filter or export failed.
pub fn error_banner(ui: &mut Ui, err: &DashboardError) {
    ui.add_space(8.0);
    egui::Frame::group(ui.style())
        .fill(Color32::from_rgb(255, 235, 235))
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new(format!("❌ {err}")).color(Color32::DARK_RED).strong());
        });
}

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &AppState, outbox: &mut Vec<Message>) {
    ui.heading("🏘️ Huizenmarkt");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("Geen data geladen.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Weergave");
            let mut mode = state.mode;
            ui.radio_value(&mut mode, ViewMode::Single, "Eén gemeente");
            ui.radio_value(&mut mode, ViewMode::Comparison, "Vergelijk twee gemeenten");
            if mode != state.mode {
                outbox.push(Message::ModeChanged(mode));
            }
            ui.separator();

            match state.mode {
                ViewMode::Single => {
                    ui.strong("Selecteer een gemeente");
                    municipality_combo(ui, state, outbox);
                }
                ViewMode::Comparison => {
                    ui.strong("Eerste gemeente");
                    comparison_combo(ui, state, Slot::First, outbox);
                    ui.strong("Tweede gemeente");
                    comparison_combo(ui, state, Slot::Second, outbox);
                }
            }
            ui.separator();

            ui.strong("Grafiek");
            egui::ComboBox::from_id_salt("metric")
                .selected_text(state.metric.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for metric in Metric::ALL {
                        if ui
                            .selectable_label(state.metric == metric, metric.label())
                            .clicked()
                        {
                            outbox.push(Message::MetricChanged(metric));
                        }
                    }
                });
        });
}

fn municipality_combo(ui: &mut Ui, state: &AppState, outbox: &mut Vec<Message>) {
    egui::ComboBox::from_id_salt("municipality")
        .selected_text(state.selection.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(state.selection == Selection::All, ALL_LABEL)
                .clicked()
            {
                outbox.push(Message::MunicipalitySelected(Selection::All));
            }
            for name in &state.municipalities {
                let selected = matches!(&state.selection, Selection::One(n) if n == name);
                if ui.selectable_label(selected, name).clicked() {
                    outbox.push(Message::MunicipalitySelected(Selection::One(name.clone())));
                }
            }
        });
}

fn comparison_combo(ui: &mut Ui, state: &AppState, slot: Slot, outbox: &mut Vec<Message>) {
    let (id, current) = match slot {
        Slot::First => ("compare_first", state.comparison[0].as_deref()),
        Slot::Second => ("compare_second", state.comparison[1].as_deref()),
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or("–"))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &state.municipalities {
                if ui
                    .selectable_label(current == Some(name.as_str()), name)
                    .clicked()
                {
                    outbox.push(Message::ComparisonSelected(slot, name.clone()));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

/// Fetch the configured URL. Blocks until the request completes or times out.
pub fn reload_from_url(config: &DashboardConfig) -> Message {
    Message::DatasetLoaded {
        source: config.data_url.clone(),
        result: loader::load(&config.data_url, config.request_timeout()),
    }
}

pub fn open_file_dialog() -> Option<Message> {
    let path = rfd::FileDialog::new()
        .set_title("Woningdata openen")
        .add_filter("Ondersteunde bestanden", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()?;

    Some(Message::DatasetLoaded {
        source: path.display().to_string(),
        result: loader::load_file(&path),
    })
}

/// Ask where to save the current view and write it there.
pub fn save_file_dialog(state: &AppState) -> Option<Message> {
    let view = state.view.as_ref()?;
    let path = rfd::FileDialog::new()
        .set_title("CSV opslaan")
        .set_file_name(state.download_file_name())
        .add_filter("CSV", &["csv"])
        .save_file()?;

    Some(Message::Exported(export::write_csv(view, &path).map(|()| path)))
}
