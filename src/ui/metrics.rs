use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::ColorMap;
use crate::data::filter::{filter_by_municipality, first_row, Selection};
use crate::data::model::Dataset;
use crate::data::stats::{self, Metric};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn card(ui: &mut Ui, title: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).small());
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

fn format_opt(metric: Metric, value: Option<f64>) -> String {
    value.map_or_else(|| "n.v.t.".to_string(), |v| metric.format(v))
}

/// Cards for the single-municipality view.
///
/// With "Alle" selected the cards show dataset averages (population is
/// summed); with one municipality they show its first row.
pub fn single_cards(ui: &mut Ui, state: &AppState, view: &Dataset) {
    let values: Vec<(String, String)> = match &state.selection {
        Selection::All => Metric::ALL
            .iter()
            .map(|&m| match m {
                Metric::Population => (
                    "Totaal inwoners".to_string(),
                    m.format(stats::sum(view, m)),
                ),
                _ => (
                    format!("{} (gemiddeld)", m.label()),
                    format_opt(m, stats::mean(view, m)),
                ),
            })
            .collect(),
        Selection::One(name) => match first_row(view, name) {
            Ok(rec) => Metric::ALL
                .iter()
                .map(|&m| (m.label().to_string(), format_opt(m, m.value(rec))))
                .collect(),
            Err(e) => {
                ui.colored_label(Color32::DARK_RED, e.to_string());
                return;
            }
        },
    };

    ui.columns(values.len(), |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(values) {
            card(col, &title, value);
        }
    });
}

/// Two columns of cards, one per compared municipality.
pub fn comparison_cards(ui: &mut Ui, view: &Dataset, first: &str, second: &str) {
    let colors = ColorMap::pair(first, second);
    ui.columns(2, |cols: &mut [Ui]| {
        for ((col, name), color) in cols.iter_mut().zip([first, second]).zip(colors) {
            col.label(RichText::new(name).heading().color(color));
            match first_row(view, name) {
                Ok(rec) => {
                    for m in Metric::ALL {
                        card(col, m.label(), format_opt(m, m.value(rec)));
                    }
                }
                Err(e) => {
                    col.colored_label(Color32::DARK_RED, e.to_string());
                }
            }
            if let Ok(rows) = filter_by_municipality(view, &Selection::One(name.to_string())) {
                if rows.len() > 1 {
                    col.label(RichText::new(format!("{} rijen, eerste getoond", rows.len())).weak());
                }
            }
        }
    });
}
