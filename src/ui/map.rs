use eframe::egui::{RichText, Ui};
use egui_plot::{Plot, Points};

use crate::data::model::Dataset;
use crate::state::AppState;

/// Scatter map of municipalities on longitude (x) / latitude (y).
///
/// Without both coordinate columns the map is skipped with a note; rows
/// with a missing coordinate are left off the map.
pub fn scatter_map(ui: &mut Ui, state: &AppState, view: &Dataset) {
    ui.strong("Kaart");
    if !view.has_coordinates() {
        ui.label(RichText::new("Geen latitude/longitude in de data, kaart niet getoond.").weak());
        return;
    }

    let located: Vec<_> = view
        .records
        .iter()
        .filter_map(|r| r.coordinates().map(|(lat, lon)| (r, lat, lon)))
        .collect();
    if located.is_empty() {
        ui.label(RichText::new("Geen rijen met coördinaten.").weak());
        return;
    }

    // Shrink longitude by cos(latitude) so the country is not stretched sideways.
    let mean_lat = located.iter().map(|(_, lat, _)| lat).sum::<f64>() / located.len() as f64;
    let aspect = mean_lat.to_radians().cos().clamp(0.1, 1.0) as f32;

    Plot::new("map")
        .height(420.0)
        .data_aspect(aspect)
        .x_axis_label("Lengtegraad")
        .y_axis_label("Breedtegraad")
        .show(ui, |plot_ui| {
            for (rec, lat, lon) in located {
                let points = Points::new(vec![[lon, lat]])
                    .radius(4.0)
                    .color(state.color_map.color_for(rec.municipality.as_deref()))
                    .name(rec.label());
                plot_ui.points(points);
            }
        });
}
