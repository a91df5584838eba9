use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::{ColorMap, NEUTRAL};
use crate::data::filter::{filter_by_municipality, Selection};
use crate::data::model::Dataset;
use crate::data::stats::{self, Metric};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Bar chart: chosen metric per row
// ---------------------------------------------------------------------------

pub fn metric_bars(ui: &mut Ui, state: &AppState, view: &Dataset) {
    let metric = state.metric;
    ui.strong(format!("{} per gemeente", metric.label()));

    let rows: Vec<(String, f64, Option<&str>)> = view
        .records
        .iter()
        .filter_map(|r| Some((r.label(), metric.value(r)?, r.municipality.as_deref())))
        .collect();
    if rows.is_empty() {
        ui.label("Geen waarden voor deze grafiek.");
        return;
    }

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, (label, value, municipality))| {
            Bar::new(i as f64, *value)
                .name(label)
                .fill(state.color_map.color_for(*municipality))
        })
        .collect();

    let labels: Vec<String> = rows.into_iter().map(|(label, _, _)| label).collect();
    Plot::new("metric_bars")
        .height(CHART_HEIGHT)
        .y_axis_label(metric.label())
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(metric.label()));
        });
}

// ---------------------------------------------------------------------------
// Histogram of the chosen metric
// ---------------------------------------------------------------------------

pub fn metric_histogram(ui: &mut Ui, state: &AppState, view: &Dataset) {
    let metric = state.metric;
    ui.strong(format!("Verdeling van {}", metric.label().to_lowercase()));

    if let Some((lo, hi)) = stats::min_max(view, metric) {
        ui.label(format!("Bereik: {} – {}", metric.format(lo), metric.format(hi)));
    }

    let bins = stats::histogram(&stats::values(view, metric), state.config.histogram_bins);
    if bins.is_empty() {
        ui.label("Geen waarden voor deze grafiek.");
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|bin| {
            let width = if bin.width() > 0.0 { bin.width() } else { 1.0 };
            Bar::new(bin.center(), bin.count as f64)
                .width(width)
                .fill(NEUTRAL)
                .name(format!(
                    "{} – {}",
                    metric.format(bin.lower),
                    metric.format(bin.upper)
                ))
        })
        .collect();

    Plot::new("metric_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label(metric.label())
        .y_axis_label("Aantal")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Side-by-side comparison
// ---------------------------------------------------------------------------

/// One small chart per metric with a bar for each municipality. Multiple
/// rows for one municipality (several years) are averaged.
pub fn comparison_bars(ui: &mut Ui, view: &Dataset, first: &str, second: &str) {
    let colors = ColorMap::pair(first, second);

    ui.columns(Metric::ALL.len(), |cols| {
        for (col, metric) in cols.iter_mut().zip(Metric::ALL) {
            col.strong(metric.label());

            let charts: Vec<BarChart> = [first, second]
                .into_iter()
                .zip(colors)
                .enumerate()
                .filter_map(|(i, (name, color))| {
                    let rows = filter_by_municipality(view, &Selection::One(name.to_string())).ok()?;
                    let value = stats::mean(&rows, metric)?;
                    let bar = Bar::new(i as f64, value).width(0.6).name(name);
                    Some(BarChart::new(vec![bar]).name(name).color(color))
                })
                .collect();

            Plot::new(format!("compare_{metric:?}"))
                .height(CHART_HEIGHT * 0.75)
                .legend(Legend::default())
                .show_x(false)
                .allow_drag(false)
                .allow_scroll(false)
                .allow_zoom(false)
                .show(col, |plot_ui| {
                    for chart in charts {
                        plot_ui.bar_chart(chart);
                    }
                });
        }
    });
}
