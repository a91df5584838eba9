use std::path::PathBuf;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{
    distinct_municipalities, filter_by_municipalities, filter_by_municipality, Selection,
};
use crate::data::model::Dataset;
use crate::data::stats::Metric;
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Messages: every user interaction is one of these
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Single,
    Comparison,
}

/// Left or right side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

#[derive(Debug)]
pub enum Message {
    /// A load (remote or local) finished. `source` is shown in the banner.
    DatasetLoaded {
        source: String,
        result: Result<Dataset>,
    },
    MunicipalitySelected(Selection),
    ComparisonSelected(Slot, String),
    ModeChanged(ViewMode),
    MetricChanged(Metric),
    /// Click on a table header: sort by that schema field, toggling direction.
    SortBy(usize),
    Exported(Result<PathBuf>),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Distinct municipality values of `dataset`, sorted.
    pub municipalities: Vec<String>,

    pub color_map: ColorMap,

    pub mode: ViewMode,
    pub selection: Selection,
    pub comparison: [Option<String>; 2],

    /// Metric plotted in the bar chart and histogram.
    pub metric: Metric,

    /// The filtered view (cached). None while an error is shown.
    pub view: Option<Dataset>,

    /// Table row order over `view` (cached).
    pub row_order: Vec<usize>,

    /// Schema field index and ascending flag.
    pub sort: Option<(usize, bool)>,

    /// Success line shown under the top bar.
    pub status_message: Option<String>,

    /// Shown instead of everything else until the next successful message.
    pub error: Option<DashboardError>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            municipalities: Vec::new(),
            color_map: ColorMap::default(),
            mode: ViewMode::default(),
            selection: Selection::default(),
            comparison: [None, None],
            metric: Metric::default(),
            view: None,
            row_order: Vec::new(),
            sort: None,
            status_message: None,
            error: None,
        }
    }

    pub fn handle(&mut self, msg: Message) {
        match msg {
            Message::DatasetLoaded { source, result } => match result {
                Ok(dataset) => self.set_dataset(dataset, &source),
                Err(e) => {
                    self.dataset = None;
                    self.municipalities.clear();
                    self.view = None;
                    self.row_order.clear();
                    self.status_message = None;
                    self.error = Some(e);
                }
            },
            Message::MunicipalitySelected(selection) => {
                log::debug!("Selected {selection}");
                self.selection = selection;
                self.refilter();
            }
            Message::ComparisonSelected(slot, name) => {
                let idx = match slot {
                    Slot::First => 0,
                    Slot::Second => 1,
                };
                self.comparison[idx] = Some(name);
                self.refilter();
            }
            Message::ModeChanged(mode) => {
                self.mode = mode;
                self.refilter();
            }
            Message::MetricChanged(metric) => self.metric = metric,
            Message::SortBy(field) => {
                self.sort = match self.sort {
                    Some((f, ascending)) if f == field => Some((field, !ascending)),
                    _ => Some((field, true)),
                };
                self.reorder();
            }
            Message::Exported(Ok(path)) => {
                self.status_message = Some(format!("CSV opgeslagen als {}", path.display()));
            }
            Message::Exported(Err(e)) => {
                log::error!("{e}");
                self.status_message = None;
                self.error = Some(e);
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the selections.
    fn set_dataset(&mut self, dataset: Dataset, source: &str) {
        self.municipalities = distinct_municipalities(&dataset);
        self.color_map = ColorMap::new(&self.municipalities);

        self.selection = Selection::All;
        let first = self.municipalities.first().cloned();
        let second = self.municipalities.get(1).cloned().or_else(|| first.clone());
        self.comparison = [first, second];
        self.sort = None;

        self.status_message = Some(format!(
            "Data succesvol geladen vanaf {source} ({} rijen)",
            dataset.len()
        ));
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Recompute `view` after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let result = match self.mode {
            ViewMode::Single => filter_by_municipality(ds, &self.selection),
            ViewMode::Comparison => {
                let names: Vec<&str> = self.comparison.iter().flatten().map(String::as_str).collect();
                if names.is_empty() {
                    Ok(ds.select(&[]))
                } else {
                    filter_by_municipalities(ds, &names)
                }
            }
        };

        match result {
            Ok(view) => {
                self.view = Some(view);
                self.error = None;
            }
            Err(e) => {
                self.view = None;
                self.error = Some(e);
            }
        }
        self.reorder();
    }

    fn reorder(&mut self) {
        let order = match &self.view {
            None => Vec::new(),
            Some(view) => {
                let mut order: Vec<usize> = (0..view.len()).collect();
                if let Some((field, ascending)) = self.sort {
                    let keys: Vec<_> = view
                        .records
                        .iter()
                        .map(|r| r.to_cells(&view.schema).into_iter().nth(field))
                        .collect();
                    // Stable, so equal keys keep dataset order.
                    order.sort_by(|&a, &b| {
                        let ord = keys[a].cmp(&keys[b]);
                        if ascending {
                            ord
                        } else {
                            ord.reverse()
                        }
                    });
                }
                order
            }
        };
        self.row_order = order;
    }

    /// Name offered in the save dialog for the current view.
    pub fn download_file_name(&self) -> &str {
        match self.mode {
            ViewMode::Single => &self.config.download_file_name,
            ViewMode::Comparison => &self.config.comparison_file_name,
        }
    }

    /// The two compared names, once both slots are set.
    pub fn comparison_pair(&self) -> Option<(&str, &str)> {
        match &self.comparison {
            [Some(a), Some(b)] => Some((a.as_str(), b.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    const SAMPLE: &str = "\
gemeente,gemiddeld_inkomen,gemiddelde_woz,totaal_inwoners
Rotterdam,40000,280000,650000
Amsterdam,45000,350000,900000
Utrecht,41000,330000,360000
";

    fn loaded() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.handle(Message::DatasetLoaded {
            source: "test".into(),
            result: parse_csv(SAMPLE.as_bytes()),
        });
        state
    }

    #[test]
    fn load_resets_selection_and_shows_everything() {
        let state = loaded();
        assert_eq!(state.municipalities, vec!["Amsterdam", "Rotterdam", "Utrecht"]);
        assert_eq!(state.selection, Selection::All);
        assert_eq!(state.view.as_ref().map(Dataset::len), Some(3));
        assert_eq!(state.comparison_pair(), Some(("Amsterdam", "Rotterdam")));
        assert!(state.status_message.as_deref().unwrap().contains("3 rijen"));
        assert!(state.error.is_none());
    }

    #[test]
    fn failed_load_shows_only_error() {
        let mut state = loaded();
        state.handle(Message::DatasetLoaded {
            source: "test".into(),
            result: Err(DashboardError::Load("timeout".into())),
        });
        assert!(state.dataset.is_none());
        assert!(state.view.is_none());
        assert!(state.status_message.is_none());
        assert_eq!(state.error, Some(DashboardError::Load("timeout".into())));
    }

    #[test]
    fn missing_selection_errors_until_a_valid_one() {
        let mut state = loaded();
        state.handle(Message::MunicipalitySelected(Selection::One("Delft".into())));
        assert_eq!(state.error, Some(DashboardError::NotFound("Delft".into())));
        assert!(state.view.is_none());

        state.handle(Message::MunicipalitySelected(Selection::One("Utrecht".into())));
        assert!(state.error.is_none());
        assert_eq!(state.view.as_ref().map(Dataset::len), Some(1));
    }

    #[test]
    fn comparison_filters_both_names() {
        let mut state = loaded();
        state.handle(Message::ModeChanged(ViewMode::Comparison));
        state.handle(Message::ComparisonSelected(Slot::Second, "Utrecht".into()));

        let view = state.view.as_ref().unwrap();
        let names: Vec<_> = view.records.iter().filter_map(|r| r.municipality.as_deref()).collect();
        assert_eq!(names, vec!["Amsterdam", "Utrecht"]);
        assert_eq!(state.download_file_name(), "vergelijking_woningdata.csv");

        state.handle(Message::ModeChanged(ViewMode::Single));
        assert_eq!(state.download_file_name(), "woningdata_per_gemeente.csv");
    }

    #[test]
    fn sort_toggles_direction() {
        let mut state = loaded();
        // Field 1 is gemiddeld_inkomen.
        state.handle(Message::SortBy(1));
        assert_eq!(state.row_order, vec![0, 2, 1]);
        state.handle(Message::SortBy(1));
        assert_eq!(state.row_order, vec![1, 2, 0]);
    }

    #[test]
    fn export_failure_becomes_error() {
        let mut state = loaded();
        state.handle(Message::Exported(Err(DashboardError::Export("disk full".into()))));
        assert!(matches!(state.error, Some(DashboardError::Export(_))));
    }
}
