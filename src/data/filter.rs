use std::collections::BTreeSet;
use std::fmt;

use super::model::{Dataset, Record};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Selection: what the municipality dropdown currently points at
// ---------------------------------------------------------------------------

/// Label of the sentinel entry at the top of the dropdown.
pub const ALL_LABEL: &str = "Alle";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No filter: the dataset is shown unchanged.
    #[default]
    All,
    /// Rows whose municipality equals this value exactly.
    One(String),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "{ALL_LABEL}"),
            Selection::One(name) => write!(f, "{name}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Non-missing unique municipality values, sorted ascending.
pub fn distinct_municipalities(dataset: &Dataset) -> Vec<String> {
    dataset
        .records
        .iter()
        .filter_map(|r| r.municipality.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Indices of records whose municipality is one of `names`, in dataset order.
///
/// Matching is exact: no trimming, no case folding.
pub fn matching_indices(dataset: &Dataset, names: &[&str]) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            r.municipality
                .as_deref()
                .is_some_and(|m| names.contains(&m))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Apply a single-municipality selection.
///
/// [`Selection::All`] returns the dataset unchanged; a name without any
/// matching row is a [`DashboardError::NotFound`].
pub fn filter_by_municipality(dataset: &Dataset, selection: &Selection) -> Result<Dataset> {
    match selection {
        Selection::All => Ok(dataset.clone()),
        Selection::One(name) => filter_by_municipalities(dataset, &[name.as_str()]),
    }
}

/// Rows whose municipality is any of `names` (used for side-by-side
/// comparison). Repeating a name is allowed and does not duplicate rows.
/// Every name must match at least one row.
pub fn filter_by_municipalities(dataset: &Dataset, names: &[&str]) -> Result<Dataset> {
    if let Some(missing) = names
        .iter()
        .find(|&&name| matching_indices(dataset, &[name]).is_empty())
    {
        log::warn!("No rows for municipality '{missing}'");
        return Err(DashboardError::NotFound(missing.to_string()));
    }
    Ok(dataset.select(&matching_indices(dataset, names)))
}

/// The first record for `name`.
pub fn first_row<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Record> {
    dataset
        .records
        .iter()
        .find(|r| r.municipality.as_deref() == Some(name))
        .ok_or_else(|| DashboardError::NotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::Schema;

    fn record(name: Option<&str>, income: f64) -> Record {
        Record {
            municipality: name.map(str::to_string),
            average_income: Some(income),
            ..Record::default()
        }
    }

    fn dataset() -> Dataset {
        let schema = Schema::resolve(&["gemeente", "gemiddeld_inkomen"]).unwrap();
        Dataset::new(
            schema,
            vec![
                record(Some("Rotterdam"), 40000.0),
                record(Some("Amsterdam"), 45000.0),
                record(None, 1.0),
                record(Some("Rotterdam"), 41000.0),
                record(Some("amsterdam"), 2.0),
            ],
        )
    }

    #[test]
    fn distinct_is_sorted_and_unique() {
        assert_eq!(
            distinct_municipalities(&dataset()),
            vec!["Amsterdam", "Rotterdam", "amsterdam"]
        );
    }

    #[test]
    fn all_is_identity() {
        let ds = dataset();
        assert_eq!(filter_by_municipality(&ds, &Selection::All).unwrap(), ds);
    }

    #[test]
    fn single_filter_is_exact_and_case_sensitive() {
        let out = filter_by_municipality(&dataset(), &Selection::One("Amsterdam".into())).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.records[0].average_income, Some(45000.0));

        let rotterdam =
            filter_by_municipality(&dataset(), &Selection::One("Rotterdam".into())).unwrap();
        assert!(rotterdam
            .records
            .iter()
            .all(|r| r.municipality.as_deref() == Some("Rotterdam")));
        assert_eq!(rotterdam.len(), 2);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let err = filter_by_municipality(&dataset(), &Selection::One("Utrecht".into())).unwrap_err();
        assert_eq!(err, DashboardError::NotFound("Utrecht".into()));
    }

    #[test]
    fn pair_filter_keeps_dataset_order() {
        let out = filter_by_municipalities(&dataset(), &["Amsterdam", "Rotterdam"]).unwrap();
        let incomes: Vec<_> = out.records.iter().filter_map(|r| r.average_income).collect();
        assert_eq!(incomes, vec![40000.0, 45000.0, 41000.0]);
    }

    #[test]
    fn pair_filter_with_same_name_does_not_duplicate() {
        let out = filter_by_municipalities(&dataset(), &["Amsterdam", "Amsterdam"]).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn pair_filter_reports_missing_name() {
        let err = filter_by_municipalities(&dataset(), &["Amsterdam", "Delft"]).unwrap_err();
        assert_eq!(err, DashboardError::NotFound("Delft".into()));
    }

    #[test]
    fn first_row_finds_first_match() {
        let ds = dataset();
        assert_eq!(first_row(&ds, "Rotterdam").unwrap().average_income, Some(40000.0));
        assert_eq!(
            first_row(&ds, "Delft").unwrap_err(),
            DashboardError::NotFound("Delft".into())
        );
    }
}
