use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Metrics shown on cards and charts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    AverageIncome,
    AverageWoz,
    Population,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::AverageIncome, Metric::AverageWoz, Metric::Population];

    pub fn label(self) -> &'static str {
        match self {
            Metric::AverageIncome => "Gemiddeld inkomen",
            Metric::AverageWoz => "Gemiddelde WOZ-waarde",
            Metric::Population => "Inwoners",
        }
    }

    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            Metric::AverageIncome => record.average_income,
            Metric::AverageWoz => record.average_woz,
            Metric::Population => record.population,
        }
    }

    /// Euro amounts for the currency metrics, plain thousands for population.
    pub fn format(self, value: f64) -> String {
        let grouped = group_thousands(value.round() as i64);
        match self {
            Metric::AverageIncome | Metric::AverageWoz => format!("€ {grouped}"),
            Metric::Population => grouped,
        }
    }
}

/// `1234567` → `1.234.567` (Dutch grouping).
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Reductions (missing values are skipped)
// ---------------------------------------------------------------------------

pub fn values(dataset: &Dataset, metric: Metric) -> Vec<f64> {
    dataset
        .records
        .iter()
        .filter_map(|r| metric.value(r))
        .filter(|v| !v.is_nan())
        .collect()
}

/// `None` when the column holds no values.
pub fn mean(dataset: &Dataset, metric: Metric) -> Option<f64> {
    let vals = values(dataset, metric);
    if vals.is_empty() {
        None
    } else {
        Some(vals.iter().sum::<f64>() / vals.len() as f64)
    }
}

pub fn sum(dataset: &Dataset, metric: Metric) -> f64 {
    values(dataset, metric).iter().sum()
}

pub fn min_max(dataset: &Dataset, metric: Metric) -> Option<(f64, f64)> {
    bounds(&values(dataset, metric))
}

fn bounds(vals: &[f64]) -> Option<(f64, f64)> {
    if vals.is_empty() {
        return None;
    }
    let min = vals.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = vals.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Equal-width bins over `[min, max]`. The maximum lands in the last bin.
/// A constant series yields one zero-width bin holding every value.
pub fn histogram(vals: &[f64], bins: usize) -> Vec<Bin> {
    let Some((min, max)) = bounds(vals) else {
        return Vec::new();
    };
    let range = max - min;
    if bins == 0 {
        return Vec::new();
    }
    if range.abs() < f64::EPSILON {
        return vec![Bin {
            lower: min,
            upper: max,
            count: vals.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in vals {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}
