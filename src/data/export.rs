use std::path::Path;

use anyhow::Context;

use super::model::Dataset;
use crate::error::{DashboardError, Result};

/// Serialise `dataset` as UTF-8 CSV: header row in source column order,
/// no index column, missing values as empty fields.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    write_records(dataset).map_err(|e| DashboardError::Export(format!("{e:#}")))
}

/// Write the CSV download to `path`.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let bytes = to_csv(dataset)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("writing {}", path.display()))
        .map_err(|e| DashboardError::Export(format!("{e:#}")))?;
    log::info!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn write_records(dataset: &Dataset) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(dataset.schema.names())
        .context("writing CSV header")?;

    for (row_no, record) in dataset.records.iter().enumerate() {
        let fields: Vec<String> = record
            .to_cells(&dataset.schema)
            .iter()
            .map(|c| c.to_string())
            .collect();
        writer
            .write_record(&fields)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV writer: {}", e.error()))
}
