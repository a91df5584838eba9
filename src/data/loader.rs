use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Record};
use super::schema::{FieldKind, Schema};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch and parse the CSV at `url`.
///
/// Network failures, non-success statuses and malformed CSV come back as
/// [`DashboardError::Load`]; a missing municipality column as
/// [`DashboardError::Schema`]. Nothing is retried.
pub fn load(url: &str, timeout: Duration) -> Result<Dataset> {
    log::info!("Fetching {url}");
    let dataset = fetch_csv(url, timeout).map_err(into_dashboard_error)?;
    log::info!(
        "Loaded {} rows with columns {:?} from {url}",
        dataset.len(),
        dataset.schema.names()
    );
    Ok(dataset)
}

/// Load a local snapshot.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – same layout as the remote file
/// * `.json`    – `[{ "gemeente": "...", "gemiddeld_inkomen": 41000, ... }, ...]`
/// * `.parquet` – flat columns (Utf8, Int32/64, Float32/64, Boolean)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let result = match ext.as_str() {
        "csv" => std::fs::File::open(path)
            .with_context(|| format!("opening {}", path.display()))
            .and_then(read_csv),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    };

    let dataset = result.map_err(into_dashboard_error)?;
    log::info!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Parse CSV text with a header row into a [`Dataset`].
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    read_csv(reader).map_err(into_dashboard_error)
}

/// Schema errors travel through `anyhow` untouched; everything else is a load error.
fn into_dashboard_error(err: anyhow::Error) -> DashboardError {
    log::error!("Load failed: {err:#}");
    match err.downcast::<DashboardError>() {
        Ok(e) => e,
        Err(err) => DashboardError::load(err),
    }
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

fn fetch_csv(url: &str, timeout: Duration) -> anyhow::Result<Dataset> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("building HTTP client")?;

    let body = client
        .get(url)
        .send()
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url}"))?
        .bytes()
        .with_context(|| format!("reading body from {url}"))?;

    log::debug!("Received {} bytes from {url}", body.len());
    read_csv(body.as_ref()).with_context(|| format!("parsing CSV from {url}"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Text columns keep their raw value (so `"0363"` stays `"0363"`); numeric
/// and extra columns are typed with [`CellValue::guess`], which trims
/// padding and reads `NA`-style tokens as missing.
fn read_csv<R: Read>(reader: R) -> anyhow::Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let schema = Schema::resolve(&headers)?;
    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let cells: Vec<CellValue> = schema
            .fields
            .iter()
            .zip(row.iter())
            .map(|(field, raw)| match field.kind {
                FieldKind::Known(col) if !col.is_numeric() => CellValue::text(raw),
                _ => CellValue::guess(raw),
            })
            .collect();

        let record =
            Record::from_cells(&schema, cells).with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }

    log::debug!("Parsed {} CSV rows", records.len());
    Ok(Dataset::new(schema, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "gemeente": "Amsterdam", "gemiddeld_inkomen": 45000, "jaar": 2023 },
///   ...
/// ]
/// ```
///
/// Columns are the union of all keys in first-seen order; absent keys are missing values.
fn load_json(path: &Path) -> anyhow::Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let schema = Schema::resolve(&headers)?;
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let cells = headers
            .iter()
            .map(|h| obj.get(h).map_or(CellValue::Null, json_to_cell))
            .collect();
        records.push(Record::from_cells(&schema, cells).with_context(|| format!("Row {i}"))?);
    }

    Ok(Dataset::new(schema, records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table, as written by Pandas (`df.to_parquet()`),
/// Polars (`df.write_parquet()`) or the `generate_sample` binary.
fn load_parquet(path: &Path) -> anyhow::Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let schema = Schema::resolve(&headers)?;

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        if batch.num_columns() != schema.len() {
            bail!(
                "record batch has {} columns, schema has {}",
                batch.num_columns(),
                schema.len()
            );
        }

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell_value(col, row))
                .collect();
            records.push(
                Record::from_cells(&schema, cells)
                    .with_context(|| format!("Row {}", records.len()))?,
            );
        }
    }

    Ok(Dataset::new(schema, records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell_value(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row))),
        _ => array_value_to_string(col, row).ok().map(CellValue::String),
    };
    value.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema as ArrowSchema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::Builder;

    const SAMPLE: &str = "\
GEMEENTE,gemiddeld_inkomen,gemiddelde_woz,totaal_inwoners,jaar
Amsterdam,45000,350000,900000,2023
Rotterdam,40000,280000,650000,2023
";

    #[test]
    fn csv_rows_become_typed_records() {
        let ds = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.municipality.as_deref(), Some("Amsterdam"));
        assert_eq!(first.average_income, Some(45000.0));
        assert_eq!(first.average_woz, Some(350000.0));
        assert_eq!(first.population, Some(900000.0));
        assert_eq!(first.year.as_deref(), Some("2023"));
        assert!(!ds.has_coordinates());
    }

    #[test]
    fn text_columns_are_not_retyped() {
        let ds = parse_csv("gemeente,jaar\n0363,2023\n,2024\n".as_bytes()).unwrap();
        assert_eq!(ds.records[0].municipality.as_deref(), Some("0363"));
        assert_eq!(ds.records[1].municipality, None);
    }

    #[test]
    fn missing_municipality_column_is_schema_error() {
        let err = parse_csv("stad,gemiddeld_inkomen\nAmsterdam,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Schema { missing: "gemeente", .. }));
    }

    #[test]
    fn bad_number_is_load_error_with_row() {
        let err = parse_csv("gemeente,gemiddeld_inkomen\nAmsterdam,veel\n".as_bytes()).unwrap_err();
        match err {
            DashboardError::Load(msg) => {
                assert!(msg.contains("CSV row 0"), "{msg}");
                assert!(msg.contains("gemiddeld_inkomen"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn na_tokens_are_missing() {
        let text = "gemeente,gemiddeld_inkomen,totaal_inwoners\n\
                    Amsterdam,45000,NA\n\
                    Rotterdam,N/A,#N/A\n\
                    Utrecht,null,None\n";
        let ds = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.records[0].average_income, Some(45000.0));
        assert_eq!(ds.records[0].population, None);
        assert_eq!(ds.records[1].average_income, None);
        assert_eq!(ds.records[2].average_income, None);
        assert_eq!(ds.records[2].population, None);
    }

    #[test]
    fn padded_numbers_parse() {
        let ds = parse_csv("gemeente, gemiddeld_inkomen\nAmsterdam, 45000\nRotterdam,40000.5 \n".as_bytes())
            .unwrap();
        assert_eq!(ds.records[0].average_income, Some(45000.0));
        assert_eq!(ds.records[1].average_income, Some(40000.5));
    }

    #[test]
    fn dataset_without_coordinates_has_no_map() {
        let none = parse_csv("gemeente,jaar\nAmsterdam,2023\n".as_bytes()).unwrap();
        assert!(!none.has_coordinates());

        let lat_only = parse_csv("gemeente,latitude\nAmsterdam,52.37\n".as_bytes()).unwrap();
        assert!(!lat_only.has_coordinates());
        assert_eq!(lat_only.records[0].coordinates(), None);

        let both = parse_csv("gemeente,latitude,longitude\nAmsterdam,52.37,4.90\n".as_bytes()).unwrap();
        assert!(both.has_coordinates());
    }

    #[test]
    fn ragged_csv_is_load_error() {
        let err = parse_csv("gemeente,jaar\nAmsterdam\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Load(_)));
    }

    #[test]
    fn invalid_url_is_load_error() {
        let err = load("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, DashboardError::Load(_)));
    }

    #[test]
    fn unsupported_extension_is_load_error() {
        let err = load_file(Path::new("woningdata.xlsx")).unwrap_err();
        assert_eq!(
            err,
            DashboardError::Load("Unsupported file extension: .xlsx".into())
        );
    }

    #[test]
    fn csv_file_loads_like_text() -> anyhow::Result<()> {
        let mut file = Builder::new().suffix(".csv").tempfile()?;
        file.write_all(SAMPLE.as_bytes())?;

        let from_file = load_file(file.path())?;
        assert_eq!(from_file, parse_csv(SAMPLE.as_bytes())?);
        Ok(())
    }

    #[test]
    fn json_snapshot_matches_csv_records() -> anyhow::Result<()> {
        let mut file = Builder::new().suffix(".json").tempfile()?;
        write!(
            file,
            r#"[
                {{"gemeente": "Amsterdam", "gemiddeld_inkomen": 45000, "latitude": 52.37}},
                {{"gemeente": "Rotterdam", "gemiddeld_inkomen": 40000.5}}
            ]"#
        )?;

        let ds = load_file(file.path())?;
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].latitude, Some(52.37));
        assert_eq!(ds.records[1].latitude, None);
        assert_eq!(ds.records[1].average_income, Some(40000.5));
        Ok(())
    }

    #[test]
    fn parquet_snapshot_loads_flat_columns() -> anyhow::Result<()> {
        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("gemeente", DataType::Utf8, true),
            Field::new("totaal_inwoners", DataType::Int64, true),
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Utrecht"), None])),
                Arc::new(Int64Array::from(vec![Some(361_000), Some(12)])),
                Arc::new(Float64Array::from(vec![Some(52.09), None])),
                Arc::new(Float64Array::from(vec![Some(5.12), None])),
            ],
        )?;

        let file = Builder::new().suffix(".parquet").tempfile()?;
        let mut writer = ArrowWriter::try_new(file.reopen()?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let ds = load_file(file.path())?;
        assert_eq!(ds.len(), 2);
        assert!(ds.has_coordinates());
        assert_eq!(ds.records[0].municipality.as_deref(), Some("Utrecht"));
        assert_eq!(ds.records[0].population, Some(361_000.0));
        assert_eq!(ds.records[0].coordinates(), Some((52.09, 5.12)));
        assert_eq!(ds.records[1].municipality, None);
        Ok(())
    }
}
