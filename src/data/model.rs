use std::fmt;

use anyhow::{bail, Result};

use super::schema::{Column, FieldKind, Schema};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
/// The table view sorts by arbitrary columns, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Tokens read as a missing value, the same set Pandas' `read_csv` uses.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// -- Manual Eq/Ord so floats get a total order --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Best-effort typing of a raw CSV field.
    ///
    /// Surrounding whitespace is ignored for typing but kept when the field
    /// stays text. Missing-value tokens (`NA`, `null`, ...) become `Null`.
    pub fn guess(s: &str) -> CellValue {
        let t = s.trim();
        if t.is_empty() || MISSING_TOKENS.contains(&t) {
            return CellValue::Null;
        }
        if let Ok(i) = t.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = t.parse::<f64>() {
            return CellValue::Float(f);
        }
        if t == "true" || t == "false" {
            return CellValue::Bool(t == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Keep a raw field as text; empty means missing.
    pub fn text(s: &str) -> CellValue {
        if s.is_empty() {
            CellValue::Null
        } else {
            CellValue::String(s.to_string())
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one municipality-year row
// ---------------------------------------------------------------------------

/// One row of the source table with the known columns typed out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub municipality: Option<String>,
    pub average_income: Option<f64>,
    pub average_woz: Option<f64>,
    pub population: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub year: Option<String>,
    /// Columns the dashboard does not interpret, in the order of the
    /// schema's extra fields. Positional, so repeated headers stay distinct.
    pub extra: Vec<CellValue>,
}

impl Record {
    /// Build a record from cells aligned with `schema.fields`.
    ///
    /// Numeric columns accept integers, floats and nulls; any other cell
    /// is rejected so bad data fails the load instead of rendering as zero.
    pub fn from_cells(schema: &Schema, cells: Vec<CellValue>) -> Result<Self> {
        if cells.len() != schema.len() {
            bail!("expected {} fields, found {}", schema.len(), cells.len());
        }

        let mut rec = Record::default();
        for (field, cell) in schema.fields.iter().zip(cells) {
            let col = match field.kind {
                FieldKind::Known(col) => col,
                FieldKind::Extra => {
                    rec.extra.push(cell);
                    continue;
                }
            };

            match col {
                Column::Municipality => rec.municipality = as_text(cell),
                Column::Year => rec.year = as_text(cell),
                Column::AverageIncome => rec.average_income = as_number(&field.name, &cell)?,
                Column::AverageWoz => rec.average_woz = as_number(&field.name, &cell)?,
                Column::Population => rec.population = as_number(&field.name, &cell)?,
                Column::Latitude => rec.latitude = as_number(&field.name, &cell)?,
                Column::Longitude => rec.longitude = as_number(&field.name, &cell)?,
            }
        }
        Ok(rec)
    }

    /// Cells in `schema` order, the inverse of [`Record::from_cells`].
    pub fn to_cells(&self, schema: &Schema) -> Vec<CellValue> {
        let mut extra = self.extra.iter();
        schema
            .fields
            .iter()
            .map(|field| match field.kind {
                FieldKind::Extra => extra.next().cloned().unwrap_or(CellValue::Null),
                FieldKind::Known(col) => self.cell(col),
            })
            .collect()
    }

    /// The value of a known column as a cell.
    pub fn cell(&self, column: Column) -> CellValue {
        let text = |v: &Option<String>| v.clone().map_or(CellValue::Null, CellValue::String);
        let num = |v: Option<f64>| match v {
            None => CellValue::Null,
            Some(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => CellValue::Integer(x as i64),
            Some(x) => CellValue::Float(x),
        };
        match column {
            Column::Municipality => text(&self.municipality),
            Column::Year => text(&self.year),
            Column::AverageIncome => num(self.average_income),
            Column::AverageWoz => num(self.average_woz),
            Column::Population => num(self.population),
            Column::Latitude => num(self.latitude),
            Column::Longitude => num(self.longitude),
        }
    }

    /// Label used in charts: municipality, plus the year when present.
    pub fn label(&self) -> String {
        let name = self.municipality.as_deref().unwrap_or("(onbekend)");
        match &self.year {
            Some(year) => format!("{name} ({year})"),
            None => name.to_string(),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

fn as_text(cell: CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn as_number(column: &str, cell: &CellValue) -> Result<Option<f64>> {
    match cell {
        CellValue::Null => Ok(None),
        other => match other.as_f64() {
            Some(v) => Ok(Some(v)),
            None => bail!("column '{column}': '{other}' is not a number"),
        },
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered collection of records sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub schema: Schema,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Dataset { schema, records }
    }

    /// A dataset with the same schema holding the rows at `indices`.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            schema: self.schema.clone(),
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The map is only drawn when both coordinate columns exist.
    pub fn has_coordinates(&self) -> bool {
        self.schema.has(Column::Latitude) && self.schema.has(Column::Longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::resolve(&["gemeente", "gemiddeld_inkomen", "jaar", "regio"]).unwrap()
    }

    #[test]
    fn cells_round_trip_through_record() {
        let cells = vec![
            CellValue::text("Utrecht"),
            CellValue::Integer(41000),
            CellValue::text("2023"),
            CellValue::text("Midden"),
        ];
        let rec = Record::from_cells(&schema(), cells.clone()).unwrap();
        assert_eq!(rec.municipality.as_deref(), Some("Utrecht"));
        assert_eq!(rec.average_income, Some(41000.0));
        assert_eq!(rec.year.as_deref(), Some("2023"));
        assert_eq!(rec.label(), "Utrecht (2023)");
        assert_eq!(rec.to_cells(&schema()), cells);
    }

    #[test]
    fn non_numeric_metric_is_rejected() {
        let cells = vec![
            CellValue::text("Utrecht"),
            CellValue::text("veel"),
            CellValue::Null,
            CellValue::Null,
        ];
        let err = Record::from_cells(&schema(), cells).unwrap_err();
        assert!(err.to_string().contains("gemiddeld_inkomen"));
    }

    #[test]
    fn field_count_must_match_schema() {
        assert!(Record::from_cells(&schema(), vec![CellValue::text("Utrecht")]).is_err());
    }

    #[test]
    fn coordinates_need_both_axes() {
        let rec = Record {
            latitude: Some(52.1),
            ..Record::default()
        };
        assert_eq!(rec.coordinates(), None);
    }

    #[test]
    fn guess_types_raw_fields() {
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("12"), CellValue::Integer(12));
        assert_eq!(CellValue::guess("1.5"), CellValue::Float(1.5));
        assert_eq!(CellValue::guess("true"), CellValue::Bool(true));
        assert_eq!(CellValue::guess("Delft"), CellValue::String("Delft".into()));
    }

    #[test]
    fn guess_trims_numbers_but_not_text() {
        assert_eq!(CellValue::guess(" 45000 "), CellValue::Integer(45000));
        assert_eq!(CellValue::guess("\t1.5"), CellValue::Float(1.5));
        assert_eq!(CellValue::guess(" Noord"), CellValue::String(" Noord".into()));
    }

    #[test]
    fn missing_tokens_guess_as_null() {
        for token in ["NA", "N/A", "#N/A", "null", "None", "NaN", " NA "] {
            assert_eq!(CellValue::guess(token), CellValue::Null, "{token:?}");
        }
    }

    #[test]
    fn repeated_extra_headers_keep_their_own_values() {
        let schema = Schema::resolve(&["gemeente", "regio", "regio"]).unwrap();
        let cells = vec![
            CellValue::text("Amsterdam"),
            CellValue::text("Noord"),
            CellValue::text("Zuid"),
        ];
        let rec = Record::from_cells(&schema, cells.clone()).unwrap();
        assert_eq!(rec.to_cells(&schema), cells);
    }
}
