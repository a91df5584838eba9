use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Known columns
// ---------------------------------------------------------------------------

/// Columns the dashboard understands. Anything else is carried through
/// untouched as an extra column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Municipality,
    AverageIncome,
    AverageWoz,
    Population,
    Latitude,
    Longitude,
    Year,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Municipality,
        Column::AverageIncome,
        Column::AverageWoz,
        Column::Population,
        Column::Latitude,
        Column::Longitude,
        Column::Year,
    ];

    /// Canonical (lower-case) header name.
    pub fn header(self) -> &'static str {
        match self {
            Column::Municipality => "gemeente",
            Column::AverageIncome => "gemiddeld_inkomen",
            Column::AverageWoz => "gemiddelde_woz",
            Column::Population => "totaal_inwoners",
            Column::Latitude => "latitude",
            Column::Longitude => "longitude",
            Column::Year => "jaar",
        }
    }

    /// Match a source header. Header names are compared case-insensitively
    /// (`GEMEENTE` and `gemeente` both resolve); values never are.
    pub fn from_header(header: &str) -> Option<Column> {
        let h = header.trim_start_matches('\u{feff}').trim();
        Column::ALL
            .into_iter()
            .find(|c| c.header().eq_ignore_ascii_case(h))
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Municipality | Column::Year)
    }
}

// ---------------------------------------------------------------------------
// Schema: header order + resolved column kinds
// ---------------------------------------------------------------------------

/// What a source header resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Known(Column),
    Extra,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Header text as it appeared in the source.
    pub name: String,
    pub kind: FieldKind,
}

/// The validated header of a dataset, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    /// Resolve raw headers, failing when the municipality column is absent.
    ///
    /// A header that appears twice only binds the first occurrence to a
    /// known column; later duplicates are kept as extra columns.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let mut fields = Vec::with_capacity(headers.len());
        for h in headers {
            let name = h.as_ref().to_string();
            let kind = match Column::from_header(&name) {
                Some(col) if !fields.iter().any(|f: &Field| f.kind == FieldKind::Known(col)) => {
                    FieldKind::Known(col)
                }
                _ => FieldKind::Extra,
            };
            fields.push(Field { name, kind });
        }

        let schema = Schema { fields };
        if !schema.has(Column::Municipality) {
            return Err(DashboardError::Schema {
                missing: Column::Municipality.header(),
                found: schema.names(),
            });
        }
        Ok(schema)
    }

    pub fn has(&self, column: Column) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::Known(column))
    }

    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
