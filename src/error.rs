use thiserror::Error;

// ---------------------------------------------------------------------------
// Dashboard error taxonomy
// ---------------------------------------------------------------------------

/// Every failure the dashboard can surface to the user.
///
/// Loader internals work with `anyhow` and are flattened into [`DashboardError::Load`]
/// at the public boundary, so the UI only ever deals with this enum.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Network failure, non-success HTTP status, malformed CSV/JSON/Parquet.
    #[error("Fout bij laden van data: {0}")]
    Load(String),

    /// A required column is absent from the source.
    #[error("Kolom '{missing}' ontbreekt (gevonden kolommen: {})", .found.join(", "))]
    Schema {
        missing: &'static str,
        found: Vec<String>,
    },

    /// The selected municipality has no rows in the dataset.
    #[error("Gemeente '{0}' niet gevonden in de data")]
    NotFound(String),

    /// Writing the CSV download failed.
    #[error("Fout bij opslaan van CSV: {0}")]
    Export(String),
}

impl DashboardError {
    /// Wrap an `anyhow` chain as a load error, keeping the full context.
    pub fn load(err: anyhow::Error) -> Self {
        DashboardError::Load(format!("{err:#}"))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_found_columns() {
        let err = DashboardError::Schema {
            missing: "gemeente",
            found: vec!["jaar".into(), "totaal_inwoners".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'gemeente'"));
        assert!(msg.contains("jaar, totaal_inwoners"));
    }

    #[test]
    fn load_keeps_context_chain() {
        let inner = anyhow::anyhow!("connection refused").context("GET https://example.invalid");
        let err = DashboardError::load(inner);
        assert_eq!(
            err,
            DashboardError::Load("GET https://example.invalid: connection refused".into())
        );
    }
}
