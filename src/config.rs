use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Source used when no config file overrides it.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/AbdullahOzisik/huizenmarkt/main/woningdata_per_gemeente.csv";

/// Looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "huizenmarkt.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Runtime settings. Every field has a default, so a config file only
/// needs to name what it changes:
///
/// ```json
/// { "data_url": "https://example.org/woningdata.csv", "histogram_bins": 30 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_url: String,
    pub request_timeout_secs: u64,
    pub download_file_name: String,
    pub comparison_file_name: String,
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            request_timeout_secs: 30,
            download_file_name: "woningdata_per_gemeente.csv".to_string(),
            comparison_file_name: "vergelijking_woningdata.csv".to_string(),
            histogram_bins: 20,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Read `path` if it exists, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(cfg) => {
                log::info!("Using config from {}", path.display());
                cfg
            }
            Err(e) => {
                log::error!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_other_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{ "histogram_bins": 7 }}"#)?;

        let cfg = DashboardConfig::from_file(file.path())?;
        assert_eq!(cfg.histogram_bins, 7);
        assert_eq!(cfg.data_url, DEFAULT_DATA_URL);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
        Ok(())
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "not json")?;

        assert!(DashboardConfig::from_file(file.path()).is_err());
        assert_eq!(
            DashboardConfig::load_or_default(file.path()),
            DashboardConfig::default()
        );
        Ok(())
    }

    #[test]
    fn missing_file_is_default() {
        let cfg = DashboardConfig::load_or_default(Path::new("/nonexistent/huizenmarkt.json"));
        assert_eq!(cfg, DashboardConfig::default());
    }
}
