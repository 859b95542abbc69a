use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the optional settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

/// Startup settings. Every field has a default, so `dashboard.json` only
/// needs the keys it wants to change:
///
/// ```json
/// { "data_path": "exports/march.csv", "currency_symbol": "$" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sales file loaded at startup.
    pub data_path: PathBuf,
    /// Banner image shown above the filters. Display only.
    pub banner_path: PathBuf,
    pub title: String,
    pub currency_symbol: String,
    /// Initial window size in logical points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/cloth_shop_data.csv"),
            banner_path: PathBuf::from("banner/afra.png"),
            title: "AFRA Fashion – Sales Analytics Dashboard".to_string(),
            currency_symbol: "৳".to_string(),
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists, otherwise fall back to the defaults.
    /// A file that exists but does not parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using default settings", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "data_path": "march.csv", "currency_symbol": "$" }"#).unwrap();

        let config = DashboardConfig::load_or_default(&path).unwrap();
        assert_eq!(config.data_path, PathBuf::from("march.csv"));
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.banner_path, DashboardConfig::default().banner_path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = DashboardConfig::load_or_default(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
