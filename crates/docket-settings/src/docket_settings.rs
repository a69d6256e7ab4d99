//! Docket Settings
//!
//! Persisted configuration for the docket tools:
//! - Table defaults (page size, sort direction for newly sorted columns)
//! - Record storage (where the JSON collections live)
//!
//! Settings are stored as JSON in `<config dir>/docket/settings.json`. The
//! binary writes the defaults there on first run; `load_from` on a missing
//! file just returns them.

use anyhow::{Context, Result};
use docket_table::{DEFAULT_PAGE_SIZE, SortOrder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod settings_file;

pub use settings_file::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DocketSettings {
    pub table: TableSettings,
    pub store: StoreSettings,
}

impl DocketSettings {
    /// Load the settings, writing the defaults out first when no file
    /// exists yet so there is something to edit
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&Self::settings_path()?)
    }

    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let settings = Self::default();
        settings.save_to(path)?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "no settings file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content).with_context(|| "Failed to parse settings JSON")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn settings_path() -> Result<PathBuf> {
        settings_file()
    }

    /// Directory holding the record collections
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.store.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => data_dir(),
        }
    }

    /// Path of the JSON collection named `plural`
    pub fn collection_path(&self, plural: &str) -> Result<PathBuf> {
        self.data_dir().map(|dir| dir.join(format!("{}.json", plural)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub page_size: usize,
    /// Direction applied when a new column is sorted
    pub default_sort_order: SortOrder,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort_order: SortOrder::Ascending,
        }
    }
}

impl TableSettings {
    /// The configured page size, or the default when it is zero
    pub fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            tracing::warn!("page_size of 0 in settings, using {}", DEFAULT_PAGE_SIZE);
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreSettings {
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DocketSettings::load_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(settings, DocketSettings::default());
        assert_eq!(settings.table.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = DocketSettings::default();
        settings.table.page_size = 50;
        settings.table.default_sort_order = SortOrder::Descending;
        settings.store.data_dir = Some(dir.path().join("records"));

        settings.save_to(&path).unwrap();
        assert_eq!(DocketSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docket").join("settings.json");

        let settings = DocketSettings::load_or_create_at(&path).unwrap();
        assert_eq!(settings, DocketSettings::default());
        assert!(path.is_file());

        std::fs::write(&path, r#"{ "table": { "page_size": 40 } }"#).unwrap();
        let settings = DocketSettings::load_or_create_at(&path).unwrap();
        assert_eq!(settings.table.page_size, 40);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "table": { "page_size": 10 } }"#).unwrap();

        let settings = DocketSettings::load_from(&path).unwrap();
        assert_eq!(settings.table.page_size, 10);
        assert_eq!(settings.table.default_sort_order, SortOrder::Ascending);
        assert_eq!(settings.store.data_dir, None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DocketSettings::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings JSON"));
    }

    #[test]
    fn test_collection_path_uses_override() {
        let mut settings = DocketSettings::default();
        settings.store.data_dir = Some(PathBuf::from("/srv/docket"));
        assert_eq!(
            settings.collection_path("cases").unwrap(),
            PathBuf::from("/srv/docket/cases.json")
        );
    }

    #[test]
    fn test_zero_page_size_falls_back() {
        let table = TableSettings {
            page_size: 0,
            ..TableSettings::default()
        };
        assert_eq!(table.effective_page_size(), DEFAULT_PAGE_SIZE);
    }
}
