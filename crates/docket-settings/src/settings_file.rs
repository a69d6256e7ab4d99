//! Platform locations for docket's files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::DocketSettings;

const APP_DIR: &str = "docket";

/// `<config dir>/docket`, home of `settings.json`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_DIR))
}

/// `<data dir>/docket`, the default home of the record collections
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Could not determine data directory")?;
    Ok(base.join(APP_DIR))
}

/// Rolling JSON logs live beside the default collections, even when the
/// collections themselves are redirected
pub fn logs_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("logs"))
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.json"))
}

/// Create the config, collection and log directories `settings` points
/// at. Returns the directories that did not exist before.
pub fn ensure_directories(settings: &DocketSettings) -> Result<Vec<PathBuf>> {
    create_missing(&[config_dir()?, settings.data_dir()?, logs_dir()?])
}

fn create_missing(dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for dir in dirs {
        if dir.is_dir() || created.contains(dir) {
            continue;
        }
        create_dir(dir)?;
        created.push(dir.clone());
    }
    Ok(created)
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_missing_reports_new_directories_once() {
        let root = tempfile::tempdir().unwrap();
        let records = root.path().join("records");
        let logs = root.path().join("state").join("logs");

        let created = create_missing(&[
            root.path().to_path_buf(),
            records.clone(),
            logs.clone(),
            records.clone(),
        ])
        .unwrap();

        assert_eq!(created, vec![records.clone(), logs.clone()]);
        assert!(records.is_dir());
        assert!(logs.is_dir());
        assert!(create_missing(&[records, logs]).unwrap().is_empty());
    }

    #[test]
    fn test_create_missing_fails_on_a_file_in_the_way() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("records");
        std::fs::write(&blocker, "").unwrap();

        let err = create_missing(&[blocker.join("cases")]).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create directory"));
    }

}
