#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the pipeline's data directory.
//!
//! All paths are relative to the project root's `data/` directory.

use std::path::{Path, PathBuf};

/// File name of the optional pipeline config at the project root.
pub const CONFIG_FILE_NAME: &str = "pipeline.toml";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`, falling back to the
/// current directory if the manifest has fewer than two ancestors.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the `data/raw-data/` directory holding the raw SFPD exports.
#[must_use]
pub fn raw_data_dir() -> PathBuf {
    data_dir().join("raw-data")
}

/// Returns the `data/clean-data/` directory for pipeline outputs.
#[must_use]
pub fn clean_data_dir() -> PathBuf {
    data_dir().join("clean-data")
}

/// Returns the path of the merged, normalized dataset.
#[must_use]
pub fn clean_data_path() -> PathBuf {
    clean_data_dir().join("sf_clean_data.csv")
}

/// Returns the path of the dataset with the `Focus Group` column.
#[must_use]
pub fn grouped_data_path() -> PathBuf {
    clean_data_dir().join("sf_clean_data_grouped.csv")
}

/// Returns the path of the optional `pipeline.toml` config.
#[must_use]
pub fn config_path() -> PathBuf {
    project_root().join(CONFIG_FILE_NAME)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_live_under_clean_data() {
        assert_eq!(clean_data_path().parent().unwrap(), clean_data_dir());
        assert_eq!(grouped_data_path().parent().unwrap(), clean_data_dir());
        assert!(raw_data_dir().starts_with(data_dir()));
    }
}
