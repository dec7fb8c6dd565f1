//! Pipeline configuration.
//!
//! Every setting has a default matching the 2026-02-27 SFPD snapshot, so the
//! pipeline runs without any config file. A `pipeline.toml` at the project
//! root (or a file passed with `--config`) overrides individual fields.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::SourceError;
use crate::paths;
use crate::registry::find_source;
use crate::source_def::SourceDefinition;

/// First year covered by the current dataset. Earlier sources are cut
/// off before it.
pub const DEFAULT_BOUNDARY_YEAR: i32 = 2018;

/// First year that is still incomplete and excluded from the output.
pub const DEFAULT_CUTOFF_YEAR: i32 = 2026;

/// Settings shared by both pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rows from sources with `truncate_at_boundary` are kept only if their
    /// year is strictly less than this.
    pub boundary_year: i32,
    /// Rows whose year is greater than or equal to this are dropped.
    pub cutoff_year: i32,
    /// Directory holding the raw exports named by each source's
    /// `file_name`.
    pub raw_data_dir: PathBuf,
    /// Per-source file overrides, keyed by source id.
    pub source_files: BTreeMap<String, PathBuf>,
    /// Output of the cleaning stage and input of the grouping stage.
    pub clean_output: PathBuf,
    /// Output of the grouping stage.
    pub grouped_output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            boundary_year: DEFAULT_BOUNDARY_YEAR,
            cutoff_year: DEFAULT_CUTOFF_YEAR,
            raw_data_dir: paths::raw_data_dir(),
            source_files: BTreeMap::new(),
            clean_output: paths::clean_data_path(),
            grouped_output: paths::grouped_data_path(),
        }
    }
}

impl PipelineConfig {
    /// Parses a config from a TOML string. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Toml`] if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> Result<Self, SourceError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the config from `path`, or from `pipeline.toml` at the project
    /// root if `path` is `None` and that file exists, or falls back to
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if an explicitly requested file can't be
    /// read or any file fails to parse or validate.
    pub fn load(path: Option<&Path>) -> Result<Self, SourceError> {
        let config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            None => {
                let default_path = paths::config_path();
                if default_path.is_file() {
                    log::info!("Loading config from {}", default_path.display());
                    Self::from_toml(&std::fs::read_to_string(&default_path)?)?
                } else {
                    log::debug!("No {} found, using defaults", paths::CONFIG_FILE_NAME);
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the year settings are consistent and that every file
    /// override names a registered source.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if `boundary_year > cutoff_year`, or
    /// [`SourceError::UnknownSource`] for an override with an unknown id.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.boundary_year > self.cutoff_year {
            return Err(SourceError::Config {
                message: format!(
                    "boundary_year ({}) must not be after cutoff_year ({})",
                    self.boundary_year, self.cutoff_year
                ),
            });
        }
        for id in self.source_files.keys() {
            find_source(id)?;
        }
        Ok(())
    }

    /// Returns the input file for `source`: an explicit override if one is
    /// configured, otherwise the source's default file in `raw_data_dir`.
    #[must_use]
    pub fn source_path(&self, source: &SourceDefinition) -> PathBuf {
        self.source_files
            .get(source.id())
            .cloned()
            .unwrap_or_else(|| self.raw_data_dir.join(&source.file_name))
    }

    /// Parses a `--source-file id=path` CLI argument and records the
    /// override.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the argument has no `=`, or
    /// [`SourceError::UnknownSource`] if the id isn't registered.
    pub fn set_source_file(&mut self, arg: &str) -> Result<(), SourceError> {
        let (id, path) = arg.split_once('=').ok_or_else(|| SourceError::Config {
            message: format!("expected ID=PATH, got '{arg}'"),
        })?;
        let source = find_source(id.trim())?;
        self.source_files
            .insert(source.id, PathBuf::from(path.trim()));
        Ok(())
    }
}
