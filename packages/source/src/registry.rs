//! Source registry. Loads every source definition from the embedded TOML files.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`]. The order of this list is the order
//! in which sources are concatenated into the merged dataset.

use crate::SourceError;
use crate::source_def::{SourceDefinition, parse_source_toml};

/// TOML configs embedded at compile time, oldest dataset first.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("sf_historical", include_str!("../sources/sf_historical.toml")),
    ("sf_current", include_str!("../sources/sf_current.toml")),
];

/// Returns all configured source definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (the configs are embedded, so this
/// is caught by the tests below rather than at runtime).
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a single source definition by id.
///
/// # Errors
///
/// Returns [`SourceError::UnknownSource`] if no source has that id.
pub fn find_source(id: &str) -> Result<SourceDefinition, SourceError> {
    all_sources()
        .into_iter()
        .find(|s| s.id() == id)
        .ok_or_else(|| SourceError::UnknownSource(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_sources_in_order() {
        let ids: Vec<String> = all_sources().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["sf_historical", "sf_current"]);
    }

    #[test]
    fn toml_names_match_ids() {
        for ((name, _), source) in SOURCE_TOMLS.iter().zip(all_sources()) {
            assert_eq!(*name, source.id);
        }
    }

    #[test]
    fn only_historical_is_truncated() {
        let truncated: Vec<String> = all_sources()
            .into_iter()
            .filter(|s| s.truncate_at_boundary)
            .map(|s| s.id)
            .collect();
        assert_eq!(truncated, vec!["sf_historical"]);
    }

    #[test]
    fn find_source_rejects_unknown_id() {
        assert!(find_source("sf_current").is_ok());
        assert!(matches!(
            find_source("oakland"),
            Err(SourceError::UnknownSource(id)) if id == "oakland"
        ));
    }
}
