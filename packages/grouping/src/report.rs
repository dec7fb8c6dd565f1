//! Mapping coverage diagnostics.
//!
//! The report is never persisted alongside the data. It exists so that new
//! category strings appearing upstream get noticed instead of silently
//! landing in the catch-all group.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::Serialize;
use sf_crime_crime_models::FocusGroup;
use sf_crime_source::SourceError;

/// Number of rows carrying one focus group label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    /// The label.
    pub focus_group: FocusGroup,
    /// Rows carrying it.
    pub count: u64,
}

/// Coverage statistics for one grouping run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Rows processed.
    pub total_rows: u64,
    /// Distinct non-null category values.
    pub total_categories: usize,
    /// Distinct categories that resolved to something other than the
    /// catch-all.
    pub mapped_categories: usize,
    /// Distinct categories that fell back to the catch-all, sorted.
    pub unmapped_categories: Vec<String>,
    /// Rows per focus group, most frequent first.
    pub distribution: Vec<GroupCount>,
}

impl CoverageReport {
    /// Share of distinct categories that were mapped, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mapped_percent(&self) -> f64 {
        if self.total_categories == 0 {
            return 0.0;
        }
        self.mapped_categories as f64 * 100.0 / self.total_categories as f64
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if serialization or the write fails.
    pub fn write_json(&self, path: &Path) -> Result<(), SourceError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Coverage report written to {}", path.display());
        Ok(())
    }
}

/// Accumulates per-row observations into a [`CoverageReport`].
#[derive(Debug, Default)]
pub(crate) struct CoverageBuilder {
    rows: u64,
    categories: HashMap<String, FocusGroup>,
    counts: BTreeMap<FocusGroup, u64>,
}

impl CoverageBuilder {
    /// Records one row. Null categories count toward the distribution only.
    pub(crate) fn record(&mut self, category: Option<&str>, group: FocusGroup) {
        self.rows += 1;
        *self.counts.entry(group).or_default() += 1;
        if let Some(category) = category
            && !self.categories.contains_key(category)
        {
            self.categories.insert(category.to_string(), group);
        }
    }

    pub(crate) fn build(self) -> CoverageReport {
        let unmapped: BTreeSet<String> = self
            .categories
            .iter()
            .filter(|(_, group)| group.is_catch_all())
            .map(|(category, _)| category.clone())
            .collect();

        let mut distribution: Vec<GroupCount> = self
            .counts
            .into_iter()
            .map(|(focus_group, count)| GroupCount { focus_group, count })
            .collect();
        distribution.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.focus_group.label().cmp(b.focus_group.label()))
        });

        CoverageReport {
            total_rows: self.rows,
            total_categories: self.categories.len(),
            mapped_categories: self.categories.len() - unmapped.len(),
            unmapped_categories: unmapped.into_iter().collect(),
            distribution,
        }
    }
}

/// Prints the coverage report to stdout.
pub fn print_report(report: &CoverageReport) {
    println!("--- Mapping Verification ---");
    println!("Total unique categories: {}", report.total_categories);
    println!(
        "Categories mapped to a specific group: {} ({:.1}%)",
        report.mapped_categories,
        report.mapped_percent()
    );
    if report.unmapped_categories.is_empty() {
        println!("Every category has a specific group.");
    } else {
        println!(
            "Categories defaulted to '{}': {}",
            FocusGroup::CATCH_ALL,
            report.unmapped_categories.len()
        );
        for category in &report.unmapped_categories {
            println!("  - {category}");
        }
    }

    println!();
    println!("--- Focus Group Distribution ---");
    let width = report
        .distribution
        .iter()
        .map(|g| g.focus_group.label().len())
        .max()
        .unwrap_or(0);
    for entry in &report.distribution {
        println!(
            "{:<width$}  {:>10}",
            entry.focus_group.label(),
            entry.count
        );
    }
    println!("{:<width$}  {:>10}", "Total", report.total_rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_categories_only_touch_distribution() {
        let mut builder = CoverageBuilder::default();
        builder.record(None, FocusGroup::CATCH_ALL);
        builder.record(None, FocusGroup::CATCH_ALL);
        let report = builder.build();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.total_categories, 0);
        assert!(report.unmapped_categories.is_empty());
        assert_eq!(
            report.distribution,
            vec![GroupCount {
                focus_group: FocusGroup::CATCH_ALL,
                count: 2
            }]
        );
        assert!(report.mapped_percent().abs() < f64::EPSILON);
    }

    #[test]
    fn ties_are_ordered_by_label() {
        let mut builder = CoverageBuilder::default();
        builder.record(Some("WEAPON LAWS"), FocusGroup::Weapons);
        builder.record(Some("FRAUD"), FocusGroup::FinancialCrime);
        let report = builder.build();

        let order: Vec<_> = report.distribution.iter().map(|g| g.focus_group).collect();
        assert_eq!(order, vec![FocusGroup::FinancialCrime, FocusGroup::Weapons]);
        assert_eq!(report.mapped_categories, 2);
        assert!((report.mapped_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_with_labels() {
        let mut builder = CoverageBuilder::default();
        builder.record(Some("Jaywalking"), FocusGroup::CATCH_ALL);
        let json = serde_json::to_value(builder.build()).unwrap();

        assert_eq!(json["unmapped_categories"][0], "Jaywalking");
        assert_eq!(json["distribution"][0]["focus_group"], "Other/Suspicious");
        assert_eq!(json["distribution"][0]["count"], 1);
    }

    #[test]
    fn writes_json_file() {
        let dir = std::env::temp_dir().join(format!("sf_crime_report_{}", std::process::id()));
        let path = dir.join("nested").join("coverage.json");
        let mut builder = CoverageBuilder::default();
        builder.record(Some("ROBBERY"), FocusGroup::ViolentCrime);
        builder.build().write_json(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["total_rows"], 1);
        assert_eq!(written["mapped_categories"], 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
