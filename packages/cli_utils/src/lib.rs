#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal helpers for the interactive SF crime pipeline.
//!
//! [`init_logger`] routes `log` output through an `indicatif`
//! [`MultiProgress`] so log lines don't tear through the bars, and
//! [`IndicatifProgress`] renders a stage's [`ProgressCallback`] updates.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use sf_crime_source::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const SPINNER_TICK: Duration = Duration::from_millis(100);

fn row_spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg} {human_pos} rows")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// A [`ProgressCallback`] drawn as an `indicatif` bar.
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Applied once the total is known.
    sized_style: ProgressStyle,
}

impl IndicatifProgress {
    fn attach(
        multi: &MultiProgress,
        bar: ProgressBar,
        initial: ProgressStyle,
        sized_style: ProgressStyle,
        message: &str,
    ) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(bar);
        bar.set_style(initial);
        bar.set_message(message.to_string());
        Arc::new(Self { bar, sized_style })
    }

    /// Bar for rows read from a CSV file.
    ///
    /// Starts as a spinner showing the running row count, since a file's
    /// length isn't known until it has been read. Becomes a full bar once a
    /// stage calls [`ProgressCallback::set_total()`].
    #[must_use]
    pub fn rows_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(SPINNER_TICK);
        Self::attach(
            multi,
            bar,
            row_spinner_style(),
            bar_style("  {msg} {wide_bar:.cyan/dim} {human_pos}/{human_len} rows [{eta}]"),
            message,
        )
    }

    /// Bar counting the steps of one stage. The stage sets the total.
    #[must_use]
    pub fn steps_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let style = bar_style("{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]");
        Self::attach(multi, ProgressBar::new(0), style.clone(), style, message)
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.sized_style.clone());
    }

    fn set_position(&self, pos: u64) {
        self.bar.set_position(pos);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }

    fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

/// Installs `pretty_env_logger` (configured by `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Every bar must be added to the returned [`MultiProgress`] for log output
/// to be suspended while it redraws.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(level);
    }

    multi
}
