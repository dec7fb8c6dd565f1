//! Progress reporting for the cleaning and grouping stages.
//!
//! Stages report through [`ProgressCallback`] without knowing how progress
//! is shown. The interactive CLI plugs in `indicatif` bars, the standalone
//! binaries use [`LogProgress`], and tests use [`NullProgress`].

use std::sync::Arc;

/// Number of rows between progress updates while scanning a file.
pub const ROW_PROGRESS_INTERVAL: u64 = 10_000;

/// Receives progress updates from a running stage.
///
/// Shared behind an [`Arc`] between the stage and its caller, hence
/// `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Sets the number of units the current step expects.
    fn set_total(&self, total: u64);

    /// Moves to an absolute position.
    fn set_position(&self, pos: u64);

    /// Advances by `delta` units.
    fn inc(&self, delta: u64);

    /// Replaces the status text.
    fn set_message(&self, msg: String);

    /// Marks the work done, leaving `msg` visible.
    fn finish(&self, msg: String);

    /// Marks the work done and hides the indicator.
    fn finish_and_clear(&self);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}

/// Forwards status messages to the `log` facade, tagged with a stage name.
///
/// Positions are only logged at `trace` level.
pub struct LogProgress {
    stage: &'static str,
}

impl ProgressCallback for LogProgress {
    fn set_total(&self, total: u64) {
        log::debug!("[{}] {total} units of work", self.stage);
    }

    fn set_position(&self, pos: u64) {
        log::trace!("[{}] at {pos}", self.stage);
    }

    fn inc(&self, _delta: u64) {}

    fn set_message(&self, msg: String) {
        log::info!("[{}] {msg}", self.stage);
    }

    fn finish(&self, msg: String) {
        log::info!("[{}] {msg}", self.stage);
    }

    fn finish_and_clear(&self) {}
}

/// Returns a shared [`LogProgress`] for `stage`.
#[must_use]
pub fn log_progress(stage: &'static str) -> Arc<dyn ProgressCallback> {
    Arc::new(LogProgress { stage })
}

/// Counts rows and reports the running count every
/// [`ROW_PROGRESS_INTERVAL`] rows.
pub struct RowTicker<'a> {
    progress: &'a Arc<dyn ProgressCallback>,
    count: u64,
}

impl<'a> RowTicker<'a> {
    #[must_use]
    pub const fn new(progress: &'a Arc<dyn ProgressCallback>) -> Self {
        Self { progress, count: 0 }
    }

    /// Counts one row.
    pub fn tick(&mut self) {
        self.count += 1;
        if self.count % ROW_PROGRESS_INTERVAL == 0 {
            self.progress.set_position(self.count);
        }
    }

    /// Reports the final count and returns it.
    pub fn finish(self) -> u64 {
        self.progress.set_position(self.count);
        self.count
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Positions(Mutex<Vec<u64>>);

    impl ProgressCallback for Positions {
        fn set_total(&self, _total: u64) {}
        fn set_position(&self, pos: u64) {
            self.0.lock().unwrap().push(pos);
        }
        fn inc(&self, _delta: u64) {}
        fn set_message(&self, _msg: String) {}
        fn finish(&self, _msg: String) {}
        fn finish_and_clear(&self) {}
    }

    #[test]
    fn ticker_reports_every_interval_and_at_the_end() {
        let positions = Arc::new(Positions::default());
        let progress: Arc<dyn ProgressCallback> = positions.clone();

        let mut ticker = RowTicker::new(&progress);
        for _ in 0..(2 * ROW_PROGRESS_INTERVAL + 5) {
            ticker.tick();
        }
        assert_eq!(ticker.finish(), 2 * ROW_PROGRESS_INTERVAL + 5);

        assert_eq!(
            *positions.0.lock().unwrap(),
            vec![
                ROW_PROGRESS_INTERVAL,
                2 * ROW_PROGRESS_INTERVAL,
                2 * ROW_PROGRESS_INTERVAL + 5
            ]
        );
    }

    #[test]
    fn empty_ticker_reports_zero() {
        let progress = null_progress();
        assert_eq!(RowTicker::new(&progress).finish(), 0);
    }
}
