//! Progress reporting functionality
//!
//! Bars draw on stderr so a report written to stdout stays clean.

use crate::core::parallel::{ProgressCallback, ProgressUpdate};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Progress reporter for analysis and copy batches
pub struct ProgressReporter {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a reporter; nothing is drawn when `enabled` is false
    pub fn new(enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            bar.set_style(bar_style());
            bar
        });
        Self { enabled, bar }
    }

    /// A reporter that never draws
    pub fn hidden() -> Self {
        Self::new(false)
    }

    /// Start a new progress operation
    pub fn start(&self, total: usize, operation: &str) {
        debug!(total, operation, "progress started");
        if let Some(bar) = &self.bar {
            bar.reset();
            bar.set_length(total as u64);
            bar.set_position(0);
            bar.set_message(operation.to_string());
        }
    }

    /// Update progress
    pub fn update(&self, current: usize, total: usize, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
            bar.set_message(message.to_string());
        }
    }

    /// Update progress from a ProgressUpdate
    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    /// Finish the progress operation
    pub fn finish(&self, message: &str) {
        debug!(message, "progress finished");
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Spinner for work of unknown length, such as the reference walk
    pub fn create_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.enabled {
            return None;
        }

        let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        spinner.set_style(spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }

    /// Check if progress drawing is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current bar position, if a bar exists
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }
}

/// Create a progress callback that updates a ProgressReporter
pub fn create_progress_callback(reporter: Arc<ProgressReporter>) -> ProgressCallback {
    Box::new(move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    })
}
