//! Output formatting and writing functionality

mod formatters;
mod progress;
mod writers;

pub use self::formatters::{format_copy_report_text, format_report_summary, format_report_text};
pub use self::progress::{create_progress_callback, ProgressReporter};
pub use self::writers::{create_writer, FileWriter, OutputWriter, StdoutWriter};

use crate::error::Result;
use crate::models::analysis::AnalysisReport;
use crate::models::config::OutputFormat;
use crate::models::package::CopyReport;

/// Trait for different output formatters
pub trait Formatter {
    /// Format an analysis report into a string
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;

    /// Format a repackaging report into a string
    fn format_copy_report(&self, report: &CopyReport) -> Result<String>;
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    pub use_colors: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(use_colors: bool, verbose: bool, quiet: bool) -> Self {
        Self {
            use_colors,
            verbose,
            quiet,
        }
    }
}

impl Formatter for TextFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.quiet {
            return Ok(formatters::format_report_summary(report));
        }
        Ok(formatters::format_report_text(report, self.use_colors, self.verbose))
    }

    fn format_copy_report(&self, report: &CopyReport) -> Result<String> {
        if self.quiet {
            return Ok(format!("{}\n", report.message));
        }
        Ok(formatters::format_copy_report_text(report, self.use_colors, self.verbose))
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        formatters::format_report_json(report)
    }

    fn format_copy_report(&self, report: &CopyReport) -> Result<String> {
        formatters::format_copy_report_json(report)
    }
}

/// CSV formatter for spreadsheet analysis
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for CsvFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        formatters::format_report_csv(report)
    }

    fn format_copy_report(&self, report: &CopyReport) -> Result<String> {
        formatters::format_copy_report_csv(report)
    }
}

/// Create a formatter based on the output format
pub fn create_formatter(
    format: OutputFormat,
    use_colors: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_colors, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}
