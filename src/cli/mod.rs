//! Command-line interface components

pub mod args;
pub mod commands;

pub use args::Args;
pub use commands::{analyze_scene, package_scene, run_with_settings, AnalysisOutcome, Command};
