//! Command implementations

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::{GraphWalker, RepackageOptions, Repackager, WalkOptions};
use crate::error::{try_with_recovery, ErrorSeverity, Result, ResultExt, WalkerError};
use crate::models::analysis::AnalysisReport;
use crate::models::config::Settings;
use crate::models::dependency_graph::DependencyGraph;
use crate::models::package::{CopyReport, RepackageRequest};
use crate::output::{create_formatter, create_progress_callback, create_writer, FileWriter, OutputWriter, ProgressReporter};
use crate::scene::{NullSceneProvider, SceneGraphProvider};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Write a default configuration file
    Init,
    /// Inventory the dependencies of a scene
    Analyze(Args),
    /// Inventory a scene, then copy it into a self-contained tree
    Package(Args),
}

/// Result of analyzing one scene
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub graph: DependencyGraph,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            Command::Init
        } else if args.package_to.is_some() {
            Command::Package(args)
        } else {
            Command::Analyze(args)
        }
    }

    /// Load settings for this command from every configuration source
    pub fn settings(&self) -> Result<Settings> {
        match self {
            Command::Init => Ok(Settings::default()),
            Command::Analyze(args) | Command::Package(args) => load_settings(args),
        }
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Command::Init => init_config(&PathBuf::from(DEFAULT_CONFIG_FILE)),
            Command::Analyze(_) | Command::Package(_) => {
                let settings = self.settings()?;
                run_with_settings(&settings, &NullSceneProvider)
            }
        }
    }

    /// Run the command, printing a user-facing message on failure, and map
    /// its outcome to a process exit code
    pub fn run(&self) -> i32 {
        let err = match self.execute() {
            Ok(()) => return 0,
            Err(err) => err,
        };

        eprintln!("\nError: {}", err.user_message());

        match &err {
            WalkerError::InvalidPath { .. } => {
                eprintln!("Suggestion: Check that the scene path exists and points to a file");
            }
            WalkerError::ConfigNotFound { .. } => {
                eprintln!("Suggestion: Create one with --init or drop the --config option");
            }
            WalkerError::ConfigParse { .. } => {
                eprintln!("Suggestion: Compare the file with the template written by --init");
            }
            WalkerError::PermissionDenied { .. } => {
                eprintln!("Suggestion: Check file permissions on the output location");
            }
            _ => {}
        }

        let code = exit_code(err.severity());
        if code > 0 {
            eprintln!("\nExiting with code {} due to {}", code, err.severity());
        }
        code
    }
}

/// Exit code for an error of the given severity
pub fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

fn load_settings(args: &Args) -> Result<Settings> {
    let settings = config::load_config(CliArgs::from(args))?;

    debug!(?settings, "resolved settings");
    Ok(settings)
}

/// Write the default configuration template, refusing to overwrite
pub fn init_config(path: &std::path::Path) -> Result<()> {
    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("To overwrite it, delete the file first and run this command again.");
        return Ok(());
    }

    config::create_default_config(path)?;

    println!("Created default configuration file at: {}", path.display());
    println!("\nEdit it to set the root marker, staging aliases and convention folders,");
    println!("or point scene-walker at another file with --config.");
    Ok(())
}

/// Analyze `settings.scene_path` with a fresh walker
pub fn analyze_scene(settings: &Settings, provider: &dyn SceneGraphProvider) -> Result<AnalysisOutcome> {
    let mut walker = GraphWalker::new(provider, WalkOptions::from(settings))?;
    let report = walker.analyze(&settings.scene_path, settings.base_dir.as_deref());
    let graph = walker.graph().clone();

    info!(
        references = report.references.len(),
        textures = report.textures.len(),
        issues = report.issues.len(),
        "analysis finished"
    );
    Ok(AnalysisOutcome { report, graph })
}

/// Copy the analyzed scene into `dest_root`
pub fn package_scene(
    settings: &Settings,
    report: &AnalysisReport,
    dest_root: impl Into<PathBuf>,
    reporter: Option<Arc<ProgressReporter>>,
) -> CopyReport {
    let request = RepackageRequest::from_report(report, dest_root);
    let mut repackager = Repackager::new(RepackageOptions::from(settings));

    if let Some(reporter) = &reporter {
        reporter.start(request.entry_count(), "Copying");
        repackager = repackager.with_progress(create_progress_callback(reporter.clone()));
    }

    let copy_report = repackager.repackage(&request);

    if let Some(reporter) = &reporter {
        reporter.finish(&copy_report.message);
    }
    copy_report
}

/// Run the analysis, optional graph export and optional repackaging
/// described by `settings`, writing the formatted result.
pub fn run_with_settings(settings: &Settings, provider: &dyn SceneGraphProvider) -> Result<()> {
    let show_progress = settings.show_progress && !settings.quiet;
    let reporter = Arc::new(ProgressReporter::new(show_progress));

    let spinner = reporter.create_spinner(&format!("Walking {}", settings.scene_path.display()));
    let outcome = analyze_scene(settings, provider);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let AnalysisOutcome { report, graph } =
        outcome.with_context(|| format!("Failed to analyze {}", settings.scene_path.display()))?;

    for issue in &report.issues {
        debug!(kind = %issue.kind, path = %issue.path.display(), "{}", issue.message);
    }

    // Non-critical export failures are logged and skipped
    if let Some(path) = &settings.graph_output {
        try_with_recovery(|| FileWriter::new(path).write(&graph.to_dot()))?;
    }

    let formatter = create_formatter(settings.output_format, settings.use_colors, settings.verbose, settings.quiet);
    let writer = create_writer(settings.output_file.as_ref());

    let Some(dest_root) = &settings.package_dir else {
        return writer.write(&formatter.format_report(&report)?);
    };

    let copy_report = package_scene(settings, &report, dest_root, show_progress.then(|| reporter.clone()));
    writer.write(&formatter.format_copy_report(&copy_report)?)?;

    if !copy_report.success {
        warn!("{}", copy_report.message);
        return Err(WalkerError::analysis_error(format!(
            "Repackaging failed: {}",
            copy_report.message
        )));
    }
    Ok(())
}
