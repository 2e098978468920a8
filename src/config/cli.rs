//! Command-line argument configuration source

use std::path::PathBuf;

use crate::cli::args::Args;
use crate::error::Result;
use crate::models::config::{OutputFormat, PartialSettings};
use super::ConfigSource;

/// Command-line argument configuration source
#[derive(Debug)]
pub struct CliConfig {
    args: CliArgs,
    name: String,
    priority: u8,
}

/// Command-line values relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub scene: Option<PathBuf>,
    pub base_dir: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub package_dir: Option<PathBuf>,
    pub graph_output: Option<PathBuf>,
    pub root_marker: Option<String>,
    pub staging_aliases: Vec<String>,
    pub max_depth: Option<usize>,
    pub dry_run: bool,
    pub no_parallel: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
    pub no_progress: bool,
    pub config: Option<PathBuf>,
}

impl From<&Args> for CliArgs {
    fn from(args: &Args) -> Self {
        Self {
            scene: args.scene.clone(),
            base_dir: args.base_dir.clone(),
            output_format: args.format.map(OutputFormat::from),
            output_file: args.output.clone(),
            package_dir: args.package_to.clone(),
            graph_output: args.graph.clone(),
            root_marker: args.root_marker.clone(),
            staging_aliases: args.staging_aliases.clone(),
            max_depth: args.max_depth,
            dry_run: args.dry_run,
            no_parallel: args.no_parallel,
            quiet: args.quiet,
            verbose: args.verbose,
            no_color: args.no_color,
            no_progress: args.no_progress,
            config: args.config.clone(),
        }
    }
}

impl CliConfig {
    /// Create a new CLI configuration source
    pub fn new(args: CliArgs) -> Self {
        Self {
            args,
            name: "command-line arguments".to_string(),
            priority: 30,
        }
    }

    /// Create a CLI configuration source from parsed Args
    pub fn from_args(args: &Args) -> Self {
        Self::new(CliArgs::from(args))
    }

    /// Get the config file path if specified
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.args.config.as_ref()
    }
}

impl ConfigSource for CliConfig {
    fn load(&self) -> Result<PartialSettings> {
        let args = &self.args;
        let mut settings = PartialSettings {
            scene_path: args.scene.clone(),
            base_dir: args.base_dir.clone(),
            output_format: args.output_format,
            output_file: args.output_file.clone(),
            package_dir: args.package_dir.clone(),
            graph_output: args.graph_output.clone(),
            root_marker: args.root_marker.clone(),
            max_depth: args.max_depth,
            ..Default::default()
        };

        if !args.staging_aliases.is_empty() {
            settings.staging_aliases = Some(args.staging_aliases.clone());
        }

        // Flags only ever override towards their non-default value
        if args.dry_run {
            settings.dry_run = Some(true);
        }
        if args.no_parallel {
            settings.parallel = Some(false);
        }
        if args.quiet {
            settings.quiet = Some(true);
        }
        if args.verbose {
            settings.verbose = Some(true);
        }
        if args.no_color {
            settings.use_colors = Some(false);
        }
        if args.no_progress {
            settings.show_progress = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
